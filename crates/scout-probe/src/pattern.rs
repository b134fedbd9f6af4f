//! Directory-name patterns for versioned install roots

use std::fmt;

use regex::{Regex, RegexBuilder};
use scout_version::VersionId;

use crate::error::{Error, Result};

/// A compiled, case-insensitive pattern matched against the start of a
/// candidate directory name.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
    raw: String,
}

/// The outcome of matching a directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// Version derived from the capture groups, if it is a concrete
    /// identifier.
    pub version: Option<VersionId>,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            regex,
            raw: pattern.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `name` and derive a version from the capture groups.
    ///
    /// The match must start at the beginning of the name. The version is
    /// the first and last capture groups joined by `.` (`2016.3.210` with
    /// three groups gives `2016.210`); a single group is used as is. The
    /// derived text is dropped when it is not a concrete version.
    pub fn extract(&self, name: &str) -> Option<NameMatch> {
        let caps = self.regex.captures(name)?;
        if caps.get(0).is_none_or(|m| m.start() != 0) {
            return None;
        }

        let groups: Vec<&str> = caps.iter().skip(1).map(|g| g.map_or("", |m| m.as_str())).collect();
        let text = match groups.as_slice() {
            [] => None,
            [only] => Some((*only).to_string()),
            [first, .., last] => Some(format!("{first}.{last}")),
        };
        let version = text
            .and_then(|t| VersionId::parse(&t).ok())
            .filter(VersionId::is_concrete);

        Some(NameMatch { version })
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for NamePattern {}
