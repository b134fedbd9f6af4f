//! Host and target platform identities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Architecture value that matches every architecture when registered.
pub const ANY_ARCH: &str = "any";

/// An `{os_family, architecture}` pair such as `posix-x86_64`.
///
/// Both parts are stored lowercase. A configuration registered with the
/// architecture `any` serves requests for every architecture of that OS
/// family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform {
    pub os_family: String,
    pub architecture: String,
}

impl Platform {
    pub fn new(os_family: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            os_family: os_family.into().to_lowercase(),
            architecture: architecture.into().to_lowercase(),
        }
    }

    /// The platform this process runs on.
    pub fn host() -> Self {
        let os_family = match std::env::consts::OS {
            "windows" => "win32",
            "macos" => "darwin",
            _ => "posix",
        };
        Self::new(os_family, std::env::consts::ARCH)
    }

    /// Whether a configuration registered for `self` serves `requested`.
    pub fn matches(&self, requested: &Platform) -> bool {
        self.os_family == requested.os_family
            && (self.architecture == ANY_ARCH || self.architecture == requested.architecture)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os_family, self.architecture)
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPlatform {
            input: s.to_string(),
        };
        let (os, arch) = s.trim().split_once('-').ok_or_else(invalid)?;
        if os.is_empty() || arch.is_empty() || arch.contains('-') {
            return Err(invalid());
        }
        Ok(Self::new(os, arch))
    }
}

impl TryFrom<String> for Platform {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.to_string()
    }
}
