//! Compiler families and their version-query conventions
//!
//! Each [`ToolchainKind`] is backed by a small [`CompilerFamily`]
//! implementation that knows how to ask its compiler for a version and how
//! to read the answer.

mod clang;
mod gcc;
mod intelc;
mod msvc;

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use scout_version::VersionId;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use clang::Clang;
pub use gcc::Gcc;
pub use intelc::IntelC;
pub use msvc::Msvc;

/// The compiler kinds the resolver knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainKind {
    Msvc,
    Gcc,
    Clang,
    IntelC,
}

impl ToolchainKind {
    pub const ALL: [ToolchainKind; 4] = [Self::Msvc, Self::Gcc, Self::Clang, Self::IntelC];

    /// Lowercase identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Msvc => "msvc",
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::IntelC => "intelc",
        }
    }

    /// Prefix used in placeholders and environment variables (`INTELC`).
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::Msvc => "MSVC",
            Self::Gcc => "GCC",
            Self::Clang => "CLANG",
            Self::IntelC => "INTELC",
        }
    }

    /// The probing behavior for this kind.
    pub fn family(&self) -> &'static dyn CompilerFamily {
        match self {
            Self::Msvc => &Msvc,
            Self::Gcc => &Gcc,
            Self::Clang => &Clang,
            Self::IntelC => &IntelC,
        }
    }
}

impl fmt::Display for ToolchainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolchainKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// Per-kind knowledge needed to probe a compiler.
pub trait CompilerFamily: Send + Sync + fmt::Debug {
    fn kind(&self) -> ToolchainKind;

    /// Human readable name used in version reports, e.g. `GCC`.
    fn display_name(&self) -> &'static str;

    /// Arguments that make the compiler print its version.
    fn version_args(&self) -> &'static [&'static str];

    /// Regex over a single banner line; the version is the last capture
    /// group.
    fn banner_pattern(&self) -> &Regex;

    /// Binary name probed when a definition does not name one.
    fn default_binary(&self) -> &'static str;

    /// Placeholder name for the install root, e.g. `INTELC.INSTALL_ROOT`.
    fn root_placeholder(&self) -> String {
        format!("{}.INSTALL_ROOT", self.kind().env_prefix())
    }

    /// Placeholder name for the resolved version, e.g. `GCC.VERSION`.
    fn version_placeholder(&self) -> String {
        format!("{}.VERSION", self.kind().env_prefix())
    }

    /// Environment variable recording the resolved version, e.g.
    /// `INTELC_VERSION`.
    fn version_var(&self) -> String {
        format!("{}_VERSION", self.kind().env_prefix())
    }

    /// Find the first banner line carrying a concrete version.
    fn extract_version(&self, output: &str) -> Option<VersionId> {
        output.lines().find_map(|line| {
            let caps = self.banner_pattern().captures(line.trim())?;
            let raw = caps.iter().skip(1).flatten().last()?.as_str();
            VersionId::parse(raw.trim_end_matches('.'))
                .ok()
                .filter(VersionId::is_concrete)
        })
    }

    /// One-line report such as `GCC 9.4.0`.
    fn report(&self, version: &VersionId) -> String {
        format!("{} {}", self.display_name(), version)
    }
}
