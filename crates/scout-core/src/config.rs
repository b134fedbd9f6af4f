//! Toolchain definition files and runtime settings
//!
//! A definitions file is TOML, JSON or YAML (picked by extension):
//!
//! ```toml
//! [settings]
//! probe_timeout_secs = 10
//!
//! [[toolchain]]
//! name = "intelc-16-intel64"
//! kind = "intelc"
//! version_range = "16.*-*"
//! hosts = ["posix-x86_64"]
//! targets = ["posix-x86_64"]
//! search_roots = ["/opt/intel"]
//! name_pattern = '^compilers_and_libraries_(\d+)\.(\d+)\.(\d+)$'
//! arch = "intel64"
//! platform_subdir = "linux"
//! env_overrides = ["ICPP_COMPILER16"]
//!
//! [toolchain.shell_vars]
//! PATH = "${INTELC.INSTALL_ROOT}/linux/bin/intel64/"
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use scout_fs::{ConfigStore, NormalizedPath};
use scout_probe::{InstallLayout, ProbeStrategy, ToolchainKind};
use scout_version::VersionConstraint;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::Platform;
use crate::scanner::EnvSource;

/// Environment variable overriding [`Settings::probe_timeout_secs`].
pub const PROBE_TIMEOUT_ENV: &str = "SCOUT_PROBE_TIMEOUT_SECS";

/// Default time a compiler gets to print its version.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Settings shared by every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

fn default_probe_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Apply [`PROBE_TIMEOUT_ENV`] if it holds a positive integer.
    pub fn with_env_override(mut self, env: &dyn EnvSource) -> Self {
        if let Some(raw) = env.var(PROBE_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.probe_timeout_secs = secs,
                _ => tracing::warn!(
                    var = PROBE_TIMEOUT_ENV,
                    value = %raw,
                    "ignoring invalid probe timeout override"
                ),
            }
        }
        self
    }
}

/// One `[[toolchain]]` entry of a definitions file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainDefinition {
    pub name: String,
    pub kind: ToolchainKind,
    #[serde(default)]
    pub version_range: VersionConstraint,
    pub hosts: Vec<Platform>,
    pub targets: Vec<Platform>,
    #[serde(default)]
    pub search_roots: Vec<NormalizedPath>,
    #[serde(default)]
    pub name_pattern: Option<String>,
    #[serde(default)]
    pub strategy: Option<ProbeStrategy>,
    #[serde(default)]
    pub layout: InstallLayout,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub platform_subdir: Option<String>,
    /// Compiler binary; defaults to the kind's usual name.
    #[serde(default)]
    pub binary: Option<String>,
    #[serde(default)]
    pub env_overrides: Vec<String>,
    #[serde(default)]
    pub shell_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub subst_vars: BTreeMap<String, String>,
    /// File that proves an install is usable; defaults to the binary name.
    #[serde(default)]
    pub test_file: Option<String>,
}

/// A whole definitions file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, rename = "toolchain")]
    pub toolchains: Vec<ToolchainDefinition>,
}

impl RegistryFile {
    /// Load a definitions file, format detected from the extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let file = ConfigStore::new().load(path)?;
        Ok(file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// `<config dir>/toolscout/toolchains.toml`, if the platform has a config
/// directory.
pub fn default_config_path() -> Option<NormalizedPath> {
    dirs::config_dir().map(|dir| NormalizedPath::new(dir.join("toolscout").join("toolchains.toml")))
}
