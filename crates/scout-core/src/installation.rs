//! Verified toolchain installations

use std::collections::BTreeMap;

use scout_fs::NormalizedPath;
use scout_probe::{ProbedInstall, ToolchainKind};
use scout_version::VersionId;

use crate::scanner::ScannerConfig;

/// One concrete, verified toolchain on disk.
///
/// Created by a scan and never modified; shared as `Arc<Installation>`
/// until the owning cache entry is invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub kind: ToolchainKind,
    /// Authoritative version, always concrete.
    pub version: VersionId,
    /// Other versions this install is keyed by (directory-name versions
    /// that differ from the binary's own).
    pub aliases: Vec<VersionId>,
    pub root_path: NormalizedPath,
    pub binary: NormalizedPath,
    pub shell_vars: BTreeMap<String, String>,
    pub subst_vars: BTreeMap<String, String>,
    pub test_file: String,
    /// Name of the configuration that found it.
    pub config: String,
}

impl Installation {
    pub fn from_probe(config: &ScannerConfig, probed: ProbedInstall) -> Self {
        Self {
            kind: config.kind,
            version: probed.version,
            aliases: probed.aliases,
            root_path: probed.root,
            binary: probed.binary,
            shell_vars: config.shell_vars.clone(),
            subst_vars: config.subst_vars.clone(),
            test_file: config.test_file.clone(),
            config: config.name.clone(),
        }
    }

    /// All keys this install is known by: the version, then aliases.
    pub fn keys(&self) -> impl Iterator<Item = &VersionId> {
        std::iter::once(&self.version).chain(self.aliases.iter())
    }

    /// Report line such as `Intel C++ 16.0.3`.
    pub fn report(&self) -> String {
        self.kind.family().report(&self.version)
    }
}
