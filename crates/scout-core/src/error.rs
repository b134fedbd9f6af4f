//! Error types for scout-core

use scout_version::{VersionConstraint, VersionId};

use crate::platform::Platform;

/// Result type for scout-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scout-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configuration serves the requested host/target pair
    #[error("No toolchain registered for host {host} and target {target}")]
    NoToolchainRegistered { host: Platform, target: Platform },

    /// Configurations matched but no installation satisfied the constraint
    #[error("No installed version satisfies '{constraint}' (found: {})", list_versions(.considered))]
    NoVersionSatisfiesConstraint {
        constraint: VersionConstraint,
        considered: Vec<VersionId>,
    },

    #[error("Toolchain configuration '{name}' is already registered")]
    DuplicateConfig { name: String },

    #[error("Invalid toolchain definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Invalid platform '{input}': expected <os>-<arch>")]
    InvalidPlatform { input: String },

    #[error("Unresolved placeholder '${{{placeholder}}}' in '{template}'")]
    UnresolvedPlaceholder { placeholder: String, template: String },

    // Transparent wrappers for underlying crate errors
    /// Version or constraint parse error from scout-version
    #[error(transparent)]
    Version(#[from] scout_version::Error),

    /// Filesystem or config file error from scout-fs
    #[error(transparent)]
    Fs(#[from] scout_fs::Error),

    /// Probe construction error (invalid name pattern) from scout-probe
    #[error(transparent)]
    Probe(#[from] scout_probe::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

fn list_versions(versions: &[VersionId]) -> String {
    if versions.is_empty() {
        return "none".to_string();
    }
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
