//! Deciding whether a candidate path is a toolchain installation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use scout_fs::NormalizedPath;
use scout_version::VersionId;
use serde::{Deserialize, Serialize};

use crate::error::{Error, InvocationError, ProbeSkip, Result};
use crate::family::ToolchainKind;
use crate::pattern::NamePattern;
use crate::runner::{CommandRunner, CommandSpec};

/// Where the version of a candidate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStrategy {
    /// Version derived from the directory name only.
    PathPattern,
    /// Version reported by the compiler binary only.
    Introspection,
    /// Binary version is authoritative; a differing directory-name version
    /// is kept as an alias.
    #[default]
    Combined,
}

impl ProbeStrategy {
    /// Whether the strategy reads the version from the directory name.
    pub fn uses_path(&self) -> bool {
        matches!(self, Self::PathPattern | Self::Combined)
    }

    /// Whether the strategy runs the compiler.
    pub fn uses_binary(&self) -> bool {
        matches!(self, Self::Introspection | Self::Combined)
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PathPattern => "path_pattern",
            Self::Introspection => "introspection",
            Self::Combined => "combined",
        })
    }
}

/// How candidates are laid out under a search root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallLayout {
    /// Each immediate subdirectory is a candidate; the binary lives at
    /// `candidate/[platform_subdir/]bin/[arch/]<binary>`.
    #[default]
    Versioned,
    /// The search root itself is the candidate; the binary lives at
    /// `root/[platform_subdir/]<binary>` (e.g. `/usr/bin/gcc`).
    Flat,
}

/// How to probe one kind of installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSpec {
    pub kind: ToolchainKind,
    pub strategy: ProbeStrategy,
    pub layout: InstallLayout,
    pub name_pattern: Option<NamePattern>,
    pub arch: Option<String>,
    pub platform_subdir: Option<String>,
    pub binary: String,
}

impl ProbeSpec {
    /// A versioned-layout introspection probe for the kind's default binary.
    pub fn new(kind: ToolchainKind) -> Self {
        Self {
            kind,
            strategy: ProbeStrategy::Introspection,
            layout: InstallLayout::Versioned,
            name_pattern: None,
            arch: None,
            platform_subdir: None,
            binary: kind.family().default_binary().to_string(),
        }
    }

    pub fn with_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_layout(mut self, layout: InstallLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_pattern(mut self, pattern: NamePattern) -> Self {
        self.name_pattern = Some(pattern);
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn with_platform_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.platform_subdir = Some(subdir.into());
        self
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Check that the strategy has what it needs.
    pub fn validate(&self) -> Result<()> {
        if self.strategy.uses_path() && self.name_pattern.is_none() {
            return Err(Error::MissingPattern {
                strategy: self.strategy.to_string(),
            });
        }
        Ok(())
    }

    /// Expected location of the compiler binary for `candidate`.
    pub fn binary_path(&self, candidate: &NormalizedPath) -> NormalizedPath {
        let base = candidate.join(self.platform_subdir.as_deref().unwrap_or(""));
        match self.layout {
            InstallLayout::Versioned => base
                .join("bin")
                .join(self.arch.as_deref().unwrap_or(""))
                .join(&self.binary),
            InstallLayout::Flat => base.join(&self.binary),
        }
    }
}

/// A candidate that passed probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedInstall {
    /// Authoritative version.
    pub version: VersionId,
    /// Other versions the same install is known by.
    pub aliases: Vec<VersionId>,
    pub root: NormalizedPath,
    pub binary: NormalizedPath,
}

/// Applies a [`ProbeSpec`] to candidate paths.
#[derive(Clone)]
pub struct InstallationProbe {
    spec: ProbeSpec,
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl fmt::Debug for InstallationProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationProbe")
            .field("spec", &self.spec)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl InstallationProbe {
    pub fn new(spec: ProbeSpec, runner: Arc<dyn CommandRunner>, timeout: Duration) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            runner,
            timeout,
        })
    }

    pub fn spec(&self) -> &ProbeSpec {
        &self.spec
    }

    /// Probe a candidate found while walking a search root.
    ///
    /// When a name pattern is configured the directory name must match it,
    /// whatever the strategy.
    pub fn probe(&self, candidate: &NormalizedPath) -> std::result::Result<ProbedInstall, ProbeSkip> {
        let path_version = match &self.spec.name_pattern {
            Some(pattern) => {
                let name = candidate.file_name().unwrap_or_default();
                pattern
                    .extract(name)
                    .ok_or_else(|| ProbeSkip::NameMismatch {
                        name: name.to_string(),
                    })?
                    .version
            }
            None => None,
        };

        let binary = self.require_binary(candidate)?;

        let (version, aliases) = match self.spec.strategy {
            ProbeStrategy::PathPattern => {
                let version = path_version.ok_or_else(|| ProbeSkip::NoVersion {
                    path: candidate.clone(),
                })?;
                (version, Vec::new())
            }
            ProbeStrategy::Introspection => (self.introspect(&binary)?, Vec::new()),
            ProbeStrategy::Combined => {
                let version = self.introspect(&binary)?;
                let aliases: Vec<VersionId> =
                    path_version.filter(|alias| alias != &version).into_iter().collect();
                (version, aliases)
            }
        };

        Ok(ProbedInstall {
            version,
            aliases,
            root: candidate.clone(),
            binary,
        })
    }

    /// Probe an install root named directly by an environment override.
    ///
    /// The name pattern is not enforced. The compiler is asked first; when
    /// that fails the directory-name version is used if there is one.
    pub fn probe_root_override(
        &self,
        root: &NormalizedPath,
    ) -> std::result::Result<ProbedInstall, ProbeSkip> {
        let binary = self.require_binary(root)?;
        let path_version = self.spec.name_pattern.as_ref().and_then(|pattern| {
            pattern
                .extract(root.file_name().unwrap_or_default())
                .and_then(|m| m.version)
        });

        let introspected = if self.spec.strategy.uses_binary() {
            Some(self.introspect(&binary))
        } else {
            None
        };

        let version = match (introspected, path_version) {
            (Some(Ok(version)), _) => version,
            (_, Some(version)) => version,
            (Some(Err(skip)), None) => return Err(skip),
            (None, None) => return Err(ProbeSkip::NoVersion { path: root.clone() }),
        };

        Ok(ProbedInstall {
            version,
            aliases: Vec::new(),
            root: root.clone(),
            binary,
        })
    }

    fn require_binary(
        &self,
        candidate: &NormalizedPath,
    ) -> std::result::Result<NormalizedPath, ProbeSkip> {
        let binary = self.spec.binary_path(candidate);
        if binary.is_file() {
            Ok(binary)
        } else {
            Err(ProbeSkip::MissingBinary { path: binary })
        }
    }

    /// Ask the compiler for its version from inside a scratch directory.
    fn introspect(&self, binary: &NormalizedPath) -> std::result::Result<VersionId, ProbeSkip> {
        let workdir = tempfile::TempDir::new().map_err(|source| InvocationError::Io {
            program: binary.to_native(),
            source,
        })?;

        let family = self.spec.kind.family();
        let command = CommandSpec::new(binary.to_native()).args(family.version_args().iter().copied());
        let captured = self
            .runner
            .run_and_capture(&command, workdir.path(), self.timeout)?;

        family
            .extract_version(&captured.output)
            .ok_or_else(|| {
                tracing::trace!(
                    command = %command,
                    exit_code = ?captured.exit_code,
                    "no version in compiler output"
                );
                ProbeSkip::NoVersion {
                    path: binary.clone(),
                }
            })
    }
}
