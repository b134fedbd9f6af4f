//! Scanner configurations: where and how to look for one toolchain variant

use std::collections::BTreeMap;

use scout_fs::NormalizedPath;
use scout_probe::{NamePattern, ProbeSpec, ProbeStrategy, ToolchainKind};
use scout_version::VersionConstraint;

use crate::config::ToolchainDefinition;
use crate::error::{Error, Result};
use crate::platform::Platform;

/// Declares where and how to look for one (host, target, kind) variant.
///
/// Configurations are independent and never merged; the registry keeps
/// them in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Unique within a registry; also the cache key.
    pub name: String,
    pub kind: ToolchainKind,
    /// Installs outside this range are dropped from the scan.
    pub version_range: VersionConstraint,
    pub hosts: Vec<Platform>,
    pub targets: Vec<Platform>,
    /// Walked in order.
    pub search_roots: Vec<NormalizedPath>,
    pub probe: ProbeSpec,
    /// Environment variables naming an install root directly, tried in
    /// order when the walk finds nothing.
    pub env_overrides: Vec<String>,
    pub shell_vars: BTreeMap<String, String>,
    pub subst_vars: BTreeMap<String, String>,
    pub test_file: String,
}

impl ScannerConfig {
    pub fn builder(name: impl Into<String>, kind: ToolchainKind) -> ScannerConfigBuilder {
        ScannerConfigBuilder::new(name.into(), kind)
    }

    /// Build from a definitions-file entry.
    pub fn from_definition(def: &ToolchainDefinition) -> Result<Self> {
        let mut probe = ProbeSpec::new(def.kind).with_layout(def.layout);
        if let Some(pattern) = &def.name_pattern {
            probe = probe.with_pattern(NamePattern::new(pattern)?);
        }
        let default_strategy = if def.name_pattern.is_some() {
            ProbeStrategy::Combined
        } else {
            ProbeStrategy::Introspection
        };
        probe = probe.with_strategy(def.strategy.unwrap_or(default_strategy));
        if let Some(arch) = &def.arch {
            probe = probe.with_arch(arch);
        }
        if let Some(subdir) = &def.platform_subdir {
            probe = probe.with_platform_subdir(subdir);
        }
        if let Some(binary) = &def.binary {
            probe = probe.with_binary(binary);
        }

        let mut builder = Self::builder(&def.name, def.kind)
            .version_range(def.version_range.clone())
            .probe(probe);
        builder.hosts = def.hosts.clone();
        builder.targets = def.targets.clone();
        builder.search_roots = def.search_roots.clone();
        builder.env_overrides = def.env_overrides.clone();
        builder.shell_vars = def.shell_vars.clone();
        builder.subst_vars = def.subst_vars.clone();
        builder.test_file = def.test_file.clone();
        builder.build()
    }

    /// Whether this configuration serves the (host, target) request.
    pub fn serves(&self, host: &Platform, target: &Platform) -> bool {
        self.hosts.iter().any(|h| h.matches(host)) && self.targets.iter().any(|t| t.matches(target))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.hosts.is_empty() {
            return Err(invalid("at least one host platform is required"));
        }
        if self.targets.is_empty() {
            return Err(invalid("at least one target platform is required"));
        }
        if self.search_roots.is_empty() && self.env_overrides.is_empty() {
            return Err(invalid("needs a search root or an environment override"));
        }
        if self.probe.kind != self.kind {
            return Err(invalid("probe kind differs from configuration kind"));
        }
        self.probe
            .validate()
            .map_err(|e| invalid(&e.to_string()))
    }
}

/// Builder for [`ScannerConfig`].
#[derive(Debug, Clone)]
pub struct ScannerConfigBuilder {
    name: String,
    kind: ToolchainKind,
    version_range: VersionConstraint,
    hosts: Vec<Platform>,
    targets: Vec<Platform>,
    search_roots: Vec<NormalizedPath>,
    probe: ProbeSpec,
    env_overrides: Vec<String>,
    shell_vars: BTreeMap<String, String>,
    subst_vars: BTreeMap<String, String>,
    test_file: Option<String>,
}

impl ScannerConfigBuilder {
    fn new(name: String, kind: ToolchainKind) -> Self {
        Self {
            name,
            kind,
            version_range: VersionConstraint::any(),
            hosts: Vec::new(),
            targets: Vec::new(),
            search_roots: Vec::new(),
            probe: ProbeSpec::new(kind),
            env_overrides: Vec::new(),
            shell_vars: BTreeMap::new(),
            subst_vars: BTreeMap::new(),
            test_file: None,
        }
    }

    pub fn version_range(mut self, range: VersionConstraint) -> Self {
        self.version_range = range;
        self
    }

    pub fn host(mut self, platform: Platform) -> Self {
        self.hosts.push(platform);
        self
    }

    pub fn target(mut self, platform: Platform) -> Self {
        self.targets.push(platform);
        self
    }

    pub fn search_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn probe(mut self, probe: ProbeSpec) -> Self {
        self.probe = probe;
        self
    }

    pub fn env_override(mut self, var: impl Into<String>) -> Self {
        self.env_overrides.push(var.into());
        self
    }

    pub fn shell_var(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.shell_vars.insert(name.into(), template.into());
        self
    }

    pub fn subst_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.subst_vars.insert(name.into(), value.into());
        self
    }

    pub fn test_file(mut self, file: impl Into<String>) -> Self {
        self.test_file = Some(file.into());
        self
    }

    pub fn build(self) -> Result<ScannerConfig> {
        let test_file = self.test_file.unwrap_or_else(|| self.probe.binary.clone());
        let config = ScannerConfig {
            name: self.name,
            kind: self.kind,
            version_range: self.version_range,
            hosts: self.hosts,
            targets: self.targets,
            search_roots: self.search_roots,
            probe: self.probe,
            env_overrides: self.env_overrides,
            shell_vars: self.shell_vars,
            subst_vars: self.subst_vars,
            test_file,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_probe::InstallLayout;

    fn posix64() -> Platform {
        Platform::new("posix", "x86_64")
    }

    #[test]
    fn test_builder_defaults() {
        let config = ScannerConfig::builder("gcc", ToolchainKind::Gcc)
            .host(posix64())
            .target(posix64())
            .search_root("/usr/bin")
            .build()
            .unwrap();
        assert_eq!(config.version_range, VersionConstraint::any());
        assert_eq!(config.probe.binary, "gcc");
        assert_eq!(config.test_file, "gcc");
        assert_eq!(config.probe.strategy, ProbeStrategy::Introspection);
    }

    #[test]
    fn test_builder_requires_platforms() {
        let err = ScannerConfig::builder("gcc", ToolchainKind::Gcc)
            .search_root("/usr/bin")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { .. }));
    }

    #[test]
    fn test_builder_requires_somewhere_to_look() {
        let err = ScannerConfig::builder("gcc", ToolchainKind::Gcc)
            .host(posix64())
            .target(posix64())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("search root"));
    }

    #[test]
    fn test_path_strategy_without_pattern_rejected() {
        let err = ScannerConfig::builder("icc", ToolchainKind::IntelC)
            .host(posix64())
            .target(posix64())
            .search_root("/opt/intel")
            .probe(ProbeSpec::new(ToolchainKind::IntelC).with_strategy(ProbeStrategy::PathPattern))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { .. }));
    }

    #[test]
    fn test_mismatched_probe_kind_rejected() {
        let err = ScannerConfig::builder("icc", ToolchainKind::IntelC)
            .host(posix64())
            .target(posix64())
            .search_root("/opt/intel")
            .probe(ProbeSpec::new(ToolchainKind::Gcc))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { .. }));
    }

    #[test]
    fn test_serves_with_any_host() {
        let config = ScannerConfig::builder("icc-ia32", ToolchainKind::IntelC)
            .host(Platform::new("posix", "any"))
            .target(Platform::new("posix", "x86"))
            .search_root("/opt/intel")
            .build()
            .unwrap();
        assert!(config.serves(&posix64(), &Platform::new("posix", "x86")));
        assert!(!config.serves(&posix64(), &posix64()));
    }

    #[test]
    fn test_from_definition_picks_strategy() {
        let def = ToolchainDefinition {
            name: "icc".into(),
            kind: ToolchainKind::IntelC,
            version_range: VersionConstraint::parse("16.*-*").unwrap(),
            hosts: vec![posix64()],
            targets: vec![posix64()],
            search_roots: vec![NormalizedPath::new("/opt/intel")],
            name_pattern: Some(r"^compilers_and_libraries_(\d+)\.(\d+)\.(\d+)$".into()),
            strategy: None,
            layout: InstallLayout::Versioned,
            arch: Some("intel64".into()),
            platform_subdir: Some("linux".into()),
            binary: None,
            env_overrides: vec!["ICPP_COMPILER16".into()],
            shell_vars: BTreeMap::new(),
            subst_vars: BTreeMap::new(),
            test_file: None,
        };
        let config = ScannerConfig::from_definition(&def).unwrap();
        assert_eq!(config.probe.strategy, ProbeStrategy::Combined);
        assert_eq!(config.probe.binary, "icc");
        assert_eq!(config.probe.arch.as_deref(), Some("intel64"));
    }

    #[test]
    fn test_from_definition_bad_pattern() {
        let def = ToolchainDefinition {
            name: "icc".into(),
            kind: ToolchainKind::IntelC,
            version_range: VersionConstraint::any(),
            hosts: vec![posix64()],
            targets: vec![posix64()],
            search_roots: vec![NormalizedPath::new("/opt/intel")],
            name_pattern: Some("(".into()),
            strategy: None,
            layout: InstallLayout::Versioned,
            arch: None,
            platform_subdir: None,
            binary: None,
            env_overrides: Vec::new(),
            shell_vars: BTreeMap::new(),
            subst_vars: BTreeMap::new(),
            test_file: None,
        };
        assert!(matches!(
            ScannerConfig::from_definition(&def),
            Err(Error::Probe(scout_probe::Error::InvalidPattern { .. }))
        ));
    }
}
