//! Registry of scanner configurations and the resolution entry points

use std::sync::Arc;
use std::thread;

use scout_fs::NormalizedPath;
use scout_probe::{CommandRunner, ToolchainKind};
use scout_version::{VersionConstraint, VersionId};

use crate::builtins;
use crate::config::{RegistryFile, ToolchainDefinition};
use crate::error::{Error, Result};
use crate::installation::Installation;
use crate::matcher::{ConstraintMatcher, ResolutionResult};
use crate::platform::Platform;
use crate::scanner::{
    EnvSource, ProcessEnv, ScanCache, ScanEntry, ScanResult, ScannerConfig, ToolchainScanner,
};

/// One row of [`ToolchainRegistry::dump_candidates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub version: VersionId,
    pub root_path: NormalizedPath,
    pub kind: ToolchainKind,
    /// Name of the configuration that found it.
    pub config: String,
    /// True when `version` is a directory-name alias.
    pub alias: bool,
}

/// Scanner configurations in registration order, plus the scan cache.
///
/// Registration order is the tie-break between configurations: candidates
/// are merged config by config, so an earlier configuration wins between
/// equal versions.
#[derive(Debug)]
pub struct ToolchainRegistry {
    configs: Vec<Arc<ScannerConfig>>,
    scanner: ToolchainScanner,
    cache: ScanCache,
}

impl ToolchainRegistry {
    /// Create an empty registry.
    pub fn new(scanner: ToolchainScanner) -> Self {
        Self {
            configs: Vec::new(),
            scanner,
            cache: ScanCache::new(),
        }
    }

    /// Create a registry holding the built-in toolchain definitions.
    pub fn with_builtins(scanner: ToolchainScanner) -> Result<Self> {
        let mut registry = Self::new(scanner);
        for def in builtins::definitions()? {
            registry.register_definition(&def)?;
        }
        Ok(registry)
    }

    /// Load a definitions file and scan with real processes.
    pub fn from_file(path: &NormalizedPath) -> Result<Self> {
        let file = RegistryFile::load(path)?;
        Self::from_registry_file(
            file,
            Arc::new(scout_probe::SystemRunner::new()),
            Arc::new(ProcessEnv),
        )
    }

    /// Build from an already loaded definitions file.
    ///
    /// File settings are applied first, then environment overrides.
    pub fn from_registry_file(
        file: RegistryFile,
        runner: Arc<dyn CommandRunner>,
        env: Arc<dyn EnvSource>,
    ) -> Result<Self> {
        let settings = file.settings.clone().with_env_override(env.as_ref());
        let mut registry = Self::new(ToolchainScanner::new(runner, env, settings));
        for def in &file.toolchains {
            registry.register_definition(def)?;
        }
        Ok(registry)
    }

    /// Append a configuration. Names must be unique.
    pub fn register(&mut self, config: ScannerConfig) -> Result<()> {
        config.validate()?;
        if self.configs.iter().any(|c| c.name == config.name) {
            return Err(Error::DuplicateConfig { name: config.name });
        }
        tracing::debug!(config = %config.name, kind = %config.kind, "registered toolchain configuration");
        self.configs.push(Arc::new(config));
        Ok(())
    }

    pub fn register_definition(&mut self, def: &ToolchainDefinition) -> Result<()> {
        self.register(ScannerConfig::from_definition(def)?)
    }

    /// Registered configurations in order.
    pub fn configs(&self) -> impl Iterator<Item = &ScannerConfig> {
        self.configs.iter().map(|config| config.as_ref())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn scanner(&self) -> &ToolchainScanner {
        &self.scanner
    }

    pub fn cache(&self) -> &ScanCache {
        &self.cache
    }

    /// Resolve the best installation of any kind for the request.
    pub fn resolve(
        &self,
        host: &Platform,
        target: &Platform,
        constraint: &VersionConstraint,
    ) -> Result<Arc<Installation>> {
        self.find(host, target, constraint)?.into_result()
    }

    /// Resolve the best installation of `kind` for the request.
    pub fn resolve_kind(
        &self,
        kind: ToolchainKind,
        host: &Platform,
        target: &Platform,
        constraint: &VersionConstraint,
    ) -> Result<Arc<Installation>> {
        self.find_kind(kind, host, target, constraint)?.into_result()
    }

    /// Like [`resolve`](Self::resolve), scanning uncached configurations on
    /// worker threads. The merge still follows registration order.
    pub fn resolve_parallel(
        &self,
        host: &Platform,
        target: &Platform,
        constraint: &VersionConstraint,
    ) -> Result<Arc<Installation>> {
        let configs = self.matching(None, host, target)?;
        let scans: Vec<Result<Arc<ScanResult>>> = thread::scope(|s| {
            let handles: Vec<_> = configs
                .iter()
                .map(|config| s.spawn(move || self.scan_cached(config)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        let scans = scans.into_iter().collect::<Result<Vec<_>>>()?;
        let entries = scans.iter().flat_map(|scan| scan.entries());
        self.log_outcome(ConstraintMatcher::select(entries, constraint))
            .into_result()
    }

    /// Match without turning a miss into an error.
    ///
    /// Fails only when no configuration serves the pair or a scan fails.
    pub fn find(
        &self,
        host: &Platform,
        target: &Platform,
        constraint: &VersionConstraint,
    ) -> Result<ResolutionResult> {
        let configs = self.matching(None, host, target)?;
        self.select(&configs, constraint)
    }

    pub fn find_kind(
        &self,
        kind: ToolchainKind,
        host: &Platform,
        target: &Platform,
        constraint: &VersionConstraint,
    ) -> Result<ResolutionResult> {
        let configs = self.matching(Some(kind), host, target)?;
        self.select(&configs, constraint)
    }

    /// Every candidate visible for the pair, in registration then
    /// discovery order, alias keys included.
    pub fn dump_candidates(&self, host: &Platform, target: &Platform) -> Result<Vec<CandidateReport>> {
        let mut reports = Vec::new();
        for config in self.matching(None, host, target)? {
            let scan = self.scan_cached(config)?;
            reports.extend(scan.entries().iter().map(|entry| CandidateReport {
                version: entry.key.clone(),
                root_path: entry.installation.root_path.clone(),
                kind: entry.installation.kind,
                config: entry.installation.config.clone(),
                alias: entry.is_alias(),
            }));
        }
        Ok(reports)
    }

    /// Forget every cached scan.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }

    /// Forget the cached scan of one configuration.
    pub fn invalidate_config(&self, name: &str) -> bool {
        self.cache.invalidate(name)
    }

    fn matching(
        &self,
        kind: Option<ToolchainKind>,
        host: &Platform,
        target: &Platform,
    ) -> Result<Vec<&Arc<ScannerConfig>>> {
        let configs: Vec<_> = self
            .configs
            .iter()
            .filter(|c| kind.is_none_or(|k| c.kind == k))
            .filter(|c| c.serves(host, target))
            .collect();

        if configs.is_empty() {
            return Err(Error::NoToolchainRegistered {
                host: host.clone(),
                target: target.clone(),
            });
        }
        Ok(configs)
    }

    fn scan_cached(&self, config: &ScannerConfig) -> Result<Arc<ScanResult>> {
        self.cache
            .get_or_scan(&config.name, || self.scanner.scan(config))
    }

    fn select(
        &self,
        configs: &[&Arc<ScannerConfig>],
        constraint: &VersionConstraint,
    ) -> Result<ResolutionResult> {
        let scans = configs
            .iter()
            .map(|config| self.scan_cached(config))
            .collect::<Result<Vec<_>>>()?;
        let entries: Vec<&ScanEntry> = scans.iter().flat_map(|scan| scan.entries()).collect();
        Ok(self.log_outcome(ConstraintMatcher::select(entries, constraint)))
    }

    fn log_outcome(&self, result: ResolutionResult) -> ResolutionResult {
        match &result {
            ResolutionResult::Found {
                installation,
                matched,
            } => tracing::debug!(
                version = %matched,
                root = %installation.root_path,
                config = %installation.config,
                "resolved toolchain"
            ),
            ResolutionResult::NotFound {
                constraint,
                considered,
            } => tracing::debug!(
                constraint = %constraint,
                considered = considered.len(),
                "no installation satisfies constraint"
            ),
        }
        result
    }
}
