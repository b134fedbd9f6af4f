//! Scanning search roots for installations

mod cache;
mod config;
mod result;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scout_fs::{NormalizedPath, list_subdirectories};
use scout_probe::{CommandRunner, InstallLayout, InstallationProbe, ProbedInstall, SystemRunner};

use crate::config::Settings;
use crate::error::Result;
use crate::installation::Installation;

pub use cache::ScanCache;
pub use config::{ScannerConfig, ScannerConfigBuilder};
pub use result::{ScanEntry, ScanResult};

/// Read access to environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Walks a configuration's search roots and probes every candidate.
///
/// The scanner holds no results; caching is [`ScanCache`]'s job.
pub struct ToolchainScanner {
    runner: Arc<dyn CommandRunner>,
    env: Arc<dyn EnvSource>,
    settings: Settings,
    scans: AtomicUsize,
}

impl std::fmt::Debug for ToolchainScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolchainScanner")
            .field("settings", &self.settings)
            .field("scans", &self.scan_count())
            .finish_non_exhaustive()
    }
}

impl ToolchainScanner {
    pub fn new(runner: Arc<dyn CommandRunner>, env: Arc<dyn EnvSource>, settings: Settings) -> Self {
        Self {
            runner,
            env,
            settings,
            scans: AtomicUsize::new(0),
        }
    }

    /// Real processes and the real environment, with default settings
    /// adjusted by the environment.
    pub fn system() -> Self {
        let settings = Settings::default().with_env_override(&ProcessEnv);
        Self::new(Arc::new(SystemRunner::new()), Arc::new(ProcessEnv), settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Number of scans started so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Run one full scan of `config`.
    ///
    /// Roots are walked in order and candidates within a root in path
    /// order, so results are reproducible. A missing root contributes
    /// nothing; a root that exists but cannot be read fails the whole scan.
    /// Candidates that fail probing are skipped. When nothing is found the
    /// configuration's environment overrides are tried.
    pub fn scan(&self, config: &ScannerConfig) -> Result<ScanResult> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let probe = InstallationProbe::new(
            config.probe.clone(),
            Arc::clone(&self.runner),
            self.settings.probe_timeout(),
        )?;

        let mut result = ScanResult::new();
        for root in &config.search_roots {
            let candidates = match config.probe.layout {
                InstallLayout::Versioned => list_subdirectories(root)?,
                InstallLayout::Flat if root.is_dir() => vec![root.clone()],
                InstallLayout::Flat => Vec::new(),
            };

            for candidate in candidates {
                match probe.probe(&candidate) {
                    Ok(found) => accept(config, found, &mut result),
                    Err(skip) => tracing::trace!(
                        config = %config.name,
                        candidate = %candidate,
                        reason = %skip,
                        "candidate skipped"
                    ),
                }
            }
        }

        if result.is_empty() {
            self.scan_env_overrides(config, &probe, &mut result);
        }

        tracing::info!(
            config = %config.name,
            found = result.installations().count(),
            "scan complete"
        );
        Ok(result)
    }

    /// The first override variable that is set and non-empty names the
    /// install root; later variables are not consulted.
    fn scan_env_overrides(
        &self,
        config: &ScannerConfig,
        probe: &InstallationProbe,
        result: &mut ScanResult,
    ) {
        let Some((var, value)) = config.env_overrides.iter().find_map(|var| {
            self.env
                .var(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (var, value))
        }) else {
            return;
        };

        let root = NormalizedPath::new(&value);
        match probe.probe_root_override(&root) {
            Ok(found) => {
                tracing::debug!(config = %config.name, var = %var, root = %root, "using environment override");
                accept(config, found, result);
            }
            Err(skip) => tracing::warn!(
                config = %config.name,
                var = %var,
                root = %root,
                reason = %skip,
                "environment override does not point at a usable install"
            ),
        }
    }
}

fn accept(config: &ScannerConfig, found: ProbedInstall, result: &mut ScanResult) {
    if !config.version_range.satisfies(&found.version) {
        tracing::debug!(
            config = %config.name,
            version = %found.version,
            range = %config.version_range,
            "install outside configured version range"
        );
        return;
    }
    result.push(Arc::new(Installation::from_probe(config, found)));
}
