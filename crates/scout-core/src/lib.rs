//! Toolchain scanning, caching and version resolution
//!
//! This crate ties the lower layers together:
//!
//! - **Registry**: scanner configurations registered per host/target pair
//! - **Scanner**: walks search roots, probes candidates, falls back to
//!   environment overrides
//! - **Cache**: one scan per configuration, shared by concurrent callers
//! - **Matcher**: picks the highest installation satisfying a constraint
//! - **Environment**: applies a resolved installation's variables
//!
//! ```text
//!                 caller
//!                    |
//!               scout-core
//!                    |
//!     +--------------+--------------+
//!     |              |              |
//! scout-version   scout-fs     scout-probe
//! ```
//!
//! # Example
//!
//! ```no_run
//! use scout_core::{Platform, ToolchainRegistry, ToolchainScanner};
//! use scout_version::VersionConstraint;
//!
//! fn example() -> scout_core::Result<()> {
//!     let registry = ToolchainRegistry::with_builtins(ToolchainScanner::system())?;
//!     let host: Platform = "posix-x86_64".parse()?;
//!     let icc = registry.resolve(&host, &host, &VersionConstraint::parse("16.*-*")?)?;
//!     println!("{} at {}", icc.report(), icc.root_path);
//!     Ok(())
//! }
//! ```

pub mod builtins;
pub mod config;
pub mod environment;
pub mod error;
pub mod installation;
pub mod logging;
pub mod matcher;
pub mod platform;
pub mod registry;
pub mod scanner;

pub use config::{RegistryFile, Settings, ToolchainDefinition, default_config_path};
pub use environment::{BuildEnvironment, EnvAction, apply_installation};
pub use error::{Error, Result};
pub use installation::Installation;
pub use matcher::{ConstraintMatcher, ResolutionResult};
pub use platform::Platform;
pub use registry::{CandidateReport, ToolchainRegistry};
pub use scanner::{
    EnvSource, ProcessEnv, ScanCache, ScanEntry, ScanResult, ScannerConfig, ScannerConfigBuilder,
    ToolchainScanner,
};
