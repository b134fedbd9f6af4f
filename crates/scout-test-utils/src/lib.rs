//! Shared test utilities for the toolscout workspace.
//!
//! - [`InstallTree`]: temporary directory of fake compiler installs
//! - [`ScriptedRunner`]: [`CommandRunner`](scout_probe::CommandRunner) that
//!   answers from a table and counts invocations

pub mod runner;
pub mod tree;

pub use runner::ScriptedRunner;
pub use tree::InstallTree;
