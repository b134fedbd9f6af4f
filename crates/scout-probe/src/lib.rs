//! Installation probing for compiler toolchains
//!
//! Decides whether a candidate directory holds a real toolchain install and
//! which version it is, either from the directory name, from the compiler's
//! own version banner, or both.
//!
//! Compiler invocation goes through the [`CommandRunner`] capability so
//! callers can substitute a scripted runner.

pub mod error;
pub mod family;
pub mod pattern;
pub mod probe;
pub mod runner;

pub use error::{Error, InvocationError, ProbeSkip, Result};
pub use family::{CompilerFamily, ToolchainKind};
pub use pattern::NamePattern;
pub use probe::{InstallLayout, InstallationProbe, ProbeSpec, ProbeStrategy, ProbedInstall};
pub use runner::{CapturedOutput, CommandRunner, CommandSpec, SystemRunner};
