//! Filesystem helpers for toolchain discovery
//!
//! Provides normalized paths, deterministic directory listing and
//! format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod listing;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use listing::{list_subdirectories, read_text};
pub use path::NormalizedPath;
