//! Version identifiers and version constraints for toolchain resolution.
//!
//! A [`VersionId`] is a dot-separated list of numeric or wildcard (`*`)
//! segments. Installed toolchains always carry concrete identifiers; only
//! constraints may contain wildcards or open-ended ranges.
//!
//! # Examples
//!
//! ```
//! use scout_version::{VersionConstraint, VersionId};
//!
//! let constraint = VersionConstraint::parse("7-*").unwrap();
//! assert!(constraint.satisfies(&VersionId::parse("7.1").unwrap()));
//! assert!(!constraint.satisfies(&VersionId::parse("6.9").unwrap()));
//!
//! let constraint = VersionConstraint::parse("16.*-*").unwrap();
//! assert!(constraint.satisfies(&VersionId::parse("16.2").unwrap()));
//! ```

pub mod constraint;
pub mod error;
pub mod identifier;

pub use constraint::{VersionConstraint, satisfies};
pub use error::{Error, Result};
pub use identifier::{Segment, VersionId, VersionOrdering};
