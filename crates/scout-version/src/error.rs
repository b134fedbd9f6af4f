//! Error types for scout-version

/// Result type for scout-version operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing versions and constraints.
///
/// Parse failures are always surfaced to the caller; a malformed string is
/// never coerced into some nearby valid value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A version string from a path, a compiler banner or a request could not be parsed.
    #[error("malformed version '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    /// A constraint string does not follow the `SEGMENT("."SEGMENT)*` or
    /// `LOWER-UPPER` grammar.
    #[error("malformed version constraint '{input}': {reason}")]
    MalformedConstraint { input: String, reason: String },
}

impl Error {
    pub fn malformed_version(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_constraint(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedConstraint {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
