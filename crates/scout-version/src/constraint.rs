//! Version constraint parsing and checking.
//!
//! Grammar:
//!
//! ```text
//! constraint = pattern | pattern "-" upper
//! pattern    = SEGMENT ("." SEGMENT)*
//! upper      = "*" | pattern
//! SEGMENT    = non-negative integer | "*"
//! ```
//!
//! - A bare pattern matches segment-wise. `*` matches anything at its
//!   position, and segments past the end of the pattern are free, so `16`
//!   and `16.*` both match `16.2.1`.
//! - A range `LOWER-UPPER` is inclusive on both ends. Bounds are compared
//!   on their prefix up to the first wildcard: `16.*-*` means "major at
//!   least 16" and `7-9` includes `9.5`.
//! - `*` alone matches every concrete version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identifier::{Segment, VersionId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConstraintKind {
    /// Segment-wise match with wildcards.
    Pattern(VersionId),
    /// Inclusive range; `upper == None` is the open `*` tail.
    Range {
        lower: VersionId,
        upper: Option<VersionId>,
    },
}

/// A parsed version constraint that can be checked against concrete versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionConstraint {
    kind: ConstraintKind,
    /// The original constraint string for display.
    raw: String,
}

impl VersionConstraint {
    /// Parse a constraint string such as `7-*`, `16.*-*`, `3-*`, `16.2` or `*`.
    pub fn parse(constraint: &str) -> Result<Self> {
        let raw = constraint.trim().to_string();
        if raw.is_empty() {
            return Err(Error::malformed_constraint(constraint, "empty constraint"));
        }

        let kind = match raw.split_once('-') {
            Some((lower, upper)) => {
                let lower = parse_part(&raw, lower, "lower bound")?;
                let upper = match upper.trim() {
                    "*" => None,
                    other => Some(parse_part(&raw, other, "upper bound")?),
                };
                if let Some(upper) = &upper
                    && bound_order(upper, &lower) == Ordering::Less
                {
                    return Err(Error::malformed_constraint(
                        &raw,
                        format!("upper bound {upper} is below lower bound {lower}"),
                    ));
                }
                ConstraintKind::Range { lower, upper }
            }
            None => ConstraintKind::Pattern(parse_part(&raw, &raw, "version")?),
        };

        Ok(Self { kind, raw })
    }

    /// The constraint matching every concrete version.
    pub fn any() -> Self {
        Self {
            kind: ConstraintKind::Pattern(VersionId::wildcard()),
            raw: "*".to_string(),
        }
    }

    /// Check whether a concrete version satisfies this constraint.
    ///
    /// Identifiers holding wildcards never satisfy anything: only
    /// discovered, concrete versions are candidates.
    pub fn satisfies(&self, candidate: &VersionId) -> bool {
        if !candidate.is_concrete() {
            return false;
        }

        match &self.kind {
            ConstraintKind::Pattern(pattern) => matches_pattern(candidate, pattern),
            ConstraintKind::Range { lower, upper } => {
                bound_order(candidate, lower) != Ordering::Less
                    && upper
                        .as_ref()
                        .is_none_or(|upper| bound_order(candidate, upper) != Ordering::Greater)
            }
        }
    }

    /// Parse `version` and check it; unparseable versions never satisfy.
    pub fn satisfies_str(&self, version: &str) -> bool {
        VersionId::parse(version)
            .map(|v| self.satisfies(&v))
            .unwrap_or(false)
    }

    /// True for ranges (`LOWER-UPPER`).
    pub fn is_range(&self) -> bool {
        matches!(self.kind, ConstraintKind::Range { .. })
    }

    /// Return the original constraint string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Free-function form of [`VersionConstraint::satisfies`].
pub fn satisfies(candidate: &VersionId, constraint: &VersionConstraint) -> bool {
    constraint.satisfies(candidate)
}

fn parse_part(raw: &str, part: &str, what: &str) -> Result<VersionId> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::malformed_constraint(raw, format!("empty {what}")));
    }
    VersionId::parse(part).map_err(|e| match e {
        Error::MalformedVersion { reason, .. } => {
            Error::malformed_constraint(raw, format!("invalid {what} '{part}': {reason}"))
        }
        other => other,
    })
}

fn matches_pattern(candidate: &VersionId, pattern: &VersionId) -> bool {
    pattern
        .segments()
        .iter()
        .enumerate()
        .all(|(index, segment)| match segment {
            Segment::Wildcard => true,
            Segment::Number(n) => candidate.number_at(index) == *n,
        })
}

/// Compare `candidate` against a bound on the bound's prefix up to its
/// first wildcard.
fn bound_order(candidate: &VersionId, bound: &VersionId) -> Ordering {
    for (index, segment) in bound.segments().iter().enumerate() {
        let Segment::Number(n) = segment else {
            break;
        };
        match candidate.number_at(index).cmp(n) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionConstraint {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<VersionConstraint> for String {
    fn from(c: VersionConstraint) -> Self {
        c.raw
    }
}

impl Default for VersionConstraint {
    fn default() -> Self {
        Self::any()
    }
}
