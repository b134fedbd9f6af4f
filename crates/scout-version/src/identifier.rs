//! Version identifiers.
//!
//! Identifiers are parsed from directory names, compiler banners and
//! constraint strings. Comparison is segment-wise and numeric; a shorter
//! identifier is conceptually padded with zeros but still orders before an
//! otherwise equal identifier that spells the zero out (`16 < 16.0`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One dot-separated position of a [`VersionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A non-negative integer.
    Number(u64),
    /// `*`, matching any value at this position.
    Wildcard,
}

impl Segment {
    fn parse(text: &str, whole: &str) -> Result<Self> {
        if text == "*" {
            return Ok(Self::Wildcard);
        }
        if text.is_empty() {
            return Err(Error::malformed_version(whole, "empty segment"));
        }
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::malformed_version(
                whole,
                format!("segment '{text}' is neither a number nor '*'"),
            ));
        }
        text.parse::<u64>()
            .map(Self::Number)
            .map_err(|e| Error::malformed_version(whole, e.to_string()))
    }

    /// The numeric value, or `None` for a wildcard.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Wildcard => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Number(_), Self::Wildcard) => Ordering::Less,
            (Self::Wildcard, Self::Number(_)) => Ordering::Greater,
            (Self::Wildcard, Self::Wildcard) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// Outcome of [`VersionId::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrdering {
    Less,
    Equal,
    Greater,
    /// At least one side contains a wildcard segment.
    Incomparable,
}

impl From<Ordering> for VersionOrdering {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }
}

/// A dot-separated version identifier such as `16.0.1` or `16.*`.
///
/// `Ord` is a total order over all identifiers (wildcards sort after every
/// number) so identifiers can key ordered maps; for concrete identifiers it
/// agrees with [`VersionId::compare`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId {
    segments: Vec<Segment>,
}

impl VersionId {
    /// Parse a version string.
    ///
    /// - `"16.0.1"` -> three numeric segments
    /// - `"16.*"` -> a numeric and a wildcard segment
    /// - `"16.x"`, `"16..1"`, `""` -> [`Error::MalformedVersion`]
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::malformed_version(text, "empty version"));
        }

        let segments = trimmed
            .split('.')
            .map(|segment| Segment::parse(segment, trimmed))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Build a concrete identifier from numeric segments.
    ///
    /// An empty iterator yields `0`, since identifiers always hold at least
    /// one segment.
    pub fn new(numbers: impl IntoIterator<Item = u64>) -> Self {
        let mut segments: Vec<Segment> = numbers.into_iter().map(Segment::Number).collect();
        if segments.is_empty() {
            segments.push(Segment::Number(0));
        }
        Self { segments }
    }

    /// The single-segment identifier `*`.
    pub fn wildcard() -> Self {
        Self {
            segments: vec![Segment::Wildcard],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when no segment is a wildcard.
    pub fn is_concrete(&self) -> bool {
        self.segments.iter().all(|s| !s.is_wildcard())
    }

    /// The first segment, if it is numeric.
    pub fn major(&self) -> Option<u64> {
        self.segments.first().and_then(Segment::as_number)
    }

    /// Segment `index` with zero padding past the end.
    ///
    /// Wildcards also read as zero; callers that care check
    /// [`VersionId::is_concrete`] first.
    pub fn number_at(&self, index: usize) -> u64 {
        self.segments
            .get(index)
            .and_then(Segment::as_number)
            .unwrap_or(0)
    }

    /// Compare two identifiers.
    ///
    /// Returns [`VersionOrdering::Incomparable`] when either side holds a
    /// wildcard.
    pub fn compare(&self, other: &Self) -> VersionOrdering {
        if !self.is_concrete() || !other.is_concrete() {
            return VersionOrdering::Incomparable;
        }
        self.cmp(other).into()
    }
}

impl Ord for VersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for index in 0..len {
            let a = self
                .segments
                .get(index)
                .copied()
                .unwrap_or(Segment::Number(0));
            let b = other
                .segments
                .get(index)
                .copied()
                .unwrap_or(Segment::Number(0));
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.segments.len().cmp(&other.segments.len())
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for VersionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<VersionId> for String {
    fn from(v: VersionId) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionId {
        VersionId::parse(s).unwrap()
    }

    #[test]
    fn test_parse_numeric() {
        let id = v("16.0.1");
        assert_eq!(
            id.segments(),
            &[Segment::Number(16), Segment::Number(0), Segment::Number(1)]
        );
        assert!(id.is_concrete());
        assert_eq!(id.major(), Some(16));
    }

    #[test]
    fn test_parse_wildcard() {
        let id = v("16.*");
        assert_eq!(id.segments(), &[Segment::Number(16), Segment::Wildcard]);
        assert!(!id.is_concrete());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(v("  9.4.0\n"), v("9.4.0"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(VersionId::parse("").is_err());
        assert!(VersionId::parse("16.x").is_err());
        assert!(VersionId::parse("16..1").is_err());
        assert!(VersionId::parse("16.").is_err());
        assert!(VersionId::parse("-1").is_err());
        assert!(VersionId::parse("1.2-3").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let err = VersionId::parse("99999999999999999999999").unwrap_err();
        assert!(matches!(err, Error::MalformedVersion { .. }));
    }

    #[test]
    fn test_compare_concrete() {
        assert_eq!(v("1.2.3").compare(&v("1.3.0")), VersionOrdering::Less);
        assert_eq!(v("2.0.0").compare(&v("1.3.0")), VersionOrdering::Greater);
        assert_eq!(v("16.2").compare(&v("16.2")), VersionOrdering::Equal);
    }

    #[test]
    fn test_compare_numeric_not_lexical() {
        assert_eq!(v("16.10").compare(&v("16.9")), VersionOrdering::Greater);
    }

    #[test]
    fn test_shorter_orders_before_explicit_zero() {
        assert_eq!(v("16").compare(&v("16.0")), VersionOrdering::Less);
        assert_ne!(v("16"), v("16.0"));
        assert_eq!(v("16").compare(&v("16.0.1")), VersionOrdering::Less);
        assert_eq!(v("16.1").compare(&v("16.0.5")), VersionOrdering::Greater);
    }

    #[test]
    fn test_compare_wildcard_is_incomparable() {
        assert_eq!(v("16.*").compare(&v("16.2")), VersionOrdering::Incomparable);
        assert_eq!(v("16.2").compare(&v("*")), VersionOrdering::Incomparable);
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["16", "16.0.1", "16.*", "*", "7.10.3"] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn test_leading_zeros_normalized() {
        assert_eq!(v("07.01").to_string(), "7.1");
    }

    #[test]
    fn test_number_at_pads_with_zero() {
        let id = v("16.2");
        assert_eq!(id.number_at(0), 16);
        assert_eq!(id.number_at(1), 2);
        assert_eq!(id.number_at(5), 0);
    }

    #[test]
    fn test_new_from_numbers() {
        assert_eq!(VersionId::new([9, 4, 0]), v("9.4.0"));
        assert_eq!(VersionId::new([]), v("0"));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&v("16.0.1")).unwrap();
        assert_eq!(json, "\"16.0.1\"");
        let back: VersionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("16.0.1"));
        assert!(serde_json::from_str::<VersionId>("\"abc\"").is_err());
    }
}
