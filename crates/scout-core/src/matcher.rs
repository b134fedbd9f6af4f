//! Picking one installation for a constraint

use std::sync::Arc;

use scout_version::{VersionConstraint, VersionId, VersionOrdering};

use crate::error::{Error, Result};
use crate::installation::Installation;
use crate::scanner::ScanEntry;

/// Outcome of matching a constraint against candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Found {
        installation: Arc<Installation>,
        /// The key that satisfied the constraint.
        matched: VersionId,
    },
    NotFound {
        constraint: VersionConstraint,
        /// Versions that were looked at, in discovery order without repeats.
        considered: Vec<VersionId>,
    },
}

impl ResolutionResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn installation(&self) -> Option<&Arc<Installation>> {
        match self {
            Self::Found { installation, .. } => Some(installation),
            Self::NotFound { .. } => None,
        }
    }

    /// Turn a miss into [`Error::NoVersionSatisfiesConstraint`].
    pub fn into_result(self) -> Result<Arc<Installation>> {
        match self {
            Self::Found { installation, .. } => Ok(installation),
            Self::NotFound {
                constraint,
                considered,
            } => Err(Error::NoVersionSatisfiesConstraint {
                constraint,
                considered,
            }),
        }
    }
}

/// Best-match policy over scan entries.
///
/// Only authoritative keys take part; alias keys are for lookup and
/// reporting. The highest satisfying version wins, and among equal
/// versions the entry seen first wins, so callers must pass entries in a
/// deterministic order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintMatcher;

impl ConstraintMatcher {
    pub fn select<'a>(
        entries: impl IntoIterator<Item = &'a ScanEntry>,
        constraint: &VersionConstraint,
    ) -> ResolutionResult {
        let mut best: Option<&ScanEntry> = None;
        let mut considered: Vec<VersionId> = Vec::new();

        for entry in entries.into_iter().filter(|entry| !entry.is_alias()) {
            if !considered.contains(&entry.key) {
                considered.push(entry.key.clone());
            }
            if !constraint.satisfies(&entry.key) {
                continue;
            }
            let better = best.is_none_or(|current| {
                entry.key.compare(&current.key) == VersionOrdering::Greater
            });
            if better {
                best = Some(entry);
            }
        }

        match best {
            Some(entry) => ResolutionResult::Found {
                installation: Arc::clone(&entry.installation),
                matched: entry.key.clone(),
            },
            None => ResolutionResult::NotFound {
                constraint: constraint.clone(),
                considered,
            },
        }
    }
}
