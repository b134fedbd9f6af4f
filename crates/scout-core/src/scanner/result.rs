//! Scan results: version keys mapped to installations

use std::collections::BTreeMap;
use std::sync::Arc;

use scout_version::VersionId;

use crate::installation::Installation;

/// One key of a scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub key: VersionId,
    pub installation: Arc<Installation>,
}

impl ScanEntry {
    /// True when the key is an alias rather than the install's own
    /// version.
    pub fn is_alias(&self) -> bool {
        self.key != self.installation.version
    }
}

/// Everything one configuration's scan found, in discovery order.
///
/// Each install contributes its version key followed by its alias keys, so
/// the same install can appear under several versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    entries: Vec<ScanEntry>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, installation: Arc<Installation>) {
        for key in installation.keys() {
            self.entries.push(ScanEntry {
                key: key.clone(),
                installation: Arc::clone(&installation),
            });
        }
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Installs in discovery order, each once.
    pub fn installations(&self) -> impl Iterator<Item = &Arc<Installation>> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_alias())
            .map(|entry| &entry.installation)
    }

    /// First install keyed by `version`, alias keys included.
    pub fn get(&self, version: &VersionId) -> Option<&Arc<Installation>> {
        self.entries
            .iter()
            .find(|entry| &entry.key == version)
            .map(|entry| &entry.installation)
    }

    /// Version map where the first discovered install wins a key.
    pub fn map(&self) -> BTreeMap<VersionId, Arc<Installation>> {
        let mut map = BTreeMap::new();
        for entry in &self.entries {
            map.entry(entry.key.clone())
                .or_insert_with(|| Arc::clone(&entry.installation));
        }
        map
    }
}
