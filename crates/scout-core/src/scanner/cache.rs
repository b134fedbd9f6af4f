//! Per-configuration scan cache with single-flight population

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::scanner::ScanResult;

type Slot = Arc<Mutex<Option<Arc<ScanResult>>>>;

/// Scan results keyed by configuration name.
///
/// Each configuration has its own slot. The first caller for an empty slot
/// runs the scan while holding that slot's lock, so concurrent callers for
/// the same configuration wait and then share the result instead of
/// scanning again. Scans of different configurations do not block each
/// other. A failed scan leaves the slot empty.
#[derive(Debug, Default)]
pub struct ScanCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `name`, running `scan` if there is none.
    pub fn get_or_scan<F>(&self, name: &str, scan: F) -> Result<Arc<ScanResult>>
    where
        F: FnOnce() -> Result<ScanResult>,
    {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(name.to_string()).or_default())
        };

        let mut cached = lock(&slot);
        if let Some(result) = cached.as_ref() {
            tracing::trace!(config = name, "scan cache hit");
            return Ok(Arc::clone(result));
        }

        let result = Arc::new(scan()?);
        *cached = Some(Arc::clone(&result));
        Ok(result)
    }

    /// Cached result for `name`, without scanning.
    pub fn get(&self, name: &str) -> Option<Arc<ScanResult>> {
        let slot = lock(&self.slots).get(name).cloned()?;
        let cached = lock(&slot);
        cached.clone()
    }

    /// Drop the result for `name`. Returns whether a slot existed.
    ///
    /// A scan already in flight still hands its result to the callers
    /// waiting on it; later callers scan again.
    pub fn invalidate(&self, name: &str) -> bool {
        lock(&self.slots).remove(name).is_some()
    }

    pub fn invalidate_all(&self) {
        lock(&self.slots).clear();
    }
}

// A panic inside a scan closure leaves the slot empty, which is a valid state.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
