use std::sync::Arc;

use crate::contracts::{RecordStore, ScanTarget, StoreError};

/// Computes the starting value for a sequence that does not exist yet.
///
/// Scans every configured reference-holding group for already-assigned
/// numeric references, so a deployment migrating from manually numbered
/// data (or restored from a backup without the sequence object) never
/// reissues an existing number. Only consulted during first-time counter
/// creation.
pub struct BootstrapScanner<R> {
    store: Arc<R>,
    targets: Vec<ScanTarget>,
}

impl<R: RecordStore> BootstrapScanner<R> {
    /// Creates a scanner over the given groups.
    pub fn new(store: Arc<R>, targets: Vec<ScanTarget>) -> Self {
        Self { store, targets }
    }

    /// Returns the highest numeric reference found across all targeted
    /// groups, or `None` when no group is configured or no record holds a
    /// parseable value.
    pub fn compute_seed(&self) -> Result<Option<u64>, StoreError> {
        if self.targets.is_empty() {
            return Ok(None);
        }
        self.store.max_numeric_reference(&self.targets)
    }
}
