use std::collections::HashMap;
use std::sync::RwLock;

use dashmap::DashMap;
use uuid::Uuid;

use crate::contracts::{
    parse_reference, LockResultExt, Record, RecordStore, ScanTarget, SequenceError, SequenceStore,
    StoreError, TextDirection,
};

/// In-process record and sequence store.
///
/// Backs tests, benches, and embedders that have no external database.
/// Records live in a concurrent map keyed by record id; sequences live
/// behind a single lock so create-if-absent and increment are atomic with
/// respect to each other, matching the serializable semantics the
/// allocator requires from a real backend.
///
/// `new()` registers the `en` locale as left-to-right; other locales must
/// be registered before use.
pub struct MemoryStore {
    records: DashMap<Uuid, Record>,
    sequences: RwLock<HashMap<String, u64>>,
    locales: DashMap<String, TextDirection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let locales = DashMap::new();
        locales.insert("en".to_string(), TextDirection::Ltr);
        Self {
            records: DashMap::new(),
            sequences: RwLock::new(HashMap::new()),
            locales,
        }
    }

    /// Registers the default text direction for a locale code.
    pub fn register_locale(&self, code: impl Into<String>, direction: TextDirection) {
        self.locales.insert(code.into(), direction);
    }

    /// Returns a snapshot of the record with the given id.
    pub fn record(&self, id: Uuid) -> Option<Record> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// Number of persisted records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn query_records(&self, group: Uuid, entity: Option<Uuid>) -> Result<Vec<Record>, StoreError> {
        let mut matches: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.group == group && entity.is_none_or(|e| r.entity == e))
            .map(|r| r.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; keep results deterministic.
        matches.sort_by_key(|r| r.id);
        Ok(matches)
    }

    fn blank_record(&self, group: Uuid, entity: Uuid) -> Result<Record, StoreError> {
        Ok(Record::blank(group, entity))
    }

    fn persist(&self, record: &Record) -> Result<(), StoreError> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    fn max_numeric_reference(&self, targets: &[ScanTarget]) -> Result<Option<u64>, StoreError> {
        let mut max = None;
        for record in self.records.iter() {
            for target in targets {
                if record.group != target.group {
                    continue;
                }
                if let Some(value) = record.data.get(&target.field).and_then(parse_reference) {
                    max = Some(max.map_or(value, |m: u64| m.max(value)));
                }
            }
        }
        Ok(max)
    }

    fn default_text_direction(&self, locale: &str) -> Result<TextDirection, StoreError> {
        self.locales
            .get(locale)
            .map(|d| *d)
            .ok_or_else(|| StoreError::LocaleNotFound(locale.to_string()))
    }
}

impl SequenceStore for MemoryStore {
    fn sequence_exists(&self, name: &str) -> Result<bool, SequenceError> {
        Ok(self.sequences.read().map_lock_err()?.contains_key(name))
    }

    fn create_sequence_if_absent(&self, name: &str, start: u64) -> Result<(), SequenceError> {
        let mut sequences = self.sequences.write().map_lock_err()?;
        sequences.entry(name.to_string()).or_insert(start);
        Ok(())
    }

    fn next_value(&self, name: &str) -> Result<u64, SequenceError> {
        let mut sequences = self.sequences.write().map_lock_err()?;
        let slot = sequences
            .get_mut(name)
            .ok_or_else(|| SequenceError::Missing(name.to_string()))?;
        let value = *slot;
        *slot = value.checked_add(1).ok_or(SequenceError::Overflow)?;
        Ok(value)
    }
}
