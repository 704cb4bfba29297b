use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::allocator::{AllocatorConfig, ReferenceCounter};
use crate::contracts::{
    needs_reference, LocalizedValue, Record, RecordStore, SequenceStore, StoreError, SysrefError,
};

/// Per-record validation of the numeric reference and the unique
/// identifier.
///
/// Both checks fail soft: an unexpected error in either is logged and
/// treated as no change for that check alone, so one malformed record (or
/// a transient counter failure) never aborts the caller's save. Each check
/// is an idempotent no-op once its field is valid.
pub struct RecordValidator<Q, R> {
    counter: Arc<ReferenceCounter<Q, R>>,
    store: Arc<R>,
    config: AllocatorConfig,
}

impl<Q, R> RecordValidator<Q, R>
where
    Q: SequenceStore,
    R: RecordStore,
{
    pub fn new(
        counter: Arc<ReferenceCounter<Q, R>>,
        store: Arc<R>,
        config: AllocatorConfig,
    ) -> Self {
        Self {
            counter,
            store,
            config,
        }
    }

    /// Checks and backfills both fields, returning true if the record was
    /// mutated by either check.
    pub fn validate(&self, record: &mut Record) -> bool {
        let mut changed = false;

        match self.ensure_simple_number(record) {
            Ok(mutated) => changed |= mutated,
            Err(e) => {
                tracing::error!(record = %record.id, error = %e, "could not populate simple reference number");
            }
        }

        match self.ensure_unique_id(record) {
            Ok(mutated) => changed |= mutated,
            Err(e) => {
                tracing::error!(record = %record.id, error = %e, "could not populate unique identifier");
            }
        }

        changed
    }

    /// Allocates a fresh number when the field is absent, zero, or not a
    /// non-negative integer.
    fn ensure_simple_number(&self, record: &mut Record) -> Result<bool, SysrefError> {
        if !needs_reference(record.field(&self.config.simple_number_field)) {
            return Ok(false);
        }

        let next = self.counter.next()?;
        record.set_field(self.config.simple_number_field.clone(), json!(next));
        tracing::debug!(record = %record.id, reference = next, "assigned simple reference number");
        Ok(true)
    }

    /// Overwrites the unique-identifier entry for the active locale unless
    /// it already holds a well-formed UUID string.
    fn ensure_unique_id(&self, record: &mut Record) -> Result<bool, SysrefError> {
        let locale = self.config.locale.as_str();

        let current = record
            .field(&self.config.unique_id_field)
            .and_then(Value::as_object)
            .and_then(|entries| entries.get(locale))
            .and_then(Value::as_object)
            .and_then(|entry| entry.get("value"))
            .and_then(Value::as_str);

        if let Some(value) = current {
            if Uuid::parse_str(value).is_ok() {
                return Ok(false);
            }
        }

        let direction = self.store.default_text_direction(locale)?;
        let entry = LocalizedValue {
            value: record.entity.to_string(),
            direction,
        };
        let mut entries = serde_json::Map::new();
        entries.insert(
            locale.to_string(),
            serde_json::to_value(entry).map_err(|e| StoreError::Serialization(e.to_string()))?,
        );
        record.set_field(self.config.unique_id_field.clone(), Value::Object(entries));
        Ok(true)
    }
}
