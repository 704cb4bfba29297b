use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::contracts::error::StoreError;
use crate::contracts::locale::TextDirection;

/// A mutable record belonging to one group and owned by one entity.
///
/// The field mapping is opaque JSON keyed by field key. The allocator
/// mutates `data` in place; persistence is owned by the [`RecordStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub group: Uuid,
    pub entity: Uuid,
    pub data: HashMap<String, Value>,
}

impl Record {
    /// Creates a transient record with no field data.
    pub fn blank(group: Uuid, entity: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            entity,
            data: HashMap::new(),
        }
    }

    /// Returns the value stored under `field`, if any.
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Writes `value` under `field`, replacing any previous value.
    pub fn set_field(&mut self, field: impl Into<String>, value: Value) {
        self.data.insert(field.into(), value);
    }
}

/// One group/field pair covered by the bootstrap scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTarget {
    /// Group whose records hold numeric references.
    pub group: Uuid,
    /// Field key the references are stored under.
    pub field: String,
}

/// Parses a field value as a numeric reference.
///
/// Accepts a non-negative integer JSON number, or a non-empty ASCII-digit
/// string that fits in `u64`. Everything else (null, floats, negatives,
/// booleans, arrays, objects, non-digit strings) is treated as absent.
pub fn parse_reference(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

/// Returns true if the field value does not hold a usable reference and a
/// fresh number must be allocated.
///
/// Numeric zero counts as unset; the digit string `"0"` does not.
pub fn needs_reference(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_u64().is_none_or(|v| v == 0),
        Some(v) => parse_reference(v).is_none(),
        None => true,
    }
}

/// External record store.
///
/// # Invariants
/// - `persist` participates in the caller's ambient transaction
/// - `query_records` returns every live record matching the filter
/// - At most one reference record per entity by convention; the store is
///   not required to enforce it
pub trait RecordStore: Send + Sync {
    /// Fetches records in `group`, optionally filtered by owning entity.
    fn query_records(&self, group: Uuid, entity: Option<Uuid>) -> Result<Vec<Record>, StoreError>;

    /// Constructs a blank record for `group`/`entity` without persisting it.
    fn blank_record(&self, group: Uuid, entity: Uuid) -> Result<Record, StoreError>;

    /// Durably saves `record`, inserting or replacing by record id.
    fn persist(&self, record: &Record) -> Result<(), StoreError>;

    /// Returns the maximum parseable numeric reference across all records
    /// in the targeted groups, or `None` if no record holds one.
    fn max_numeric_reference(&self, targets: &[ScanTarget]) -> Result<Option<u64>, StoreError>;

    /// Returns the default text direction for a locale code.
    fn default_text_direction(&self, locale: &str) -> Result<TextDirection, StoreError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_reference_accepts_integers_and_digit_strings() {
        assert_eq!(parse_reference(&json!(42)), Some(42));
        assert_eq!(parse_reference(&json!(0)), Some(0));
        assert_eq!(parse_reference(&json!("41")), Some(41));
        assert_eq!(parse_reference(&json!("0")), Some(0));
    }

    #[test]
    fn parse_reference_rejects_everything_else() {
        assert_eq!(parse_reference(&json!(3.1415927)), None);
        assert_eq!(parse_reference(&json!(-5)), None);
        assert_eq!(parse_reference(&json!("")), None);
        assert_eq!(parse_reference(&json!("12a")), None);
        assert_eq!(parse_reference(&json!(" 12")), None);
        assert_eq!(parse_reference(&json!(true)), None);
        assert_eq!(parse_reference(&json!(null)), None);
        assert_eq!(parse_reference(&json!([1])), None);
        assert_eq!(parse_reference(&json!({"v": 1})), None);
        // Larger than u64
        assert_eq!(parse_reference(&json!("99999999999999999999999999")), None);
    }

    #[test]
    fn needs_reference_treats_zero_as_unset() {
        assert!(needs_reference(Some(&json!(0))));
        assert!(needs_reference(Some(&json!(null))));
        assert!(needs_reference(None));
        assert!(!needs_reference(Some(&json!(1))));
        // The digit string "0" is kept, matching truthiness of a non-empty string
        assert!(!needs_reference(Some(&json!("0"))));
    }

    #[test]
    fn blank_records_get_distinct_ids() {
        let group = Uuid::new_v4();
        let entity = Uuid::new_v4();
        let a = Record::blank(group, entity);
        let b = Record::blank(group, entity);
        assert_ne!(a.id, b.id);
        assert!(a.data.is_empty());
        assert_eq!(a.group, group);
        assert_eq!(a.entity, entity);
    }
}
