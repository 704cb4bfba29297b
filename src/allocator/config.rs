use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contracts::ScanTarget;

/// Configuration for one reference-holding group.
///
/// `simple_number_field` and `unique_id_field` are field keys inside the
/// reference record; `reference_group` is the group that carries exactly
/// one such record per entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Field key holding the numeric reference.
    pub simple_number_field: String,
    /// Field key holding the per-locale unique identifier value.
    pub unique_id_field: String,
    /// Group identifier of the reference-holding group.
    pub reference_group: Uuid,
    /// Minimum starting value for the counter.
    #[serde(default = "default_initial_seed")]
    pub initial_seed: u64,
    /// Active locale code used when reading and backfilling the unique
    /// identifier.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Name of the backing sequence. Deployments sharing one counter
    /// across several groups must use the same name everywhere.
    #[serde(default = "default_sequence_name")]
    pub sequence_name: String,
}

fn default_initial_seed() -> u64 {
    1
}

fn default_locale() -> String {
    "en".into()
}

fn default_sequence_name() -> String {
    "simple_reference_seq".into()
}

impl AllocatorConfig {
    /// Creates a config with default seed, locale, and sequence name.
    pub fn new(
        simple_number_field: impl Into<String>,
        unique_id_field: impl Into<String>,
        reference_group: Uuid,
    ) -> Self {
        Self {
            simple_number_field: simple_number_field.into(),
            unique_id_field: unique_id_field.into(),
            reference_group,
            initial_seed: default_initial_seed(),
            locale: default_locale(),
            sequence_name: default_sequence_name(),
        }
    }

    /// The bootstrap scan target this group contributes.
    pub fn scan_target(&self) -> ScanTarget {
        ScanTarget {
            group: self.reference_group,
            field: self.simple_number_field.clone(),
        }
    }
}
