use std::sync::Arc;

use uuid::Uuid;

use crate::allocator::{AllocatorConfig, BootstrapScanner, RecordValidator, ReferenceCounter};
use crate::contracts::{Record, RecordStore, SequenceStore, SysrefError};

/// Save-hook entry point for one reference-holding group.
///
/// Invoked synchronously after a record is persisted, before the outer
/// save transaction completes. Decides whether the saved record is itself
/// the reference record (validate in place, the caller's save persists the
/// mutation) or an unrelated record of the same entity (locate or create
/// the companion reference record and persist whatever changed).
pub struct ReferenceAllocator<Q, R> {
    store: Arc<R>,
    validator: RecordValidator<Q, R>,
    reference_group: Uuid,
}

impl<Q, R> ReferenceAllocator<Q, R>
where
    Q: SequenceStore,
    R: RecordStore,
{
    /// Wires up an allocator with its own counter, bootstrapped from this
    /// group alone.
    pub fn new(store: Arc<R>, sequences: Arc<Q>, config: AllocatorConfig) -> Self {
        let scanner = BootstrapScanner::new(Arc::clone(&store), vec![config.scan_target()]);
        let counter = Arc::new(ReferenceCounter::with_settings(
            sequences,
            scanner,
            config.sequence_name.clone(),
            config.initial_seed,
        ));
        Self::with_counter(store, counter, config)
    }

    /// Wires up an allocator over a shared counter.
    ///
    /// Deployments with several reference-holding groups construct one
    /// counter whose scanner covers every group's scan target, then share
    /// it here so allocation stays unique across all of them.
    pub fn with_counter(
        store: Arc<R>,
        counter: Arc<ReferenceCounter<Q, R>>,
        config: AllocatorConfig,
    ) -> Self {
        let reference_group = config.reference_group;
        let validator = RecordValidator::new(counter, Arc::clone(&store), config);
        Self {
            store,
            validator,
            reference_group,
        }
    }

    /// The validator driving this allocator.
    pub fn validator(&self) -> &RecordValidator<Q, R> {
        &self.validator
    }

    /// Handles one saved record.
    ///
    /// Fail-open by contract: every error is logged and swallowed so a
    /// misconfigured allocator never blocks an unrelated record save. The
    /// cost is that genuine configuration errors surface only in the logs,
    /// as no-ops from the caller's point of view.
    pub fn on_record_saved(&self, record: &mut Record) {
        if let Err(e) = self.process(record) {
            tracing::error!(
                record = %record.id,
                entity = %record.entity,
                error = %e,
                "reference allocation failed"
            );
        }
    }

    fn process(&self, record: &mut Record) -> Result<(), SysrefError> {
        // The user is editing the reference record directly; its own save
        // is still in flight and will persist whatever we write.
        if record.group == self.reference_group {
            self.validator.validate(record);
            return Ok(());
        }

        let existing = self
            .store
            .query_records(self.reference_group, Some(record.entity))?;

        if existing.is_empty() {
            let mut fresh = self.store.blank_record(self.reference_group, record.entity)?;
            if self.validator.validate(&mut fresh) {
                self.store.persist(&fresh)?;
            }
            return Ok(());
        }

        // Should be a singleton per entity; tolerate duplicates and handle
        // every match independently.
        for mut reference in existing {
            if self.validator.validate(&mut reference) {
                if let Err(e) = self.store.persist(&reference) {
                    tracing::error!(
                        record = %reference.id,
                        error = %e,
                        "failed to persist reference record"
                    );
                }
            }
        }
        Ok(())
    }
}
