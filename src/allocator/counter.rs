use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::allocator::BootstrapScanner;
use crate::contracts::{RecordStore, SequenceStore, SysrefError};

/// Default name of the backing sequence.
pub const DEFAULT_SEQUENCE_NAME: &str = "simple_reference_seq";

/// Monotonic reference-number counter with lazy, race-safe creation.
///
/// Constructed once per process and shared by reference among callers.
/// The backing sequence is created on first use, seeded from a scan of
/// pre-existing record data so already-assigned numbers are never
/// reissued.
///
/// # Invariants
/// - Every value returned by `next()` is distinct across all concurrent
///   callers in this and other processes
/// - The first value is >= `max(initial_seed, highest pre-existing + 1)`
/// - Gaps are permitted, duplicates never
pub struct ReferenceCounter<Q, R> {
    sequences: Arc<Q>,
    scanner: BootstrapScanner<R>,
    name: String,
    initial_seed: u64,
    /// Process-local existence cache. Only ever transitions false -> true;
    /// a stale false merely costs a redundant existence probe, so no lock
    /// is held around it.
    created: AtomicBool,
}

impl<Q, R> ReferenceCounter<Q, R>
where
    Q: SequenceStore,
    R: RecordStore,
{
    /// Creates a counter over the default sequence name with seed 1.
    pub fn new(sequences: Arc<Q>, scanner: BootstrapScanner<R>) -> Self {
        Self::with_settings(sequences, scanner, DEFAULT_SEQUENCE_NAME, 1)
    }

    /// Creates a counter with an explicit sequence name and minimum seed.
    pub fn with_settings(
        sequences: Arc<Q>,
        scanner: BootstrapScanner<R>,
        name: impl Into<String>,
        initial_seed: u64,
    ) -> Self {
        Self {
            sequences,
            scanner,
            name: name.into(),
            initial_seed,
            created: AtomicBool::new(false),
        }
    }

    /// Returns the name of the backing sequence.
    pub fn sequence_name(&self) -> &str {
        &self.name
    }

    /// Allocates the next reference number, creating the backing sequence
    /// first if it does not exist yet.
    ///
    /// A failed create-if-absent is fatal and propagates: no valid
    /// numbers can be issued without the sequence.
    pub fn next(&self) -> Result<u64, SysrefError> {
        if !self.created.load(Ordering::Acquire) {
            self.ensure_created()?;
        }
        Ok(self.sequences.next_value(&self.name)?)
    }

    /// Probes for the sequence and creates it when absent.
    ///
    /// Safe against concurrent callers racing through the same path: the
    /// store's create-if-absent is atomic, so at most one physical
    /// sequence is created no matter how many callers attempt it, and the
    /// losers' create calls are no-ops.
    fn ensure_created(&self) -> Result<(), SysrefError> {
        if self.sequences.sequence_exists(&self.name)? {
            self.created.store(true, Ordering::Release);
            return Ok(());
        }

        let seed = self.scanner.compute_seed()?;
        let start = seed
            .map(|s| s.saturating_add(1))
            .unwrap_or(1)
            .max(self.initial_seed);
        self.sequences.create_sequence_if_absent(&self.name, start)?;
        tracing::info!(sequence = %self.name, start, "created reference sequence");
        self.created.store(true, Ordering::Release);
        Ok(())
    }
}
