//! Counter store doubles.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use teamforge_core::{CounterStore, StoreError};

/// In-memory counter store whose saves can be made to fail.
///
/// Clones share state, so a test can keep a handle after moving the store
/// into an allocator and flip failures on or off mid-test.
#[derive(Debug, Clone, Default)]
pub struct FlakyCounterStore {
    value: Arc<AtomicU64>,
    fail_saves: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
}

impl FlakyCounterStore {
    pub fn new(initial: u64) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(initial)),
            ..Self::default()
        }
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    /// The last successfully saved value.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl CounterStore for FlakyCounterStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.value.load(Ordering::SeqCst))
    }

    fn save(&mut self, value: u64) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("counter store unavailable")));
        }
        self.value.store(value, Ordering::SeqCst);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
