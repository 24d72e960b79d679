//! Persistence interface for the team-id counter.

use std::fmt::Debug;

use crate::error::StoreError;

/// Durable storage for the last committed team sequence number.
///
/// The engine performs no I/O of its own; it loads the counter once through
/// this trait and writes it back only when a run is committed.
pub trait CounterStore: Send + Debug {
    /// Reads the last committed value. A store with no value yet returns 0.
    fn load(&self) -> Result<u64, StoreError>;

    /// Durably records `value` as the last committed sequence number.
    fn save(&mut self, value: u64) -> Result<(), StoreError>;
}
