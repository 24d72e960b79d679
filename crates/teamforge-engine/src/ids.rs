//! Sequential team identifier allocation.
//!
//! The allocator owns the counter and is only ever borrowed mutably by the
//! serial merge step; workers never see it. Identifiers handed out during a
//! run become durable on [`persist`](TeamIdAllocator::persist) and can be
//! taken back with [`rollback`](TeamIdAllocator::rollback) until then.

use teamforge_core::{CounterStore, DraftTeam, Result, Team, TeamId};
use tracing::debug;

/// Counter value captured before a run, used to roll it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CounterSnapshot(u64);

impl CounterSnapshot {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing team identifiers backed by a [`CounterStore`].
#[derive(Debug)]
pub struct TeamIdAllocator<C: CounterStore> {
    store: C,
    value: u64,
    persisted: u64,
}

impl<C: CounterStore> TeamIdAllocator<C> {
    /// Reads the counter once from `store`.
    pub fn load(store: C) -> Result<Self> {
        let value = store.load()?;
        debug!(event = "counter_loaded", value = value);
        Ok(Self {
            store,
            value,
            persisted: value,
        })
    }

    /// The most recently allocated sequence number.
    pub fn current(&self) -> u64 {
        self.value
    }

    /// The value last written to the store.
    pub fn persisted(&self) -> u64 {
        self.persisted
    }

    /// Returns true if identifiers were allocated since the last persist.
    pub fn is_dirty(&self) -> bool {
        self.value != self.persisted
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot(self.value)
    }

    /// Increments the counter and returns the new identifier.
    pub fn allocate(&mut self) -> TeamId {
        self.value += 1;
        TeamId::new(self.value)
    }

    /// Attaches the next identifier to `draft`.
    pub fn finalize(&mut self, draft: DraftTeam) -> Team {
        let id = self.allocate();
        draft.finalize(id)
    }

    /// Writes the counter to the store. Does nothing if nothing changed.
    ///
    /// On failure the in-memory counter is kept, so calling `persist` again
    /// writes the same value.
    pub fn persist(&mut self) -> Result<()> {
        if !self.is_dirty() {
            return Ok(());
        }
        self.store.save(self.value)?;
        self.persisted = self.value;
        debug!(event = "counter_persisted", value = self.value);
        Ok(())
    }

    /// Restores the in-memory counter to `snapshot`.
    ///
    /// Never goes below the persisted value; identifiers that were committed
    /// stay taken even if the snapshot predates the commit.
    pub fn rollback(&mut self, snapshot: CounterSnapshot) {
        let to = snapshot.0.max(self.persisted);
        debug!(event = "counter_rolled_back", from = self.value, to = to);
        self.value = to;
    }

    pub fn store(&self) -> &C {
        &self.store
    }
}
