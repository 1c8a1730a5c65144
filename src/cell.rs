//! Single-assignment result cells.
//!
//! A [`ResultCell`] is bound to one `(k, offset)` job. The worker that runs the
//! job publishes its finished [`CountTable`] exactly once; any number of
//! readers block in [`ResultCell::wait`] until then and afterwards get the same
//! shared, read-only table without blocking.
//!
//! The table lives in a [`OnceLock`], which makes it immutable after
//! publication. The mutex and condition variable exist only to park readers
//! until the lock is filled.

use std::sync::{Condvar, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::{kmer::KmerLength, table::CountTable};

/// The counting result for one offset shard of one fragment length.
#[derive(Debug)]
pub struct ResultCell {
    k: KmerLength,
    offset: usize,
    table: OnceLock<CountTable>,
    gate: Mutex<()>,
    published: Condvar,
}

impl ResultCell {
    /// Creates an empty cell for the windows of length `k` starting at
    /// `offset, offset + k, ...`.
    pub const fn new(k: KmerLength, offset: usize) -> Self {
        Self {
            k,
            offset,
            table: OnceLock::new(),
            gate: Mutex::new(()),
            published: Condvar::new(),
        }
    }

    /// Creates a cell that is already published.
    pub fn published(k: KmerLength, offset: usize, table: CountTable) -> Self {
        Self {
            k,
            offset,
            table: OnceLock::from(table),
            gate: Mutex::new(()),
            published: Condvar::new(),
        }
    }

    /// Fragment length counted in this cell.
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Offset of the first window counted in this cell.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Stores the finished table and wakes every waiting reader.
    ///
    /// # Panics
    ///
    /// Publishing twice to the same cell is a programming error and panics.
    #[allow(clippy::panic)]
    pub fn publish(&self, table: CountTable) {
        let _gate = self.lock();
        if self.table.set(table).is_err() {
            panic!(
                "result cell for k={} offset={} published twice",
                self.k, self.offset
            );
        }
        self.published.notify_all();
    }

    /// Blocks until the table is published, then returns it.
    ///
    /// Once published, every call returns the same table immediately.
    pub fn wait(&self) -> &CountTable {
        if let Some(table) = self.table.get() {
            return table;
        }

        let mut gate = self.lock();
        loop {
            if let Some(table) = self.table.get() {
                return table;
            }
            gate = self
                .published
                .wait(gate)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Returns the table if it has been published, without blocking.
    pub fn try_get(&self) -> Option<&CountTable> {
        self.table.get()
    }

    pub fn is_published(&self) -> bool {
        self.table.get().is_some()
    }

    // The guarded value is `()`, so a poisoned lock carries no broken state.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
