//! Offset-sharded fragment counting on a fixed worker pool.
//!
//! For every configured length `k` the windows of the sequence are split into
//! `k` shards by start offset: shard `o` holds the windows starting at
//! `o, o + k, o + 2k, ...`. Each shard is one job with its own
//! [`ResultCell`]. Together the shards of one length cover every window
//! exactly once.
//!
//! Jobs go through a bounded channel read by `workers` long-lived threads.
//! Each worker builds a private [`CountTable`] for its job and publishes it to
//! the job's cell. Once every job has been sent the channel is closed, and the
//! workers exit when it runs dry.
//!
//! ```rust
//! use knucleotide::kmer::{EncodedSequence, KmerLength};
//! use knucleotide::scheduler::FragmentScheduler;
//!
//! let sequence = EncodedSequence::from_bases(b"GGTATTTTAATTTATAGTAG");
//! let lengths = [KmerLength::new(1)?, KmerLength::new(3)?];
//!
//! let fragments = FragmentScheduler::new(2).spawn(&sequence, &lengths);
//! assert_eq!(fragments.cells().len(), 1 + 3);
//!
//! let windows: u64 = fragments.for_length(lengths[1]).map(|c| c.wait().total()).sum();
//! assert_eq!(windows, 18);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    panic,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel as channel;
use tracing::{debug, error, info, info_span, warn};

use crate::{
    cell::ResultCell,
    kmer::{EncodedSequence, KmerLength},
    progress::{Progress, ScanProgress},
    table::CountTable,
};

/// Counts the windows of length `k` starting at `offset, offset + k, ...`.
pub fn count_offset(sequence: &EncodedSequence, k: KmerLength, offset: usize) -> CountTable {
    let mut table = CountTable::new();
    for key in sequence.offset_windows(k, offset) {
        table.increment(key);
    }
    table
}

/// Spawns fragment-counting runs on a fixed number of worker threads.
#[derive(Debug, Clone, Copy)]
pub struct FragmentScheduler {
    workers: usize,
}

impl Default for FragmentScheduler {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl FragmentScheduler {
    /// Creates a scheduler with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Starts one job per `(k, offset)` pair and returns the cells.
    ///
    /// Cells are ordered by `lengths`, then by offset. This call returns once
    /// every job has been queued; the cells fill in as workers finish them.
    pub fn spawn(&self, sequence: &EncodedSequence, lengths: &[KmerLength]) -> Fragments {
        let cells: Vec<Arc<ResultCell>> = lengths
            .iter()
            .flat_map(|&k| (0..k.get()).map(move |offset| Arc::new(ResultCell::new(k, offset))))
            .collect();

        let _span = info_span!("count_fragments", jobs = cells.len(), workers = self.workers)
            .entered();

        for &k in lengths {
            if k.get() > sequence.len() {
                warn!(
                    k = k.get(),
                    bases = sequence.len(),
                    "fragment length exceeds sequence length; no windows to count"
                );
            }
        }

        let progress = Arc::new(ScanProgress::new());
        let (job_tx, job_rx) = channel::bounded::<Arc<ResultCell>>(self.workers);

        let workers: Vec<JoinHandle<()>> = (0..self.workers)
            .map(|_| {
                let jobs = job_rx.clone();
                let sequence = sequence.clone();
                let progress = Arc::clone(&progress);
                thread::spawn(move || {
                    for cell in jobs.iter() {
                        let table = count_offset(&sequence, cell.k(), cell.offset());
                        let windows = table.total();
                        debug!(
                            k = cell.k().get(),
                            offset = cell.offset(),
                            windows,
                            distinct = table.len(),
                            "publishing shard"
                        );
                        cell.publish(table);
                        progress.record_job(windows);
                    }
                })
            })
            .collect();
        drop(job_rx);

        for cell in &cells {
            // Receivers only disappear if every worker has died, and unqueued
            // cells would never be published.
            if job_tx.send(Arc::clone(cell)).is_err() {
                drop(job_tx);
                join_workers(workers);
                abandon_run(cells.len());
            }
        }
        drop(job_tx);
        debug!(jobs = cells.len(), "all jobs dispatched, queue closed");

        Fragments {
            cells,
            workers,
            progress,
        }
    }
}

/// The cells of a fragment-counting run and the workers filling them.
///
/// Dropping this value detaches the workers; cells already handed out stay
/// readable and are still published.
#[derive(Debug)]
pub struct Fragments {
    cells: Vec<Arc<ResultCell>>,
    workers: Vec<JoinHandle<()>>,
    progress: Arc<ScanProgress>,
}

impl Fragments {
    /// Every cell, ordered by length then offset.
    pub fn cells(&self) -> &[Arc<ResultCell>] {
        &self.cells
    }

    /// The cell counting length `k` from `offset`, if that job exists.
    pub fn cell(&self, k: KmerLength, offset: usize) -> Option<&Arc<ResultCell>> {
        self.cells
            .iter()
            .find(|cell| cell.k() == k && cell.offset() == offset)
    }

    /// Every offset shard of length `k`.
    pub fn for_length(&self, k: KmerLength) -> impl Iterator<Item = &Arc<ResultCell>> + '_ {
        self.cells.iter().filter(move |cell| cell.k() == k)
    }

    /// Current progress of the workers.
    pub fn progress(&self) -> Progress {
        self.progress.snapshot()
    }

    /// Waits for every worker to exit and returns the cells, all published.
    ///
    /// A panic inside a worker is propagated to the caller.
    pub fn join(self) -> Vec<Arc<ResultCell>> {
        join_workers(self.workers);
        let progress = self.progress.snapshot();
        info!(
            jobs = progress.jobs_completed,
            windows = progress.windows_scanned,
            "fragment counting complete"
        );
        self.cells
    }
}

/// Joins every worker, re-raising the first worker panic on this thread.
fn join_workers(workers: Vec<JoinHandle<()>>) {
    for handle in workers {
        if let Err(payload) = handle.join() {
            panic::resume_unwind(payload);
        }
    }
}

#[allow(clippy::panic)]
fn abandon_run(jobs: usize) -> ! {
    error!(jobs, "worker pool exited before all jobs were queued");
    panic!("worker pool exited before all {jobs} jobs were queued");
}
