//! End-to-end runs: read the record, count every shard, report.
//!
//! Counting starts as soon as the record is loaded. The report is assembled in
//! memory and written in one go, so a failure never leaves partial output.

use std::{
    io::{stdout, BufWriter, Read, Write},
    sync::Arc,
};

use rayon::prelude::{ParallelBridge, ParallelIterator};
use rustc_hash::FxHashMap;
use tracing::info;

use crate::{
    cell::ResultCell,
    config::RunConfig,
    error::KnucleotideError,
    kmer::{unpack_to_string, EncodedSequence, KmerLength},
    reader::{read_record, Input},
    report::{merge_shards, Report},
    scheduler::FragmentScheduler,
};

/// Reads `input`, counts it with `config` and writes the report to stdout.
pub fn run(input: &Input, config: &RunConfig) -> Result<(), KnucleotideError> {
    info!(input = %input, workers = config.workers, "starting run");
    let sequence = input.read_record(&config.marker)?;
    let report = count(&sequence, config)?;

    let buf = BufWriter::new(stdout().lock());
    report.write(buf, config.format)
}

/// Like [`run`], but for any reader and writer. Returns the report it wrote.
pub fn run_with_io<R, W>(
    reader: R,
    writer: W,
    config: &RunConfig,
) -> Result<Report, KnucleotideError>
where
    R: Read,
    W: Write,
{
    let sequence = read_record(reader, &config.marker)?;
    let report = count(&sequence, config)?;
    report.write(writer, config.format)?;
    Ok(report)
}

/// Counts every configured length of `sequence` and builds the report.
pub fn count(sequence: &EncodedSequence, config: &RunConfig) -> Result<Report, KnucleotideError> {
    let fragments = FragmentScheduler::new(config.workers).spawn(sequence, &config.lengths);
    let cells: Vec<Arc<ResultCell>> = fragments.cells().to_vec();
    let report = Report::build(sequence, &cells, config)?;
    fragments.join();
    Ok(report)
}

/// Counts every length-`k` window of `sequence`, keyed by fragment string.
///
/// Runs the offset-sharded scheduler for the single length `k` and merges the
/// shards.
///
/// ```rust
/// use knucleotide::kmer::{EncodedSequence, KmerLength};
/// use knucleotide::run::fragment_counts;
///
/// let sequence = EncodedSequence::from_bases(b"ACGACG");
/// let counts = fragment_counts(&sequence, KmerLength::new(3)?, 2);
///
/// assert_eq!(counts["ACG"], 2);
/// assert_eq!(counts["CGA"], 1);
/// assert_eq!(counts["GAC"], 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fragment_counts(
    sequence: &EncodedSequence,
    k: KmerLength,
    workers: usize,
) -> FxHashMap<String, u64> {
    let cells = FragmentScheduler::new(workers).spawn(sequence, &[k]).join();
    let Some(merged) = merge_shards(&cells, k) else {
        return FxHashMap::default();
    };

    merged
        .wait()
        .iter()
        .par_bridge()
        .map(|(key, count)| (unpack_to_string(key, k), count))
        .collect()
}
