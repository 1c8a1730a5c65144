//! Run configuration.
//!
//! The constants describe the reference run: which record to read, which
//! fragment lengths to count and which fragments to look up. [`RunConfig`]
//! bundles them with the worker count and output format; its `Default` is the
//! reference run on every available core.

use crate::{
    cli::{Args, OutputFormat},
    error::KmerLengthError,
    kmer::KmerLength,
};

/// Header prefix of the record whose body is counted.
pub const RECORD_MARKER: &[u8] = b">THREE";

/// Fragment lengths counted in a run, shortest first.
pub const FRAGMENT_LENGTHS: [usize; 7] = [1, 2, 3, 4, 6, 12, 18];

/// Fragments whose exact occurrence count is reported.
pub const QUERY_FRAGMENTS: [&str; 5] = [
    "GGT",
    "GGTA",
    "GGTATT",
    "GGTATTTTAATT",
    "GGTATTTTAATTTATAGT",
];

/// Everything a run needs besides its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Header prefix selecting the record to count.
    pub marker: Vec<u8>,
    /// Fragment lengths to count. The first two get frequency tables.
    pub lengths: Vec<KmerLength>,
    /// Fragments to count exactly.
    pub queries: Vec<String>,
    /// Worker pool size.
    pub workers: usize,
    /// Report layout.
    pub format: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            marker: RECORD_MARKER.to_vec(),
            lengths: FRAGMENT_LENGTHS
                .iter()
                .filter_map(|&k| KmerLength::new(k).ok())
                .collect(),
            queries: QUERY_FRAGMENTS.iter().map(ToString::to_string).collect(),
            workers: num_cpus::get().max(1),
            format: OutputFormat::default(),
        }
    }
}

impl RunConfig {
    /// Builds a configuration from parsed command-line arguments.
    pub fn from_args(args: &Args) -> Self {
        Self {
            workers: args.threads.max(1),
            format: args.format,
            ..Self::default()
        }
    }

    /// Replaces the fragment lengths, validating each one.
    pub fn with_lengths(mut self, lengths: &[usize]) -> Result<Self, KmerLengthError> {
        self.lengths = lengths
            .iter()
            .map(|&k| KmerLength::new(k))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Replaces the query fragments.
    #[must_use]
    pub fn with_queries<I, S>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries = queries.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}
