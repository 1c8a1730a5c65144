//! Parallel, offset-sharded fragment counting.
//!
//! `knucleotide` reads the `>THREE` record of a FASTA stream, counts every
//! overlapping fragment of lengths 1, 2, 3, 4, 6, 12 and 18, and reports the
//! 1- and 2-mer frequency tables together with exact counts for a fixed set of
//! fragments.
//!
//! Each length `k` is split into `k` offset shards. Shard `o` counts the
//! windows starting at `o, o + k, o + 2k, ...`, so the shards of one length
//! never overlap and together cover every window. Every shard is counted by a
//! worker into a private [`table::CountTable`] and handed over through a
//! single-assignment [`cell::ResultCell`]; the report reads the cells as they
//! are published.
//!
//! # Example
//!
//! ```rust
//! use knucleotide::config::RunConfig;
//! use knucleotide::run::run_with_io;
//!
//! let fasta = b">THREE\nGGTATTTTAATTTATAGTAG\n";
//! let mut out = Vec::new();
//! let report = run_with_io(&fasta[..], &mut out, &RunConfig::default())?;
//!
//! assert_eq!(report.counts[0].fragment, "GGT");
//! assert_eq!(report.counts[0].count, 1);
//! # Ok::<(), knucleotide::error::KnucleotideError>(())
//! ```

pub mod cell;
pub mod cli;
pub mod config;
pub mod error;
pub mod kmer;
pub mod progress;
pub mod reader;
pub mod report;
pub mod run;
pub mod scheduler;
pub mod table;
