//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// Counts nucleotide fragments of the >THREE record of a FASTA stream.
///
/// Prints the frequency tables of 1- and 2-mers followed by the exact counts
/// of GGT, GGTA, GGTATT, GGTATTTTAATT and GGTATTTTAATTTATAGT.
#[derive(Parser, Debug)]
#[command(name = "knucleotide")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to a FASTA file (reads from stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Number of counting threads
    #[arg(short, long, default_value_t = num_cpus::get(), value_parser = parse_threads)]
    pub threads: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log progress to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output, including warnings
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Frequency tables and tab-separated counts
    #[default]
    Text,
    /// The same report as pretty-printed JSON
    Json,
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let threads: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if threads == 0 {
        return Err("thread count must be at least 1".to_string());
    }
    Ok(threads)
}
