//! Basic fragment counting example.
//!
//! Loads one record of a FASTA file and prints the most frequent fragments of
//! a single length.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example basic_count -- sequences.fa [k] [marker]
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::env;
use std::process;

use knucleotide::kmer::KmerLength;
use knucleotide::reader::Input;
use knucleotide::run::fragment_counts;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <fasta_file> [k] [marker]", args[0]);
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  fasta_file  Path to a FASTA file, or - for stdin");
        eprintln!("  k           Fragment length (default: 12)");
        eprintln!("  marker      Header prefix of the record to count (default: >THREE)");
        process::exit(1);
    }

    let input = Input::from_option(Some(args[1].as_ref()));
    let k: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(12);
    let marker = args.get(3).map_or(">THREE", String::as_str);

    let k = match KmerLength::new(k) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Invalid fragment length: {e}");
            process::exit(1);
        }
    };

    let sequence = match input.read_record(marker.as_bytes()) {
        Ok(sequence) => sequence,
        Err(e) => {
            eprintln!("Error reading {input}: {e}");
            process::exit(1);
        }
    };

    let counts = fragment_counts(&sequence, k, num_cpus::get());

    println!("Fragment counting complete!");
    println!("  Record length: {}", sequence.len());
    println!("  Fragment length: {k}");
    println!("  Windows: {}", sequence.window_count(k));
    println!("  Distinct fragments: {}", counts.len());

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!("\nTop 10 most frequent fragments:");
    for (fragment, count) in sorted.into_iter().take(10) {
        println!("  {fragment}: {count}");
    }
}
