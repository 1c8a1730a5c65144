//! Direct library API tests.
//!
//! These tests call the library functions directly without going through the CLI,
//! enabling more precise assertions about behavior and return values.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::sync::Arc;

use knucleotide::cell::ResultCell;
use knucleotide::config::{RunConfig, FRAGMENT_LENGTHS, QUERY_FRAGMENTS};
use knucleotide::error::KnucleotideError;
use knucleotide::kmer::{pack_fragment, EncodedSequence, KmerLength};
use knucleotide::reader::{read_record, Input};
use knucleotide::report::{
    count_fragment, count_report, frequency_report, merge_into, merge_shards,
};
use knucleotide::run::{count, fragment_counts, run_with_io};
use knucleotide::scheduler::FragmentScheduler;
use tempfile::NamedTempFile;

const SAMPLE: &str = "GGTATTTTAATTTATAGTAG";

/// Creates a temporary FASTA file with the given content and returns its path.
fn temp_fasta(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

fn k(len: usize) -> KmerLength {
    KmerLength::new(len).unwrap()
}

fn lengths(values: &[usize]) -> Vec<KmerLength> {
    values.iter().map(|&v| k(v)).collect()
}

#[test]
fn input_file_reads_marked_record() {
    let fasta = temp_fasta(">ONE first\nAAAA\n>THREE third\nGGTA\nttaa\n>FOUR\nCCCC\n");
    let input = Input::File(fasta.path().to_path_buf());

    let sequence = input.read_record(b">THREE").unwrap();
    assert_eq!(sequence, EncodedSequence::from_bases(b"GGTATTAA"));
}

#[test]
fn input_file_missing_path_is_read_error() {
    let input = Input::File("/nonexistent/path/to/file.fa".into());
    let err = input.read_record(b">THREE").unwrap_err();
    assert!(matches!(err, KnucleotideError::SequenceRead { .. }));
    assert!(err.to_string().contains("/nonexistent/path/to/file.fa"));
}

#[test]
fn read_record_takes_first_matching_record() {
    let fasta = b">THREE a\nAC\n>THREE b\nGT\n";
    let sequence = read_record(&fasta[..], b">THREE").unwrap();
    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence, EncodedSequence::from_bases(b"AC"));
}

#[test]
fn count_fragment_sums_every_shard() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let cells = FragmentScheduler::new(3)
        .spawn(&sequence, &lengths(&FRAGMENT_LENGTHS))
        .join();

    assert_eq!(count_fragment(&cells, "GGT").unwrap(), 1);
    assert_eq!(count_fragment(&cells, "TA").unwrap(), 5);
    assert_eq!(count_fragment(&cells, "T").unwrap(), 10);
    assert_eq!(count_fragment(&cells, "ggtatt").unwrap(), 1);
    assert_eq!(count_fragment(&cells, "CCCC").unwrap(), 0);
}

#[test]
fn count_fragment_rejects_bad_queries() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let cells = FragmentScheduler::new(2).spawn(&sequence, &lengths(&[3])).join();

    assert!(matches!(
        count_fragment(&cells, "GNT"),
        Err(KnucleotideError::InvalidBase { base: b'N', position: 1 })
    ));
    assert!(matches!(
        count_fragment(&cells, ""),
        Err(KnucleotideError::InvalidKmerLength { k: 0, .. })
    ));
    // No shards of length 4 were counted.
    assert_eq!(count_fragment(&cells, "GGTA").unwrap(), 0);
}

#[test]
fn count_report_formats_tab_separated() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let cells = FragmentScheduler::new(2).spawn(&sequence, &lengths(&[4])).join();
    assert_eq!(count_report(&cells, "GGTA").unwrap(), "1\tGGTA");
}

#[test]
fn frequency_report_over_merged_shards() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let two = k(2);
    let cells = FragmentScheduler::new(4).spawn(&sequence, &[two]).join();
    let merged = merge_shards(&cells, two).unwrap();

    assert_eq!(
        frequency_report(sequence.window_count(two), &merged),
        "TA 26.316\nTT 26.316\nAT 15.789\nAG 10.526\nGT 10.526\nAA 5.263\nGG 5.263\n"
    );
}

#[test]
fn merge_into_leaves_inputs_untouched() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let one = k(1);
    let cells = FragmentScheduler::new(2).spawn(&sequence, &[one]).join();
    let lone: Arc<ResultCell> = Arc::clone(&cells[0]);
    let before = lone.wait().total();

    let merged = merge_into(&lone, &lone);
    assert!(merged.is_published());
    assert_eq!(merged.wait().total(), before * 2);
    assert_eq!(lone.wait().total(), before);
}

#[test]
fn count_is_independent_of_worker_count() {
    let sequence = EncodedSequence::from_bases(SAMPLE.repeat(7).as_bytes());
    let baseline = count(&sequence, &RunConfig::default().with_workers(1)).unwrap();

    for workers in [2, 3, 8, 64] {
        let report = count(&sequence, &RunConfig::default().with_workers(workers)).unwrap();
        assert_eq!(report.to_text(), baseline.to_text(), "workers = {workers}");
    }
}

#[test]
fn run_with_io_end_to_end() {
    let fasta = format!(">ONE\nCCCC\n>THREE sample\n{}\n{}\n", &SAMPLE[..10], &SAMPLE[10..]);
    let mut out = Vec::new();
    let report = run_with_io(fasta.as_bytes(), &mut out, &RunConfig::default()).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "T 50.000\nA 30.000\nG 20.000\n\n\
         TA 26.316\nTT 26.316\nAT 15.789\nAG 10.526\nGT 10.526\nAA 5.263\nGG 5.263\n\n\
         1\tGGT\n1\tGGTA\n1\tGGTATT\n1\tGGTATTTTAATT\n1\tGGTATTTTAATTTATAGT\n"
    );
    let queried: Vec<&str> = report.counts.iter().map(|c| c.fragment.as_str()).collect();
    assert_eq!(queried, QUERY_FRAGMENTS);
}

#[test]
fn custom_lengths_and_queries() {
    let config = RunConfig::default()
        .with_lengths(&[3, 1])
        .unwrap()
        .with_queries(["TTT", "A"]);
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let report = count(&sequence, &config).unwrap();

    assert_eq!(report.frequencies[0].k, 3);
    assert_eq!(report.frequencies[0].total, 18);
    assert_eq!(report.frequencies[1].k, 1);
    assert_eq!(report.counts[0].count, 3);
    assert_eq!(report.counts[1].count, 6);
}

#[test]
fn fragment_counts_agree_with_count_fragment() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let three = k(3);
    let counts = fragment_counts(&sequence, three, 2);
    let cells = FragmentScheduler::new(2).spawn(&sequence, &[three]).join();

    assert_eq!(counts.values().sum::<u64>(), 18);
    for (fragment, &expected) in &counts {
        assert_eq!(count_fragment(&cells, fragment).unwrap(), expected);
        assert!(pack_fragment(fragment.as_bytes()).is_ok());
    }
}

#[test]
fn join_returns_every_cell_published() {
    let sequence = EncodedSequence::from_bases(SAMPLE.as_bytes());
    let fragments = FragmentScheduler::new(2).spawn(&sequence, &lengths(&[1, 2, 3]));
    for cell in fragments.cells() {
        cell.wait();
    }
    let cells = fragments.join();
    assert_eq!(cells.len(), 6);
    assert!(cells.iter().all(|cell| cell.is_published()));
}
