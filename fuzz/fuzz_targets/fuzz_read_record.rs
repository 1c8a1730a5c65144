//! Fuzz target for record loading and counting.
//!
//! Arbitrary input must either fail cleanly or produce a report whose
//! frequency totals match the record length.

#![no_main]

use knucleotide::config::RunConfig;
use knucleotide::reader::read_record;
use knucleotide::run::count;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(sequence) = read_record(data, b">THREE") else {
        return;
    };

    let config = RunConfig::default().with_workers(2);
    let Ok(report) = count(&sequence, &config) else {
        return;
    };

    for table in &report.frequencies {
        let counted: u64 = table.rows.iter().map(|row| row.count).sum();
        assert_eq!(counted as usize, table.total);
    }
});
