//! Fuzz target for the counting table.
//!
//! Feeds arbitrary keys through `CountTable` and checks every count against
//! a `HashMap`.

#![no_main]

use std::collections::HashMap;

use knucleotide::table::CountTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut table = CountTable::new();
    let mut expected: HashMap<u64, u64> = HashMap::new();

    for chunk in data.chunks_exact(2) {
        // Few distinct keys collide more often; spread them across buckets too.
        let key = u64::from(u16::from_le_bytes([chunk[0], chunk[1]])) << (chunk[0] % 8);
        table.increment(key);
        *expected.entry(key).or_insert(0) += 1;
    }

    assert_eq!(table.len(), expected.len());
    assert!(table.bucket_count().is_power_of_two());
    for (key, count) in &expected {
        assert_eq!(table.get(*key), *count);
    }

    let mut visited = 0;
    table.for_each(|key, count| {
        assert_eq!(expected.get(&key), Some(&count));
        visited += 1;
    });
    assert_eq!(visited, expected.len());
});
