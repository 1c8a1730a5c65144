//! Fuzz target for pack/unpack roundtrip.
//!
//! Packing accepts exactly the ACGT bytes (any case), and unpacking an
//! accepted fragment gives back its uppercase form.

#![no_main]

use knucleotide::kmer::{pack_fragment, unpack_to_bytes, KmerLength};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(k) = KmerLength::new(data.len()) else {
        return;
    };

    let valid = data
        .iter()
        .all(|&b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't'));

    match pack_fragment(data) {
        Ok(key) => {
            assert!(valid, "accepted a fragment with an invalid base");
            let normalized: Vec<u8> = data.iter().map(u8::to_ascii_uppercase).collect();
            assert_eq!(
                unpack_to_bytes(key, k).as_ref(),
                normalized.as_slice(),
                "Pack/unpack roundtrip failed"
            );
        }
        Err(err) => {
            assert!(!valid, "rejected a valid fragment");
            assert_eq!(data[err.position], err.base);
        }
    }
});
