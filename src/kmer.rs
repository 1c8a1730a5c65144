//! 2-bit nucleotide encoding and k-mer packing.
//!
//! Bases map to codes `A=0, C=1, G=2, T=3` (case-insensitive). A k-mer of
//! length `k <= 32` packs MSB-first into a `u64`, so the first base of the
//! fragment lands in the highest occupied bit pair:
//!
//! ```rust
//! use knucleotide::kmer::{pack_fragment, unpack_to_string, KmerLength};
//!
//! let key = pack_fragment(b"GT")?;
//! assert_eq!(key, 0b10_11);
//!
//! let k = KmerLength::new(2)?;
//! assert_eq!(unpack_to_string(key, k), "GT");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use bytes::Bytes;

use crate::error::{InvalidBaseError, KmerLengthError};

/// Bases indexed by their 2-bit code.
pub const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Byte-to-code lookup. Bytes that are not a nucleotide map to 0.
const CODES: [u8; 256] = {
    let mut table = [0u8; 256];
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;
    table
};

/// A validated k-mer length (1-32).
///
/// The upper bound comes from packing two bits per base into a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Minimum valid k-mer length.
    pub const MIN: u8 = 1;
    /// Maximum valid k-mer length.
    pub const MAX: u8 = 32;

    /// Creates a validated k-mer length.
    ///
    /// # Errors
    ///
    /// Returns `KmerLengthError` if `k` is outside `1..=32`.
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k < Self::MIN as usize || k > Self::MAX as usize {
            return Err(KmerLengthError {
                k,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(k))
    }

    /// Returns the length as a `usize`.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for KmerLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record body encoded to 2-bit codes.
///
/// Built once by the reader and never mutated afterwards; clones share the
/// same buffer, so every worker can hold one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedSequence(Bytes);

impl EncodedSequence {
    /// Encodes raw bases (`ACGT`, any case) into a sequence.
    pub fn from_bases(bases: &[u8]) -> Self {
        let mut codes = bases.to_vec();
        encode_in_place(&mut codes);
        Self(Bytes::from(codes))
    }

    /// Wraps bytes that are already 2-bit codes.
    pub fn from_codes(codes: Vec<u8>) -> Self {
        Self(Bytes::from(codes))
    }

    /// Number of bases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_codes(&self) -> &[u8] {
        &self.0
    }

    /// Number of length-`k` windows in the whole sequence.
    pub fn window_count(&self, k: KmerLength) -> usize {
        (self.len() + 1).saturating_sub(k.get())
    }

    /// Packed keys of the windows starting at `offset, offset + k, ...`.
    ///
    /// A trailing window shorter than `k` is skipped, never padded.
    pub fn offset_windows(
        &self,
        k: KmerLength,
        offset: usize,
    ) -> impl Iterator<Item = u64> + '_ {
        self.0
            .get(offset..)
            .unwrap_or_default()
            .chunks_exact(k.get())
            .map(pack)
    }
}

/// Maps one raw byte to its 2-bit code without validation.
#[inline]
pub const fn encode_base(byte: u8) -> u8 {
    CODES[byte as usize]
}

/// Encodes a line of raw bases in place.
pub fn encode_in_place(seq: &mut [u8]) {
    for b in seq.iter_mut() {
        *b = encode_base(*b);
    }
}

/// Packs a run of 2-bit codes MSB-first.
///
/// The caller guarantees `codes.len() <= 32`.
#[inline]
pub fn pack(codes: &[u8]) -> u64 {
    codes
        .iter()
        .fold(0u64, |key, &code| (key << 2) | u64::from(code))
}

/// Packs a literal fragment of bases, rejecting anything that is not ACGT.
///
/// # Errors
///
/// Returns `InvalidBaseError` naming the first offending byte.
pub fn pack_fragment(fragment: &[u8]) -> Result<u64, InvalidBaseError> {
    fragment
        .iter()
        .enumerate()
        .try_fold(0u64, |key, (position, &base)| match base {
            b'A' | b'a' | b'C' | b'c' | b'G' | b'g' | b'T' | b't' => {
                Ok((key << 2) | u64::from(encode_base(base)))
            }
            _ => Err(InvalidBaseError { base, position }),
        })
}

/// Unpacks a key into its bases, filling from the last position backwards.
pub fn unpack_to_bytes(mut key: u64, k: KmerLength) -> Bytes {
    let mut out = vec![0u8; k.get()];
    for slot in out.iter_mut().rev() {
        *slot = NUCLEOTIDES[(key & 0b11) as usize];
        key >>= 2;
    }
    Bytes::from(out)
}

/// Unpacks a key into a `String` of bases.
pub fn unpack_to_string(key: u64, k: KmerLength) -> String {
    let bytes = unpack_to_bytes(key, k);
    // Every byte comes from NUCLEOTIDES, which is ASCII.
    bytes.iter().map(|&b| b as char).collect()
}
