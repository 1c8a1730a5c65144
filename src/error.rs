//! Error types for knucleotide.
//!
//! Everything past input reading is pure computation: the counting table,
//! result cells and scheduler have no failure modes. The variants below cover
//! the input boundary, query validation and output writing.

use thiserror::Error;

/// Errors that can occur in knucleotide operations.
#[derive(Debug, Error)]
pub enum KnucleotideError {
    /// K-mer length is outside the valid range (1-32).
    #[error("invalid k-mer length {k}: must be between {min} and {max}")]
    InvalidKmerLength { k: usize, min: u8, max: u8 },

    /// Encountered an invalid DNA base in a query fragment.
    #[error("invalid base '{}' at position {position}", .base.escape_ascii())]
    InvalidBase { base: u8, position: usize },

    /// Failed to open or read the input stream.
    #[error("failed to read sequence from '{input}': {source}")]
    SequenceRead {
        #[source]
        source: std::io::Error,
        input: String,
    },

    /// No record header starts with the configured marker.
    #[error("no record with a header starting with '{marker}' was found")]
    RecordNotFound { marker: String },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: u8,
    /// Maximum valid k-mer length.
    pub max: u8,
}

/// Error for invalid DNA base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the fragment.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for KnucleotideError {
    fn from(source: std::io::Error) -> Self {
        Self::WriteError { source }
    }
}

impl From<serde_json::Error> for KnucleotideError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonError { source }
    }
}

impl From<KmerLengthError> for KnucleotideError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}

impl From<InvalidBaseError> for KnucleotideError {
    fn from(err: InvalidBaseError) -> Self {
        Self::InvalidBase {
            base: err.base,
            position: err.position,
        }
    }
}
