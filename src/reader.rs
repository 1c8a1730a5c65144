//! Input selection and record loading.
//!
//! Only one record of the input is counted: the first whose header line starts
//! with the configured marker (`>THREE` by default). Its body lines are joined
//! and encoded to 2-bit codes. Parsing stops as soon as that record is read.
//!
//! The input is scanned as raw bytes. Only the line terminator is stripped;
//! every other byte of a body line is encoded. Lines outside the marked record
//! are only checked for the marker.

use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use tracing::{debug, info, info_span};

use crate::{
    error::KnucleotideError,
    kmer::{encode_in_place, EncodedSequence},
};

/// Where the FASTA stream comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// A file on disk.
    File(PathBuf),
    /// Standard input.
    #[default]
    Stdin,
}

impl Input {
    /// `None` and `-` mean stdin; anything else is a file path.
    pub fn from_option(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.as_os_str() != "-" => Self::File(path.to_path_buf()),
            _ => Self::Stdin,
        }
    }

    /// Opens the underlying stream.
    pub fn open(&self) -> Result<Box<dyn Read>, KnucleotideError> {
        match self {
            Self::File(path) => File::open(path)
                .map(|file| Box::new(file) as Box<dyn Read>)
                .map_err(|source| KnucleotideError::SequenceRead {
                    source,
                    input: self.to_string(),
                }),
            Self::Stdin => Ok(Box::new(io::stdin())),
        }
    }

    /// Opens the stream and loads the record whose header starts with `marker`.
    pub fn read_record(&self, marker: &[u8]) -> Result<EncodedSequence, KnucleotideError> {
        read_labelled(self.open()?, marker, &self.to_string())
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Loads the record whose header starts with `marker` from any reader.
///
/// ```rust
/// use knucleotide::reader::read_record;
///
/// let fasta = b">ONE first\nCCCC\n>THREE third\nGGta\nTT\n>FOUR\nAAAA\n";
/// let sequence = read_record(&fasta[..], b">THREE")?;
/// assert_eq!(sequence.as_codes(), &[2, 2, 3, 0, 3, 3]);
/// # Ok::<(), knucleotide::error::KnucleotideError>(())
/// ```
pub fn read_record<R: Read>(reader: R, marker: &[u8]) -> Result<EncodedSequence, KnucleotideError> {
    read_labelled(reader, marker, "<reader>")
}

fn read_labelled<R: Read>(
    reader: R,
    marker: &[u8],
    label: &str,
) -> Result<EncodedSequence, KnucleotideError> {
    let _span = info_span!("read_record", input = label).entered();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    // Anything before the marked header is skipped, including other records
    // and lines that are not FASTA at all.
    loop {
        if next_line(&mut reader, &mut line, label)? == 0 {
            return Err(KnucleotideError::RecordNotFound {
                marker: String::from_utf8_lossy(marker).into_owned(),
            });
        }
        if line.starts_with(marker) {
            break;
        }
    }
    debug!(header = %line.escape_ascii(), "found record");

    let mut codes = Vec::new();
    while next_line(&mut reader, &mut line, label)? > 0 {
        if line.first() == Some(&b'>') {
            break;
        }
        let start = codes.len();
        codes.extend_from_slice(&line);
        encode_in_place(&mut codes[start..]);
    }

    let sequence = EncodedSequence::from_codes(codes);
    info!(bases = sequence.len(), "record loaded");
    Ok(sequence)
}

/// Reads one line into `line` without its `\n` or `\r\n` terminator.
///
/// Returns the number of bytes consumed, 0 at end of input.
fn next_line<R: BufRead>(
    reader: &mut R,
    line: &mut Vec<u8>,
    label: &str,
) -> Result<usize, KnucleotideError> {
    line.clear();
    let read = reader
        .read_until(b'\n', line)
        .map_err(|source| KnucleotideError::SequenceRead {
            source,
            input: label.to_string(),
        })?;
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(read)
}
