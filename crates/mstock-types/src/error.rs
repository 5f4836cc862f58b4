//! Error types for mstock.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mstock operations.
pub type Result<T> = std::result::Result<T, MstockError>;

/// Errors that can occur while decoding an archive.
#[derive(Error, Debug)]
pub enum MstockError {
    /// Malformed index or data bytes.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The index lists a symbol whose data file is absent.
    #[error("Missing data file for {ticker}: {}", .path.display())]
    MissingFile {
        /// Ticker of the symbol.
        ticker: String,
        /// Expected location of the data file.
        path: PathBuf,
    },

    /// The directory holds neither a `MASTER` nor an `XMASTER` index.
    #[error("No recognizable index file (MASTER or XMASTER) in {}", .dir.display())]
    UnsupportedVariant {
        /// The archive directory.
        dir: PathBuf,
    },

    /// I/O error while reading a file.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl MstockError {
    /// Wraps an I/O error with the path it happened on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error must abort the whole archive read.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedVariant { .. } | Self::Io { .. })
    }
}

/// Byte-level format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The float carries the "no value" sentinel (exponent byte zero).
    #[error("Empty value sentinel")]
    EmptyValue,

    /// The exponent is too small for a normal IEEE single.
    #[error("MBF exponent {0:#04x} underflows single precision")]
    ExponentUnderflow(u8),

    /// The index header is shorter than one record.
    #[error("{}: header is {len} bytes, expected at least {expected}", .file.display())]
    ShortHeader {
        /// Index file.
        file: PathBuf,
        /// Bytes available.
        len: usize,
        /// Bytes required.
        expected: usize,
    },

    /// The index declares more records than the file holds.
    #[error(
        "{}: header declares {declared} records but only {found} are present",
        .file.display()
    )]
    TruncatedIndex {
        /// Index file.
        file: PathBuf,
        /// Count from the header.
        declared: usize,
        /// Complete records found.
        found: usize,
    },

    /// A data file whose length is not a whole number of records.
    #[error("{}: length {len} is not a multiple of record stride {stride}", .file.display())]
    BadStride {
        /// Data file.
        file: PathBuf,
        /// File length in bytes.
        len: usize,
        /// Expected record stride.
        stride: usize,
    },

    /// A `MASTER` record whose record-length byte disagrees with its column count.
    #[error(
        "{ticker}: index record length {record_length} disagrees with {columns} columns, \
         using the column count"
    )]
    RecordLengthMismatch {
        /// Ticker of the entry.
        ticker: String,
        /// Record length stored in the index.
        record_length: usize,
        /// Column count stored in the index, date included.
        columns: usize,
    },

    /// The same ticker is listed twice, usually once per index variant.
    #[error("Ticker {ticker} is listed more than once, keeping the first entry")]
    DuplicateTicker {
        /// The duplicated ticker.
        ticker: String,
    },
}

/// A recovered problem reported alongside a partial result.
#[derive(Debug)]
pub struct Diagnostic {
    /// Ticker the problem belongs to, if any.
    pub ticker: Option<String>,
    /// What went wrong.
    pub error: MstockError,
}

impl Diagnostic {
    /// Creates a diagnostic not tied to a single symbol.
    #[must_use]
    pub fn archive(error: impl Into<MstockError>) -> Self {
        Self {
            ticker: None,
            error: error.into(),
        }
    }

    /// Creates a diagnostic for one symbol.
    #[must_use]
    pub fn symbol(ticker: impl Into<String>, error: impl Into<MstockError>) -> Self {
        Self {
            ticker: Some(ticker.into()),
            error: error.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.ticker {
            Some(ticker) => write!(f, "[{ticker}] {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}
