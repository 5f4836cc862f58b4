//! On-disk layouts of the two index variants.
//!
//! Each variant is described by one [`IndexLayout`] value. The index reader
//! has a single decode routine driven by that value, so adjusting an offset or
//! the record padding for a new format revision is a data change.

use serde::{Deserialize, Serialize};

/// Trailing filler bytes after each `MASTER` record.
pub const STANDARD_RECORD_PADDING: usize = 3;

/// Trailing filler bytes after each `XMASTER` record.
pub const EXTENDED_RECORD_PADDING: usize = 30;

/// Index format variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVariant {
    /// `MASTER` index, data files `F1.DAT` through `F255.DAT`.
    Standard,
    /// `XMASTER` index, data files `F256.MWD` and up.
    Extended,
}

impl FormatVariant {
    /// Name of the index file for this variant.
    #[must_use]
    pub const fn index_file(&self) -> &'static str {
        match self {
            Self::Standard => "MASTER",
            Self::Extended => "XMASTER",
        }
    }

    /// Extension of the per-symbol data files.
    #[must_use]
    pub const fn data_extension(&self) -> &'static str {
        match self {
            Self::Standard => "DAT",
            Self::Extended => "MWD",
        }
    }

    /// Builds the data-file name for a file number, e.g. `F12.DAT`.
    #[must_use]
    pub fn data_file_name(&self, file_number: u16) -> String {
        format!("F{file_number}.{}", self.data_extension())
    }

    /// Returns the default layout of this variant.
    #[must_use]
    pub const fn layout(&self) -> IndexLayout {
        match self {
            Self::Standard => IndexLayout::STANDARD,
            Self::Extended => IndexLayout::EXTENDED,
        }
    }

    /// Returns the variant as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }

    /// Returns all variants in the order they are read.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Standard, Self::Extended]
    }
}

impl std::fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fixed-width field inside an index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    /// Offset from the start of the record.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
}

impl FieldSpan {
    /// Creates a new span.
    #[must_use]
    pub const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    /// Offset one past the last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Borrows the span out of a record.
    ///
    /// # Panics
    ///
    /// Panics if the record is shorter than [`Self::end`]; the index reader
    /// only hands out records of the full layout length.
    #[must_use]
    pub fn slice<'a>(&self, record: &'a [u8]) -> &'a [u8] {
        &record[self.offset..self.end()]
    }
}

/// How dates are stored in an index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEncoding {
    /// MBF float holding a packed `CYYMMDD`/`YYYYMMDD` value.
    Mbf,
    /// Little-endian `u32` holding `YYYYMMDD`.
    Integer,
}

/// How the number of columns per data record is stored.
///
/// Either way the result counts every column of a data record, the date
/// column (and the time column of intraday data) included. The value field
/// count is what remains, see [`RecordLayout::from_columns`].
///
/// [`RecordLayout::from_columns`]: crate::RecordLayout::from_columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCountEncoding {
    /// The byte is the column count itself.
    Count,
    /// The byte is a bitset with one bit per present column.
    Bitset,
}

/// Byte layout of one index variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLayout {
    /// The variant this layout decodes.
    pub variant: FormatVariant,
    /// Offset of the little-endian `u16` record count in the header block.
    pub count_offset: usize,
    /// Bytes of meaningful content per record.
    pub payload_len: usize,
    /// Trailing filler bytes per record.
    pub record_padding: usize,
    /// Data-file number (1 byte `u8` or 2 bytes little-endian `u16`).
    pub file_number: FieldSpan,
    /// Column count byte.
    pub field_count: FieldSpan,
    /// Interpretation of the column count byte.
    pub field_count_encoding: FieldCountEncoding,
    /// Data-record length byte, cross-checked against the column count.
    pub record_length: Option<FieldSpan>,
    /// Security name.
    pub name: FieldSpan,
    /// Ticker symbol.
    pub ticker: FieldSpan,
    /// Periodicity code byte.
    pub periodicity: FieldSpan,
    /// First date on file.
    pub first_date: FieldSpan,
    /// Last date on file.
    pub last_date: FieldSpan,
    /// Interpretation of the two date fields.
    pub date_encoding: DateEncoding,
    /// Whether tickers get the `@xx`/`#suffix` clean-up.
    pub normalize_ticker: bool,
}

impl IndexLayout {
    /// Layout of the `MASTER` file.
    ///
    /// Byte 4 is the column count, date included, and byte 3 the data-record
    /// length in bytes. A daily symbol with seven columns stores 7 and 28.
    pub const STANDARD: Self = Self {
        variant: FormatVariant::Standard,
        count_offset: 0,
        payload_len: 50,
        record_padding: STANDARD_RECORD_PADDING,
        file_number: FieldSpan::new(0, 1),
        field_count: FieldSpan::new(4, 1),
        field_count_encoding: FieldCountEncoding::Count,
        record_length: Some(FieldSpan::new(3, 1)),
        name: FieldSpan::new(7, 16),
        first_date: FieldSpan::new(25, 4),
        last_date: FieldSpan::new(29, 4),
        periodicity: FieldSpan::new(33, 1),
        ticker: FieldSpan::new(36, 14),
        date_encoding: DateEncoding::Mbf,
        normalize_ticker: false,
    };

    /// Layout of the `XMASTER` file.
    ///
    /// Byte 70 has one bit per column, date included; `0x7f` is the usual
    /// seven-column daily file. There is no record-length byte.
    pub const EXTENDED: Self = Self {
        variant: FormatVariant::Extended,
        count_offset: 10,
        payload_len: 120,
        record_padding: EXTENDED_RECORD_PADDING,
        ticker: FieldSpan::new(1, 15),
        name: FieldSpan::new(16, 46),
        periodicity: FieldSpan::new(62, 1),
        file_number: FieldSpan::new(65, 2),
        field_count: FieldSpan::new(70, 1),
        field_count_encoding: FieldCountEncoding::Bitset,
        record_length: None,
        first_date: FieldSpan::new(104, 4),
        last_date: FieldSpan::new(116, 4),
        date_encoding: DateEncoding::Integer,
        normalize_ticker: true,
    };

    /// Length of one record, padding included. The header block has the same length.
    #[must_use]
    pub const fn record_len(&self) -> usize {
        self.payload_len + self.record_padding
    }

    /// Returns a copy with a different record padding.
    #[must_use]
    pub const fn with_record_padding(mut self, padding: usize) -> Self {
        self.record_padding = padding;
        self
    }

    /// Byte offset of the `i`-th record (0-based) in the index file.
    #[must_use]
    pub const fn record_offset(&self, i: usize) -> usize {
        (i + 1) * self.record_len()
    }
}
