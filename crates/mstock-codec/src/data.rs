//! Per-symbol data files.
//!
//! A data file is a sequence of fixed-stride records of 4-byte MBF columns.
//! The first record is a header; every following record is a packed date,
//! a packed time for intraday symbols, and then `field_count` values. See
//! [`RecordLayout`].

use byteorder::{ByteOrder, LittleEndian};
use mstock_types::{DataRecord, FormatError, MstockError, RecordLayout, SymbolDescriptor};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::fs::locate;
use crate::{date, mbf};

/// Counters stored in the header record of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataHeader {
    /// Capacity recorded by the writer.
    pub max_records: u16,
    /// Number of the last record written; records + 1, zero if unknown.
    pub last_record: u16,
}

/// A loaded data file, decoded lazily through [`DataFile::records`].
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
    layout: RecordLayout,
    header: DataHeader,
    bytes: Vec<u8>,
}

impl DataFile {
    /// Opens the data file of `symbol` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`MstockError::MissingFile`] if the file does not exist,
    /// [`MstockError::Io`] if it cannot be read and [`FormatError::BadStride`]
    /// if its length is not a multiple of the record stride.
    pub fn open(dir: &Path, symbol: &SymbolDescriptor) -> Result<Self, MstockError> {
        let name = symbol.data_file_name();
        let missing = || MstockError::MissingFile {
            ticker: symbol.ticker().to_string(),
            path: dir.join(&name),
        };

        let path = locate(dir, &name).ok_or_else(missing)?;
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => missing(),
            _ => MstockError::io(&path, e),
        })?;

        Ok(Self::from_bytes(path, symbol.record_layout(), bytes)?)
    }

    /// Wraps raw file contents.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::BadStride`] if the length is not a multiple of
    /// the record stride.
    pub fn from_bytes(
        path: impl Into<PathBuf>,
        layout: RecordLayout,
        bytes: Vec<u8>,
    ) -> Result<Self, FormatError> {
        let path = path.into();
        let stride = layout.stride();
        if !bytes.len().is_multiple_of(stride) {
            return Err(FormatError::BadStride {
                file: path,
                len: bytes.len(),
                stride,
            });
        }

        let header = if bytes.len() >= stride {
            DataHeader {
                max_records: LittleEndian::read_u16(&bytes[0..2]),
                last_record: LittleEndian::read_u16(&bytes[2..4]),
            }
        } else {
            DataHeader::default()
        };

        Ok(Self {
            path,
            layout,
            header,
            bytes,
        })
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the header counters.
    #[must_use]
    pub const fn header(&self) -> DataHeader {
        self.header
    }

    /// Returns the column layout of the records.
    #[must_use]
    pub const fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Returns the record stride in bytes.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.layout.stride()
    }

    /// Number of record slots that will be decoded, padding records included.
    ///
    /// A non-zero last-record number in the header bounds the count.
    #[must_use]
    pub fn record_count(&self) -> usize {
        let available = (self.bytes.len() / self.stride()).saturating_sub(1);
        match self.header.last_record {
            0 => available,
            last => available.min(usize::from(last) - 1),
        }
    }

    /// Iterates over the decoded records in file order.
    ///
    /// Records whose date is not a valid calendar date are end-of-data
    /// padding and are skipped. Each call starts over from the first record.
    pub fn records(&self) -> impl Iterator<Item = DataRecord> + '_ {
        let stride = self.stride();
        let layout = self.layout;
        self.bytes
            .get(stride..)
            .unwrap_or_default()
            .chunks_exact(stride)
            .take(self.record_count())
            .filter_map(move |chunk| decode_record(chunk, layout))
    }
}

/// Decodes one record; `None` if the date is out of range.
fn decode_record(chunk: &[u8], layout: RecordLayout) -> Option<DataRecord> {
    let Some(date) = date::read_date(&chunk[0..4]) else {
        trace!(raw = ?&chunk[0..4], "skipping record with out-of-range date");
        return None;
    };
    let time = layout
        .time_column
        .then(|| date::read_time(&chunk[4..8]))
        .flatten();

    let fields = chunk[layout.value_offset()..]
        .chunks_exact(DataRecord::FIELD_SIZE)
        .take(layout.field_count)
        .map(mbf::read_or_zero)
        .collect();

    Some(DataRecord::new(date, time, fields))
}
