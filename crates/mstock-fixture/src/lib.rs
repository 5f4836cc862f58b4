//! Synthetic Metastock archives for tests and benchmarks.
//!
//! Everything here writes bytes the way the decoders in `mstock-codec` expect
//! to read them. Index records are laid out through the same [`IndexLayout`]
//! values the reader uses, so a layout change shows up in both directions.

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

use byteorder::{ByteOrder, LittleEndian};
use chrono::{Datelike, NaiveDate};
use mstock_types::{
    DataRecord, DateEncoding, FieldCountEncoding, FieldSpan, FormatVariant, IndexLayout,
    Periodicity, RecordLayout,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Encodes an `f32` as a Microsoft Binary Format single.
///
/// Zero (and anything whose IEEE exponent is zero) encodes as the empty sentinel.
#[must_use]
pub fn encode_mbf(value: f32) -> [u8; 4] {
    let bits = value.to_bits();
    let exponent = (bits >> 23) & 0xff;
    if exponent == 0 {
        return [0; 4];
    }
    let sign = (bits >> 31) & 1;
    let mut out = [0u8; 4];
    out[0] = (bits & 0xff) as u8;
    out[1] = ((bits >> 8) & 0xff) as u8;
    out[2] = (((bits >> 16) & 0x7f) | (sign << 7)) as u8;
    out[3] = (exponent + 2) as u8;
    out
}

/// Packs a date in the century form `CYYMMDD` and encodes it as MBF.
#[must_use]
pub fn encode_date(date: NaiveDate) -> [u8; 4] {
    let packed = (date.year() - 1900) * 10_000 + date.month() as i32 * 100 + date.day() as i32;
    encode_mbf(packed as f32)
}

/// One symbol to place in a synthetic index.
#[derive(Debug, Clone)]
pub struct FixtureSymbol {
    /// Ticker as stored on disk (before any normalisation).
    pub ticker: String,
    /// Security name.
    pub name: String,
    /// Data-file number.
    pub file_number: u16,
    /// Value fields per record, date and time columns excluded.
    pub field_count: usize,
    /// Periodicity code byte.
    pub periodicity: u8,
    /// First date written to the index.
    pub first_date: Option<NaiveDate>,
    /// Last date written to the index.
    pub last_date: Option<NaiveDate>,
}

impl FixtureSymbol {
    /// Creates a daily symbol with five value fields.
    #[must_use]
    pub fn new(ticker: &str, file_number: u16) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: format!("{ticker} Inc"),
            file_number,
            field_count: 5,
            periodicity: b'D',
            first_date: None,
            last_date: None,
        }
    }

    /// Sets the number of value fields.
    #[must_use]
    pub const fn with_field_count(mut self, field_count: usize) -> Self {
        self.field_count = field_count;
        self
    }

    /// Marks the symbol intraday, which adds a time column to its records.
    #[must_use]
    pub const fn intraday(mut self) -> Self {
        self.periodicity = b'I';
        self
    }

    /// Column layout of the symbol's data records.
    #[must_use]
    pub const fn record_layout(&self) -> RecordLayout {
        if Periodicity::from_code(self.periodicity).is_intraday() {
            RecordLayout::intraday(self.field_count)
        } else {
            RecordLayout::daily(self.field_count)
        }
    }

    /// Sets the first and last index dates.
    #[must_use]
    pub const fn with_dates(mut self, first: NaiveDate, last: NaiveDate) -> Self {
        self.first_date = Some(first);
        self.last_date = Some(last);
        self
    }
}

/// One bar to place in a synthetic data file.
#[derive(Debug, Clone)]
pub struct FixtureBar {
    /// Raw packed date value, written through [`encode_mbf`].
    pub packed_date: f32,
    /// Raw packed time value (`HHMMSS`), written only for intraday layouts.
    pub packed_time: f32,
    /// Values, one per field.
    pub values: Vec<f32>,
}

impl FixtureBar {
    /// Creates an end-of-day bar.
    #[must_use]
    pub fn daily(date: NaiveDate, values: &[f32]) -> Self {
        let packed = (date.year() - 1900) * 10_000 + date.month() as i32 * 100 + date.day() as i32;
        Self {
            packed_date: packed as f32,
            packed_time: 0.0,
            values: values.to_vec(),
        }
    }

    /// Creates a bar with a raw packed date, e.g. an out-of-range one.
    #[must_use]
    pub fn raw(packed_date: f32, values: &[f32]) -> Self {
        Self {
            packed_date,
            packed_time: 0.0,
            values: values.to_vec(),
        }
    }

    /// Sets the packed `HHMMSS` time.
    #[must_use]
    pub const fn at(mut self, packed_time: f32) -> Self {
        self.packed_time = packed_time;
        self
    }
}

fn write_text(record: &mut [u8], span: FieldSpan, text: &str) {
    let field = &mut record[span.offset..span.end()];
    field.fill(b' ');
    let bytes = text.as_bytes();
    let n = bytes.len().min(field.len());
    field[..n].copy_from_slice(&bytes[..n]);
}

fn write_index_date(
    record: &mut [u8],
    layout: &IndexLayout,
    span: FieldSpan,
    date: Option<NaiveDate>,
) {
    let Some(date) = date else { return };
    let field = &mut record[span.offset..span.end()];
    match layout.date_encoding {
        DateEncoding::Mbf => field.copy_from_slice(&encode_date(date)),
        DateEncoding::Integer => {
            let packed = date.year() as u32 * 10_000 + date.month() * 100 + date.day();
            LittleEndian::write_u32(field, packed);
        }
    }
}

/// Builds the bytes of an index file using `layout`.
///
/// The header declares `symbols.len()` records. Column counts include the
/// date (and time) columns, and `MASTER` records carry the matching record
/// length, as real archives do.
#[must_use]
pub fn index_bytes(layout: &IndexLayout, symbols: &[FixtureSymbol]) -> Vec<u8> {
    index_bytes_declaring(layout, symbols, symbols.len())
}

/// Builds index bytes whose header declares `declared` records, which may
/// differ from how many are actually written.
#[must_use]
pub fn index_bytes_declaring(
    layout: &IndexLayout,
    symbols: &[FixtureSymbol],
    declared: usize,
) -> Vec<u8> {
    let record_len = layout.record_len();
    let mut out = vec![0u8; record_len * (symbols.len() + 1)];
    LittleEndian::write_u16(
        &mut out[layout.count_offset..layout.count_offset + 2],
        declared as u16,
    );

    for (i, symbol) in symbols.iter().enumerate() {
        let start = layout.record_offset(i);
        let record = &mut out[start..start + record_len];

        match layout.file_number.width {
            1 => record[layout.file_number.offset] = symbol.file_number as u8,
            _ => LittleEndian::write_u16(
                &mut record[layout.file_number.offset..layout.file_number.offset + 2],
                symbol.file_number,
            ),
        }
        let records = symbol.record_layout();
        record[layout.field_count.offset] = match layout.field_count_encoding {
            FieldCountEncoding::Count => records.columns() as u8,
            FieldCountEncoding::Bitset => ((1u16 << records.columns()) - 1) as u8,
        };
        if let Some(span) = layout.record_length {
            record[span.offset] = records.stride() as u8;
        }
        write_text(record, layout.ticker, &symbol.ticker);
        write_text(record, layout.name, &symbol.name);
        record[layout.periodicity.offset] = symbol.periodicity;
        write_index_date(record, layout, layout.first_date, symbol.first_date);
        write_index_date(record, layout, layout.last_date, symbol.last_date);
    }

    out
}

/// Builds the bytes of a data file: one header record followed by the bars.
///
/// The header's last-record number is `bars.len() + 1`.
#[must_use]
pub fn data_bytes(layout: RecordLayout, bars: &[FixtureBar]) -> Vec<u8> {
    let stride = layout.stride();
    let mut out = vec![0u8; stride * (bars.len() + 1)];
    LittleEndian::write_u16(&mut out[0..2], (bars.len() + 1) as u16);
    LittleEndian::write_u16(&mut out[2..4], (bars.len() + 1) as u16);

    for (i, bar) in bars.iter().enumerate() {
        let record = &mut out[stride * (i + 1)..stride * (i + 2)];
        record[0..4].copy_from_slice(&encode_mbf(bar.packed_date));
        if layout.time_column {
            record[4..8].copy_from_slice(&encode_mbf(bar.packed_time));
        }
        for (j, value) in bar.values.iter().take(layout.field_count).enumerate() {
            let at = layout.value_offset() + j * DataRecord::FIELD_SIZE;
            record[at..at + 4].copy_from_slice(&encode_mbf(*value));
        }
    }

    out
}

/// A synthetic archive in a temporary directory.
#[derive(Debug)]
pub struct FixtureArchive {
    dir: TempDir,
}

impl FixtureArchive {
    /// Returns the archive directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of a file inside the archive.
    #[must_use]
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Overwrites (or creates) a file inside the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.file(name), bytes)
    }

    /// Removes a file from the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist.
    pub fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.file(name))
    }
}

/// Collects symbols and bars, then writes a complete archive.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    standard: Vec<(FixtureSymbol, Vec<FixtureBar>)>,
    extended: Vec<(FixtureSymbol, Vec<FixtureBar>)>,
}

impl ArchiveBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `MASTER` symbol with its bars.
    #[must_use]
    pub fn standard(mut self, symbol: FixtureSymbol, bars: Vec<FixtureBar>) -> Self {
        self.standard.push((symbol, bars));
        self
    }

    /// Adds an `XMASTER` symbol with its bars.
    #[must_use]
    pub fn extended(mut self, symbol: FixtureSymbol, bars: Vec<FixtureBar>) -> Self {
        self.extended.push((symbol, bars));
        self
    }

    /// Writes the archive. An index file is only written for a variant that
    /// has at least one symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory or any file cannot be written.
    pub fn build(self) -> io::Result<FixtureArchive> {
        let archive = FixtureArchive {
            dir: TempDir::new()?,
        };

        for (variant, entries) in [
            (FormatVariant::Standard, &self.standard),
            (FormatVariant::Extended, &self.extended),
        ] {
            if entries.is_empty() {
                continue;
            }
            let symbols: Vec<_> = entries.iter().map(|(s, _)| s.clone()).collect();
            archive.write(variant.index_file(), &index_bytes(&variant.layout(), &symbols))?;
            for (symbol, bars) in entries {
                archive.write(
                    &variant.data_file_name(symbol.file_number),
                    &data_bytes(symbol.record_layout(), bars),
                )?;
            }
        }

        Ok(archive)
    }
}

/// Generates `count` consecutive daily bars starting at `start`, with
/// prices that are exact in single precision.
#[must_use]
pub fn daily_series(start: NaiveDate, count: usize, field_count: usize) -> Vec<FixtureBar> {
    start
        .iter_days()
        .take(count)
        .enumerate()
        .map(|(i, date)| {
            let base = 10.0 + i as f32 * 0.25;
            let values: Vec<f32> = (0..field_count)
                .map(|j| match j {
                    0 => base,
                    1 => base + 0.5,
                    2 => base - 0.5,
                    3 => base + 0.125,
                    _ => 1000.0 * (i as f32 + 1.0),
                })
                .collect();
            FixtureBar::daily(date, &values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_mbf(0.0), [0, 0, 0, 0]);
        assert_eq!(encode_mbf(1.0), [0x00, 0x00, 0x00, 0x81]);
        assert_eq!(encode_mbf(-1.0), [0x00, 0x00, 0x80, 0x81]);
        assert_eq!(encode_mbf(123.25), [0x00, 0x80, 0x76, 0x87]);
    }

    #[test]
    fn test_index_header_count() {
        let layout = IndexLayout::EXTENDED;
        let bytes = index_bytes(&layout, &[FixtureSymbol::new("AAA", 256)]);
        assert_eq!(bytes.len(), 300);
        assert_eq!(LittleEndian::read_u16(&bytes[10..12]), 1);
    }

    #[test]
    fn test_index_column_count_includes_date() {
        let standard = index_bytes(&IndexLayout::STANDARD, &[FixtureSymbol::new("AAA", 1)]);
        assert_eq!(standard[53 + 3], 24);
        assert_eq!(standard[53 + 4], 6);

        let intraday = FixtureSymbol::new("ES", 256).intraday();
        let extended = index_bytes(&IndexLayout::EXTENDED, &[intraday]);
        assert_eq!(extended[150 + 70], 0b0111_1111);
    }

    #[test]
    fn test_data_bytes_length() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bytes = data_bytes(RecordLayout::daily(5), &daily_series(date, 3, 5));
        assert_eq!(bytes.len(), 24 * 4);
        assert_eq!(LittleEndian::read_u16(&bytes[2..4]), 4);

        let bytes = data_bytes(RecordLayout::intraday(5), &daily_series(date, 3, 5));
        assert_eq!(bytes.len(), 28 * 4);
    }
}
