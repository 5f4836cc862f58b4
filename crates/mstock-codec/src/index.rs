//! Index file parsing.
//!
//! Both `MASTER` and `XMASTER` are a header block followed by fixed-length
//! records; the header block is as long as one record and holds a
//! little-endian `u16` record count. [`parse_index`] decodes either variant
//! from its [`IndexLayout`].
//!
//! The column count an entry stores includes the date column, and the time
//! column of intraday symbols; a descriptor's field count is what is left.

use byteorder::{ByteOrder, LittleEndian};
use chrono::NaiveDate;
use mstock_types::{
    DataRecord, DateEncoding, Diagnostic, FieldCountEncoding, FieldSpan, FormatError,
    FormatVariant, IndexLayout, MstockError, Periodicity, RecordLayout, SymbolDescriptor,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::date;
use crate::fs::{archive_dir, locate};

/// Index layouts used when reading an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Layout of `MASTER`.
    pub standard: IndexLayout,
    /// Layout of `XMASTER`.
    pub extended: IndexLayout,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            standard: IndexLayout::STANDARD,
            extended: IndexLayout::EXTENDED,
        }
    }
}

impl IndexConfig {
    /// Returns the layout for a variant.
    #[must_use]
    pub const fn layout(&self, variant: FormatVariant) -> &IndexLayout {
        match variant {
            FormatVariant::Standard => &self.standard,
            FormatVariant::Extended => &self.extended,
        }
    }

    /// Replaces the layout of the variant `layout` belongs to.
    #[must_use]
    pub const fn with_layout(mut self, layout: IndexLayout) -> Self {
        match layout.variant {
            FormatVariant::Standard => self.standard = layout,
            FormatVariant::Extended => self.extended = layout,
        }
        self
    }
}

/// Symbols listed by an archive, plus the problems recovered while reading them.
#[derive(Debug, Default)]
pub struct IndexListing {
    /// Descriptors in index order, `MASTER` entries first.
    pub symbols: Vec<SymbolDescriptor>,
    /// Recovered problems.
    pub diagnostics: Vec<Diagnostic>,
}

impl IndexListing {
    /// Returns the number of symbols.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbols were found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Looks up a symbol by exact ticker.
    #[must_use]
    pub fn find(&self, ticker: &str) -> Option<&SymbolDescriptor> {
        self.symbols.iter().find(|s| s.ticker() == ticker)
    }

    /// Appends another listing, dropping tickers that are already present.
    fn merge(&mut self, other: Self) {
        let mut seen: HashSet<String> =
            self.symbols.iter().map(|s| s.ticker().to_string()).collect();
        self.diagnostics.extend(other.diagnostics);

        for symbol in other.symbols {
            if seen.insert(symbol.ticker().to_string()) {
                self.symbols.push(symbol);
            } else {
                warn!(
                    ticker = symbol.ticker(),
                    variant = %symbol.variant(),
                    "duplicate ticker in index"
                );
                self.diagnostics.push(Diagnostic::symbol(
                    symbol.ticker(),
                    FormatError::DuplicateTicker {
                        ticker: symbol.ticker().to_string(),
                    },
                ));
            }
        }
    }
}

/// Lists every symbol of the archive in `dir`.
///
/// `MASTER` is read first, then `XMASTER`; a variant whose index file is
/// absent is skipped.
///
/// # Errors
///
/// Returns [`MstockError::UnsupportedVariant`] if neither index file exists
/// and [`MstockError::Io`] if one exists but cannot be read.
pub fn list_symbols(dir: &Path, config: &IndexConfig) -> Result<IndexListing, MstockError> {
    let dir = archive_dir(dir);
    let mut listing = IndexListing::default();
    let mut found_index = false;

    for variant in FormatVariant::all() {
        let Some(path) = locate(&dir, variant.index_file()) else {
            debug!(dir = %dir.display(), file = variant.index_file(), "index file not present");
            continue;
        };
        found_index = true;
        let part = read_index(&path, config.layout(*variant))?;
        debug!(file = %path.display(), symbols = part.len(), "read index");
        listing.merge(part);
    }

    if !found_index {
        return Err(MstockError::UnsupportedVariant { dir });
    }

    Ok(listing)
}

/// Reads one index file.
///
/// # Errors
///
/// Returns [`MstockError::Io`] if the file cannot be read.
pub fn read_index(path: &Path, layout: &IndexLayout) -> Result<IndexListing, MstockError> {
    let data = fs::read(path).map_err(|e| MstockError::io(path, e))?;
    Ok(parse_index(&data, layout, path))
}

/// Parses index bytes laid out as `layout`.
///
/// A short header or a record count larger than the file yields the complete
/// records plus a diagnostic, as does a `MASTER` entry whose record length
/// disagrees with its column count. Entries with file number zero are empty
/// slots and are skipped.
#[must_use]
pub fn parse_index(data: &[u8], layout: &IndexLayout, file: &Path) -> IndexListing {
    let mut listing = IndexListing::default();
    let record_len = layout.record_len();

    if data.len() < record_len {
        let error = FormatError::ShortHeader {
            file: PathBuf::from(file),
            len: data.len(),
            expected: record_len,
        };
        warn!(%error, "index header too short");
        listing.diagnostics.push(Diagnostic::archive(error));
        return listing;
    }

    let declared = usize::from(LittleEndian::read_u16(
        &data[layout.count_offset..layout.count_offset + 2],
    ));
    let available = data.len() / record_len - 1;
    let count = declared.min(available);

    if declared > available {
        let error = FormatError::TruncatedIndex {
            file: PathBuf::from(file),
            declared,
            found: available,
        };
        warn!(%error, "index truncated");
        listing.diagnostics.push(Diagnostic::archive(error));
    }

    for i in 0..count {
        let start = layout.record_offset(i);
        let record = &data[start..start + record_len];
        if let Some(symbol) = parse_record(record, layout, &mut listing.diagnostics) {
            listing.symbols.push(symbol);
        }
    }

    listing
}

/// Decodes one index record; `None` for an empty slot.
fn parse_record(
    record: &[u8],
    layout: &IndexLayout,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<SymbolDescriptor> {
    let file_number = match layout.file_number.width {
        1 => u16::from(record[layout.file_number.offset]),
        _ => LittleEndian::read_u16(layout.file_number.slice(record)),
    };
    if file_number == 0 {
        return None;
    }

    let raw_ticker = text(layout.ticker.slice(record));
    let ticker = if layout.normalize_ticker {
        normalize_ticker(&raw_ticker).to_string()
    } else {
        raw_ticker
    };

    let raw_count = record[layout.field_count.offset];
    let columns = match layout.field_count_encoding {
        FieldCountEncoding::Count => usize::from(raw_count),
        FieldCountEncoding::Bitset => raw_count.count_ones() as usize,
    };

    // Zero means the writer left the length out.
    if let Some(span) = layout.record_length {
        let record_length = usize::from(record[span.offset]);
        if record_length != 0 && record_length != columns * DataRecord::FIELD_SIZE {
            let error = FormatError::RecordLengthMismatch {
                ticker: ticker.clone(),
                record_length,
                columns,
            };
            warn!(%error, "index record length mismatch");
            diagnostics.push(Diagnostic::symbol(&ticker, error));
        }
    }

    let periodicity = Periodicity::from_code(record[layout.periodicity.offset]);
    let field_count = RecordLayout::from_columns(columns, periodicity.is_intraday()).field_count;

    let symbol = SymbolDescriptor::new(ticker, file_number, field_count, layout.variant)
        .with_name(text(layout.name.slice(record)))
        .with_periodicity(periodicity)
        .with_dates(
            index_date(record, layout.first_date, layout.date_encoding),
            index_date(record, layout.last_date, layout.date_encoding),
        );

    Some(symbol)
}

fn index_date(record: &[u8], span: FieldSpan, encoding: DateEncoding) -> Option<NaiveDate> {
    let bytes = span.slice(record);
    match encoding {
        DateEncoding::Mbf => date::read_date(bytes),
        DateEncoding::Integer => date::integer_date(LittleEndian::read_u32(bytes)),
    }
}

/// Decodes a fixed-width text field: cut at the first NUL, trimmed of blanks.
fn text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end]
        .iter()
        .map(|&b| char::from(b))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Strips the `@x` prefix and any `#suffix` from an `XMASTER` ticker.
fn normalize_ticker(raw: &str) -> &str {
    let start = if raw.starts_with('@') {
        raw.char_indices().nth(2).map_or(raw.len(), |(i, _)| i)
    } else {
        0
    };
    let end = raw.find('#').unwrap_or(raw.len()).max(start);
    &raw[start..end]
}
