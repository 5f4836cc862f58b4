//! Ticker resolution and row assembly.

use mstock_codec::{DataFile, IndexConfig, IndexListing, archive_dir, list_symbols};
use mstock_types::{Diagnostic, MstockError, ResultRow, SymbolDescriptor};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::round::round_to;

/// Decimal places kept when no precision is given.
pub const DEFAULT_PRECISION: u32 = 4;

/// Options for one archive read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Tickers to keep; empty means every symbol in the archive.
    pub tickers: Vec<String>,
    /// Decimal places every value is rounded to.
    pub precision: u32,
    /// Decode data files on the rayon thread pool.
    pub parallel: bool,
    /// Index layouts.
    pub index: IndexConfig,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            precision: DEFAULT_PRECISION,
            parallel: false,
            index: IndexConfig::default(),
        }
    }
}

impl AssembleOptions {
    /// Restricts the read to the given tickers.
    #[must_use]
    pub fn with_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the rounding precision.
    #[must_use]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Enables or disables parallel decoding.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Replaces the index layouts.
    #[must_use]
    pub const fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }
}

/// Rows of an archive read together with everything that was skipped.
#[derive(Debug, Default)]
pub struct Assembly {
    /// Rows grouped by symbol in index order, file order within a symbol.
    pub rows: Vec<ResultRow>,
    /// Recovered problems, index diagnostics first.
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows were produced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct tickers in row order.
    #[must_use]
    pub fn tickers(&self) -> Vec<&str> {
        let mut tickers: Vec<&str> = Vec::new();
        for row in &self.rows {
            if tickers.last() != Some(&row.ticker.as_str()) {
                tickers.push(&row.ticker);
            }
        }
        tickers
    }

    /// Rows of one ticker.
    pub fn rows_for<'a>(&'a self, ticker: &'a str) -> impl Iterator<Item = &'a ResultRow> + 'a {
        self.rows.iter().filter(move |row| row.ticker == ticker)
    }
}

/// Reads archives into [`Assembly`] values.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: AssembleOptions,
}

impl Assembler {
    /// Creates an assembler.
    #[must_use]
    pub const fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Selects the symbols named by the ticker filter, in index order.
    ///
    /// Requested tickers that the archive does not list are ignored.
    #[must_use]
    pub fn resolve<'a>(&self, listing: &'a IndexListing) -> Vec<&'a SymbolDescriptor> {
        if self.options.tickers.is_empty() {
            return listing.symbols.iter().collect();
        }

        let wanted: HashSet<&str> = self.options.tickers.iter().map(String::as_str).collect();
        for ticker in &wanted {
            if listing.find(ticker).is_none() {
                debug!(ticker, "requested ticker not in archive");
            }
        }

        listing
            .symbols
            .iter()
            .filter(|symbol| wanted.contains(symbol.ticker()))
            .collect()
    }

    /// Reads the archive in `dir`; an empty path means the current directory.
    ///
    /// # Errors
    ///
    /// Fails only if the index cannot be read at all; per-symbol problems are
    /// returned as [`Assembly::diagnostics`].
    pub fn assemble(&self, dir: &Path) -> Result<Assembly, MstockError> {
        self.assemble_with_progress(dir, |_| {})
    }

    /// Like [`Assembler::assemble`], calling `on_symbol` after each symbol
    /// has been decoded. In parallel mode the calls come from worker threads
    /// in completion order.
    ///
    /// # Errors
    ///
    /// Fails only if the index cannot be read at all.
    pub fn assemble_with_progress<F>(
        &self,
        dir: &Path,
        on_symbol: F,
    ) -> Result<Assembly, MstockError>
    where
        F: Fn(&SymbolDescriptor) + Sync,
    {
        let dir = archive_dir(dir);
        let listing = list_symbols(&dir, &self.options.index)?;
        Ok(self.assemble_listing(&dir, listing, on_symbol))
    }

    /// Decodes the symbols of an index listing that has already been read
    /// from `dir`, for callers that inspect the listing first.
    ///
    /// The listing's diagnostics lead the returned ones.
    pub fn assemble_listing<F>(&self, dir: &Path, listing: IndexListing, on_symbol: F) -> Assembly
    where
        F: Fn(&SymbolDescriptor) + Sync,
    {
        let dir = archive_dir(dir);
        let selected = self.resolve(&listing);
        debug!(
            dir = %dir.display(),
            listed = listing.len(),
            selected = selected.len(),
            parallel = self.options.parallel,
            "assembling archive"
        );

        let decode = |symbol: &&SymbolDescriptor| {
            let rows = self.decode_symbol(&dir, symbol);
            on_symbol(symbol);
            rows
        };
        let parts: Vec<Result<Vec<ResultRow>, Diagnostic>> = if self.options.parallel {
            selected.par_iter().map(decode).collect()
        } else {
            selected.iter().map(decode).collect()
        };
        let symbols = selected.len();

        let mut assembly = Assembly {
            rows: Vec::new(),
            diagnostics: listing.diagnostics,
        };
        for part in parts {
            match part {
                Ok(rows) => assembly.rows.extend(rows),
                Err(diagnostic) => assembly.diagnostics.push(diagnostic),
            }
        }

        info!(
            symbols,
            rows = assembly.rows.len(),
            diagnostics = assembly.diagnostics.len(),
            "archive assembled"
        );
        assembly
    }

    fn decode_symbol(
        &self,
        dir: &Path,
        symbol: &SymbolDescriptor,
    ) -> Result<Vec<ResultRow>, Diagnostic> {
        let file = DataFile::open(dir, symbol).map_err(|error| {
            warn!(ticker = symbol.ticker(), %error, "skipping symbol");
            Diagnostic::symbol(symbol.ticker(), error)
        })?;

        let precision = self.options.precision;
        let rows: Vec<ResultRow> = file
            .records()
            .map(|record| {
                let values = record
                    .fields
                    .into_iter()
                    .map(|value| round_to(value, precision))
                    .collect();
                ResultRow::new(symbol.ticker().to_string(), record.date, record.time, values)
            })
            .collect();

        debug!(
            ticker = symbol.ticker(),
            file = %file.path().display(),
            rows = rows.len(),
            "decoded symbol"
        );
        Ok(rows)
    }
}

/// Reads the archive in `dir` with the given ticker filter and precision.
///
/// # Errors
///
/// Fails only if the index cannot be read at all.
pub fn decode_archive<S: AsRef<str>>(
    dir: impl AsRef<Path>,
    tickers: &[S],
    precision: u32,
) -> Result<Assembly, MstockError> {
    let options = AssembleOptions::default()
        .with_tickers(tickers.iter().map(|t| t.as_ref().to_string()))
        .with_precision(precision);
    Assembler::new(options).assemble(dir.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveTime};
    use mstock_fixture::{ArchiveBuilder, FixtureArchive, FixtureBar, FixtureSymbol, daily_series};
    use mstock_types::FormatError;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_symbol_archive() -> FixtureArchive {
        ArchiveBuilder::new()
            .standard(FixtureSymbol::new("AAA", 1), daily_series(ymd(2024, 1, 1), 5, 5))
            .standard(FixtureSymbol::new("BBB", 2), daily_series(ymd(2024, 1, 1), 3, 5))
            .extended(
                FixtureSymbol::new("CCC", 300).with_field_count(6),
                daily_series(ymd(2024, 2, 1), 4, 6),
            )
            .build()
            .unwrap()
    }

    fn assemble(archive: &FixtureArchive, options: AssembleOptions) -> Assembly {
        Assembler::new(options).assemble(archive.path()).unwrap()
    }

    #[test]
    fn test_filter_and_precision() {
        let archive = three_symbol_archive();
        let result = decode_archive(archive.path(), &["AAA"], 2).unwrap();

        assert_eq!(result.len(), 5);
        assert!(result.diagnostics.is_empty());
        assert!(result.rows.iter().all(|row| row.ticker == "AAA"));
        for row in &result.rows {
            for value in &row.values {
                let scaled = value * 100.0;
                assert!((scaled - scaled.round()).abs() < 1e-6, "{value} has more than 2 decimals");
            }
        }
        // 10.125 ties up to 10.13
        assert_relative_eq!(result.rows[0].close().unwrap(), 10.13);
    }

    #[test]
    fn test_union_in_index_order() {
        let archive = three_symbol_archive();
        let result = assemble(&archive, AssembleOptions::default());

        assert_eq!(result.len(), 12);
        assert_eq!(result.tickers(), ["AAA", "BBB", "CCC"]);
        let keys: HashSet<_> = result.rows.iter().map(|r| (r.ticker.as_str(), r.date)).collect();
        assert_eq!(keys.len(), result.len());
        assert_eq!(result.rows_for("CCC").next().unwrap().values.len(), 6);
        assert_eq!(result.rows_for("CCC").next().unwrap().date, ymd(2024, 2, 1));
    }

    #[test]
    fn test_unknown_ticker_ignored() {
        let archive = three_symbol_archive();
        let result = assemble(
            &archive,
            AssembleOptions::default().with_tickers(["CCC", "ZZZ", "AAA"]),
        );

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.tickers(), ["AAA", "CCC"]);
    }

    #[test]
    fn test_bad_stride_is_recovered() {
        let archive = three_symbol_archive();
        let mut bytes = std::fs::read(archive.file("F2.DAT")).unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);
        archive.write("F2.DAT", &bytes).unwrap();

        let result = assemble(&archive, AssembleOptions::default());
        assert_eq!(result.tickers(), ["AAA", "CCC"]);
        assert_eq!(result.diagnostics.len(), 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.ticker.as_deref(), Some("BBB"));
        assert!(matches!(
            diagnostic.error,
            MstockError::Format(FormatError::BadStride { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_recovered() {
        let archive = three_symbol_archive();
        archive.remove("F300.MWD").unwrap();

        let result = assemble(&archive, AssembleOptions::default());
        assert_eq!(result.tickers(), ["AAA", "BBB"]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            &result.diagnostics[0].error,
            MstockError::MissingFile { ticker, .. } if ticker == "CCC"
        ));
    }

    #[test]
    fn test_no_index_is_fatal() {
        let archive = ArchiveBuilder::new().build().unwrap();
        let result = Assembler::default().assemble(archive.path());
        assert!(matches!(result, Err(MstockError::UnsupportedVariant { .. })));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut builder = ArchiveBuilder::new();
        for n in 1..=12u16 {
            builder = builder.standard(
                FixtureSymbol::new(&format!("S{n:02}"), n),
                daily_series(ymd(2023, 6, 1), 20 + usize::from(n), 5),
            );
        }
        let archive = builder.build().unwrap();

        let sequential = assemble(&archive, AssembleOptions::default());
        let parallel = assemble(&archive, AssembleOptions::default().with_parallel(true));
        assert_eq!(sequential.rows, parallel.rows);
        assert_eq!(parallel.tickers().len(), 12);
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let archive = three_symbol_archive();
        let first = assemble(&archive, AssembleOptions::default());
        let second = assemble(&archive, AssembleOptions::default());

        assert_eq!(first.rows, second.rows);
        assert_eq!(
            serde_json::to_vec(&first.rows).unwrap(),
            serde_json::to_vec(&second.rows).unwrap()
        );
    }

    #[test]
    fn test_zero_precision_ties() {
        let archive = ArchiveBuilder::new()
            .standard(
                FixtureSymbol::new("TIE", 1).with_field_count(2),
                vec![FixtureBar::daily(ymd(2024, 1, 2), &[2.5, -2.5])],
            )
            .build()
            .unwrap();

        let result = decode_archive(archive.path(), &[] as &[&str], 0).unwrap();
        assert_eq!(result.rows[0].values, [3.0, -3.0]);
    }

    #[test]
    fn test_progress_called_per_symbol() {
        let archive = three_symbol_archive();
        archive.remove("F1.DAT").unwrap();
        let calls = AtomicUsize::new(0);

        let assembler = Assembler::new(AssembleOptions::default().with_parallel(true));
        let result = assembler
            .assemble_with_progress(archive.path(), |_| {
                calls.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 3);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_assemble_listing_read_once() {
        let archive = three_symbol_archive();
        let mut master = std::fs::read(archive.file("MASTER")).unwrap();
        master[53 + 3] = 40; // AAA record length no longer matches its columns
        archive.write("MASTER", &master).unwrap();

        let assembler = Assembler::new(AssembleOptions::default().with_tickers(["AAA", "CCC"]));
        let listing = list_symbols(archive.path(), &assembler.options().index).unwrap();
        assert_eq!(assembler.resolve(&listing).len(), 2);

        let calls = AtomicUsize::new(0);
        let result = assembler.assemble_listing(archive.path(), listing, |_| {
            calls.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert_eq!(result.tickers(), ["AAA", "CCC"]);
        assert_eq!(result.len(), 9);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0].error,
            MstockError::Format(FormatError::RecordLengthMismatch {
                record_length: 40,
                columns: 6,
                ..
            })
        ));
    }

    #[test]
    fn test_intraday_rows_carry_time() {
        let bars = vec![
            FixtureBar::daily(ymd(2024, 1, 2), &[10.0, 10.5, 9.5, 10.25]).at(93_000.0),
            FixtureBar::daily(ymd(2024, 1, 2), &[10.25, 10.75, 10.0, 10.5]).at(100_000.0),
        ];
        let archive = ArchiveBuilder::new()
            .standard(FixtureSymbol::new("ES", 1).with_field_count(4).intraday(), bars)
            .build()
            .unwrap();

        let result = decode_archive(archive.path(), &["ES"], 2).unwrap();
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(result.rows[1].time, NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(result.rows[1].values, [10.25, 10.75, 10.0, 10.5]);
    }
}
