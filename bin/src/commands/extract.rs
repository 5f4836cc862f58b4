//! Extract command implementation.
//!
//! This module decodes the selected symbols of an archive and writes their
//! rows in the requested format.

use crate::display::{Format, write_rows};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use mstock_lib::MAX_PRECISION;
use mstock_lib::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Decode `tickers` (all symbols if empty) from the archive in `dir`.
pub(crate) fn extract(
    dir: &Path,
    tickers: Vec<String>,
    precision: u32,
    format: Format,
    output: Option<&Path>,
    parallel: bool,
    quiet: bool,
) -> Result<()> {
    let options = AssembleOptions::default()
        .with_tickers(tickers)
        .with_precision(precision)
        .with_parallel(parallel);
    let assembler = Assembler::new(options);

    let listing = list_symbols(dir, &assembler.options().index)
        .with_context(|| format!("Failed to read archive index in {}", dir.display()))?;
    let selected = assembler.resolve(&listing).len();
    if selected == 0 {
        warn!("no requested ticker is listed in {}", dir.display());
    }

    let pb = if quiet || output.is_none() {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(selected as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                     {pos}/{len} symbols ({percent}%) {msg}",
                )?
                .progress_chars("=>-"),
        );
        pb
    };

    let assembly = assembler.assemble_listing(dir, listing, |symbol| {
        pb.set_message(symbol.ticker().to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    for diagnostic in &assembly.diagnostics {
        warn!("{diagnostic}");
    }

    let decimals = (precision <= MAX_PRECISION).then_some(precision as usize);
    let decimals = matches!(format, Format::Csv).then_some(decimals).flatten();
    write_rows(&assembly.rows, output, format, decimals)?;

    info!(
        rows = assembly.len(),
        symbols = assembly.tickers().len(),
        skipped = assembly.diagnostics.len(),
        format = %format,
        "extraction finished"
    );
    if let Some(path) = output
        && !quiet
    {
        eprintln!(
            "Wrote {} rows for {} symbols to {}",
            assembly.len(),
            assembly.tickers().len(),
            path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mstock_fixture::{ArchiveBuilder, FixtureSymbol, daily_series};

    #[test]
    fn test_extract_to_csv() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let archive = ArchiveBuilder::new()
            .standard(FixtureSymbol::new("AAA", 1), daily_series(start, 3, 5))
            .standard(FixtureSymbol::new("BBB", 2), daily_series(start, 2, 5))
            .build()
            .unwrap();
        let out = archive.file("out.csv");

        extract(
            archive.path(),
            vec!["BBB".into()],
            2,
            Format::Csv,
            Some(&out),
            false,
            true,
        )
        .unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ticker,date,open,high,low,close,volume");
        assert_eq!(lines[1], "BBB,2024-01-01,10.00,10.50,9.50,10.13,1000.00");
    }

    #[test]
    fn test_extract_without_index_fails() {
        let archive = ArchiveBuilder::new().build().unwrap();
        let out = archive.file("out.json");
        let result = extract(archive.path(), Vec::new(), 4, Format::Json, Some(&out), true, true);
        assert!(result.is_err());
    }
}
