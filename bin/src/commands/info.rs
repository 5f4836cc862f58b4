//! Info command implementation.
//!
//! This module shows the index entry of one symbol together with what its
//! data file actually holds.

use crate::display::date_cell;
use anyhow::{Context, Result};
use mstock_lib::column_name;
use mstock_lib::prelude::*;
use std::path::Path;

/// Show details of `ticker` in the archive in `dir`.
pub(crate) fn show_info(ticker: &str, dir: &Path) -> Result<()> {
    let listing = mstock_lib::list_symbols(dir, &IndexConfig::default())
        .with_context(|| format!("Failed to read archive index in {}", dir.display()))?;

    let symbol = listing
        .find(ticker)
        .or_else(|| {
            listing
                .symbols
                .iter()
                .find(|s| s.ticker().eq_ignore_ascii_case(ticker))
        })
        .with_context(|| format!("Unknown ticker: {ticker}"))?;

    let columns: Vec<_> = (0..symbol.field_count()).map(column_name).collect();

    println!("Ticker:      {}", symbol.ticker());
    println!("Name:        {}", symbol.name());
    println!("Variant:     {}", symbol.variant());
    println!("Data file:   {}", symbol.data_file_name());
    println!("Periodicity: {}", symbol.periodicity());
    println!("Fields:      {} ({})", symbol.field_count(), columns.join(", "));
    let time_column = symbol.record_layout().time_column;
    println!("Time column: {}", if time_column { "yes" } else { "no" });
    println!("Stride:      {} bytes", symbol.record_stride());
    println!("First date:  {}", date_cell(symbol.first_date()));
    println!("Last date:   {}", date_cell(symbol.last_date()));

    match DataFile::open(&mstock_lib::archive_dir(dir), symbol) {
        Ok(file) => {
            let (count, first, last) = file
                .records()
                .fold((0usize, None, None), |(n, first, _), r| {
                    (n + 1, first.or(Some(r.date)), Some(r.date))
                });

            println!("\nRecords:     {count}");
            if let (Some(first), Some(last)) = (first, last) {
                println!("Range:       {first} to {last}");
            }
            println!("Header:      last record {}", file.header().last_record);
        }
        Err(error) => println!("\nData file unreadable: {error}"),
    }

    Ok(())
}
