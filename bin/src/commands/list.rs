//! List command implementation.
//!
//! This module prints every symbol an archive's index files describe.

use crate::display::date_cell;
use anyhow::{Context, Result};
use mstock_lib::prelude::*;
use std::path::Path;

/// List the symbols of the archive in `dir`, optionally only one periodicity.
pub(crate) fn list_symbols(dir: &Path, periodicity: Option<Periodicity>) -> Result<()> {
    let listing = mstock_lib::list_symbols(dir, &IndexConfig::default())
        .with_context(|| format!("Failed to read archive index in {}", dir.display()))?;

    for diagnostic in &listing.diagnostics {
        tracing::warn!("{diagnostic}");
    }

    let symbols: Vec<_> = listing
        .symbols
        .iter()
        .filter(|s| periodicity.is_none_or(|p| s.periodicity() == p))
        .collect();

    if symbols.is_empty() {
        println!("No symbols found.");
        return Ok(());
    }

    println!(
        "{:<15} {:<30} {:>6} {:<8} {:<9} {:<10} {:<10}",
        "TICKER", "NAME", "FILE", "VARIANT", "PERIOD", "FIRST", "LAST"
    );
    println!("{}", "-".repeat(96));

    for symbol in &symbols {
        println!(
            "{:<15} {:<30} {:>6} {:<8} {:<9} {:<10} {:<10}",
            symbol.ticker(),
            symbol.name(),
            symbol.file_number(),
            symbol.variant().as_str(),
            symbol.periodicity().to_string(),
            date_cell(symbol.first_date()),
            date_cell(symbol.last_date()),
        );
    }

    println!("\nTotal: {} symbols", symbols.len());
    Ok(())
}
