//! Display utilities and output formatting for the mstock CLI.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use mstock_lib::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output format for extracted rows.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Writes rows to `output`, or to stdout when no path is given.
///
/// CSV values are printed with exactly `decimals` digits when set.
pub(crate) fn write_rows(
    rows: &[ResultRow],
    output: Option<&Path>,
    format: Format,
    decimals: Option<usize>,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            emit(rows, BufWriter::new(file), format, decimals)
        }
        None => {
            if matches!(format, Format::Parquet) {
                bail!("Parquet output needs a file, pass --output");
            }
            emit(rows, BufWriter::new(std::io::stdout()), format, decimals)
        }
    }
}

fn emit<W: Write + Send>(
    rows: &[ResultRow],
    writer: W,
    format: Format,
    decimals: Option<usize>,
) -> Result<()> {
    match format {
        Format::Csv => {
            let formatter = CsvFormatter::new().with_decimals(decimals);
            formatter.write_rows(rows, writer)?;
        }
        Format::Json => {
            let formatter = JsonFormatter::new();
            formatter.write_rows(rows, writer)?;
        }
        Format::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_rows(rows, writer)?;
        }
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                let formatter = ParquetFormatter::new();
                formatter.write_rows(rows, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                let _ = writer;
                bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Formats an optional date for tables.
pub(crate) fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows() -> Vec<ResultRow> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        vec![ResultRow::new("AAA".into(), date, None, vec![1.5, 2.0])]
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&rows(), Some(&path), Format::Csv, Some(2)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "ticker,date,open,high\nAAA,2024-01-15,1.50,2.00\n");
    }

    #[test]
    fn test_parquet_needs_file() {
        let err = write_rows(&rows(), None, Format::Parquet, None).unwrap_err();
        assert!(err.to_string().contains("--output"));
    }

    #[test]
    fn test_date_cell() {
        assert_eq!(date_cell(None), "-");
        assert_eq!(date_cell(NaiveDate::from_ymd_opt(2023, 1, 15)), "2023-01-15");
    }
}
