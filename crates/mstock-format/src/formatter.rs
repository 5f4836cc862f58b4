//! Output format abstraction.

use mstock_types::{ResultRow, column_name};
use std::borrow::Cow;
use std::io::Write;
use thiserror::Error;

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson, Self::Parquet]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Column shape shared by a set of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowShape {
    /// Largest number of values in any row.
    pub width: usize,
    /// Whether any row carries a time of day.
    pub has_time: bool,
}

impl RowShape {
    /// Computes the shape of `rows`.
    #[must_use]
    pub fn of(rows: &[ResultRow]) -> Self {
        rows.iter().fold(Self::default(), |shape, row| Self {
            width: shape.width.max(row.values.len()),
            has_time: shape.has_time || row.time.is_some(),
        })
    }

    /// Names of the value columns.
    pub fn value_columns(&self) -> impl Iterator<Item = Cow<'static, str>> {
        (0..self.width).map(column_name)
    }

    /// Every column name in output order.
    #[must_use]
    pub fn header(&self) -> Vec<Cow<'static, str>> {
        let mut columns = vec![Cow::Borrowed("ticker"), Cow::Borrowed("date")];
        if self.has_time {
            columns.push(Cow::Borrowed("time"));
        }
        columns.extend(self.value_columns());
        columns
    }
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes rows to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_rows<W: Write + Send>(&self, rows: &[ResultRow], writer: W) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    pub(crate) fn sample_rows() -> Vec<ResultRow> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        vec![
            ResultRow::new("AAA".into(), date, None, vec![10.5, 11.0, 10.25, 10.75, 15000.0]),
            ResultRow::new(
                "CCC".into(),
                date,
                None,
                vec![20.0, 21.5, 19.75, 21.0, 500.0, 1200.0],
            ),
        ]
    }

    pub(crate) fn intraday_rows() -> Vec<ResultRow> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        vec![ResultRow::new(
            "XYZ".into(),
            date,
            NaiveTime::from_hms_opt(9, 30, 0),
            vec![1.5, 2.0],
        )]
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert_eq!("pq".parse::<OutputFormat>().unwrap(), OutputFormat::Parquet);
        assert!(matches!(
            "xlsx".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
        for format in OutputFormat::all() {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_row_shape() {
        let shape = RowShape::of(&sample_rows());
        assert_eq!(shape.width, 6);
        assert!(!shape.has_time);
        assert_eq!(
            shape.header(),
            ["ticker", "date", "open", "high", "low", "close", "volume", "open_interest"]
        );

        let shape = RowShape::of(&intraday_rows());
        assert_eq!(shape.header(), ["ticker", "date", "time", "open", "high"]);

        assert_eq!(RowShape::of(&[]), RowShape::default());
    }
}
