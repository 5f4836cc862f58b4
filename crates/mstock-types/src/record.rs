//! Decoded records and output rows.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Conventional meaning of the value fields, by position.
///
/// The archive stores no type information per field; position is the only
/// contract. Fields past the sixth are named `field7`, `field8`, ...
pub const DEFAULT_COLUMNS: [&str; 6] = ["open", "high", "low", "close", "volume", "open_interest"];

/// Returns the conventional column name for a value position.
#[must_use]
pub fn column_name(index: usize) -> Cow<'static, str> {
    DEFAULT_COLUMNS
        .get(index)
        .map_or_else(|| Cow::Owned(format!("field{}", index + 1)), |name| Cow::Borrowed(*name))
}

/// One decoded record of a symbol's data file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord {
    /// Trading date.
    pub date: NaiveDate,
    /// Time of day, present in intraday archives only.
    pub time: Option<NaiveTime>,
    /// Decoded values in file order. Always `field_count` long.
    pub fields: Vec<f64>,
}

impl DataRecord {
    /// Bytes per encoded column, date and time columns included.
    pub const FIELD_SIZE: usize = 4;

    /// Creates a new record.
    #[must_use]
    pub const fn new(date: NaiveDate, time: Option<NaiveTime>, fields: Vec<f64>) -> Self {
        Self { date, time, fields }
    }
}

/// Column arrangement of a data file's records.
///
/// Every record is a run of 4-byte MBF columns. The first column is the
/// packed date; intraday files follow it with a packed `HHMMSS` time. The
/// remaining `field_count` columns are the values. A daily file with the
/// usual seven columns (date, open, high, low, close, volume, open interest)
/// therefore has six value fields and a 28-byte stride, and an intraday file
/// with eight columns has six value fields behind an 8-byte date block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordLayout {
    /// Number of value columns after the date (and time) columns.
    pub field_count: usize,
    /// Whether the second column holds a time of day.
    pub time_column: bool,
}

impl RecordLayout {
    /// Layout with a date column followed by `field_count` values.
    #[must_use]
    pub const fn daily(field_count: usize) -> Self {
        Self {
            field_count,
            time_column: false,
        }
    }

    /// Layout with date and time columns followed by `field_count` values.
    #[must_use]
    pub const fn intraday(field_count: usize) -> Self {
        Self {
            field_count,
            time_column: true,
        }
    }

    /// Derives the layout from a total column count that includes the date
    /// column and, when `time_column` is set, the time column.
    #[must_use]
    pub const fn from_columns(columns: usize, time_column: bool) -> Self {
        let leading = if time_column { 2 } else { 1 };
        Self {
            field_count: columns.saturating_sub(leading),
            time_column,
        }
    }

    /// Number of date/time columns in front of the values.
    #[must_use]
    pub const fn leading_columns(&self) -> usize {
        if self.time_column { 2 } else { 1 }
    }

    /// Total number of columns per record.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.leading_columns() + self.field_count
    }

    /// Byte offset of the first value column.
    #[must_use]
    pub const fn value_offset(&self) -> usize {
        self.leading_columns() * DataRecord::FIELD_SIZE
    }

    /// Record stride in bytes. The header record has the same length.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.columns() * DataRecord::FIELD_SIZE
    }
}

/// One output row: a ticker, a date and the rounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Ticker from the index.
    pub ticker: String,
    /// Trading date.
    pub date: NaiveDate,
    /// Time of day for intraday data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    /// Rounded values, positional (see [`DEFAULT_COLUMNS`]).
    pub values: Vec<f64>,
}

impl ResultRow {
    /// Creates a new row.
    #[must_use]
    pub const fn new(
        ticker: String,
        date: NaiveDate,
        time: Option<NaiveTime>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            ticker,
            date,
            time,
            values,
        }
    }

    /// Opening price, if the record has that field.
    #[must_use]
    pub fn open(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// High price.
    #[must_use]
    pub fn high(&self) -> Option<f64> {
        self.values.get(1).copied()
    }

    /// Low price.
    #[must_use]
    pub fn low(&self) -> Option<f64> {
        self.values.get(2).copied()
    }

    /// Closing price.
    #[must_use]
    pub fn close(&self) -> Option<f64> {
        self.values.get(3).copied()
    }

    /// Traded volume.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        self.values.get(4).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_layout() {
        let layout = RecordLayout::from_columns(7, false);
        assert_eq!(layout, RecordLayout::daily(6));
        assert_eq!(layout.value_offset(), 4);
        assert_eq!(layout.stride(), 28);
        assert_eq!(RecordLayout::daily(0).stride(), 4);
    }

    #[test]
    fn test_intraday_layout() {
        let layout = RecordLayout::from_columns(8, true);
        assert_eq!(layout, RecordLayout::intraday(6));
        assert_eq!(layout.value_offset(), 8);
        assert_eq!(layout.stride(), 8 + 4 * 6);
        assert_eq!(layout.columns(), 8);
    }

    #[test]
    fn test_too_few_columns() {
        assert_eq!(RecordLayout::from_columns(1, true).field_count, 0);
        assert_eq!(RecordLayout::from_columns(0, false).stride(), 4);
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "open");
        assert_eq!(column_name(4), "volume");
        assert_eq!(column_name(5), "open_interest");
        assert_eq!(column_name(6), "field7");
    }

    #[test]
    fn test_row_accessors() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let row = ResultRow::new("AAA".into(), date, None, vec![1.0, 2.0, 0.5, 1.5, 1000.0]);
        assert_eq!(row.open(), Some(1.0));
        assert_eq!(row.high(), Some(2.0));
        assert_eq!(row.low(), Some(0.5));
        assert_eq!(row.close(), Some(1.5));
        assert_eq!(row.volume(), Some(1000.0));

        let short = ResultRow::new("BBB".into(), date, None, vec![3.0]);
        assert_eq!(short.close(), None);
    }

    #[test]
    fn test_row_serializes_without_time() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let row = ResultRow::new("AAA".into(), date, None, vec![1.25]);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"ticker":"AAA","date":"2024-03-01","values":[1.25]}"#);
    }
}
