//! CSV output format.

use mstock_types::ResultRow;
use std::borrow::Cow;
use std::io::Write;

use crate::formatter::RowShape;
use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Fixed number of decimals; shortest representation if unset.
    decimals: Option<usize>,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            decimals: None,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Prints every value with exactly `decimals` digits after the point.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: Option<usize>) -> Self {
        self.decimals = decimals;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }

    fn escape<'a>(&self, field: &'a str) -> Cow<'a, str> {
        if field.contains([self.delimiter, '"', '\n', '\r']) {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }

    fn value(&self, value: f64) -> String {
        match self.decimals {
            Some(decimals) => format!("{value:.decimals$}"),
            None => value.to_string(),
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_rows<W: Write + Send>(
        &self,
        rows: &[ResultRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        let shape = RowShape::of(rows);

        if self.include_header {
            let header = shape.header().join(&d.to_string());
            writeln!(writer, "{header}")?;
        }

        for row in rows {
            write!(writer, "{}{d}{}", self.escape(&row.ticker), row.date.format("%Y-%m-%d"))?;
            if shape.has_time {
                match row.time {
                    Some(time) => write!(writer, "{d}{}", time.format("%H:%M:%S"))?,
                    None => write!(writer, "{d}")?,
                }
            }
            for i in 0..shape.width {
                match row.values.get(i) {
                    Some(value) => write!(writer, "{d}{}", self.value(*value))?,
                    None => write!(writer, "{d}")?,
                }
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
