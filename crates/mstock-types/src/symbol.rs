//! Symbol descriptors read from the index files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{FormatVariant, Periodicity, RecordLayout};

/// One index entry: everything needed to locate and decode a symbol's data file.
///
/// Descriptors are created by the index reader and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    ticker: String,
    name: String,
    file_number: u16,
    field_count: usize,
    variant: FormatVariant,
    periodicity: Periodicity,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
}

impl SymbolDescriptor {
    /// Creates a descriptor with an empty name, daily periodicity and no dates.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        file_number: u16,
        field_count: usize,
        variant: FormatVariant,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            file_number,
            field_count,
            variant,
            periodicity: Periodicity::Daily,
            first_date: None,
            last_date: None,
        }
    }

    /// Sets the security name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the periodicity.
    #[must_use]
    pub const fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = periodicity;
        self
    }

    /// Sets the first and last dates recorded in the index.
    #[must_use]
    pub const fn with_dates(
        mut self,
        first_date: Option<NaiveDate>,
        last_date: Option<NaiveDate>,
    ) -> Self {
        self.first_date = first_date;
        self.last_date = last_date;
        self
    }

    /// Returns the ticker symbol.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns the security name (may be empty).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data-file number.
    #[must_use]
    pub const fn file_number(&self) -> u16 {
        self.file_number
    }

    /// Returns the number of value fields per record, date and time excluded.
    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.field_count
    }

    /// Returns the column layout of the data records.
    ///
    /// Intraday symbols carry a time column after the date.
    #[must_use]
    pub const fn record_layout(&self) -> RecordLayout {
        if self.periodicity.is_intraday() {
            RecordLayout::intraday(self.field_count)
        } else {
            RecordLayout::daily(self.field_count)
        }
    }

    /// Returns the index variant this symbol was listed in.
    #[must_use]
    pub const fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Returns the periodicity.
    #[must_use]
    pub const fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Returns the first date on file, if the index recorded one.
    #[must_use]
    pub const fn first_date(&self) -> Option<NaiveDate> {
        self.first_date
    }

    /// Returns the last date on file, if the index recorded one.
    #[must_use]
    pub const fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    /// Returns the data-file name, e.g. `F12.DAT`.
    #[must_use]
    pub fn data_file_name(&self) -> String {
        self.variant.data_file_name(self.file_number)
    }

    /// Returns the byte stride of one data record.
    #[must_use]
    pub const fn record_stride(&self) -> usize {
        self.record_layout().stride()
    }
}

impl std::fmt::Display for SymbolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.ticker, self.data_file_name())
    }
}
