//! Time-frame codes stored in the index files.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sampling period of a symbol's data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// Intraday bars (`I`).
    Intraday,
    /// End-of-day bars (`D`).
    #[default]
    Daily,
    /// Weekly bars (`W`).
    Weekly,
    /// Monthly bars (`M`).
    Monthly,
    /// Quarterly bars (`Q`).
    Quarterly,
    /// Yearly bars (`Y`).
    Yearly,
    /// Any code this crate does not know about, kept verbatim.
    Other(char),
}

impl Periodicity {
    /// Decodes the one-byte code from an index record.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code.to_ascii_uppercase() {
            b'I' => Self::Intraday,
            b'D' => Self::Daily,
            b'W' => Self::Weekly,
            b'M' => Self::Monthly,
            b'Q' => Self::Quarterly,
            b'Y' => Self::Yearly,
            other => Self::Other(other as char),
        }
    }

    /// Returns the one-letter code.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Intraday => 'I',
            Self::Daily => 'D',
            Self::Weekly => 'W',
            Self::Monthly => 'M',
            Self::Quarterly => 'Q',
            Self::Yearly => 'Y',
            Self::Other(c) => *c,
        }
    }

    /// Returns the periodicity as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intraday => "intraday",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Other(_) => "other",
        }
    }

    /// Returns true for intraday data, whose records carry a time of day.
    #[must_use]
    pub const fn is_intraday(&self) -> bool {
        matches!(self, Self::Intraday)
    }
}

impl std::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(c) => write!(f, "other({c})"),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

impl FromStr for Periodicity {
    type Err = PeriodicityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "i" | "intraday" => Ok(Self::Intraday),
            "d" | "daily" | "day" => Ok(Self::Daily),
            "w" | "weekly" | "week" => Ok(Self::Weekly),
            "m" | "monthly" | "month" => Ok(Self::Monthly),
            "q" | "quarterly" | "quarter" => Ok(Self::Quarterly),
            "y" | "yearly" | "year" => Ok(Self::Yearly),
            _ => Err(PeriodicityParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid periodicity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicityParseError(String);

impl std::fmt::Display for PeriodicityParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid periodicity '{}', expected one of: \
             intraday, daily, weekly, monthly, quarterly, yearly",
            self.0
        )
    }
}

impl std::error::Error for PeriodicityParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Periodicity::from_code(b'D'), Periodicity::Daily);
        assert_eq!(Periodicity::from_code(b'w'), Periodicity::Weekly);
        assert_eq!(Periodicity::from_code(b'I'), Periodicity::Intraday);
        assert_eq!(Periodicity::from_code(b'X'), Periodicity::Other('X'));
        assert_eq!(Periodicity::from_code(b'M').code(), 'M');
    }

    #[test]
    fn test_periodicity_parse() {
        assert_eq!("daily".parse::<Periodicity>().unwrap(), Periodicity::Daily);
        assert_eq!("Q".parse::<Periodicity>().unwrap(), Periodicity::Quarterly);
        assert!("hourly".parse::<Periodicity>().is_err());
    }
}
