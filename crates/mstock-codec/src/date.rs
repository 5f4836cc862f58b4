//! Packed date and time values.
//!
//! Data records and the `MASTER` index store dates as MBF floats holding an
//! integer. Single precision is only exact up to 2^24, so Metastock writes the
//! century form `CYYMMDD` (year = 1900 + `CYY`); full `YYYYMMDD` values are
//! accepted as well. `XMASTER` stores plain `u32` `YYYYMMDD` integers.

use chrono::{NaiveDate, NaiveTime};

use crate::mbf;

/// Packed values at or above this are read as `YYYYMMDD`.
const FULL_YEAR_THRESHOLD: i64 = 10_000_000;

/// Converts a packed `CYYMMDD` or `YYYYMMDD` number to a date.
///
/// Returns `None` for non-positive, non-finite or non-calendar values.
#[must_use]
pub fn packed_date(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    let packed = value as i64;
    let year = if packed >= FULL_YEAR_THRESHOLD {
        packed / 10_000
    } else {
        1900 + packed / 10_000
    };
    let rest = packed % 10_000;
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(rest / 100).ok()?,
        u32::try_from(rest % 100).ok()?,
    )
}

/// Converts a packed `HHMMSS` number to a time of day.
#[must_use]
pub fn packed_time(value: f64) -> Option<NaiveTime> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let packed = value as u32;
    NaiveTime::from_hms_opt(packed / 10_000, packed % 10_000 / 100, packed % 100)
}

/// Converts an integer `YYYYMMDD` to a date. Zero means "not set".
#[must_use]
pub fn integer_date(value: u32) -> Option<NaiveDate> {
    if value == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(
        i32::try_from(value / 10_000).ok()?,
        value % 10_000 / 100,
        value % 100,
    )
}

/// Reads an MBF packed date from the start of `data`.
///
/// # Panics
///
/// Panics if `data` is shorter than four bytes.
#[must_use]
pub fn read_date(data: &[u8]) -> Option<NaiveDate> {
    mbf::read(data).ok().and_then(packed_date)
}

/// Reads an MBF packed time from the start of `data`.
///
/// # Panics
///
/// Panics if `data` is shorter than four bytes.
#[must_use]
pub fn read_time(data: &[u8]) -> Option<NaiveTime> {
    mbf::read(data).ok().and_then(packed_time)
}
