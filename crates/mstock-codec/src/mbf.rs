//! Microsoft Binary Format (MBF) single-precision floats.
//!
//! Metastock stores every number as a 4-byte MBF single, little-endian:
//!
//! - bytes 0-1: mantissa bits 0..15
//! - byte 2: sign in bit 7, mantissa bits 16..22 in bits 0..6
//! - byte 3: exponent, biased by 129
//!
//! The mantissa has an implicit leading one exactly like IEEE-754, so decoding
//! moves the sign bit and re-biases the exponent by [`MBF_EXPONENT_REBIAS`].

use byteorder::{ByteOrder, LittleEndian};
use mstock_types::FormatError;
use tracing::trace;

/// Size in bytes of an encoded MBF single.
pub const MBF_SIZE: usize = 4;

/// Difference between the MBF exponent bias (129) and the IEEE single bias (127).
pub const MBF_EXPONENT_REBIAS: u8 = 2;

/// Decodes one MBF single.
///
/// # Errors
///
/// Returns [`FormatError::EmptyValue`] for the sentinel (exponent byte zero)
/// and [`FormatError::ExponentUnderflow`] for exponents 1 and 2, which have
/// no normal IEEE single counterpart.
pub const fn decode(bytes: [u8; 4]) -> Result<f32, FormatError> {
    decode_raw(u32::from_le_bytes(bytes))
}

/// Decodes an MBF single already loaded as a little-endian `u32`.
///
/// # Errors
///
/// See [`decode`].
pub const fn decode_raw(raw: u32) -> Result<f32, FormatError> {
    let exponent = (raw >> 24) as u8;
    if exponent == 0 {
        return Err(FormatError::EmptyValue);
    }
    if exponent <= MBF_EXPONENT_REBIAS {
        return Err(FormatError::ExponentUnderflow(exponent));
    }

    let sign = (raw >> 23) & 1;
    let mantissa = raw & 0x007f_ffff;
    let ieee_exponent = (exponent - MBF_EXPONENT_REBIAS) as u32;

    Ok(f32::from_bits((sign << 31) | (ieee_exponent << 23) | mantissa))
}

/// Reads and decodes the MBF single at the start of `data`, widened to `f64`.
///
/// # Errors
///
/// See [`decode`].
///
/// # Panics
///
/// Panics if `data` is shorter than [`MBF_SIZE`].
pub fn read(data: &[u8]) -> Result<f64, FormatError> {
    decode_raw(LittleEndian::read_u32(&data[..MBF_SIZE])).map(f64::from)
}

/// Like [`read`], but maps the empty sentinel and underflowing exponents to `0.0`.
///
/// This is how record fields are read: the archive writes the sentinel for
/// missing values. Underflows are logged at `trace` level.
///
/// # Panics
///
/// Panics if `data` is shorter than [`MBF_SIZE`].
#[must_use]
pub fn read_or_zero(data: &[u8]) -> f64 {
    match read(data) {
        Ok(value) => value,
        Err(FormatError::ExponentUnderflow(exponent)) => {
            trace!(exponent, raw = ?&data[..MBF_SIZE], "MBF underflow read as zero");
            0.0
        }
        Err(_) => 0.0,
    }
}
