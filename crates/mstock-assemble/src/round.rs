//! Decimal rounding of output values.

/// Precisions above this leave values untouched; an `f64` carries about 15
/// significant decimal digits.
pub const MAX_PRECISION: u32 = 15;

/// Magnitude from which every `f64` is already an integer (2^52).
const INTEGRAL_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Rounds `value` to `precision` decimal digits, ties away from zero.
///
/// The tie rule applies to the scaled binary value: `0.125` at precision 2
/// becomes `0.13` because `12.5` is exact, while `1.005` stays `1.0` because
/// its nearest `f64` lies just below the tie.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    if precision > MAX_PRECISION || !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(precision as i32);
    let scaled = value * scale;
    if scaled.abs() >= INTEGRAL_LIMIT {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.5, 0), 1.0);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert_eq!(round_to(1.375, 2), 1.38);
        assert_eq!(round_to(0.0625, 3), 0.063);
    }

    #[test]
    fn test_not_bankers_rounding() {
        // Half-even would give 2.0 and 0.12 here.
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(0.125, 2), 0.13);
    }

    #[test]
    fn test_regular_rounding() {
        assert_eq!(round_to(3.141_59, 4), 3.1416);
        assert_eq!(round_to(3.141_54, 4), 3.1415);
        assert_eq!(round_to(1_234_567.0, 2), 1_234_567.0);
        assert_eq!(round_to(10.0, 4), 10.0);
    }

    #[test]
    fn test_edges() {
        assert_eq!(round_to(1.234_567, 20), 1.234_567);
        assert_eq!(round_to(1.0e300, 4), 1.0e300);
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(0.0, 4), 0.0);
    }
}
