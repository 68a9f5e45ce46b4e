//! Shared numeric helpers.

/// Tolerance used when comparing computed floats (weight sums, ratios).
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Round to a fixed number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Round to one decimal place, the precision used for every displayed value.
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Whether two floats are equal within [`FLOAT_TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < FLOAT_TOLERANCE
}
