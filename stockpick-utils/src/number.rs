use anyhow::{anyhow, Result};

/// Converts a money amount into integer units of `1 / scale`.
///
/// Rounds half to even so that `2.675 * 100` style products that land exactly
/// on a half are resolved the same way every time. Fails when the scaled value
/// is not finite or does not fit an `i64`.
pub fn to_units(value: f64, scale: u32) -> Result<i64> {
    if scale == 0 {
        return Err(anyhow!("Scale must be positive"));
    }
    let scaled = (value * scale as f64).round_ties_even();
    if !scaled.is_finite() {
        return Err(anyhow!(
            "Scaled value of {} at scale {} is not finite",
            value,
            scale
        ));
    }
    // i64::MAX as f64 rounds up to 2^63, which itself does not fit
    if scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
        return Err(anyhow!(
            "Scaled value of {} at scale {} overflows 64 bit units",
            value,
            scale
        ));
    }
    Ok(scaled as i64)
}

pub fn from_units(units: i64, scale: u32) -> f64 {
    units as f64 / scale as f64
}

/// Rounds a money amount to two decimals for display and stable comparison.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
