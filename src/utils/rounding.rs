//! Rounding shared by every bucket reducer, so displayed totals stay
//! consistent across charts.

/// Round to the nearest integer, halves away from zero.
pub fn round_half_away(value: f64) -> f64 {
    value.round()
}

/// Round to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    // Scaled values like 0.15 * 10 land a hair under the half; nudge by
    // one ulp-scale epsilon so they round the way they display.
    let scaled = value * factor;
    let nudged = scaled + scaled.signum() * f64::EPSILON * scaled.abs().max(1.0);
    round_half_away(nudged) / factor
}

/// Arithmetic mean, `None` for an empty count.
pub fn mean(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
