//! Rounding used for bin bounds and labels.
//!
//! - `js_round(x)`: round half toward `+∞` (`-2.5 → -2`, `2.5 → 3`)
//! - `round_to(x, d)`: round to `d` decimals, ties toward `+∞`
//!
//! `f64::round` rounds half away from zero, which differs for negative ties.

/// Round half toward `+∞`.
pub fn js_round(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    (x + 0.5).floor()
}

/// Round to `digits` decimal places, ties toward `+∞`.
///
/// Exact binary ties after scaling may differ from decimal-string rounding.
pub fn round_to(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(digits as i32);
    js_round(x * scale) / scale
}
