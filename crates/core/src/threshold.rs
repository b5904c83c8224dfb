//! Shared threshold comparison helpers.
//!
//! Upstream readings are optional. A reading that is absent (or NaN) never
//! satisfies a threshold, so classifiers built on these helpers escalate only
//! on values that were actually observed.

/// `true` when `value` is present and strictly below `threshold`.
pub fn is_below(value: Option<f64>, threshold: f64) -> bool {
    matches!(value, Some(v) if v < threshold)
}

/// `true` when `value` is present and strictly above `threshold`.
pub fn is_above(value: Option<f64>, threshold: f64) -> bool {
    matches!(value, Some(v) if v > threshold)
}
