/// Clamp `x` into `[lo, hi]`.
///
/// Unlike [`f64::clamp`] this never panics and maps NaN to `hi`, so callers
/// can feed it raw ratios computed from user input.
pub(crate) fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(x))
}
