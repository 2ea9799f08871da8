/// Computes the empirical PIT value of `observed` relative to `samples`.
///
/// The PIT value is the fraction of samples that are less than or equal to
/// the observed value. NaN samples are treated as missing and excluded from
/// both the count and the total.
///
/// # Returns
///
/// A value in `[0.0, 1.0]`, or `f64::NAN` if `observed` is NaN or there are no
/// non-missing samples.
///
/// # Examples
///
/// ```
/// use schaake_stats::pit::fraction_at_or_below;
///
/// let samples = [3.0, 1.0, 4.0, 1.0, 5.0];
/// assert_eq!(fraction_at_or_below(&samples, 1.0), 0.4);
/// assert_eq!(fraction_at_or_below(&samples, 0.0), 0.0);
/// assert_eq!(fraction_at_or_below(&samples, 5.0), 1.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn fraction_at_or_below(samples: &[f64], observed: f64) -> f64 {
    if observed.is_nan() {
        return f64::NAN;
    }
    let mut total = 0_usize;
    let mut below = 0_usize;
    for &s in samples.iter().filter(|s| !s.is_nan()) {
        total += 1;
        if s <= observed {
            below += 1;
        }
    }
    if total == 0 {
        return f64::NAN;
    }
    below as f64 / total as f64
}
