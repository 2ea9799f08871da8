use crate::rank::cmp_f64;

/// Descriptive statistics summarizing a collection of scores.
///
/// NaN entries are treated as missing: they are counted in [`Self::missing`]
/// and excluded from every other measure, mirroring how undefined per-unit
/// scores are excluded from mean reductions.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of non-missing values.
    pub count: usize,
    /// Number of NaN values that were skipped.
    pub missing: usize,
    /// The minimum value.
    pub min: f64,
    /// The maximum value.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The median (average of the two middle values for even counts).
    pub median: f64,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics, skipping NaN values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if at least one value is not NaN
    /// * `None` - otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// # use schaake_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([4.0, f64::NAN, 1.0, 3.0, 2.0]).unwrap();
    /// assert_eq!(stats.count, 4);
    /// assert_eq!(stats.missing, 1);
    /// assert_eq!(stats.mean, 2.5);
    /// assert_eq!(stats.median, 2.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut missing = 0;
        let mut sorted = values
            .into_iter()
            .filter(|v| {
                let is_nan = v.is_nan();
                missing += usize::from(is_nan);
                !is_nan
            })
            .collect::<Vec<_>>();
        sorted.sort_by(|a, b| cmp_f64(*a, *b));

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted[count / 2 - 1], sorted[count / 2])
        } else {
            sorted[count / 2]
        };
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count,
            missing,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
