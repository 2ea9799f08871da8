use crate::matrix::Matrix;

/// Computes the energy score of a sample-based multivariate forecast.
///
/// `samples` holds one sample vector per row; `observed` is the realized
/// vector with one entry per column. The score is
///
/// ```text
/// ES = mean_i ‖x_i − y‖ − ½ · mean_{i,j} ‖x_i − x_j‖
/// ```
///
/// with Euclidean distances and the second mean taken over all `m²` ordered
/// sample pairs (Gneiting et al. 2008, Eq. 7). Lower is better.
///
/// # Returns
///
/// The score, or `f64::NAN` if there are no samples or any sample or observed
/// value is NaN.
///
/// # Panics
///
/// Panics if `observed.len()` differs from the number of sample columns.
///
/// # Examples
///
/// ```
/// use schaake_stats::{energy::energy_score, matrix::Matrix};
///
/// // a point mass on the observation scores zero
/// let samples = Matrix::from_rows(&[[1.0, 2.0], [1.0, 2.0]]);
/// assert_eq!(energy_score(&samples, &[1.0, 2.0]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn energy_score(samples: &Matrix, observed: &[f64]) -> f64 {
    assert_eq!(
        samples.n_cols(),
        observed.len(),
        "observed vector must have one value per sample column"
    );
    if samples.n_rows() == 0
        || samples.as_slice().iter().any(|v| v.is_nan())
        || observed.iter().any(|v| v.is_nan())
    {
        return f64::NAN;
    }

    let m = samples.n_rows() as f64;
    let to_observed = samples
        .rows()
        .map(|x| euclidean(x, observed))
        .sum::<f64>()
        / m;
    let between_samples = samples
        .rows()
        .map(|xi| samples.rows().map(|xj| euclidean(xi, xj)).sum::<f64>())
        .sum::<f64>()
        / (m * m);
    to_observed - 0.5 * between_samples
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        // reference values from scoringRules::es_sample
        let a = Matrix::from_rows(&[
            [5.0, 3.0, 4.4],
            [7.7, 4.0, 1.0],
            [18.0, 10.0, 12.0],
            [10.0, 6.0, 9.0],
        ]);
        let b = Matrix::from_rows(&[
            [6.0, 12.0, 16.6],
            [4.0, 0.0, 21.0],
            [5.0, 15.0, 32.0],
            [2.0, 6.0, -1.0],
        ]);
        assert!((energy_score(&a, &[4.0, 10.0, 5.0]) - 5.856_067_772_593_822).abs() < 1e-12);
        assert!((energy_score(&b, &[9.6, 10.0, 14.1]) - 5.957_445_159_877_379).abs() < 1e-12);
    }

    #[test]
    fn test_univariate_reduces_to_crps_form() {
        // for d = 1 the energy score equals the sample CRPS
        let samples = Matrix::from_rows(&[[0.0], [2.0]]);
        // mean |x - 1| = 1, mean |x_i - x_j| = (0 + 2 + 2 + 0) / 4 = 1
        assert_eq!(energy_score(&samples, &[1.0]), 0.5);
    }

    #[test]
    fn test_missing_values_yield_nan() {
        let samples = Matrix::from_rows(&[[1.0, f64::NAN]]);
        assert!(energy_score(&samples, &[1.0, 1.0]).is_nan());
        let samples = Matrix::from_rows(&[[1.0, 1.0]]);
        assert!(energy_score(&samples, &[f64::NAN, 1.0]).is_nan());
        assert!(energy_score(&Matrix::zeros(0, 2), &[1.0, 1.0]).is_nan());
    }
}
