//! Rank-matching shuffle (the Schaake shuffle).
//!
//! Given a block of samples (rows = samples, columns = horizons in temporal
//! order) and an equally shaped block of dependence templates, every column
//! of samples is permuted so that its ranks match the ranks of the matching
//! template column. The `k`-th smallest sample ends up in the row whose
//! template value is the `k`-th smallest.
//!
//! Each output column is a permutation of the input column: no value is
//! created, dropped, or altered.
//!
//! Ties among template values are broken by an independent random key per
//! element, drawn from the caller's generator. With the same generator state
//! the result is reproducible; different states resolve ties differently.

use std::cmp::Ordering;

use rand::Rng;

use crate::matrix::Matrix;

/// Compares two floats, treating `a == b` (including `-0.0 == 0.0`) as a tie.
///
/// NaN values are ordered by [`f64::total_cmp`], so they sort after every
/// finite value and never panic the sort.
#[must_use]
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Returns the ascending permutation of `values`, breaking ties at random.
///
/// One random key is drawn from `rng` per element (in element order) before
/// sorting, so the number of draws depends only on `values.len()`.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use schaake_stats::rank::argsort_random_tiebreak;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let order = argsort_random_tiebreak(&[2.0, 1.0, 3.0, 1.0, 2.0], &mut rng);
///
/// // positions 1 and 3 hold the two smallest values, in either order
/// assert!(order[..2] == [1, 3] || order[..2] == [3, 1]);
/// assert!(order[2..4] == [0, 4] || order[2..4] == [4, 0]);
/// assert_eq!(order[4], 2);
/// ```
pub fn argsort_random_tiebreak<R>(values: &[f64], rng: &mut R) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let keys = (0..values.len())
        .map(|_| rng.random::<u64>())
        .collect::<Vec<_>>();
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| cmp_f64(values[a], values[b]).then(keys[a].cmp(&keys[b])));
    order
}

/// Permutes one column of samples to follow the rank order of `template`.
///
/// # Panics
///
/// Panics if `samples` and `template` have different lengths.
pub fn rank_shuffle_column<R>(samples: &[f64], template: &[f64], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(
        samples.len(),
        template.len(),
        "samples and template must have the same length"
    );
    let order = argsort_random_tiebreak(template, rng);
    assign_sorted(samples, &order)
}

/// Applies the rank shuffle independently to every column.
///
/// Orderings for all template columns are computed first (left to right),
/// then each sample column is sorted and scattered into its ordering.
///
/// # Panics
///
/// Panics if `samples` and `templates` have different shapes.
pub fn rank_shuffle<R>(samples: &Matrix, templates: &Matrix, rng: &mut R) -> Matrix
where
    R: Rng + ?Sized,
{
    assert_eq!(
        samples.shape(),
        templates.shape(),
        "samples and templates must have the same shape"
    );
    let orderings = (0..templates.n_cols())
        .map(|c| {
            let column = templates.column(c).collect::<Vec<_>>();
            argsort_random_tiebreak(&column, rng)
        })
        .collect::<Vec<_>>();

    let mut shuffled = Matrix::zeros(samples.n_rows(), samples.n_cols());
    for (c, order) in orderings.iter().enumerate() {
        let column = samples.column(c).collect::<Vec<_>>();
        for (r, value) in assign_sorted(&column, order).into_iter().enumerate() {
            shuffled.set(r, c, value);
        }
    }
    shuffled
}

fn assign_sorted(values: &[f64], order: &[usize]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| cmp_f64(*a, *b));
    let mut out = vec![0.0; values.len()];
    for (k, &row) in order.iter().enumerate() {
        out[row] = sorted[k];
    }
    out
}
