//! Training-instance weighting strategies.
//!
//! A [`Weighter`] scores how relevant each training instance is to each query
//! row, producing a row-stochastic matrix from which dependence templates are
//! drawn.

use schaake_frame::Table;
use schaake_stats::matrix::Matrix;

use crate::error::WeightError;

/// Relative tolerance for a weight row to count as summing to one.
const SUM_TOLERANCE: f64 = 1e-9;

/// Computes training-instance weights for query rows.
///
/// Implementations must return an `n_query × n_train` matrix whose rows are
/// non-negative and sum to one, and must fail with
/// [`WeightError::EmptyTrainingSet`] when there are no training instances.
pub trait Weighter: Send + Sync {
    fn weights(&self, train_features: &Table, query_features: &Table) -> Result<Matrix, WeightError>;
}

impl<W> Weighter for &W
where
    W: Weighter + ?Sized,
{
    fn weights(&self, train_features: &Table, query_features: &Table) -> Result<Matrix, WeightError> {
        (**self).weights(train_features, query_features)
    }
}

impl<W> Weighter for Box<W>
where
    W: Weighter + ?Sized,
{
    fn weights(&self, train_features: &Table, query_features: &Table) -> Result<Matrix, WeightError> {
        (**self).weights(train_features, query_features)
    }
}

/// Gives every training instance the same weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeighter;

impl Weighter for EqualWeighter {
    #[expect(clippy::cast_precision_loss)]
    fn weights(&self, train_features: &Table, query_features: &Table) -> Result<Matrix, WeightError> {
        let n_train = train_features.n_rows();
        if n_train == 0 {
            return Err(WeightError::EmptyTrainingSet);
        }
        let weight = 1.0 / n_train as f64;
        Ok(Matrix::from_fn(query_features.n_rows(), n_train, |_, _| weight))
    }
}

/// Weights training instances by a Gaussian kernel on a single numeric
/// feature.
///
/// The weight of training instance `t` for query row `q` is proportional to
/// `exp(-0.5 / h · (x_q − x_t)²)`, normalised per query row.
///
/// # Examples
///
/// ```
/// use schaake_dependence::weighter::{UnivariateGaussianKernel, Weighter as _};
/// use schaake_frame::{Cell, Table};
///
/// let train = Table::from_columns([("x", vec![Cell::from(0.0), Cell::from(1.0)])]).unwrap();
/// let query = Table::from_columns([("x", vec![Cell::from(0.5)])]).unwrap();
/// let kernel = UnivariateGaussianKernel::new(2.0).unwrap();
/// let weights = kernel.weights(&train, &query).unwrap();
/// assert_eq!(weights.row(0), [0.5, 0.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnivariateGaussianKernel {
    bandwidth: f64,
}

impl UnivariateGaussianKernel {
    pub fn new(bandwidth: f64) -> Result<Self, WeightError> {
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(WeightError::InvalidBandwidth { bandwidth });
        }
        Ok(Self { bandwidth })
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

fn single_feature(features: &Table) -> Result<Vec<f64>, WeightError> {
    let [column] = features.columns() else {
        return Err(WeightError::FeatureCount {
            found: features.columns().len(),
        });
    };
    features
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells[0]
                .as_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| WeightError::NonNumericFeature {
                    column: column.clone(),
                    row,
                })
        })
        .collect()
}

impl Weighter for UnivariateGaussianKernel {
    fn weights(&self, train_features: &Table, query_features: &Table) -> Result<Matrix, WeightError> {
        if train_features.is_empty() {
            return Err(WeightError::EmptyTrainingSet);
        }
        let train = single_feature(train_features)?;
        let query = single_feature(query_features)?;
        let scale = -0.5 / self.bandwidth;

        let mut weights = Matrix::from_fn(query.len(), train.len(), |q, t| {
            (scale * (query[q] - train[t]).powi(2)).exp()
        });
        for q in 0..weights.n_rows() {
            let total = weights.row(q).iter().sum::<f64>();
            if total <= 0.0 {
                return Err(WeightError::Degenerate { row: q });
            }
            for t in 0..weights.n_cols() {
                weights.set(q, t, weights.get(q, t) / total);
            }
        }
        Ok(weights)
    }
}

/// Checks the weighter contract: shape `n_query × n_train`, finite
/// non-negative entries, and rows summing to one.
pub fn validate_weights(weights: &Matrix, n_query: usize, n_train: usize) -> Result<(), WeightError> {
    if weights.shape() != (n_query, n_train) {
        return Err(WeightError::Shape {
            expected: (n_query, n_train),
            found: weights.shape(),
        });
    }
    for (row, values) in weights.rows().enumerate() {
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(WeightError::Contract {
                row,
                reason: "must be finite and non-negative",
            });
        }
        let total = values.iter().sum::<f64>();
        if total == 0.0 {
            return Err(WeightError::Degenerate { row });
        }
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightError::Contract {
                row,
                reason: "must sum to one",
            });
        }
    }
    Ok(())
}
