use rand::{
    RngCore,
    distr::{Distribution as _, weighted::WeightedIndex},
};
use schaake_frame::Table;
use schaake_stats::matrix::Matrix;

use crate::{
    error::{DependenceError, WeightError},
    training::TrainingSet,
    weighter::{EqualWeighter, Weighter, validate_weights},
};

/// Produces dependence templates for one group of query rows.
///
/// The returned matrix must have one row per query row and one column per
/// horizon of the training set, in temporal order.
pub trait TemplateSource: Send + Sync {
    fn build_templates(
        &self,
        training: &TrainingSet,
        query_features: &Table,
        rng: &mut dyn RngCore,
    ) -> Result<Matrix, DependenceError>;
}

/// The Schaake shuffle template source: templates are training targets
/// drawn with replacement, with probabilities given by a [`Weighter`].
#[derive(Debug, Clone, Default)]
pub struct SchaakeTemplates<W = EqualWeighter> {
    weighter: W,
}

impl<W> SchaakeTemplates<W>
where
    W: Weighter,
{
    pub fn new(weighter: W) -> Self {
        Self { weighter }
    }

    pub fn weighter(&self) -> &W {
        &self.weighter
    }
}

impl<W> TemplateSource for SchaakeTemplates<W>
where
    W: Weighter,
{
    fn build_templates(
        &self,
        training: &TrainingSet,
        query_features: &Table,
        rng: &mut dyn RngCore,
    ) -> Result<Matrix, DependenceError> {
        let weights = self.weighter.weights(training.features(), query_features)?;
        validate_weights(&weights, query_features.n_rows(), training.len())?;

        let picks = weights
            .rows()
            .map(|w| {
                let dist = WeightedIndex::new(w).map_err(WeightError::Sampling)?;
                Ok(dist.sample(&mut *rng))
            })
            .collect::<Result<Vec<_>, WeightError>>()?;
        Ok(training.targets().select_rows(&picks))
    }
}
