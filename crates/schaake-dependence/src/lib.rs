//! Cross-horizon dependence for ensemble forecasts.
//!
//! Forecast samples are usually generated one horizon at a time, so a sample
//! id carries no meaning across horizons. The [Schaake shuffle] restores a
//! realistic joint structure: for every forecast group it draws trajectories
//! from historical data as templates and reorders the samples at each
//! horizon to follow the templates' ranks.
//!
//! The pipeline lives in [`TimeDependencePostprocessor`]. Templates come from
//! a [`TemplateSource`]; [`SchaakeTemplates`] draws them from a
//! [`TrainingSet`] with probabilities given by a [`Weighter`].
//!
//! [Schaake shuffle]: https://doi.org/10.1175/1525-7541(2004)005%3C0243:TSSAMF%3E2.0.CO;2

pub use self::{
    error::{DependenceError, WeightError},
    observations::{ObservationLayout, ObservationSeries},
    postprocessor::{
        FittedPostprocessor, ForecastColumns, OutputFormat, TimeDependencePostprocessor,
        TransformOptions, TransformOutput, TransformedForecasts,
    },
    seed::{ParseSeedError, ShuffleSeed},
    shuffle::shuffle_group,
    template::{SchaakeTemplates, TemplateSource},
    training::{TargetKind, TrainingSet, TrainingTargets, build_training_set},
    weighter::{EqualWeighter, UnivariateGaussianKernel, Weighter},
};

pub mod error;
pub mod observations;
pub mod postprocessor;
pub mod seed;
pub mod shuffle;
pub mod template;
pub mod training;
pub mod weighter;

#[cfg(test)]
mod fixtures;
