//! The time-dependence pipeline: pivot, build templates, shuffle, unpivot.

use std::{num::NonZeroUsize, panic, thread};

use rand::Rng as _;
use schaake_frame::{GroupKey, LongLayout, Table, UsageError, WideRow, WideTable, pivot, unpivot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::DependenceError,
    observations::{ObservationLayout, ObservationSeries},
    seed::ShuffleSeed,
    shuffle::shuffle_group,
    template::{SchaakeTemplates, TemplateSource},
    training::{TrainingSet, TrainingTargets, build_training_set},
    weighter::Weighter,
};

/// Column names of a long forecast table, other than the key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastColumns {
    pub reference_time_col: String,
    pub horizon_col: String,
    pub sample_id_col: String,
    pub value_col: String,
}

impl Default for ForecastColumns {
    fn default() -> Self {
        Self {
            reference_time_col: "reference_date".to_owned(),
            horizon_col: "horizon".to_owned(),
            sample_id_col: "output_type_id".to_owned(),
            value_col: "value".to_owned(),
        }
    }
}

impl ForecastColumns {
    #[must_use]
    pub fn long_layout(&self, key_cols: &[String]) -> LongLayout {
        LongLayout {
            key_cols: key_cols.to_vec(),
            reference_time_col: self.reference_time_col.clone(),
            horizon_col: self.horizon_col.clone(),
            sample_id_col: self.sample_id_col.clone(),
            value_col: self.value_col.clone(),
        }
    }
}

/// Shape of the transformed forecasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Same schema as the input.
    #[default]
    Long,
    /// One row per sample with a value per horizon.
    Wide,
}

/// Per-call settings of [`FittedPostprocessor::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub columns: ForecastColumns,
    /// Training-instance mask, one entry per observation row.
    pub mask: Option<Vec<bool>>,
    /// Draw templates from PIT values of these forecasts instead of from
    /// observed values.
    pub pit_templates: bool,
    pub output: OutputFormat,
    /// Root seed; a random one is drawn when `None`.
    pub seed: Option<ShuffleSeed>,
    /// Process groups on multiple threads. The output does not depend on it.
    pub parallel: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            columns: ForecastColumns::default(),
            mask: None,
            pit_templates: false,
            output: OutputFormat::Long,
            seed: None,
            parallel: true,
        }
    }
}

/// Transformed forecasts.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum TransformedForecasts {
    Long(Table),
    Wide(WideTable),
}

/// Result of a transform call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub forecasts: TransformedForecasts,
    /// The seed the call ran with, for reproduction.
    pub seed: ShuffleSeed,
    pub n_groups: usize,
    pub n_training: usize,
}

/// An unfitted time-dependence postprocessor.
///
/// [`Self::fit`] attaches historical observations and yields a
/// [`FittedPostprocessor`], the only type that can transform forecasts.
///
/// # Example
///
/// ```
/// use schaake_dependence::{
///     ObservationLayout, OutputFormat, TimeDependencePostprocessor, TransformOptions,
///     TransformedForecasts, weighter::EqualWeighter,
/// };
/// use schaake_frame::{Cell, Table};
///
/// let observations = Table::from_rows(
///     ["location", "date", "value"],
///     (0..6).map(|t| vec!["a".into(), t.into(), f64::from(t).into()]).collect(),
/// )
/// .unwrap();
/// let forecasts = Table::from_rows(
///     ["location", "reference_date", "horizon", "output_type_id", "value"],
///     [(1, 0, 3.0), (1, 1, 1.0), (2, 0, 5.0), (2, 1, 9.0)]
///         .into_iter()
///         .map(|(h, i, v)| vec!["a".into(), 2.into(), h.into(), i.into(), Cell::Float(v)])
///         .collect(),
/// )
/// .unwrap();
///
/// let layout = ObservationLayout::new(["location"]).with_feat_cols(["location"]);
/// let fitted = TimeDependencePostprocessor::schaake(EqualWeighter, layout)
///     .fit(observations)
///     .unwrap();
/// let output = fitted
///     .transform(&forecasts, &TransformOptions { output: OutputFormat::Wide, ..Default::default() })
///     .unwrap();
/// assert_eq!(output.n_groups, 1);
/// assert_eq!(output.n_training, 4);
///
/// let TransformedForecasts::Wide(wide) = output.forecasts else { unreachable!() };
/// let mut first = wide.rows().iter().map(|r| r.values[0]).collect::<Vec<_>>();
/// first.sort_by(f64::total_cmp);
/// assert_eq!(first, [1.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct TimeDependencePostprocessor<T> {
    templates: T,
    layout: ObservationLayout,
}

impl<W> TimeDependencePostprocessor<SchaakeTemplates<W>>
where
    W: Weighter,
{
    /// A Schaake shuffle drawing templates with the given weighter.
    pub fn schaake(weighter: W, layout: ObservationLayout) -> Self {
        Self::new(SchaakeTemplates::new(weighter), layout)
    }
}

impl<T> TimeDependencePostprocessor<T>
where
    T: TemplateSource,
{
    pub fn new(templates: T, layout: ObservationLayout) -> Self {
        Self { templates, layout }
    }

    /// Validates and stores the observations.
    pub fn fit(self, observations: Table) -> Result<FittedPostprocessor<T>, DependenceError> {
        let observations = ObservationSeries::new(observations, self.layout)?;
        debug!(n_observations = observations.len(), "fitted time-dependence postprocessor");
        Ok(FittedPostprocessor {
            templates: self.templates,
            observations,
        })
    }
}

/// A postprocessor with observations attached.
#[derive(Debug, Clone)]
pub struct FittedPostprocessor<T> {
    templates: T,
    observations: ObservationSeries,
}

impl<T> FittedPostprocessor<T>
where
    T: TemplateSource,
{
    #[must_use]
    pub fn observations(&self) -> &ObservationSeries {
        &self.observations
    }

    #[must_use]
    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Induces cross-horizon dependence in a long forecast table.
    ///
    /// Forecasts are pivoted and grouped by key columns and reference time.
    /// Each group receives templates from the template source and its
    /// values are reordered to follow the template ranks. Groups are
    /// concatenated in order of first appearance.
    ///
    /// Sample ids are reassigned as described in [`pivot`]. Values are
    /// permuted within each horizon of a group and never altered.
    ///
    /// Every group draws from its own generator derived from the seed and the
    /// group index, so the output for a given seed is the same with and
    /// without [`TransformOptions::parallel`].
    ///
    /// # Errors
    ///
    /// Fails without partial output if the forecasts are malformed, the
    /// training set cannot be built or weighted, or a template source returns
    /// a template of the wrong shape.
    pub fn transform(
        &self,
        forecasts: &Table,
        options: &TransformOptions,
    ) -> Result<TransformOutput, DependenceError> {
        let layout = options
            .columns
            .long_layout(&self.observations.layout().key_cols);
        let wide = pivot(forecasts, &layout)?;
        let (Some(&min), Some(&max)) = (wide.horizons().first(), wide.horizons().last()) else {
            return Err(UsageError::EmptyInput {
                what: "forecast table",
            }
            .into());
        };

        let targets = if options.pit_templates {
            TrainingTargets::Pit(&wide)
        } else {
            TrainingTargets::Observed
        };
        let training = build_training_set(
            &self.observations,
            min..=max,
            options.mask.as_deref(),
            targets,
        )?;
        if training.is_empty() {
            warn!("training set is empty; no templates can be drawn");
        }

        let groups = wide.groups()?;
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        info!(
            n_groups = groups.len(),
            n_training = training.len(),
            min_horizon = min,
            max_horizon = max,
            %seed,
            "transforming forecasts"
        );

        let feat_idx = self
            .observations
            .layout()
            .feat_cols
            .iter()
            .map(|c| wide.meta_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        let job = GroupJob {
            wide: &wide,
            training: &training,
            templates: &self.templates,
            feat_cols: &self.observations.layout().feat_cols,
            feat_idx: &feat_idx,
            group_cols: &layout.group_cols(),
            seed,
        };

        let shuffled = if options.parallel {
            job.run_parallel(&groups)?
        } else {
            job.run_sequential(&groups)?
        };
        let wide = wide.with_rows(shuffled);

        let forecasts = match options.output {
            OutputFormat::Long => TransformedForecasts::Long(unpivot(&wide)),
            OutputFormat::Wide => TransformedForecasts::Wide(wide),
        };
        Ok(TransformOutput {
            forecasts,
            seed,
            n_groups: groups.len(),
            n_training: training.len(),
        })
    }
}

/// Everything needed to shuffle one group, shared by all worker threads.
struct GroupJob<'a, T> {
    wide: &'a WideTable,
    training: &'a TrainingSet,
    templates: &'a T,
    feat_cols: &'a [String],
    feat_idx: &'a [usize],
    group_cols: &'a [String],
    seed: ShuffleSeed,
}

impl<T> GroupJob<'_, T>
where
    T: TemplateSource,
{
    fn shuffle(&self, index: usize, key: &GroupKey, rows: &[usize]) -> Result<Vec<WideRow>, DependenceError> {
        let mut rng = self.seed.group_rng(index);
        let query = Table::from_rows(
            self.feat_cols,
            rows.iter()
                .map(|&r| {
                    let meta = &self.wide.rows()[r].meta;
                    self.feat_idx.iter().map(|&c| meta[c].clone()).collect()
                })
                .collect(),
        )?;
        let templates = self
            .templates
            .build_templates(self.training, &query, &mut rng)?;
        let expected = (rows.len(), self.wide.horizons().len());
        if templates.shape() != expected {
            return Err(DependenceError::TemplateShape {
                group: key.describe(self.group_cols),
                expected,
                found: templates.shape(),
            });
        }
        debug!(group = %key, n_samples = rows.len(), "shuffling group");
        Ok(shuffle_group(self.wide, rows, &templates, &mut rng))
    }

    fn run_sequential(&self, groups: &[(GroupKey, Vec<usize>)]) -> Result<Vec<WideRow>, DependenceError> {
        let mut out = Vec::with_capacity(self.wide.n_rows());
        for (index, (key, rows)) in groups.iter().enumerate() {
            out.extend(self.shuffle(index, key, rows)?);
        }
        Ok(out)
    }

    fn run_parallel(&self, groups: &[(GroupKey, Vec<usize>)]) -> Result<Vec<WideRow>, DependenceError> {
        let n_threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = groups.len().div_ceil(n_threads).max(1);
        let chunks = thread::scope(|s| {
            let handles = groups
                .chunks(chunk_size)
                .enumerate()
                .map(|(c, chunk)| {
                    s.spawn(move || {
                        let mut out = vec![];
                        for (i, (key, rows)) in chunk.iter().enumerate() {
                            out.extend(self.shuffle(c * chunk_size + i, key, rows)?);
                        }
                        Ok::<_, DependenceError>(out)
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect::<Vec<_>>()
        });

        let mut out = Vec::with_capacity(self.wide.n_rows());
        for chunk in chunks {
            out.extend(chunk?);
        }
        Ok(out)
    }
}
