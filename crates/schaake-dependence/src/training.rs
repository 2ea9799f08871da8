use std::{collections::HashMap, ops::RangeInclusive};

use schaake_frame::{Cell, GroupKey, Table, UsageError, WideTable, group_rows};
use schaake_stats::{matrix::Matrix, pit::fraction_at_or_below};
use tracing::debug;

use crate::observations::ObservationSeries;

/// What the targets of a training set measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TargetKind {
    /// Observed values at each horizon offset.
    Observed,
    /// PIT values of past observations under past forecasts.
    Pit,
}

/// Where training targets come from.
#[derive(Debug, Clone, Copy)]
pub enum TrainingTargets<'a> {
    /// Shifted observations.
    Observed,
    /// Marginal PIT values of the shifted observations under the forecasts of
    /// the given wide table, one instance per forecast group.
    Pit(&'a WideTable),
}

/// Candidate dependence templates with the features used to weight them.
///
/// Row `i` of [`Self::features`] describes row `i` of [`Self::targets`]; the
/// target columns correspond to [`Self::horizons`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    features: Table,
    targets: Matrix,
    horizons: Vec<i64>,
    kind: TargetKind,
}

impl TrainingSet {
    #[must_use]
    pub fn features(&self) -> &Table {
        &self.features
    }

    #[must_use]
    pub fn targets(&self) -> &Matrix {
        &self.targets
    }

    #[must_use]
    pub fn horizons(&self) -> &[i64] {
        &self.horizons
    }

    #[must_use]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.n_rows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.n_rows() == 0
    }
}

/// Builds the training set of dependence templates.
///
/// Observations are grouped by key columns and sorted by time within each
/// group. The target for horizon offset `h` at row `i` is the observation at
/// row `i + h` of the same group; offsets may be zero or negative. Rows where
/// any shifted value falls outside the group or is not numeric are dropped.
///
/// `mask` selects the observation rows that may serve as training instances.
/// It is applied after shifting, so targets of kept rows are still read from
/// the full series.
///
/// With [`TrainingTargets::Pit`], each forecast group (keys, reference time)
/// is matched with the observation of the same keys whose time equals the
/// reference time. Target `j` is the fraction of the group's samples at
/// horizon `j` that are less than or equal to the shifted observation.
/// Features are looked up in the forecast metadata first and the matched
/// observation row second. Groups whose observation is missing, masked out,
/// or lacks a shifted value contribute nothing.
///
/// # Errors
///
/// Returns [`UsageError`] if the mask length differs from the number of
/// observations, a feature column exists nowhere, or in PIT mode the horizon
/// range differs from the forecast horizons.
pub fn build_training_set(
    observations: &ObservationSeries,
    horizons: RangeInclusive<i64>,
    mask: Option<&[bool]>,
    targets: TrainingTargets<'_>,
) -> Result<TrainingSet, UsageError> {
    let table = observations.table();
    let layout = observations.layout();
    if let Some(mask) = mask
        && mask.len() != table.n_rows()
    {
        return Err(UsageError::MaskLength {
            mask_len: mask.len(),
            n_rows: table.n_rows(),
        });
    }
    let offsets = horizons.collect::<Vec<_>>();
    let key_idx = table.column_indices(&layout.key_cols)?;
    let time_idx = table.column_index(&layout.time_col)?;
    let obs_idx = table.column_index(&layout.obs_col)?;

    // shifted[row] holds the targets of an observation row, if all exist
    let mut shifted = vec![None; table.n_rows()];
    let mut ordered = Vec::with_capacity(table.n_rows());
    for (_, mut rows) in group_rows(table.rows().iter().map(Vec::as_slice), &key_idx) {
        rows.sort_by(|&a, &b| table.rows()[a][time_idx].cmp(&table.rows()[b][time_idx]));
        let values = rows
            .iter()
            .map(|&r| table.rows()[r][obs_idx].as_f64())
            .collect::<Vec<_>>();
        for (k, &r) in rows.iter().enumerate() {
            shifted[r] = offsets
                .iter()
                .map(|&h| shift_position(k, h, rows.len()).and_then(|i| values[i]))
                .collect::<Option<Vec<f64>>>();
        }
        ordered.extend(rows);
    }
    let usable = |row: usize| mask.is_none_or(|m| m[row]) && shifted[row].is_some();

    match targets {
        TrainingTargets::Observed => {
            let feat_idx = table.column_indices(&layout.feat_cols)?;
            let kept = ordered.into_iter().filter(|&r| usable(r)).collect::<Vec<_>>();
            debug!(
                kept = kept.len(),
                dropped = table.n_rows() - kept.len(),
                "built observed training set"
            );
            let features = Table::from_rows(
                &layout.feat_cols,
                kept.iter()
                    .map(|&r| feat_idx.iter().map(|&c| table.rows()[r][c].clone()).collect())
                    .collect(),
            )?;
            let data = kept
                .iter()
                .filter_map(|&r| shifted[r].as_deref())
                .flatten()
                .copied()
                .collect();
            Ok(TrainingSet {
                features,
                targets: Matrix::from_row_major(kept.len(), offsets.len(), data),
                horizons: offsets,
                kind: TargetKind::Observed,
            })
        }
        TrainingTargets::Pit(wide) => {
            if wide.horizons() != offsets {
                let (min, max) = (
                    offsets.first().copied().unwrap_or_default(),
                    offsets.last().copied().unwrap_or_default(),
                );
                return Err(UsageError::HorizonMismatch { min, max });
            }
            let query_key_idx = layout
                .key_cols
                .iter()
                .map(|c| wide.meta_index(c))
                .collect::<Result<Vec<_>, _>>()?;
            let reference_idx = wide.meta_index(&wide.layout().reference_time_col)?;
            let feature_sources = layout
                .feat_cols
                .iter()
                .map(|c| match wide.meta_index(c) {
                    Ok(i) => Ok(FeatureSource::Query(i)),
                    Err(_) => table.column_index(c).map(FeatureSource::Observation),
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut lookup = HashMap::<(GroupKey, &Cell), usize>::new();
            for (r, row) in table.rows().iter().enumerate() {
                lookup
                    .entry((GroupKey::from_row(row, &key_idx), &row[time_idx]))
                    .or_insert(r);
            }

            let mut feature_rows = vec![];
            let mut data = vec![];
            let mut excluded = 0_usize;
            for (_, rows) in wide.groups()? {
                let meta = &wide.rows()[rows[0]].meta;
                let key = GroupKey::from_row(meta, &query_key_idx);
                let Some(&obs_row) = lookup.get(&(key, &meta[reference_idx])) else {
                    excluded += 1;
                    continue;
                };
                let Some(observed) = shifted[obs_row].as_deref().filter(|_| usable(obs_row))
                else {
                    excluded += 1;
                    continue;
                };
                let samples = wide.values(&rows);
                data.extend(observed.iter().enumerate().map(|(j, &y)| {
                    fraction_at_or_below(&samples.column(j).collect::<Vec<_>>(), y)
                }));
                feature_rows.push(
                    feature_sources
                        .iter()
                        .map(|source| match *source {
                            FeatureSource::Query(i) => meta[i].clone(),
                            FeatureSource::Observation(i) => table.rows()[obs_row][i].clone(),
                        })
                        .collect(),
                );
            }
            debug!(
                kept = feature_rows.len(),
                excluded, "built PIT training set; groups without a usable observation are excluded"
            );
            let n_train = feature_rows.len();
            Ok(TrainingSet {
                features: Table::from_rows(&layout.feat_cols, feature_rows)?,
                targets: Matrix::from_row_major(n_train, offsets.len(), data),
                horizons: offsets,
                kind: TargetKind::Pit,
            })
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FeatureSource {
    Query(usize),
    Observation(usize),
}

/// Position `k + h` if it lies within `0..len`.
fn shift_position(k: usize, h: i64, len: usize) -> Option<usize> {
    let shifted = i64::try_from(k).ok()?.checked_add(h)?;
    usize::try_from(shifted).ok().filter(|&i| i < len)
}
