use std::collections::HashMap;

use schaake_frame::{Cell, GroupKey, Table, UsageError, group_rows};
use schaake_stats::matrix::Matrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Columns used to join and compare model and observation tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricColumns {
    /// Columns present in both tables that identify an observational unit.
    pub key_cols: Vec<String>,
    /// Sampled values in the model table.
    pub pred_cols: Vec<String>,
    /// Observed values, paired with `pred_cols` by position.
    pub obs_cols: Vec<String>,
}

/// The samples and the observation of one unit.
#[derive(Debug)]
pub(crate) struct Unit {
    pub(crate) key: GroupKey,
    /// One row per sample, one column per prediction column. Missing or
    /// non-numeric cells are NaN.
    pub(crate) samples: Matrix,
    pub(crate) observed: Vec<f64>,
}

/// Inner-joins the model rows with the observations on the key columns.
///
/// Units appear in order of first appearance in `model`. When several
/// observation rows share a key, the first one is used.
pub(crate) fn join_units(
    model: &Table,
    observations: &Table,
    columns: &MetricColumns,
) -> Result<Vec<Unit>, UsageError> {
    if columns.pred_cols.len() != columns.obs_cols.len() {
        return Err(UsageError::UnpairedColumns {
            pred: columns.pred_cols.len(),
            obs: columns.obs_cols.len(),
        });
    }
    let model_key = model.column_indices(&columns.key_cols)?;
    let obs_key = observations.column_indices(&columns.key_cols)?;
    let pred_idx = model.column_indices(&columns.pred_cols)?;
    let obs_idx = observations.column_indices(&columns.obs_cols)?;

    let mut lookup = HashMap::new();
    for row in observations.rows() {
        lookup
            .entry(GroupKey::from_row(row, &obs_key))
            .or_insert(row.as_slice());
    }

    let groups = group_rows(model.rows().iter().map(Vec::as_slice), &model_key);
    let n_groups = groups.len();
    let units = groups
        .into_iter()
        .filter_map(|(key, rows)| {
            let obs_row = lookup.get(&key)?;
            let samples = Matrix::from_fn(rows.len(), pred_idx.len(), |r, c| {
                numeric(&model.rows()[rows[r]][pred_idx[c]])
            });
            let observed = obs_idx.iter().map(|&c| numeric(&obs_row[c])).collect();
            Some(Unit {
                key,
                samples,
                observed,
            })
        })
        .collect::<Vec<_>>();
    debug!(
        units = units.len(),
        unmatched = n_groups - units.len(),
        "joined model and observations"
    );
    Ok(units)
}

fn numeric(cell: &Cell) -> f64 {
    cell.as_f64().unwrap_or(f64::NAN)
}

/// Builds a per-unit table: key columns followed by one value column per name.
pub(crate) fn unit_table<S>(
    key_cols: &[String],
    value_cols: &[S],
    units: &[Unit],
    mut values: impl FnMut(&Unit) -> Vec<f64>,
) -> Result<Table, UsageError>
where
    S: AsRef<str>,
{
    let columns = key_cols
        .iter()
        .map(String::as_str)
        .chain(value_cols.iter().map(AsRef::as_ref));
    let rows = units
        .iter()
        .map(|unit| {
            let mut row = unit.key.0.clone();
            row.extend(values(unit).into_iter().map(Cell::Float));
            row
        })
        .collect();
    Table::from_rows(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{columns, energy_model, observations};

    #[test]
    fn test_join_units() {
        let units = join_units(&energy_model(), &observations(), &columns()).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].key.0[0], Cell::from("a"));
        assert_eq!(units[0].samples.shape(), (4, 3));
        assert_eq!(units[0].observed, [4.0, 10.0, 5.0]);
        assert_eq!(units[1].observed, [9.6, 10.0, 14.1]);
    }

    #[test]
    fn test_unmatched_units_are_dropped() {
        let obs = observations();
        let keep = obs
            .column("location")
            .unwrap()
            .map(|c| *c == Cell::from("b"))
            .collect::<Vec<_>>();
        let units = join_units(&energy_model(), &obs.filter(&keep).unwrap(), &columns()).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].key.0[0], Cell::from("b"));
    }

    #[test]
    fn test_column_errors() {
        let mut cols = columns();
        cols.obs_cols.pop();
        assert_eq!(
            join_units(&energy_model(), &observations(), &cols).unwrap_err(),
            UsageError::UnpairedColumns { pred: 3, obs: 2 }
        );
        let mut cols = columns();
        cols.pred_cols[0] = "horizon9".into();
        assert_eq!(
            join_units(&energy_model(), &observations(), &cols).unwrap_err(),
            UsageError::MissingColumn {
                column: "horizon9".into()
            }
        );
    }
}
