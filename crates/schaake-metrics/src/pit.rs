use schaake_frame::{Table, UsageError};
use schaake_stats::pit::fraction_at_or_below;

use crate::units::{MetricColumns, join_units, unit_table};

/// Computes the marginal PIT value of every prediction column for each unit.
///
/// The PIT value is the fraction of the unit's samples that are less than or
/// equal to the observed value. Missing or non-numeric samples are ignored;
/// a missing observation gives NaN.
///
/// The result has the key columns followed by `pit_{pred_col}` for every
/// prediction column, with one row per unit that has an observation.
///
/// # Errors
///
/// Returns [`UsageError`] if a column is missing, the prediction and
/// observation columns differ in number, or an output column name collides
/// with a key column.
pub fn marginal_pit(
    model: &Table,
    observations: &Table,
    columns: &MetricColumns,
) -> Result<Table, UsageError> {
    let units = join_units(model, observations, columns)?;
    let pit_cols = columns
        .pred_cols
        .iter()
        .map(|c| format!("pit_{c}"))
        .collect::<Vec<_>>();
    unit_table(&columns.key_cols, &pit_cols, &units, |unit| {
        unit.observed
            .iter()
            .enumerate()
            .map(|(j, &y)| fraction_at_or_below(&unit.samples.column(j).collect::<Vec<_>>(), y))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use schaake_frame::Cell;

    use super::*;
    use crate::fixtures::{columns, date, observations, pit_model};

    #[test]
    fn test_marginal_pit() {
        let pit = marginal_pit(&pit_model(), &observations(), &columns()).unwrap();
        assert_eq!(
            pit.columns(),
            ["location", "date", "pit_horizon1", "pit_horizon2", "pit_horizon3"]
        );
        let row = |location: &str, day, values: [f64; 3]| {
            let mut row = vec![Cell::from(location), date(day)];
            row.extend(values.map(Cell::Float));
            row
        };
        assert_eq!(
            pit.rows(),
            [row("a", 1, [0.45, 0.23, 0.0]), row("b", 8, [0.0, 1.0, 0.35])]
        );
    }

    #[test]
    fn test_missing_cells() {
        let mut model = pit_model();
        // unit a keeps the 50 first-horizon samples up to 4.5
        model
            .map_column("horizon1", |row, cell| {
                Ok(match cell.as_f64() {
                    Some(v) if row < 100 && v > 4.5 => Cell::Null,
                    _ => cell,
                })
            })
            .unwrap();
        let mut obs = observations();
        obs.map_column("value_lead3", |_, _| Ok(Cell::Null)).unwrap();

        let pit = marginal_pit(&model, &obs, &columns()).unwrap();
        let a = &pit.rows()[0];
        // 45 of the 50 remaining samples are at or below 4.0
        assert_eq!(a[2], Cell::Float(0.9));
        assert_eq!(a[3], Cell::Float(0.23));
        assert!(a[4].as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_output_collision() {
        let model = Table::from_rows(["pit_x", "x"], vec![vec!["a".into(), 1.0.into()]]).unwrap();
        let obs = Table::from_rows(["pit_x", "y"], vec![vec!["a".into(), 2.0.into()]]).unwrap();
        let cols = MetricColumns {
            key_cols: vec!["pit_x".into()],
            pred_cols: vec!["x".into()],
            obs_cols: vec!["y".into()],
        };
        assert_eq!(
            marginal_pit(&model, &obs, &cols),
            Err(UsageError::DuplicateColumn {
                column: "pit_x".into()
            })
        );
    }
}
