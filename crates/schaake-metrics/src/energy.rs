use schaake_frame::{Table, UsageError};
use schaake_stats::{descriptive::DescriptiveStats, energy};
use serde::{Deserialize, Serialize};

use crate::units::{MetricColumns, join_units, unit_table};

/// How per-unit scores are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduce {
    /// Average over units with a defined score.
    #[default]
    Mean,
    /// One row per unit.
    PerUnit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnergyScore {
    /// Mean over units with a defined score, or `None` if there are none.
    Mean(Option<f64>),
    /// Key columns followed by an `energy_score` column.
    PerUnit(Table),
}

/// Computes the energy score of each unit's samples against its observation.
///
/// Prediction columns form the sample vectors and observation columns the
/// observed vector (Gneiting et al. 2008, Eq. 7). A unit with any missing or
/// non-numeric cell in those columns scores NaN, and NaN scores are left out
/// of the mean.
///
/// # Errors
///
/// Returns [`UsageError`] if a column is missing, the prediction and
/// observation columns differ in number, or a key column is named
/// `energy_score`.
pub fn energy_score(
    model: &Table,
    observations: &Table,
    columns: &MetricColumns,
    reduce: Reduce,
) -> Result<EnergyScore, UsageError> {
    let units = join_units(model, observations, columns)?;
    match reduce {
        Reduce::Mean => {
            let scores = units
                .iter()
                .map(|unit| energy::energy_score(&unit.samples, &unit.observed));
            Ok(EnergyScore::Mean(DescriptiveStats::new(scores).map(|s| s.mean)))
        }
        Reduce::PerUnit => unit_table(&columns.key_cols, &["energy_score"], &units, |unit| {
            vec![energy::energy_score(&unit.samples, &unit.observed)]
        })
        .map(EnergyScore::PerUnit),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg32;
    use schaake_frame::Cell;

    use super::*;
    use crate::fixtures::{columns, date, energy_model, observations};

    const SCORE_A: f64 = 5.856_067_772_593_822;
    const SCORE_B: f64 = 5.957_445_159_877_379;

    #[test]
    fn test_per_unit_scores() {
        let EnergyScore::PerUnit(scores) =
            energy_score(&energy_model(), &observations(), &columns(), Reduce::PerUnit).unwrap()
        else {
            panic!("expected per-unit scores");
        };
        assert_eq!(scores.columns(), ["location", "date", "energy_score"]);
        assert_eq!(scores.rows()[0][..2], [Cell::from("a"), date(1)]);
        assert_eq!(scores.rows()[1][..2], [Cell::from("b"), date(8)]);
        let values = scores.f64_column("energy_score").unwrap();
        assert!((values[0] - SCORE_A).abs() < 1e-12);
        assert!((values[1] - SCORE_B).abs() < 1e-12);
    }

    #[test]
    fn test_mean_score() {
        let EnergyScore::Mean(Some(mean)) =
            energy_score(&energy_model(), &observations(), &columns(), Reduce::Mean).unwrap()
        else {
            panic!("expected a mean score");
        };
        assert!((mean - f64::midpoint(SCORE_A, SCORE_B)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_values_are_excluded_from_mean() {
        let mut model = energy_model();
        // one missing sample value in unit a
        model
            .map_column("horizon2", |row, cell| Ok(if row == 2 { Cell::Null } else { cell }))
            .unwrap();
        let scores = match energy_score(&model, &observations(), &columns(), Reduce::PerUnit) {
            Ok(EnergyScore::PerUnit(scores)) => scores,
            other => panic!("unexpected result {other:?}"),
        };
        let values = scores.f64_column("energy_score").unwrap();
        assert!(values[0].is_nan());
        assert!((values[1] - SCORE_B).abs() < 1e-12);

        let EnergyScore::Mean(Some(mean)) =
            energy_score(&model, &observations(), &columns(), Reduce::Mean).unwrap()
        else {
            panic!("expected a mean score");
        };
        assert!((mean - SCORE_B).abs() < 1e-12);

        // nothing left to average
        let mut obs = observations();
        obs.map_column("value_lead1", |_, _| Ok(Cell::Null)).unwrap();
        assert_eq!(
            energy_score(&model, &obs, &columns(), Reduce::Mean),
            Ok(EnergyScore::Mean(None))
        );
    }

    #[test]
    fn test_calibrated_ensemble_scores_better() {
        // N(0, 1) samples score better than N(3, 1) samples against an
        // observation at the origin
        let mut rng = Pcg32::seed_from_u64(11);
        let mut draw = |mean: f64| {
            let normal = Normal::new(mean, 1.0).unwrap();
            let [a, b, c] = [(); 3].map(|()| {
                (0..200).map(|_| normal.sample(&mut rng)).collect::<Vec<_>>()
            });
            crate::fixtures::model([("a", 1, [a, b, c]), ("b", 8, [vec![], vec![], vec![]])])
        };
        let calibrated = draw(0.0);
        let biased = draw(3.0);
        let obs = Table::from_rows(
            ["location", "date", "value_lead1", "value_lead2", "value_lead3"],
            vec![vec![Cell::from("a"), date(1), 0.0.into(), 0.0.into(), 0.0.into()]],
        )
        .unwrap();
        let mean = |model: &Table| match energy_score(model, &obs, &columns(), Reduce::Mean) {
            Ok(EnergyScore::Mean(Some(mean))) => mean,
            other => panic!("unexpected result {other:?}"),
        };
        assert!(mean(&calibrated) < mean(&biased));
    }
}
