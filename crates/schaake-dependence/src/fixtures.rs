//! Test data modelled on Fig. 2 of Clark et al. (2004), "The Schaake
//! shuffle", with the roles of space and time swapped.
//!
//! Unit a/young replicates the figure; the other units and the second
//! reference date are offset copies.

use chrono::{Days, NaiveDate};
use schaake_frame::{Cell, LongLayout, Table, WideTable, pivot};
use schaake_stats::matrix::Matrix;

use crate::{observations::ObservationLayout, postprocessor::ForecastColumns};

pub(crate) const H1: [f64; 10] = [15.3, 11.2, 8.8, 11.9, 7.5, 9.7, 8.3, 12.5, 10.3, 10.1];
pub(crate) const H2: [f64; 10] = [9.3, 6.3, 7.9, 7.5, 13.5, 11.8, 8.6, 17.7, 7.2, 12.2];
pub(crate) const H3: [f64; 10] = [17.6, 15.6, 13.5, 14.2, 18.3, 15.9, 14.5, 23.9, 12.4, 16.3];

/// Fig. 2 ensemble after shuffling with [`templates`].
pub(crate) const SHUFFLED: [[f64; 10]; 3] = [
    [10.1, 8.8, 7.5, 10.3, 11.9, 15.3, 8.3, 9.7, 11.2, 12.5],
    [9.3, 7.2, 6.3, 8.6, 13.5, 17.7, 7.9, 7.5, 11.8, 12.2],
    [14.5, 15.6, 12.4, 16.3, 18.3, 23.9, 14.2, 13.5, 15.9, 17.6],
];

/// Units as (location, age group, population, value offset).
pub(crate) const UNITS: [(&str, &str, f64, f64); 4] = [
    ("a", "young", 100.0, 0.0),
    ("a", "old", 150.0, 4.0),
    ("b", "young", 200.0, 12.0),
    ("b", "old", 250.0, -2.0),
];

/// Reference dates as (day of January 2020, value offset).
pub(crate) const REFERENCE_DATES: [(u32, f64); 2] = [(15, 0.0), (22, 42.0)];

pub(crate) fn date(day: u32) -> Cell {
    Cell::Date(NaiveDate::from_ymd_opt(2020, 1, day).unwrap())
}

pub(crate) fn templates() -> Matrix {
    Matrix::from_rows(&[
        [10.7, 10.9, 13.5],
        [9.3, 9.1, 13.7],
        [6.8, 7.2, 9.3],
        [11.3, 10.7, 15.6],
        [12.2, 13.1, 17.8],
        [13.6, 14.2, 19.3],
        [8.9, 9.4, 12.1],
        [9.9, 9.2, 11.8],
        [11.8, 11.9, 15.2],
        [12.9, 12.5, 16.9],
    ])
}

pub(crate) fn key_cols() -> Vec<String> {
    vec!["location".into(), "age_group".into()]
}

pub(crate) fn forecast_columns() -> ForecastColumns {
    ForecastColumns::default()
}

pub(crate) fn long_layout() -> LongLayout {
    forecast_columns().long_layout(&key_cols())
}

pub(crate) fn observation_layout(feat_cols: &[&str]) -> ObservationLayout {
    ObservationLayout::new(key_cols()).with_feat_cols(feat_cols.iter().copied())
}

const LONG_COLUMNS: [&str; 8] = [
    "reference_date",
    "location",
    "population",
    "age_group",
    "output_type",
    "output_type_id",
    "horizon",
    "value",
];

/// Builds a long table (horizon-major) from per-unit horizon columns.
///
/// `columns(unit, reference)` returns the three horizon columns of one group;
/// sample ids are `sample_id(group, i)`.
fn long_table(
    columns: impl Fn(usize, usize) -> [[f64; 10]; 3],
    sample_id: impl Fn(usize, usize) -> i64,
) -> Table {
    let mut rows = vec![];
    for (h, horizon) in (1..=3).enumerate() {
        for (r, (day, _)) in REFERENCE_DATES.iter().enumerate() {
            for (u, (location, age_group, population, _)) in UNITS.iter().enumerate() {
                let values = columns(u, r);
                for (i, value) in values[h].iter().enumerate() {
                    rows.push(vec![
                        date(*day),
                        Cell::from(*location),
                        Cell::Float(*population),
                        Cell::from(*age_group),
                        Cell::from("sample"),
                        Cell::Int(sample_id(r * UNITS.len() + u, i)),
                        Cell::Int(horizon),
                        Cell::Float(*value),
                    ]);
                }
            }
        }
    }
    Table::from_rows(LONG_COLUMNS, rows).unwrap()
}

fn offset_columns(base: [[f64; 10]; 3], unit: usize, reference: usize) -> [[f64; 10]; 3] {
    let shift = UNITS[unit].3 + REFERENCE_DATES[reference].1;
    base.map(|column| column.map(|v| v + shift))
}

/// Unshuffled forecasts: 8 groups of 10 samples over horizons 1..=3, with
/// sample ids `0..10` repeated in every group.
pub(crate) fn long_model_out() -> Table {
    long_table(
        |u, r| offset_columns([H1, H2, H3], u, r),
        |_, i| i64::try_from(i).unwrap(),
    )
}

/// The expected result of shuffling every group of [`long_model_out`] with
/// [`templates`], with ids as reassigned by the pivot.
pub(crate) fn long_expected_final() -> Table {
    long_table(
        |u, r| offset_columns(SHUFFLED, u, r),
        |g, i| i64::try_from(g * 10 + i).unwrap(),
    )
}

pub(crate) fn wide_model_out() -> WideTable {
    pivot(&long_model_out(), &long_layout()).unwrap()
}

/// Ten daily observations (2020-01-14 ..= 2020-01-23) per unit, with values
/// `10..50` in unit order.
pub(crate) fn obs_data() -> Table {
    let start = NaiveDate::from_ymd_opt(2020, 1, 14).unwrap();
    let mut rows = vec![];
    for (u, (location, age_group, population, _)) in UNITS.iter().enumerate() {
        for i in 0..10_u64 {
            let value = i64::try_from(10 + u * 10).unwrap() + i64::try_from(i).unwrap();
            rows.push(vec![
                Cell::from(*location),
                Cell::Float(*population),
                Cell::from(*age_group),
                Cell::Date(start.checked_add_days(Days::new(i)).unwrap()),
                Cell::Int(value),
            ]);
        }
    }
    Table::from_rows(["location", "population", "age_group", "date", "value"], rows).unwrap()
}
