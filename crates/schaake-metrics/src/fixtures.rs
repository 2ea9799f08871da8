//! Model and observation tables with two units, `a` on 2024-10-01 and `b` on
//! 2024-10-08.

use chrono::NaiveDate;
use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use schaake_frame::{Cell, Table};

use crate::units::MetricColumns;

pub(crate) fn date(month_day: u32) -> Cell {
    Cell::Date(NaiveDate::from_ymd_opt(2024, 10, month_day).unwrap())
}

pub(crate) fn columns() -> MetricColumns {
    MetricColumns {
        key_cols: vec!["location".into(), "date".into()],
        pred_cols: vec!["horizon1".into(), "horizon2".into(), "horizon3".into()],
        obs_cols: vec!["value_lead1".into(), "value_lead2".into(), "value_lead3".into()],
    }
}

/// Observations for every location and date; only `a` on the 1st and `b` on
/// the 8th match a model unit.
pub(crate) fn observations() -> Table {
    let rows = [
        ("a", 1, [3.0, 4.0, 10.0, 5.0]),
        ("a", 8, [4.0, 10.0, 5.0, 2.0]),
        ("b", 1, [0.0, 7.2, 9.6, 10.0]),
        ("b", 8, [7.2, 9.6, 10.0, 14.1]),
    ]
    .into_iter()
    .map(|(location, day, values)| {
        let mut row = vec![Cell::from(location), date(day)];
        row.extend(values.map(Cell::Float));
        row
    })
    .collect();
    Table::from_rows(
        ["location", "date", "value", "value_lead1", "value_lead2", "value_lead3"],
        rows,
    )
    .unwrap()
}

/// Model table from per-unit horizon columns.
pub(crate) fn model(units: [(&str, u32, [Vec<f64>; 3]); 2]) -> Table {
    let mut rows = vec![];
    let mut sample_id = 0;
    for (location, day, [h1, h2, h3]) in units {
        for ((v1, v2), v3) in h1.into_iter().zip(h2).zip(h3) {
            rows.push(vec![
                Cell::from(location),
                date(day),
                Cell::from("sample"),
                Cell::Int(sample_id),
                Cell::Float(v1),
                Cell::Float(v2),
                Cell::Float(v3),
            ]);
            sample_id += 1;
        }
    }
    Table::from_rows(
        ["location", "date", "output_type", "output_type_id", "horizon1", "horizon2", "horizon3"],
        rows,
    )
    .unwrap()
}

/// Four samples per unit with energy scores known from `scoringRules`.
pub(crate) fn energy_model() -> Table {
    model([
        (
            "a",
            1,
            [
                vec![5.0, 7.7, 18.0, 10.0],
                vec![3.0, 4.0, 10.0, 6.0],
                vec![4.4, 1.0, 12.0, 9.0],
            ],
        ),
        (
            "b",
            8,
            [
                vec![6.0, 4.0, 5.0, 2.0],
                vec![12.0, 0.0, 15.0, 6.0],
                vec![16.6, 21.0, 32.0, -1.0],
            ],
        ),
    ])
}

/// `n` evenly spaced values from `start` to `end`, inclusive.
fn linspace(start: f64, end: f64, n: u32) -> Vec<f64> {
    (0..n)
        .map(|k| start + (end - start) * f64::from(k) / f64::from(n - 1))
        .collect()
}

/// A hundred samples per horizon, evenly spaced and shuffled.
pub(crate) fn pit_model() -> Table {
    let mut rng = Pcg32::seed_from_u64(123);
    let mut shuffled = |start, end| {
        let mut values = linspace(start, end, 100);
        values.shuffle(&mut rng);
        values
    };
    model([
        (
            "a",
            1,
            [shuffled(0.0, 9.0), shuffled(8.0, 17.0), shuffled(5.1, 16.1)],
        ),
        (
            "b",
            8,
            [shuffled(10.0, 19.0), shuffled(-3.0, 6.0), shuffled(10.99, 19.99)],
        ),
    ])
}
