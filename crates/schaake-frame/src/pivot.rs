use std::collections::BTreeMap;

use crate::{
    cell::Cell,
    error::{FrameError, StructuralError, UsageError},
    group::group_rows,
    layout::LongLayout,
    table::Table,
    wide::{MAX_EXACT_INT, ValueKind, WideRow, WideTable},
};

/// Number of missing horizons listed in an [`StructuralError::IncompleteHorizons`].
const MAX_REPORTED_MISSING: usize = 16;

/// Pivots a long ensemble table to wide form.
///
/// Rows are grouped by key columns and reference time. Every group must
/// contain each horizon of the global range `min..=max`, and the same number
/// of samples for each of those horizons. Within a group the `i`-th row of
/// each horizon (in input order) forms the `i`-th wide row. Passthrough
/// columns must agree across the horizons of a wide row.
///
/// Sample ids are reassigned: groups are numbered in order of first
/// appearance, and the samples of each group receive the next consecutive
/// integers starting from `0`, so that ids are unique across the table.
///
/// # Errors
///
/// * [`UsageError`] if the table is empty, a named column is missing, a
///   horizon cell is not an integer, or a value cell is not numeric.
/// * [`StructuralError`] if a group lacks a horizon, has unequal sample
///   counts across horizons, or has inconsistent passthrough values.
pub fn pivot(long: &Table, layout: &LongLayout) -> Result<WideTable, FrameError> {
    if long.is_empty() {
        return Err(UsageError::EmptyInput { what: "long table" }.into());
    }
    let group_cols = layout.group_cols();
    let group_idx = long.column_indices(&group_cols)?;
    let sample_idx = long.column_index(&layout.sample_id_col)?;
    let horizons = long.i64_column(&layout.horizon_col)?;
    let long_values = long.f64_column(&layout.value_col)?;
    let value_kind = detect_value_kind(long, &layout.value_col)?;
    let horizon_idx = long.column_index(&layout.horizon_col)?;
    let value_idx = long.column_index(&layout.value_col)?;

    // meta cells are every column except horizon and value, in long order
    let meta_idx = (0..long.columns().len())
        .filter(|&i| i != horizon_idx && i != value_idx)
        .collect::<Vec<_>>();
    let (&min, &max) = horizons
        .iter()
        .min()
        .zip(horizons.iter().max())
        .ok_or(UsageError::EmptyInput { what: "long table" })?;
    let range_len = i128::from(max) - i128::from(min) + 1;

    let mut rows = Vec::new();
    let mut next_id = 0_i64;
    for (key, positions) in group_rows(long.rows().iter().map(Vec::as_slice), &group_idx) {
        let mut by_horizon = BTreeMap::<i64, Vec<usize>>::new();
        for &p in &positions {
            by_horizon.entry(horizons[p]).or_default().push(p);
        }

        let describe = || key.describe(&group_cols);
        if i128::try_from(by_horizon.len()).unwrap_or(i128::MAX) != range_len {
            return Err(StructuralError::IncompleteHorizons {
                group: describe(),
                missing: missing_horizons(&by_horizon, min, max),
                min,
                max,
            }
            .into());
        }
        let n_samples = by_horizon.values().next().map_or(0, Vec::len);
        if by_horizon.values().any(|p| p.len() != n_samples) {
            return Err(StructuralError::UnequalSampleCounts {
                group: describe(),
                counts: by_horizon.iter().map(|(h, p)| (*h, p.len())).collect(),
            }
            .into());
        }

        for sample in 0..n_samples {
            let first = &long.rows()[by_horizon[&min][sample]];
            for at_horizon in by_horizon.values() {
                let row = &long.rows()[at_horizon[sample]];
                if let Some(&col) = meta_idx
                    .iter()
                    .find(|&&c| c != sample_idx && row[c] != first[c])
                {
                    return Err(StructuralError::InconsistentPassthrough {
                        group: describe(),
                        column: long.columns()[col].clone(),
                        sample,
                    }
                    .into());
                }
            }
            let meta = meta_idx
                .iter()
                .map(|&c| {
                    if c == sample_idx {
                        Cell::Int(next_id)
                    } else {
                        first[c].clone()
                    }
                })
                .collect();
            let values = by_horizon
                .values()
                .map(|at_horizon| long_values[at_horizon[sample]])
                .collect();
            rows.push(WideRow { meta, values });
            next_id += 1;
        }
    }

    Ok(WideTable::new(
        layout.clone(),
        long.columns().to_vec(),
        (min..=max).collect(),
        value_kind,
        rows,
    ))
}

/// `Int` if every value cell is an integer small enough to pass through `f64`
/// unchanged, `Float` if any is a float.
fn detect_value_kind(long: &Table, value_col: &str) -> Result<ValueKind, UsageError> {
    let mut kind = ValueKind::Int;
    for (row, cell) in long.column(value_col)?.enumerate() {
        match cell {
            Cell::Int(v) if v.unsigned_abs() > MAX_EXACT_INT.unsigned_abs() => {
                return Err(UsageError::InvalidCell {
                    column: value_col.to_owned(),
                    row,
                    expected: "integer within ±2^53",
                    found: cell.to_string(),
                });
            }
            Cell::Float(_) => kind = ValueKind::Float,
            _ => {}
        }
    }
    Ok(kind)
}

/// Lists up to [`MAX_REPORTED_MISSING`] horizons of `min..=max` absent from
/// `present`.
fn missing_horizons(present: &BTreeMap<i64, Vec<usize>>, min: i64, max: i64) -> Vec<i64> {
    let mut missing = Vec::new();
    let mut expected = Some(min);
    for &h in present.keys() {
        while let Some(e) = expected.filter(|e| *e < h) {
            if missing.len() == MAX_REPORTED_MISSING {
                return missing;
            }
            missing.push(e);
            expected = e.checked_add(1);
        }
        expected = h.checked_add(1);
    }
    while let Some(e) = expected.filter(|e| *e <= max) {
        if missing.len() == MAX_REPORTED_MISSING {
            break;
        }
        missing.push(e);
        expected = e.checked_add(1);
    }
    missing
}

/// Unpivots a wide table back to long form.
///
/// Columns follow the original long column order. Rows are emitted
/// horizon-major: all wide rows for the first horizon, then all for the
/// second, and so on.
#[must_use]
pub fn unpivot(wide: &WideTable) -> Table {
    enum Source {
        Meta(usize),
        Horizon,
        Value,
    }

    let layout = wide.layout();
    let mut meta = 0;
    let sources = wide
        .long_columns()
        .iter()
        .map(|c| {
            if *c == layout.horizon_col {
                Source::Horizon
            } else if *c == layout.value_col {
                Source::Value
            } else {
                meta += 1;
                Source::Meta(meta - 1)
            }
        })
        .collect::<Vec<_>>();

    let rows = wide
        .horizons()
        .iter()
        .enumerate()
        .flat_map(|(hi, &h)| wide.rows().iter().map(move |row| (hi, h, row)))
        .map(|(hi, h, row)| {
            sources
                .iter()
                .map(|source| match source {
                    Source::Meta(i) => row.meta[*i].clone(),
                    Source::Horizon => Cell::Int(h),
                    Source::Value => wide.value_kind().cell(row.values[hi]),
                })
                .collect()
        })
        .collect::<Vec<Vec<Cell>>>();

    Table::from_parts(wide.long_columns().to_vec(), rows)
}
