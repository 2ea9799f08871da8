use schaake_stats::matrix::Matrix;

use crate::{
    cell::Cell,
    error::UsageError,
    group::{GroupKey, group_rows},
    layout::LongLayout,
    table::Table,
};

/// Largest integer magnitude that survives a round trip through `f64`.
pub const MAX_EXACT_INT: i64 = 1 << 53;

/// Cell type of the long value column, restored when values leave the wide
/// table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum ValueKind {
    /// Every value cell was an `Int`.
    Int,
    /// At least one value cell was a `Float`.
    #[default]
    Float,
}

impl ValueKind {
    /// Renders a wide value as a cell of this kind.
    ///
    /// Values of an `Int` table are permutations of integers within
    /// [`MAX_EXACT_INT`], so the conversion is exact.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn cell(self, value: f64) -> Cell {
        match self {
            Self::Int => Cell::Int(value as i64),
            Self::Float => Cell::Float(value),
        }
    }
}

/// One sample of one group, with a value per horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    /// Cells of the meta columns (keys, reference time, sample id, passthrough).
    pub meta: Vec<Cell>,
    /// One value per horizon, ordered like [`WideTable::horizons`].
    pub values: Vec<f64>,
}

/// An ensemble forecast in wide form: one row per sample and group, one value
/// per horizon.
///
/// Produced by [`pivot`](crate::pivot::pivot). The table remembers the
/// column order of the long table it came from, so that
/// [`unpivot`](crate::pivot::unpivot) restores it.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    layout: LongLayout,
    long_columns: Vec<String>,
    meta_columns: Vec<String>,
    horizons: Vec<i64>,
    value_kind: ValueKind,
    rows: Vec<WideRow>,
}

impl WideTable {
    pub(crate) fn new(
        layout: LongLayout,
        long_columns: Vec<String>,
        horizons: Vec<i64>,
        value_kind: ValueKind,
        rows: Vec<WideRow>,
    ) -> Self {
        let meta_columns = long_columns
            .iter()
            .filter(|c| **c != layout.horizon_col && **c != layout.value_col)
            .cloned()
            .collect();
        Self {
            layout,
            long_columns,
            meta_columns,
            horizons,
            value_kind,
            rows,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &LongLayout {
        &self.layout
    }

    /// Columns of the long table this was pivoted from.
    #[must_use]
    pub fn long_columns(&self) -> &[String] {
        &self.long_columns
    }

    /// The long columns except the horizon and value columns, in long order.
    #[must_use]
    pub fn meta_columns(&self) -> &[String] {
        &self.meta_columns
    }

    /// The contiguous, ascending horizon range.
    #[must_use]
    pub fn horizons(&self) -> &[i64] {
        &self.horizons
    }

    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    #[must_use]
    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn meta_index(&self, name: &str) -> Result<usize, UsageError> {
        self.meta_columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| UsageError::missing_column(name))
    }

    /// Positions of the group columns (keys, then reference time) in the meta
    /// cells.
    pub fn group_indices(&self) -> Result<Vec<usize>, UsageError> {
        self.layout
            .group_cols()
            .iter()
            .map(|c| self.meta_index(c))
            .collect()
    }

    /// Partitions the rows into groups, in order of first appearance.
    pub fn groups(&self) -> Result<Vec<(GroupKey, Vec<usize>)>, UsageError> {
        let indices = self.group_indices()?;
        Ok(group_rows(self.rows.iter().map(|r| r.meta.as_slice()), &indices))
    }

    /// Collects the values of the given rows into a sample matrix
    /// (rows = samples, columns = horizons).
    #[must_use]
    pub fn values(&self, rows: &[usize]) -> Matrix {
        Matrix::from_fn(rows.len(), self.horizons.len(), |r, c| {
            self.rows[rows[r]].values[c]
        })
    }

    /// A table with the same schema but different rows.
    #[must_use]
    pub fn with_rows(&self, rows: Vec<WideRow>) -> Self {
        debug_assert!(rows.iter().all(|r| {
            r.meta.len() == self.meta_columns.len() && r.values.len() == self.horizons.len()
        }));
        Self {
            layout: self.layout.clone(),
            long_columns: self.long_columns.clone(),
            meta_columns: self.meta_columns.clone(),
            horizons: self.horizons.clone(),
            value_kind: self.value_kind,
            rows,
        }
    }

    /// Name of the output column holding horizon `h`.
    #[must_use]
    pub fn horizon_column_name(&self, h: i64) -> String {
        format!("{}{h}", self.layout.horizon_col)
    }

    /// Flattens the wide table: meta columns followed by one
    /// `{horizon_col}{h}` column per horizon.
    pub fn to_table(&self) -> Result<Table, UsageError> {
        let mut columns = self.meta_columns.clone();
        for &h in &self.horizons {
            let name = self.horizon_column_name(h);
            if columns.contains(&name) {
                return Err(UsageError::ColumnCollision { column: name });
            }
            columns.push(name);
        }
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.meta
                    .iter()
                    .cloned()
                    .chain(row.values.iter().map(|&v| self.value_kind.cell(v)))
                    .collect()
            })
            .collect();
        Table::from_rows(columns, rows)
    }
}
