/// The long table does not describe a complete ensemble.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum StructuralError {
    #[display("group [{group}] lacks horizons {missing:?} of the range {min}..={max}")]
    IncompleteHorizons {
        group: String,
        missing: Vec<i64>,
        min: i64,
        max: i64,
    },
    #[display("group [{group}] has unequal sample counts per horizon {counts:?}")]
    UnequalSampleCounts {
        group: String,
        counts: Vec<(i64, usize)>,
    },
    #[display("group [{group}]: column '{column}' differs across horizons for sample {sample}")]
    InconsistentPassthrough {
        group: String,
        column: String,
        sample: usize,
    },
}

/// The caller supplied arguments or data that cannot be processed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum UsageError {
    #[display("missing column '{column}'")]
    MissingColumn { column: String },
    #[display("column '{column}' appears more than once")]
    DuplicateColumn { column: String },
    #[display("column '{column}', row {row}: expected {expected}, found {found}")]
    InvalidCell {
        column: String,
        row: usize,
        expected: &'static str,
        found: String,
    },
    #[display("row {row} has {found} cells, but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
    #[display("{what} has no rows")]
    EmptyInput { what: &'static str },
    #[display("mask has {mask_len} entries, but the table has {n_rows} rows")]
    MaskLength { mask_len: usize, n_rows: usize },
    #[display("generated column '{column}' collides with an existing column")]
    ColumnCollision { column: String },
    #[display("horizon range {min}..={max} does not match the forecast horizons")]
    HorizonMismatch { min: i64, max: i64 },
    #[display("{pred} prediction columns cannot be paired with {obs} observation columns")]
    UnpairedColumns { pred: usize, obs: usize },
}

impl UsageError {
    pub(crate) fn missing_column(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_owned(),
        }
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum FrameError {
    #[display("structural error: {_0}")]
    Structural(StructuralError),
    #[display("usage error: {_0}")]
    Usage(UsageError),
}
