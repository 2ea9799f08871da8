use schaake_frame::{FrameError, StructuralError, UsageError};

/// A weighter could not produce valid training weights.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum WeightError {
    #[display("training set is empty")]
    EmptyTrainingSet,
    #[display("bandwidth must be finite and positive, got {bandwidth}")]
    InvalidBandwidth { bandwidth: f64 },
    #[display("expected exactly one feature column, got {found}")]
    FeatureCount { found: usize },
    #[display("feature column '{column}', row {row}: expected a number")]
    NonNumericFeature { column: String, row: usize },
    #[display("all weights of query row {row} are zero")]
    Degenerate { row: usize },
    #[display("weights have shape {found:?}, expected {expected:?}")]
    Shape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[display("weights of query row {row} {reason}")]
    Contract { row: usize, reason: &'static str },
    #[display("cannot sample a training row: {_0}")]
    Sampling(rand::distr::weighted::Error),
}

/// Failure of a dependence transform.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum DependenceError {
    #[display("{_0}")]
    Frame(FrameError),
    #[display("weighting failed: {_0}")]
    Weight(WeightError),
    #[display("templates of group [{group}] have shape {found:?}, expected {expected:?}")]
    TemplateShape {
        group: String,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl From<FrameError> for DependenceError {
    fn from(err: FrameError) -> Self {
        Self::Frame(err)
    }
}

impl From<UsageError> for DependenceError {
    fn from(err: UsageError) -> Self {
        Self::Frame(err.into())
    }
}

impl From<StructuralError> for DependenceError {
    fn from(err: StructuralError) -> Self {
        Self::Frame(err.into())
    }
}

impl From<WeightError> for DependenceError {
    fn from(err: WeightError) -> Self {
        Self::Weight(err)
    }
}
