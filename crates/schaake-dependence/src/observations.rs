use schaake_frame::{Table, UsageError};
use serde::{Deserialize, Serialize};

/// Names the columns of a historical observation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLayout {
    /// Columns identifying a unit; forecasts are grouped by the same names.
    pub key_cols: Vec<String>,
    #[serde(default = "default_time_col")]
    pub time_col: String,
    #[serde(default = "default_obs_col")]
    pub obs_col: String,
    /// Columns handed to the weighter, for training and query rows alike.
    #[serde(default = "default_feat_cols")]
    pub feat_cols: Vec<String>,
}

fn default_time_col() -> String {
    "date".to_owned()
}

fn default_obs_col() -> String {
    "value".to_owned()
}

fn default_feat_cols() -> Vec<String> {
    vec![default_time_col()]
}

impl ObservationLayout {
    #[must_use]
    pub fn new<S>(key_cols: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        Self {
            key_cols: key_cols.into_iter().map(Into::into).collect(),
            time_col: default_time_col(),
            obs_col: default_obs_col(),
            feat_cols: default_feat_cols(),
        }
    }

    #[must_use]
    pub fn with_time_col(mut self, time_col: impl Into<String>) -> Self {
        self.time_col = time_col.into();
        self
    }

    #[must_use]
    pub fn with_obs_col(mut self, obs_col: impl Into<String>) -> Self {
        self.obs_col = obs_col.into();
        self
    }

    #[must_use]
    pub fn with_feat_cols<S>(mut self, feat_cols: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.feat_cols = feat_cols.into_iter().map(Into::into).collect();
        self
    }
}

/// Historical observations of every unit, one row per unit and time.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    table: Table,
    layout: ObservationLayout,
}

impl ObservationSeries {
    /// Validates that the key, time and observation columns exist.
    ///
    /// Feature columns are not checked here: depending on the template mode
    /// they may be taken from the forecasts instead.
    pub fn new(table: Table, layout: ObservationLayout) -> Result<Self, UsageError> {
        if table.is_empty() {
            return Err(UsageError::EmptyInput {
                what: "observation table",
            });
        }
        table.column_indices(&layout.key_cols)?;
        table.column_index(&layout.time_col)?;
        table.column_index(&layout.obs_col)?;
        Ok(Self { table, layout })
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn layout(&self) -> &ObservationLayout {
        &self.layout
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.n_rows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
