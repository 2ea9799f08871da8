use serde::{Deserialize, Serialize};

/// Names the columns of a long ensemble table.
///
/// A long table has one row per (key, reference time, horizon, sample). Any
/// column not named here is a passthrough column that is carried along
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongLayout {
    /// Columns identifying a unit, e.g. location and age group.
    pub key_cols: Vec<String>,
    /// The time at which a forecast was issued.
    pub reference_time_col: String,
    /// The integer horizon relative to the reference time.
    pub horizon_col: String,
    /// The sample (ensemble member) index.
    pub sample_id_col: String,
    /// The forecast value.
    pub value_col: String,
}

impl LongLayout {
    /// Key columns followed by the reference time column.
    ///
    /// Each distinct combination of these columns is one group.
    #[must_use]
    pub fn group_cols(&self) -> Vec<String> {
        self.key_cols
            .iter()
            .chain([&self.reference_time_col])
            .cloned()
            .collect()
    }
}
