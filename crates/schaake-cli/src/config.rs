use schaake_dependence::{
    EqualWeighter, ForecastColumns, ObservationLayout, OutputFormat, ShuffleSeed,
    UnivariateGaussianKernel, Weighter,
};
use schaake_metrics::MetricColumns;
use serde::{Deserialize, Serialize};

/// Settings of the `transform` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Key, time, value and feature columns of the observation table.
    pub observations: ObservationLayout,
    /// Reference time, horizon, sample id and value columns of the forecasts.
    #[serde(default)]
    pub forecasts: ForecastColumns,
    #[serde(default)]
    pub weighter: WeighterConfig,
    #[serde(default)]
    pub pit_templates: bool,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub seed: Option<ShuffleSeed>,
    /// Boolean observation column selecting training instances.
    #[serde(default)]
    pub mask_column: Option<String>,
    /// Columns holding ISO 8601 dates, in either table.
    #[serde(default)]
    pub date_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeighterConfig {
    #[default]
    Equal,
    Gaussian {
        bandwidth: f64,
    },
}

impl WeighterConfig {
    pub fn build(self) -> anyhow::Result<Box<dyn Weighter>> {
        Ok(match self {
            Self::Equal => Box::new(EqualWeighter),
            Self::Gaussian { bandwidth } => Box::new(UnivariateGaussianKernel::new(bandwidth)?),
        })
    }
}

/// Settings of the scoring commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    #[serde(flatten)]
    pub columns: MetricColumns,
    #[serde(default)]
    pub date_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_transform_config() {
        let config: TransformConfig =
            serde_json::from_str(r#"{ "observations": { "key_cols": ["location"] } }"#).unwrap();
        assert_eq!(config.observations, ObservationLayout::new(["location"]));
        assert_eq!(config.forecasts, ForecastColumns::default());
        assert_eq!(config.weighter, WeighterConfig::Equal);
        assert_eq!(config.output_format, OutputFormat::Long);
        assert_eq!(config.seed, None);
        assert!(!config.pit_templates);
    }

    #[test]
    fn test_full_transform_config() {
        let config: TransformConfig = serde_json::from_str(
            r#"{
                "observations": {
                    "key_cols": ["location", "age_group"],
                    "time_col": "wk_end_date",
                    "obs_col": "inc",
                    "feat_cols": ["season_week"]
                },
                "forecasts": {
                    "reference_time_col": "origin_date",
                    "horizon_col": "h",
                    "sample_id_col": "sample",
                    "value_col": "inc"
                },
                "weighter": { "kind": "gaussian", "bandwidth": 4.0 },
                "pit_templates": true,
                "output_format": "wide",
                "seed": "000000000000000000000000000000ff",
                "mask_column": "in_season",
                "date_columns": ["wk_end_date", "origin_date"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.observations.time_col, "wk_end_date");
        assert_eq!(config.forecasts.horizon_col, "h");
        assert_eq!(config.weighter, WeighterConfig::Gaussian { bandwidth: 4.0 });
        assert_eq!(config.output_format, OutputFormat::Wide);
        assert_eq!(config.seed, Some(ShuffleSeed::from_u128(255)));
        assert_eq!(config.mask_column.as_deref(), Some("in_season"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<TransformConfig>(
            r#"{ "observations": { "key_cols": [] }, "weigher": { "kind": "equal" } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_bandwidth() {
        assert!(WeighterConfig::Gaussian { bandwidth: 0.0 }.build().is_err());
        assert!(WeighterConfig::Equal.build().is_ok());
    }

    #[test]
    fn test_score_config() {
        let config: ScoreConfig = serde_json::from_str(
            r#"{
                "key_cols": ["location", "date"],
                "pred_cols": ["horizon1"],
                "obs_cols": ["value_lead1"],
                "date_columns": ["date"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.columns.pred_cols, ["horizon1"]);
        assert_eq!(config.date_columns, ["date"]);
    }
}
