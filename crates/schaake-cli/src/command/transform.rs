use std::path::PathBuf;

use anyhow::Context as _;
use schaake_dependence::{
    OutputFormat, SchaakeTemplates, ShuffleSeed, TimeDependencePostprocessor, TransformOptions,
    TransformedForecasts,
};
use tracing::debug;

use crate::{
    config::TransformConfig,
    util::{bool_column, read_json_file, read_table_file, write_json},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum FormatArg {
    Long,
    Wide,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Long => Self::Long,
            FormatArg::Wide => Self::Wide,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TransformArg {
    /// Transform configuration file (JSON)
    #[arg(long)]
    config: PathBuf,
    /// Long forecast table (JSON array of records)
    #[arg(long)]
    forecasts: PathBuf,
    /// Historical observation table (JSON array of records)
    #[arg(long)]
    observations: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Seed as 32 hex digits, overriding the configuration
    #[arg(long)]
    seed: Option<ShuffleSeed>,
    /// Output shape (long or wide), overriding the configuration
    #[arg(long)]
    format: Option<FormatArg>,
    /// Draw templates from PIT values of past forecasts
    #[arg(long)]
    pit_templates: bool,
    /// Process groups on a single thread
    #[arg(long)]
    sequential: bool,
}

pub(crate) fn run(arg: &TransformArg) -> anyhow::Result<()> {
    let TransformArg {
        config,
        forecasts,
        observations,
        output,
        seed,
        format,
        pit_templates,
        sequential,
    } = arg;
    let config: TransformConfig = read_json_file("transform config", config)?;
    debug!(?config, "loaded transform config");

    let forecasts = read_table_file("forecasts", forecasts, &config.date_columns)?;
    let observations = read_table_file("observations", observations, &config.date_columns)?;
    let mask = config
        .mask_column
        .as_deref()
        .map(|column| bool_column(&observations, column))
        .transpose()?;

    let templates = SchaakeTemplates::new(config.weighter.build()?);
    let fitted = TimeDependencePostprocessor::new(templates, config.observations)
        .fit(observations)
        .context("Failed to fit observations")?;

    let options = TransformOptions {
        columns: config.forecasts,
        mask,
        pit_templates: *pit_templates || config.pit_templates,
        output: format.map_or(config.output_format, Into::into),
        seed: seed.or(config.seed),
        parallel: !sequential,
    };
    eprintln!("Transforming {} forecast rows...", forecasts.n_rows());
    let result = fitted
        .transform(&forecasts, &options)
        .context("Failed to transform forecasts")?;
    eprintln!(
        "Shuffled {} groups using {} training instances (seed {})",
        result.n_groups, result.n_training, result.seed
    );

    let table = match result.forecasts {
        TransformedForecasts::Long(table) => table,
        TransformedForecasts::Wide(wide) => wide.to_table()?,
    };
    write_json(&table, output.as_deref())?;
    Ok(())
}
