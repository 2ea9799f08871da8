use std::path::PathBuf;

use schaake_metrics::marginal_pit;

use crate::{
    config::ScoreConfig,
    util::{print_score_summary, read_json_file, read_table_file, write_json},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MarginalPitArg {
    /// Wide model output, one row per sample (JSON array of records)
    #[arg(long)]
    model: PathBuf,
    /// Wide observations, one row per unit (JSON array of records)
    #[arg(long)]
    observations: PathBuf,
    /// Score configuration file (JSON)
    #[arg(long)]
    config: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MarginalPitArg) -> anyhow::Result<()> {
    let MarginalPitArg {
        model,
        observations,
        config,
        output,
    } = arg;
    let config: ScoreConfig = read_json_file("score config", config)?;
    let model = read_table_file("model", model, &config.date_columns)?;
    let observations = read_table_file("observations", observations, &config.date_columns)?;

    let pit = marginal_pit(&model, &observations, &config.columns)?;
    eprintln!("Computed PIT values for {} units", pit.n_rows());
    for pred_col in &config.columns.pred_cols {
        let column = format!("pit_{pred_col}");
        print_score_summary(&column, pit.f64_column(&column)?);
    }
    write_json(&pit, output.as_deref())?;
    Ok(())
}
