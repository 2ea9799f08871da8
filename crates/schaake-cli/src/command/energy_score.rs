use std::path::PathBuf;

use schaake_metrics::{EnergyScore, Reduce, energy_score};

use crate::{
    config::ScoreConfig,
    util::{print_score_summary, read_json_file, read_table_file, write_json},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EnergyScoreArg {
    /// Wide model output, one row per sample (JSON array of records)
    #[arg(long)]
    model: PathBuf,
    /// Wide observations, one row per unit (JSON array of records)
    #[arg(long)]
    observations: PathBuf,
    /// Score configuration file (JSON)
    #[arg(long)]
    config: PathBuf,
    /// Report one score per unit instead of the mean
    #[arg(long)]
    per_unit: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EnergyScoreArg) -> anyhow::Result<()> {
    let EnergyScoreArg {
        model,
        observations,
        config,
        per_unit,
        output,
    } = arg;
    let config: ScoreConfig = read_json_file("score config", config)?;
    let model = read_table_file("model", model, &config.date_columns)?;
    let observations = read_table_file("observations", observations, &config.date_columns)?;

    let reduce = if *per_unit {
        Reduce::PerUnit
    } else {
        Reduce::Mean
    };
    match energy_score(&model, &observations, &config.columns, reduce)? {
        EnergyScore::Mean(score) => {
            match score {
                Some(score) => eprintln!("Mean energy score: {score:.6}"),
                None => eprintln!("No unit has a defined energy score"),
            }
            write_json(&score, output.as_deref())?;
        }
        EnergyScore::PerUnit(table) => {
            print_score_summary("energy_score", table.f64_column("energy_score")?);
            write_json(&table, output.as_deref())?;
        }
    }
    Ok(())
}
