use clap::{Parser, Subcommand};

use self::{
    energy_score::EnergyScoreArg, marginal_pit::MarginalPitArg, transform::TransformArg,
};

mod energy_score;
mod marginal_pit;
mod transform;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Reorder forecast samples to follow historical dependence templates
    Transform(#[clap(flatten)] TransformArg),
    /// Score multivariate forecasts against observations
    EnergyScore(#[clap(flatten)] EnergyScoreArg),
    /// Compute per-column PIT values of forecasts
    MarginalPit(#[clap(flatten)] MarginalPitArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Transform(arg) => transform::run(&arg)?,
        Mode::EnergyScore(arg) => energy_score::run(&arg)?,
        Mode::MarginalPit(arg) => marginal_pit::run(&arg)?,
    }
    Ok(())
}
