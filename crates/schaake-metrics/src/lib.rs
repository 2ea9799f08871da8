//! Scores for sample-based multivariate forecasts.
//!
//! Both metrics take a *model* table with one row per sample and an
//! *observation* table with one row per observational unit. Rows are joined on
//! key columns; the `i`-th prediction column is compared with the `i`-th
//! observation column.
//!
//! - [`marginal_pit`]: per-column PIT values, for checking calibration
//! - [`energy_score()`]: the multivariate energy score, sensitive to the
//!   dependence between columns

pub use self::{
    energy::{EnergyScore, Reduce, energy_score},
    pit::marginal_pit,
    units::MetricColumns,
};

pub mod energy;
pub mod pit;
pub mod units;

#[cfg(test)]
mod fixtures;
