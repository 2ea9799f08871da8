//! Numeric kernels for dependence reconstruction.
//!
//! This crate holds the pure, table-agnostic pieces of the workspace:
//!
//! - **Matrices**: a small row-major `f64` matrix used for sample blocks,
//!   dependence templates, and weight matrices
//! - **Rank shuffling**: random-tiebreak argsort and the Schaake rank shuffle
//! - **PIT**: empirical fraction of samples at or below an observation
//! - **Energy score**: the multivariate sample-based proper scoring rule
//! - **Descriptive statistics**: summaries of score collections
//!
//! # Modules
//!
//! - [`matrix`]: Row-major matrix storage
//! - [`rank`]: Rank-matching shuffle with reproducible tie-breaking
//! - [`pit`]: Probability integral transform of a sample set
//! - [`energy`]: Energy score for one observational unit
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Imposing a template's rank order on samples
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use schaake_stats::{matrix::Matrix, rank};
//!
//! let samples = Matrix::from_rows(&[[3.0, 30.0], [1.0, 10.0], [2.0, 20.0]]);
//! let templates = Matrix::from_rows(&[[0.1, 9.0], [0.3, 7.0], [0.2, 8.0]]);
//! let mut rng = Pcg32::seed_from_u64(42);
//!
//! let shuffled = rank::rank_shuffle(&samples, &templates, &mut rng);
//! assert_eq!(shuffled.column(0).collect::<Vec<_>>(), [1.0, 3.0, 2.0]);
//! assert_eq!(shuffled.column(1).collect::<Vec<_>>(), [30.0, 10.0, 20.0]);
//! ```
//!
//! ## Computing a PIT value
//!
//! ```
//! use schaake_stats::pit;
//!
//! let samples = [1.0, 2.0, 3.0, 4.0];
//! assert_eq!(pit::fraction_at_or_below(&samples, 2.0), 0.5);
//! ```

pub mod descriptive;
pub mod energy;
pub mod matrix;
pub mod pit;
pub mod rank;
