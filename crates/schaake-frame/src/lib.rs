//! Tabular data model for ensemble forecasts.
//!
//! Forecasts arrive as *long* tables with one row per unit, reference time,
//! horizon, and sample. [`pivot`] reshapes them into a [`WideTable`] with one
//! value per horizon on each row, validating that every group forms a
//! complete ensemble; [`unpivot`] reverses the reshape.
//!
//! ```
//! use schaake_frame::{Cell, LongLayout, Table, pivot, unpivot};
//!
//! let long = Table::from_rows(
//!     ["location", "ref", "horizon", "sample", "value"],
//!     vec![
//!         vec!["a".into(), 1.into(), 1.into(), 0.into(), 1.5.into()],
//!         vec!["a".into(), 1.into(), 2.into(), 0.into(), 2.5.into()],
//!     ],
//! )
//! .unwrap();
//! let layout = LongLayout {
//!     key_cols: vec!["location".into()],
//!     reference_time_col: "ref".into(),
//!     horizon_col: "horizon".into(),
//!     sample_id_col: "sample".into(),
//!     value_col: "value".into(),
//! };
//! let wide = pivot(&long, &layout).unwrap();
//! assert_eq!(wide.horizons(), [1, 2]);
//! assert_eq!(wide.rows()[0].values, [1.5, 2.5]);
//! assert_eq!(unpivot(&wide), long);
//! ```

pub use self::{
    cell::Cell,
    error::{FrameError, StructuralError, UsageError},
    group::{GroupKey, group_rows},
    layout::LongLayout,
    pivot::{pivot, unpivot},
    table::Table,
    wide::{MAX_EXACT_INT, ValueKind, WideRow, WideTable},
};

pub mod cell;
pub mod error;
pub mod group;
pub mod layout;
pub mod pivot;
pub mod table;
pub mod wide;
