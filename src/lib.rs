//! Greedy first-fit cutting of rectangular pieces onto fixed-size sheets.
//!
//! Pieces are expanded per unit, sorted largest area first and packed onto
//! per-cell occupancy grids, opening new sheets as needed unless a cap is set.

pub mod accounting;
pub mod api;
pub mod color;
pub mod config;
pub mod error;
pub mod render;
pub mod sheet;
pub mod solver;
pub mod types;
pub mod validation;

pub use config::{OptimizeConfig, ValidationPolicy};
pub use error::{Error, Result};
pub use solver::{Solution, Solver, optimize};
pub use types::{PieceSpec, Placement, Rect};
