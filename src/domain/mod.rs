//! Domain types used throughout the calibration pipeline.
//!
//! This module defines:
//!
//! - the raw per-test observation record (`TestSeries`)
//! - staged fit outputs (`StrengthParams`, `DerivedTestQuantities`, `StiffnessFit`)
//! - the final parameter set (`GlobalParameters`) and modeled curves
//! - run configuration (`CalibrationConfig`)

pub mod types;

pub use types::*;
