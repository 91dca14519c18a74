//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - modeled-curve exports (CSV) (`export`)
//! - parameter JSON read/write (`params`)

pub mod export;
pub mod ingest;
pub mod params;

pub use export::*;
pub use ingest::*;
pub use params::*;
