//! Reporting utilities: run summary and parameter table formatting.

pub mod format;

pub use format::*;
