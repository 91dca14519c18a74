//! Mathematical utilities: least-squares primitives.

pub mod ols;

pub use ols::*;
