//! Hardening Soil forward model.
//!
//! Models are implemented as small, pure functions so that fitting and
//! reporting code can stay generic.

pub mod hyperbolic;

pub use hyperbolic::*;
