//! Calibration estimators.
//!
//! The pipeline runs these in a fixed order:
//!
//! - `strength`: peak stress vs confinement -> friction angle + cohesion
//! - `derived`: per-test quantities (qf, E50, qa, Rf, psi), needs strength
//! - `stiffness`: E50 power law across confinements -> m + E50_ref
//! - `aggregate`: reduce everything into one `GlobalParameters` record
//!
//! Failures carry their cause as a named `FitError` variant rather than a
//! bare message, so callers can distinguish ill-conditioned inputs from fits
//! that contradict the physical model.

pub mod aggregate;
pub mod derived;
pub mod stiffness;
pub mod strength;

pub use aggregate::*;
pub use derived::*;
pub use stiffness::*;
pub use strength::*;

use crate::error::AppError;

/// A named fit failure.
///
/// Three families, mapped to distinct exit codes:
///
/// - input shape (exit 3): not enough tests, degenerate series
/// - numeric domain (exit 4): arcsine out of range, non-positive log argument,
///   regression with no usable variation
/// - physical validity (exit 5): the fit succeeded numerically but contradicts
///   the hyperbolic model (non-positive transform slope, asymptote below the
///   observed peak)
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Too few tests for the named estimator.
    InsufficientTests {
        stage: &'static str,
        needed: usize,
        got: usize,
    },
    /// The regression for the named estimator has no usable variation.
    DegenerateRegression { stage: &'static str },
    /// `asin` argument outside [-1, 1] in the named estimator.
    ArcsineDomain { stage: &'static str, value: f64 },
    /// Non-positive argument to `ln` in the stiffness-law linearization.
    NonPositiveLogArgument { sigma_3: f64, value: f64 },
    /// The strain at the 50%-of-peak sample is zero (degenerate series).
    ZeroStrainAtHalfPeak { sigma_3: f64 },
    /// Hyperbolic-transform regression slope is zero or negative.
    NonPhysicalSlope { sigma_3: f64, slope: f64 },
    /// Fitted asymptote sits below the observed peak stress.
    AsymptoteBelowPeak { sigma_3: f64, qa: f64, peak: f64 },
    /// An aggregation collected no defined values to average.
    NoDefinedValues { quantity: &'static str },
}

impl FitError {
    /// Exit code family for this failure (see `error` module conventions).
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InsufficientTests { .. } | FitError::ZeroStrainAtHalfPeak { .. } => 3,
            FitError::DegenerateRegression { .. }
            | FitError::ArcsineDomain { .. }
            | FitError::NonPositiveLogArgument { .. }
            | FitError::NoDefinedValues { .. } => 4,
            FitError::NonPhysicalSlope { .. } | FitError::AsymptoteBelowPeak { .. } => 5,
        }
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientTests { stage, needed, got } => {
                write!(f, "{stage}: need at least {needed} tests, got {got}")
            }
            FitError::DegenerateRegression { stage } => {
                write!(f, "{stage}: regression is degenerate (no variation in the regressor)")
            }
            FitError::ArcsineDomain { stage, value } => {
                write!(f, "{stage}: arcsine argument {value:.6} outside [-1, 1]")
            }
            FitError::NonPositiveLogArgument { sigma_3, value } => {
                write!(
                    f,
                    "stiffness law: non-positive log argument {value:.6} at sigma_3={sigma_3} kPa"
                )
            }
            FitError::ZeroStrainAtHalfPeak { sigma_3 } => {
                write!(
                    f,
                    "secant modulus: zero strain at the 50%-of-peak sample (sigma_3={sigma_3} kPa)"
                )
            }
            FitError::NonPhysicalSlope { sigma_3, slope } => {
                write!(
                    f,
                    "hyperbolic transform: non-physical slope {slope:.6} (sigma_3={sigma_3} kPa)"
                )
            }
            FitError::AsymptoteBelowPeak { sigma_3, qa, peak } => {
                write!(
                    f,
                    "asymptotic stress qa={qa:.2} is below the observed peak {peak:.2} (sigma_3={sigma_3} kPa)"
                )
            }
            FitError::NoDefinedValues { quantity } => {
                write!(f, "aggregation: no defined {quantity} values to average")
            }
        }
    }
}

impl std::error::Error for FitError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
