//! Stiffness-law estimation (stress exponent m + reference modulus).
//!
//! The Hardening Soil stiffness law
//!
//! ```text
//! E50(sigma_3) = E50_ref * [(c cos(phi) + sigma_3 sin(phi)) / (c cos(phi) + p_ref sin(phi))]^m
//! ```
//!
//! linearizes under logs: `ln E50 = m * ln(ratio) + ln(E50_ref)`, so an OLS
//! line over the per-test experimental moduli yields `m` from the slope and
//! a back-calculated `E50_ref` from the intercept.

use crate::domain::{StiffnessFit, StrengthParams};
use crate::fit::FitError;
use crate::math::fit_line;
use crate::models::stiffness_stress_ratio;

/// Fit `(m, E50_ref)` from per-test experimental secant moduli.
///
/// Needs at least 2 tests with distinct confining pressures; identical
/// pressures leave the regressor without variation.
pub fn fit_stiffness(
    confining_pressures: &[f64],
    e50_values: &[f64],
    strength: &StrengthParams,
    p_ref: f64,
) -> Result<StiffnessFit, FitError> {
    let n = confining_pressures.len();
    if n < 2 || e50_values.len() != n {
        return Err(FitError::InsufficientTests {
            stage: "stiffness fit",
            needed: 2,
            got: n.min(e50_values.len()),
        });
    }

    let mut log_ratio = Vec::with_capacity(n);
    let mut log_e50 = Vec::with_capacity(n);
    for (&sigma_3, &e50) in confining_pressures.iter().zip(e50_values.iter()) {
        let ratio = stiffness_stress_ratio(sigma_3, strength, p_ref);
        if ratio <= 0.0 || !ratio.is_finite() {
            return Err(FitError::NonPositiveLogArgument {
                sigma_3,
                value: ratio,
            });
        }
        if e50 <= 0.0 || !e50.is_finite() {
            return Err(FitError::NonPositiveLogArgument {
                sigma_3,
                value: e50,
            });
        }
        log_ratio.push(ratio.ln());
        log_e50.push(e50.ln());
    }

    let line = fit_line(&log_ratio, &log_e50).ok_or(FitError::DegenerateRegression {
        stage: "stiffness fit",
    })?;

    Ok(StiffnessFit {
        m: line.slope,
        e50_ref: line.intercept.exp(),
    })
}
