//! Aggregation of per-test quantities into the global parameter set.
//!
//! Reduction rules:
//!
//! - `Rf`: mean over tests where it is defined; undefined values are
//!   *excluded*, never zero-filled. An empty collection is an error.
//! - `psi`: plain mean over all tests. Tests with no dilatant phase carry
//!   `psi = 0` and *do* enter the mean. This asymmetry with `Rf` is
//!   deliberate and matches the agreed soil-mechanics semantics; see
//!   DESIGN.md before "fixing" it.
//! - `E50_ref`: the fitted value from the stiffness law feeds the forward
//!   model; the mean of the experimental moduli is kept as a diagnostic.
//! - fixed constants: `v_ur = 0.2`, derived scalings `Eoed_ref = E50_ref`,
//!   `Eur_ref = 3 * E50_ref`, and `K0_nc = 1 - sin(phi)`.

use crate::domain::{CalibrationConfig, DerivedTestQuantities, GlobalParameters, StiffnessFit, StrengthParams};
use crate::fit::FitError;
use crate::math::mean;

/// Assemble the immutable `GlobalParameters` record.
///
/// All prerequisite estimators must have succeeded; this function only fails
/// if a reduction collects no defined values.
pub fn aggregate(
    strength: &StrengthParams,
    derived: &[DerivedTestQuantities],
    stiffness: &StiffnessFit,
    p_ref: f64,
) -> Result<GlobalParameters, FitError> {
    let e50_experimental: Vec<f64> = derived.iter().map(|d| d.e50_experimental).collect();
    let e50_mean_experimental = mean(&e50_experimental).ok_or(FitError::NoDefinedValues {
        quantity: "experimental E50",
    })?;

    let psi_values: Vec<f64> = derived.iter().map(|d| d.psi_deg).collect();
    let psi = mean(&psi_values).ok_or(FitError::NoDefinedValues { quantity: "psi" })?;

    let rf_values: Vec<f64> = derived.iter().filter_map(|d| d.rf).collect();
    let rf = mean(&rf_values).ok_or(FitError::NoDefinedValues { quantity: "Rf" })?;

    let e50_ref = stiffness.e50_ref;

    Ok(GlobalParameters {
        phi: strength.phi_deg,
        c: strength.cohesion,
        e50_ref,
        eur_ref: 3.0 * e50_ref,
        eoed_ref: e50_ref,
        m: stiffness.m,
        psi,
        v_ur: CalibrationConfig::V_UR,
        p_ref,
        k0_nc: 1.0 - strength.phi_rad().sin(),
        rf,
        e50_mean_experimental,
    })
}
