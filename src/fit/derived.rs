//! Per-test derived quantities.
//!
//! Once the strength parameters exist, each test yields:
//!
//! - `qf`: Mohr-Coulomb failure deviator stress at its confining pressure
//! - `E50`: experimental secant modulus at 50% of peak stress
//! - `qa`: hyperbolic asymptote from the transform linearization
//! - `Rf = qf/qa` (undefined when qa is zero)
//! - `psi`: dilatancy angle from the dilatant phase of the volumetric curve
//!
//! Tests are mutually independent given the strength parameters, so the
//! pipeline computes these in parallel.

use crate::domain::{DerivedTestQuantities, StrengthParams, TestSeries};
use crate::fit::FitError;
use crate::math::{fit_line, mean};
use crate::models::failure_stress;

/// Fraction of the truncated peak below which points are discarded from the
/// hyperbolic-transform regression (near-zero stresses make eps/q blow up).
const QA_LOW_STRESS_CUTOFF: f64 = 0.1;

/// Compute all derived quantities for one test.
pub fn derive_test(
    series: &TestSeries,
    strength: &StrengthParams,
) -> Result<DerivedTestQuantities, FitError> {
    let sigma_3 = series.confining_pressure;

    let qf = failure_stress(sigma_3, strength);
    let e50_experimental = secant_modulus_experimental(series)?;
    let qa = asymptotic_stress(series)?;
    let rf = if qa != 0.0 { Some(qf / qa) } else { None };
    let psi_deg = dilatancy_angle(&series.strain, &series.volumetric_strain)?;

    Ok(DerivedTestQuantities {
        qf,
        e50_experimental,
        qa,
        rf,
        psi_deg,
    })
}

/// Experimental secant modulus: stress/strain at the sample nearest to 50%
/// of the series' peak stress.
pub fn secant_modulus_experimental(series: &TestSeries) -> Result<f64, FitError> {
    let target = 0.5 * series.peak_stress();

    let mut idx = 0;
    let mut best = f64::INFINITY;
    for (i, &q) in series.stress.iter().enumerate() {
        let dist = (q - target).abs();
        if dist < best {
            best = dist;
            idx = i;
        }
    }

    let eps = series.strain[idx];
    if eps == 0.0 {
        return Err(FitError::ZeroStrainAtHalfPeak {
            sigma_3: series.confining_pressure,
        });
    }
    Ok(series.stress[idx] / eps)
}

/// Hyperbolic asymptotic stress via transform linearization.
///
/// Only the pre-peak branch is hyperbolic, so the series is truncated at the
/// stress maximum before regressing `eps/q` against `eps`; the asymptote is
/// the inverse of the fitted slope.
pub fn asymptotic_stress(series: &TestSeries) -> Result<f64, FitError> {
    let sigma_3 = series.confining_pressure;

    let peak_idx = argmax(&series.stress);
    let strain = &series.strain[..=peak_idx];
    let stress = &series.stress[..=peak_idx];

    let truncated_max = stress.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let cutoff = truncated_max * QA_LOW_STRESS_CUTOFF;

    let mut eps = Vec::with_capacity(strain.len());
    let mut ratio = Vec::with_capacity(strain.len());
    for (&e, &q) in strain.iter().zip(stress.iter()) {
        if q > cutoff {
            eps.push(e);
            ratio.push(e / q);
        }
    }

    let line = fit_line(&eps, &ratio).ok_or(FitError::DegenerateRegression {
        stage: "hyperbolic transform",
    })?;

    if line.slope <= 0.0 {
        return Err(FitError::NonPhysicalSlope {
            sigma_3,
            slope: line.slope,
        });
    }

    let qa = 1.0 / line.slope;

    // The peak is only approached asymptotically, so a physically consistent
    // qa must exceed every observed stress.
    let peak = series.peak_stress();
    if qa < peak {
        return Err(FitError::AsymptoteBelowPeak { sigma_3, qa, peak });
    }

    Ok(qa)
}

/// Dilatancy angle from the dilatant phase (volumetric strain < 0).
///
/// A test that never dilates has `psi = 0` exactly. A test whose dilatant
/// phase is a single sample carries no rate information and is also treated
/// as non-dilatant.
pub fn dilatancy_angle(axial_strain: &[f64], volumetric_strain: &[f64]) -> Result<f64, FitError> {
    let mut axial = Vec::new();
    let mut vol = Vec::new();
    for (&e1, &ev) in axial_strain.iter().zip(volumetric_strain.iter()) {
        if ev < 0.0 {
            axial.push(e1);
            vol.push(ev);
        }
    }
    if vol.len() < 2 {
        return Ok(0.0);
    }

    let mut rates = Vec::with_capacity(vol.len() - 1);
    for i in 1..vol.len() {
        rates.push((vol[i] - vol[i - 1]) / (axial[i] - axial[i - 1]));
    }

    // `rates` is non-empty here, so `mean` cannot fail.
    let a = -mean(&rates).unwrap_or(0.0);
    let sin_psi = a / (2.0 + a);
    if !(-1.0..=1.0).contains(&sin_psi) || !sin_psi.is_finite() {
        return Err(FitError::ArcsineDomain {
            stage: "dilatancy fit",
            value: sin_psi,
        });
    }

    Ok(sin_psi.asin().to_degrees())
}

fn argmax(values: &[f64]) -> usize {
    let mut idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            idx = i;
        }
    }
    idx
}
