//! Strength-parameter estimation (friction angle + cohesion).
//!
//! Peak deviator stresses across confining pressures lie on the
//! Mohr-Coulomb envelope:
//!
//! ```text
//! q_peak = M * sigma_3 + B
//! sin(phi) = M / (2 + M)
//! c = B * (1 - sin(phi)) / (2 * cos(phi))
//! ```
//!
//! so one straight-line fit yields both parameters.

use crate::domain::StrengthParams;
use crate::fit::FitError;
use crate::math::fit_line;

/// Fit `(phi, c)` from parallel (sigma_3, peak stress) pairs.
///
/// Two pairs are the hard minimum; three or more are needed for the fit to
/// mean anything statistically, but that is the caller's call.
pub fn fit_strength(
    confining_pressures: &[f64],
    peak_stresses: &[f64],
) -> Result<StrengthParams, FitError> {
    let n = confining_pressures.len();
    if n < 2 || peak_stresses.len() != n {
        return Err(FitError::InsufficientTests {
            stage: "strength fit",
            needed: 2,
            got: n.min(peak_stresses.len()),
        });
    }

    let line = fit_line(confining_pressures, peak_stresses).ok_or(FitError::DegenerateRegression {
        stage: "strength fit",
    })?;

    let sin_phi = line.slope / (2.0 + line.slope);
    if !(-1.0..=1.0).contains(&sin_phi) || !sin_phi.is_finite() {
        return Err(FitError::ArcsineDomain {
            stage: "strength fit",
            value: sin_phi,
        });
    }

    let phi_rad = sin_phi.asin();
    let cohesion = line.intercept * (1.0 - sin_phi) / (2.0 * phi_rad.cos());

    Ok(StrengthParams {
        phi_deg: phi_rad.to_degrees(),
        cohesion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_known_envelope_exactly() {
        // sigma_3={100,300}, peaks={300,700}: slope=2, intercept=100,
        // sin(phi)=0.5 -> phi=30deg, c=100*0.5/(2*cos(30deg))~=28.87 kPa.
        let strength = fit_strength(&[100.0, 300.0], &[300.0, 700.0]).unwrap();
        assert!((strength.phi_deg - 30.0).abs() < 1e-9);
        assert!((strength.cohesion - 28.867_513_459_481_29).abs() < 1e-6);
    }

    #[test]
    fn recovers_synthetic_envelope_from_three_tests() {
        // Generate peaks exactly from phi=35deg, c=10 kPa and check recovery.
        let phi: f64 = 35_f64.to_radians();
        let c = 10.0;
        let slope = 2.0 * phi.sin() / (1.0 - phi.sin());
        let intercept = 2.0 * c * phi.cos() / (1.0 - phi.sin());

        let pressures = [50.0, 100.0, 200.0, 400.0];
        let peaks: Vec<f64> = pressures.iter().map(|p| slope * p + intercept).collect();

        let strength = fit_strength(&pressures, &peaks).unwrap();
        assert!((strength.phi_deg - 35.0).abs() < 1e-6);
        assert!((strength.cohesion - 10.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_single_test() {
        let err = fit_strength(&[100.0], &[300.0]).unwrap_err();
        assert!(matches!(err, FitError::InsufficientTests { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejects_collinear_pressures() {
        let err = fit_strength(&[100.0, 100.0, 100.0], &[300.0, 320.0, 310.0]).unwrap_err();
        assert!(matches!(err, FitError::DegenerateRegression { .. }));
    }

    #[test]
    fn rejects_arcsine_domain_violation() {
        // A steeply *decreasing* envelope gives slope < -1, pushing
        // sin(phi) = M/(2+M) below -1. Must surface, not clamp.
        let err = fit_strength(&[100.0, 200.0, 300.0], &[900.0, 600.0, 300.0]).unwrap_err();
        assert!(matches!(err, FitError::ArcsineDomain { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
