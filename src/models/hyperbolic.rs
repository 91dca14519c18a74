//! Hyperbolic stress-strain forward model.
//!
//! The fitted parameter set regenerates a deviator stress curve for any
//! confining pressure via three closed-form pieces:
//!
//! - Mohr-Coulomb failure stress `qf`
//! - the stress-dependent secant modulus `E50` (power law)
//! - the hyperbola `sigma_d(eps) = qa / (1 + qa / (2 E50 eps))`
//!
//! All functions take angles in degrees and convert to radians internally.

use crate::domain::{GlobalParameters, ModeledCurve, StrengthParams};

/// Strain floor used in place of 0 so the hyperbola is defined at the origin.
const STRAIN_FLOOR: f64 = 1e-10;

/// Mohr-Coulomb failure deviator stress for a given confining pressure.
///
/// `qf = 2 sin(phi) (sigma_3 + c / tan(phi)) / (1 - sin(phi))`
pub fn failure_stress(sigma_3: f64, strength: &StrengthParams) -> f64 {
    let phi = strength.phi_rad();
    2.0 * phi.sin() * (sigma_3 + strength.cohesion / phi.tan()) / (1.0 - phi.sin())
}

/// Ratio driving the stiffness power law:
/// `(c cos(phi) + sigma_3 sin(phi)) / (c cos(phi) + p_ref sin(phi))`.
pub fn stiffness_stress_ratio(sigma_3: f64, strength: &StrengthParams, p_ref: f64) -> f64 {
    let phi = strength.phi_rad();
    let numerator = strength.cohesion * phi.cos() + sigma_3 * phi.sin();
    let denominator = strength.cohesion * phi.cos() + p_ref * phi.sin();
    numerator / denominator
}

/// Secant modulus at a given confining pressure:
/// `E50 = E50_ref * ratio^m`.
pub fn secant_modulus(
    sigma_3: f64,
    e50_ref: f64,
    strength: &StrengthParams,
    m: f64,
    p_ref: f64,
) -> f64 {
    e50_ref * stiffness_stress_ratio(sigma_3, strength, p_ref).powf(m)
}

/// Evaluate the hyperbolic curve on a strain grid.
///
/// `qa = qf / Rf`; the caller guarantees `rf` came from a valid aggregation
/// (a zero or negative Rf inverts the curve shape and is not checked here).
pub fn model_curve(strain_grid: &[f64], sigma_3: f64, params: &GlobalParameters) -> Vec<f64> {
    let strength = StrengthParams {
        phi_deg: params.phi,
        cohesion: params.c,
    };
    let qf = failure_stress(sigma_3, &strength);
    let qa = qf / params.rf;
    let e50 = secant_modulus(sigma_3, params.e50_ref, &strength, params.m, params.p_ref);

    strain_grid
        .iter()
        .map(|&eps| {
            let eps = eps.max(STRAIN_FLOOR);
            qa / (1.0 + qa / (2.0 * e50 * eps))
        })
        .collect()
}

/// Build a uniform strain grid `[0, max_strain]` and evaluate the model on it.
pub fn modeled_curve(
    sigma_3: f64,
    max_strain: f64,
    points: usize,
    params: &GlobalParameters,
) -> ModeledCurve {
    let points = points.max(2);
    let strain: Vec<f64> = (0..points)
        .map(|i| max_strain * i as f64 / (points as f64 - 1.0))
        .collect();
    let stress = model_curve(&strain, sigma_3, params);
    ModeledCurve { strain, stress }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength_30_deg() -> StrengthParams {
        StrengthParams {
            phi_deg: 30.0,
            cohesion: 28.867_513_459_481_29,
        }
    }

    fn params_30_deg() -> GlobalParameters {
        let strength = strength_30_deg();
        GlobalParameters {
            phi: strength.phi_deg,
            c: strength.cohesion,
            e50_ref: 25_000.0,
            eur_ref: 75_000.0,
            eoed_ref: 25_000.0,
            m: 0.5,
            psi: 0.0,
            v_ur: 0.2,
            p_ref: 100.0,
            k0_nc: 0.5,
            rf: 0.9,
            e50_mean_experimental: 25_000.0,
        }
    }

    #[test]
    fn failure_stress_increases_with_confinement() {
        let strength = strength_30_deg();
        let mut prev = failure_stress(50.0, &strength);
        for sigma_3 in [100.0, 200.0, 400.0, 800.0] {
            let qf = failure_stress(sigma_3, &strength);
            assert!(qf > prev);
            prev = qf;
        }
    }

    #[test]
    fn failure_stress_matches_hand_computed_value() {
        // phi=30deg, c=100*(1-0.5)/(2*cos(30deg)): the linear-envelope scenario
        // sigma_3={100,300}, peaks={300,700}. At sigma_3=100 the envelope gives
        // q_peak=300 back.
        let strength = strength_30_deg();
        let qf = failure_stress(100.0, &strength);
        assert!((qf - 300.0).abs() < 1e-9);
    }

    #[test]
    fn secant_modulus_is_identity_at_reference_pressure() {
        let strength = strength_30_deg();
        let e50 = secant_modulus(100.0, 25_000.0, &strength, 0.5, 100.0);
        assert!((e50 - 25_000.0).abs() < 1e-9);
    }

    #[test]
    fn model_curve_is_monotonic_and_asymptotic() {
        let params = params_30_deg();
        let strain: Vec<f64> = (0..200).map(|i| i as f64 * 0.05).collect();
        let stress = model_curve(&strain, 100.0, &params);

        for pair in stress.windows(2) {
            assert!(pair[1] >= pair[0]);
        }

        // Far beyond qf/(2 E50) the curve should be close to qa.
        let strength = strength_30_deg();
        let qf = failure_stress(100.0, &strength);
        let qa = qf / params.rf;
        let far = model_curve(&[1e6], 100.0, &params)[0];
        assert!((far - qa).abs() / qa < 1e-3);
    }

    #[test]
    fn model_curve_passes_through_half_qf() {
        // By construction the hyperbola passes through ~0.5*qf at
        // eps = qf / (2 E50).
        let params = params_30_deg();
        let strength = strength_30_deg();
        let qf = failure_stress(100.0, &strength);
        let e50 = secant_modulus(100.0, params.e50_ref, &strength, params.m, params.p_ref);
        let eps_half = qf / (2.0 * e50);

        let qa = qf / params.rf;
        let expected = qa / (1.0 + qa / qf);
        let got = model_curve(&[eps_half], 100.0, &params)[0];
        assert!((got - expected).abs() < 1e-9);
        // Near half of qf when Rf is close to 1.
        assert!((got / qf - 0.5).abs() < 0.05);
    }

    #[test]
    fn model_curve_handles_zero_strain() {
        let params = params_30_deg();
        let stress = model_curve(&[0.0], 100.0, &params);
        assert!(stress[0].is_finite());
        assert!(stress[0] >= 0.0);
        assert!(stress[0] < 1.0);
    }

    #[test]
    fn modeled_curve_grid_spans_zero_to_max() {
        let params = params_30_deg();
        let curve = modeled_curve(100.0, 12.0, 100, &params);
        assert_eq!(curve.strain.len(), 100);
        assert_eq!(curve.stress.len(), 100);
        assert_eq!(curve.strain[0], 0.0);
        assert!((curve.strain[99] - 12.0).abs() < 1e-12);
    }
}
