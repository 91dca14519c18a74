//! Shared calibration pipeline used by every CLI subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> strength fit -> per-test derivation -> stiffness fit ->
//! aggregation -> forward modeling.
//!
//! The two-pass dependency is explicit in the types: per-test derivation
//! takes `&StrengthParams`, which only exists once the strength fit has
//! succeeded. Any stage failure halts the run before plotting or exports;
//! there is no partial parameter set.

use rayon::prelude::*;

use crate::domain::{
    CalibrationConfig, GlobalParameters, ModeledCurve, StrengthParams, TestRecord, TestSeries,
};
use crate::error::AppError;
use crate::fit::{aggregate, derive_test, fit_stiffness, fit_strength};
use crate::models::modeled_curve;

/// All computed outputs of a single calibration run.
#[derive(Debug, Clone)]
pub struct CalibrationOutput {
    pub parameters: GlobalParameters,
    /// One record per test, ascending confining pressure.
    pub records: Vec<TestRecord>,
    /// Optional extra model curve at a confining pressure outside the data.
    pub prediction: Option<(f64, ModeledCurve)>,
}

/// Execute the full calibration pipeline on validated series.
///
/// `series` must already satisfy the ingest invariants (equal-length arrays,
/// length >= 2, a positive stress value per test).
pub fn run_calibration(
    series: &[TestSeries],
    config: &CalibrationConfig,
) -> Result<CalibrationOutput, AppError> {
    // Stage 1: strength parameters from the peak-stress envelope.
    let pressures: Vec<f64> = series.iter().map(|s| s.confining_pressure).collect();
    let peaks: Vec<f64> = series.iter().map(|s| s.peak_stress()).collect();
    let strength: StrengthParams = fit_strength(&pressures, &peaks)
        .map_err(|e| AppError::new(e.exit_code(), format!("Strength fit failed: {e}")))?;

    // Stage 2: per-test derived quantities. Tests are independent given the
    // strength parameters, so evaluate them in parallel; the ordered collect
    // keeps the first failure deterministic.
    let derived = series
        .par_iter()
        .map(|s| derive_test(s, &strength))
        .collect::<Vec<_>>()
        .into_iter()
        .zip(series.iter())
        .map(|(result, s)| {
            result.map_err(|e| {
                AppError::new(
                    e.exit_code(),
                    format!(
                        "Per-test derivation failed for sigma_3={} kPa: {e}",
                        s.confining_pressure
                    ),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Stage 3: stiffness law + aggregation.
    let e50_values: Vec<f64> = derived.iter().map(|d| d.e50_experimental).collect();
    let stiffness = fit_stiffness(&pressures, &e50_values, &strength, config.p_ref)
        .map_err(|e| AppError::new(e.exit_code(), format!("Stiffness fit failed: {e}")))?;

    let parameters = aggregate(&strength, &derived, &stiffness, config.p_ref)
        .map_err(|e| AppError::new(e.exit_code(), format!("Aggregation failed: {e}")))?;

    // Stage 4: forward model per confining pressure (independent given the
    // finalized parameters).
    let records: Vec<TestRecord> = series
        .par_iter()
        .zip(derived.par_iter())
        .map(|(s, &d)| TestRecord {
            series: s.clone(),
            derived: d,
            modeled: modeled_curve(
                s.confining_pressure,
                s.max_strain(),
                config.curve_points,
                &parameters,
            ),
        })
        .collect();

    let prediction = config.predict_pressure.map(|sigma_3| {
        let max_strain = series
            .iter()
            .map(TestSeries::max_strain)
            .fold(f64::NEG_INFINITY, f64::max);
        (
            sigma_3,
            modeled_curve(sigma_3, max_strain, config.curve_points, &parameters),
        )
    });

    Ok(CalibrationOutput {
        parameters,
        records,
        prediction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{failure_stress, secant_modulus};
    use std::path::PathBuf;

    fn config() -> CalibrationConfig {
        CalibrationConfig {
            csv_path: PathBuf::new(),
            p_ref: 100.0,
            curve_points: 50,
            predict_pressure: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_params: None,
            export_curves: None,
        }
    }

    /// Build a synthetic dataset that follows the model exactly: hyperbolic
    /// stress curves whose asymptotes sit on a known Mohr-Coulomb envelope.
    fn synthetic_dataset(strength: &StrengthParams, e50_ref: f64, m: f64, rf: f64) -> Vec<TestSeries> {
        [100.0, 200.0, 400.0]
            .iter()
            .map(|&sigma_3| {
                let qa = failure_stress(sigma_3, strength) / rf;
                let e50 = secant_modulus(sigma_3, e50_ref, strength, m, 100.0);
                let strain: Vec<f64> = (1..=60).map(|i| i as f64 * 0.1).collect();
                let stress: Vec<f64> = strain
                    .iter()
                    .map(|&eps| qa / (1.0 + qa / (2.0 * e50 * eps)))
                    .collect();
                let volumetric_strain = vec![0.01; strain.len()];
                TestSeries {
                    confining_pressure: sigma_3,
                    strain,
                    stress,
                    volumetric_strain,
                }
            })
            .collect()
    }

    #[test]
    fn end_to_end_on_synthetic_dataset() {
        let strength = StrengthParams {
            phi_deg: 30.0,
            cohesion: 25.0,
        };
        let dataset = synthetic_dataset(&strength, 25_000.0, 0.5, 0.9);
        let out = run_calibration(&dataset, &config()).unwrap();

        // The synthetic peaks are below the asymptotes, so the recovered
        // envelope is close to (not exactly) the generating one.
        assert!(out.parameters.phi > 20.0 && out.parameters.phi < 45.0);
        assert!(out.parameters.c.is_finite());
        assert!(out.parameters.rf > 0.5 && out.parameters.rf < 1.0);
        assert!((out.parameters.eur_ref - 3.0 * out.parameters.e50_ref).abs() < 1e-9);
        assert_eq!(out.parameters.psi, 0.0);
        assert_eq!(out.records.len(), 3);
        for record in &out.records {
            assert_eq!(record.modeled.strain.len(), 50);
            // Modeled curves are monotone non-decreasing.
            for pair in record.modeled.stress.windows(2) {
                assert!(pair[1] >= pair[0]);
            }
        }
    }

    #[test]
    fn prediction_curve_generated_when_requested() {
        let strength = StrengthParams {
            phi_deg: 30.0,
            cohesion: 25.0,
        };
        let dataset = synthetic_dataset(&strength, 25_000.0, 0.5, 0.9);
        let mut config = config();
        config.predict_pressure = Some(600.0);

        let out = run_calibration(&dataset, &config).unwrap();
        let (sigma_3, curve) = out.prediction.unwrap();
        assert_eq!(sigma_3, 600.0);
        assert_eq!(curve.strain.len(), 50);
        // Higher confinement means a stiffer, stronger response than any
        // calibrated curve at the same strain.
        let last = *curve.stress.last().unwrap();
        let strongest = out
            .records
            .iter()
            .map(|r| *r.modeled.stress.last().unwrap())
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(last > strongest);
    }

    #[test]
    fn failure_names_stage_and_test() {
        // Second test's series is engineered so qa lands below the peak:
        // plateau then a sudden spike.
        let strength = StrengthParams {
            phi_deg: 30.0,
            cohesion: 25.0,
        };
        let mut dataset = synthetic_dataset(&strength, 25_000.0, 0.5, 0.9);
        dataset[1] = TestSeries {
            confining_pressure: 200.0,
            strain: vec![1.0, 2.0, 3.0, 3.05],
            stress: vec![50.0, 50.0, 50.0, 60.0],
            volumetric_strain: vec![0.0; 4],
        };

        let err = run_calibration(&dataset, &config()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Per-test derivation failed"));
        assert!(msg.contains("sigma_3=200"));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn single_test_fails_fast_in_strength_stage() {
        let strength = StrengthParams {
            phi_deg: 30.0,
            cohesion: 25.0,
        };
        let dataset = vec![synthetic_dataset(&strength, 25_000.0, 0.5, 0.9).remove(0)];
        let err = run_calibration(&dataset, &config()).unwrap_err();
        assert!(err.to_string().contains("Strength fit failed"));
        assert_eq!(err.exit_code(), 3);
    }
}
