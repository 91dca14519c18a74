//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::CalibrationOutput;
use crate::domain::{CalibrationConfig, GlobalParameters};
use crate::io::DatasetStats;

/// Format the full run summary: dataset stats, per-test quantities, and the
/// calibrated parameter table.
pub fn format_run_summary(
    stats: &DatasetStats,
    output: &CalibrationOutput,
    config: &CalibrationConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== hsc - Hardening Soil calibration ===\n");
    out.push_str(&format!("Dataset: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Tests: n={} | points={} | sigma_3=[{:.0}, {:.0}] kPa\n",
        stats.n_tests, stats.n_points, stats.pressure_min, stats.pressure_max
    ));
    out.push_str(&format!("Reference pressure: {:.0} kPa\n", config.p_ref));

    out.push_str("\nPer-test quantities:\n");
    out.push_str(&format!(
        "{:>10} {:>10} {:>12} {:>10} {:>8} {:>8}\n",
        "sigma_3", "qf", "E50(exp)", "qa", "Rf", "psi"
    ));
    for record in &output.records {
        let d = &record.derived;
        out.push_str(&format!(
            "{:>10.1} {:>10.1} {:>12.0} {:>10.1} {:>8} {:>8.2}\n",
            record.series.confining_pressure,
            d.qf,
            d.e50_experimental,
            d.qa,
            d.rf.map(|rf| format!("{rf:.3}")).unwrap_or_else(|| "n/a".to_string()),
            d.psi_deg,
        ));
    }

    if let Some((sigma_3, _)) = &output.prediction {
        out.push_str(&format!("\nPrediction curve at sigma_3={sigma_3} kPa included.\n"));
    }

    out.push('\n');
    out.push_str(&format_parameter_table(&output.parameters));
    out
}

/// Format the calibrated parameter set as a terminal table.
pub fn format_parameter_table(params: &GlobalParameters) -> String {
    let mut out = String::new();
    out.push_str("Calibrated parameters:\n");
    out.push_str(&format!("{:<24} {:>12.0} kPa\n", "E50_ref", params.e50_ref));
    out.push_str(&format!("{:<24} {:>12.0} kPa\n", "Eur_ref", params.eur_ref));
    out.push_str(&format!("{:<24} {:>12.0} kPa\n", "Eoed_ref", params.eoed_ref));
    out.push_str(&format!("{:<24} {:>12.2} deg\n", "phi (friction angle)", params.phi));
    out.push_str(&format!("{:<24} {:>12.2} kPa\n", "c (cohesion)", params.c));
    out.push_str(&format!("{:<24} {:>12.2} deg\n", "psi (dilatancy angle)", params.psi));
    out.push_str(&format!("{:<24} {:>12.3}\n", "m (stiffness exponent)", params.m));
    out.push_str(&format!("{:<24} {:>12.2}\n", "v_ur (Poisson ratio)", params.v_ur));
    out.push_str(&format!("{:<24} {:>12.0} kPa\n", "p_ref", params.p_ref));
    out.push_str(&format!("{:<24} {:>12.3}\n", "K0_nc", params.k0_nc));
    out.push_str(&format!("{:<24} {:>12.3}\n", "Rf (failure ratio)", params.rf));
    out.push_str(&format!(
        "{:<24} {:>12.0} kPa  (diagnostic)\n",
        "mean experimental E50",
        params.e50_mean_experimental
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GlobalParameters {
        GlobalParameters {
            phi: 30.0,
            c: 28.87,
            e50_ref: 25_000.0,
            eur_ref: 75_000.0,
            eoed_ref: 25_000.0,
            m: 0.5,
            psi: 2.5,
            v_ur: 0.2,
            p_ref: 100.0,
            k0_nc: 0.5,
            rf: 0.9,
            e50_mean_experimental: 24_000.0,
        }
    }

    #[test]
    fn parameter_table_lists_every_field() {
        let table = format_parameter_table(&params());
        for label in [
            "E50_ref", "Eur_ref", "Eoed_ref", "phi", "c (cohesion)", "psi", "m (stiffness",
            "v_ur", "p_ref", "K0_nc", "Rf",
        ] {
            assert!(table.contains(label), "missing {label}");
        }
        assert!(table.contains("30.00 deg"));
        assert!(table.contains("0.900"));
    }
}
