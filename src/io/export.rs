//! Export modeled curves to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per (curve, strain sample), long format like the input.

use std::path::Path;

use crate::domain::{ModeledCurve, TestRecord};
use crate::error::AppError;

/// Write modeled stress-strain curves to a CSV file.
///
/// Calibrated curves are written per confining pressure; an optional
/// prediction curve (a pressure not present in the data) is appended with
/// `kind=prediction`.
pub fn write_curves_csv(
    path: &Path,
    records: &[TestRecord],
    prediction: Option<&(f64, ModeledCurve)>,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create curve CSV '{}': {e}", path.display()),
        )
    })?;

    writer
        .write_record(["kind", "confining_pressure", "strain", "stress_model"])
        .map_err(|e| AppError::new(2, format!("Failed to write curve CSV header: {e}")))?;

    for record in records {
        write_curve(
            &mut writer,
            "calibrated",
            record.series.confining_pressure,
            &record.modeled,
        )?;
    }
    if let Some((sigma_3, curve)) = prediction {
        write_curve(&mut writer, "prediction", *sigma_3, curve)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush curve CSV: {e}")))?;
    Ok(())
}

fn write_curve(
    writer: &mut csv::Writer<std::fs::File>,
    kind: &str,
    sigma_3: f64,
    curve: &ModeledCurve,
) -> Result<(), AppError> {
    for (&eps, &q) in curve.strain.iter().zip(curve.stress.iter()) {
        writer
            .write_record([
                kind.to_string(),
                format!("{sigma_3}"),
                format!("{eps:.10}"),
                format!("{q:.4}"),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write curve CSV row: {e}")))?;
    }
    Ok(())
}
