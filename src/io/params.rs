//! Read/write parameter JSON files.
//!
//! Parameter JSON is the "portable" representation of a calibration run:
//! the full `GlobalParameters` record plus the confining pressures it was
//! derived from, enough to replot model curves against the source data.
//!
//! The schema is defined by `domain::ParameterFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{GlobalParameters, ParameterFile, TestSeries};
use crate::error::AppError;

/// Write a parameter JSON file.
pub fn write_parameters_json(
    path: &Path,
    parameters: &GlobalParameters,
    series: &[TestSeries],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create parameter JSON '{}': {e}", path.display()),
        )
    })?;

    let out = ParameterFile {
        tool: "hsc".to_string(),
        parameters: parameters.clone(),
        confining_pressures: series.iter().map(|s| s.confining_pressure).collect(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write parameter JSON: {e}")))?;

    Ok(())
}

/// Read a parameter JSON file.
pub fn read_parameters_json(path: &Path) -> Result<ParameterFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open parameter JSON '{}': {e}", path.display()),
        )
    })?;
    let params: ParameterFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid parameter JSON: {e}")))?;
    Ok(params)
}
