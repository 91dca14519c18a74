//! CSV ingest and validation.
//!
//! The input is a long-format CSV with one row per sample:
//!
//! ```text
//! confining_pressure,strain,stress,volumetric_strain
//! 100,0.1,45.2,0.02
//! 100,0.2,88.9,0.03
//! 300,0.1,122.4,0.01
//! ...
//! ```
//!
//! Rows sharing a `confining_pressure` value form one test, in file order.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level errors with line numbers** (no silent skipping)
//! - **All series invariants enforced here**, before the fit code runs:
//!   equal lengths are structural in this format, but length >= 2, a positive
//!   confining pressure, finite values, and at least one positive stress are
//!   checked per test.
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::TestSeries;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 4] = ["confining_pressure", "strain", "stress", "volumetric_strain"];

/// Summary stats about the dataset actually handed to the fit pipeline.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_tests: usize,
    pub n_points: usize,
    pub pressure_min: f64,
    pub pressure_max: f64,
}

/// Ingest output: validated series (ascending confining pressure) + stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub series: Vec<TestSeries>,
    pub stats: DatasetStats,
}

/// Load and validate a triaxial dataset from a CSV file.
pub fn load_test_series(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_test_series(file, &path.display().to_string())
}

/// Load and validate a triaxial dataset from any reader.
///
/// Split out from `load_test_series` so tests can feed in-memory CSV text.
pub fn read_test_series(reader: impl Read, source: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers in '{source}': {e}")))?
        .clone();

    let mut column_idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in column_idx.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                AppError::new(2, format!("Missing required column '{name}' in '{source}'"))
            })?;
    }

    // Grouping preserves first-seen order; tests are sorted by pressure at
    // the end. Exact float equality is intentional: rows of the same test
    // carry the same literal pressure value.
    let mut groups: Vec<TestSeries> = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let line = row_idx + 2; // 1-based, after the header line
        let record = record
            .map_err(|e| AppError::new(2, format!("Failed to read CSV row at line {line}: {e}")))?;

        let mut values = [0.0f64; REQUIRED_COLUMNS.len()];
        for (value, (&idx, name)) in values
            .iter_mut()
            .zip(column_idx.iter().zip(REQUIRED_COLUMNS.iter()))
        {
            let raw = record.get(idx).unwrap_or("");
            *value = raw.parse::<f64>().map_err(|_| {
                AppError::new(
                    2,
                    format!("Line {line}: column '{name}' has non-numeric value '{raw}'"),
                )
            })?;
            if !value.is_finite() {
                return Err(AppError::new(
                    2,
                    format!("Line {line}: column '{name}' has non-finite value '{raw}'"),
                ));
            }
        }
        let [pressure, strain, stress, vol_strain] = values;

        match groups.iter_mut().find(|g| g.confining_pressure == pressure) {
            Some(group) => {
                group.strain.push(strain);
                group.stress.push(stress);
                group.volumetric_strain.push(vol_strain);
            }
            None => groups.push(TestSeries {
                confining_pressure: pressure,
                strain: vec![strain],
                stress: vec![stress],
                volumetric_strain: vec![vol_strain],
            }),
        }
    }

    if groups.is_empty() {
        return Err(AppError::new(3, format!("No data rows in '{source}'")));
    }

    for series in &groups {
        validate_series(series)?;
    }

    groups.sort_by(|a, b| {
        a.confining_pressure
            .partial_cmp(&b.confining_pressure)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let stats = DatasetStats {
        n_tests: groups.len(),
        n_points: groups.iter().map(|g| g.strain.len()).sum(),
        pressure_min: groups.first().map(|g| g.confining_pressure).unwrap_or(0.0),
        pressure_max: groups.last().map(|g| g.confining_pressure).unwrap_or(0.0),
    };

    Ok(IngestedData {
        series: groups,
        stats,
    })
}

/// Enforce the per-series invariants the fit code relies on.
fn validate_series(series: &TestSeries) -> Result<(), AppError> {
    let sigma_3 = series.confining_pressure;
    if sigma_3 <= 0.0 {
        return Err(AppError::new(
            3,
            format!("Non-positive confining pressure {sigma_3} kPa"),
        ));
    }
    if series.strain.len() < 2 {
        return Err(AppError::new(
            3,
            format!(
                "Test at sigma_3={sigma_3} kPa has {} sample(s); need at least 2",
                series.strain.len()
            ),
        ));
    }
    if !series.stress.iter().any(|&q| q > 0.0) {
        return Err(AppError::new(
            3,
            format!("Test at sigma_3={sigma_3} kPa has no positive stress value"),
        ));
    }
    if series.strain.iter().any(|&e| e < 0.0) {
        return Err(AppError::new(
            3,
            format!("Test at sigma_3={sigma_3} kPa has negative strain values"),
        ));
    }
    Ok(())
}
