//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons
//!
//! The pipeline is staged: `TestSeries` (raw, immutable after ingest) feeds
//! `StrengthParams` (stage 1), which feeds `DerivedTestQuantities` (stage 2),
//! which feed `StiffnessFit` and `GlobalParameters` (stage 3), which feed
//! `ModeledCurve` (stage 4). Each stage is write-once; downstream stages take
//! upstream results by value or reference, never by patching a shared record.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One triaxial compression test at a fixed confining pressure.
///
/// Invariants (enforced at ingest, assumed by the fit code):
/// - `confining_pressure > 0` (kPa)
/// - the three arrays have equal length >= 2
/// - at least one stress value is > 0
///
/// `strain` is ordered by test duration; values may plateau but the sequence
/// represents time order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSeries {
    /// Minor principal stress held during the shear stage (kPa).
    pub confining_pressure: f64,
    /// Axial strain (dimensionless or %, consistent across the dataset).
    pub strain: Vec<f64>,
    /// Deviator stress q = sigma_1 - sigma_3 (kPa).
    pub stress: Vec<f64>,
    /// Volumetric strain; negative values indicate dilation.
    pub volumetric_strain: Vec<f64>,
}

impl TestSeries {
    /// Maximum observed deviator stress.
    pub fn peak_stress(&self) -> f64 {
        self.stress.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Maximum observed axial strain (upper end of the modeled strain grid).
    pub fn max_strain(&self) -> f64 {
        self.strain.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Mohr-Coulomb shear strength parameters (stage-1 output).
///
/// Stage-2 computations take `&StrengthParams`, so "use before compute" is a
/// compile error rather than a runtime check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrengthParams {
    /// Friction angle, degrees.
    pub phi_deg: f64,
    /// Cohesion, kPa.
    pub cohesion: f64,
}

impl StrengthParams {
    /// Friction angle in radians (trig evaluation only; interfaces stay in degrees).
    pub fn phi_rad(&self) -> f64 {
        self.phi_deg.to_radians()
    }
}

/// Quantities derived from a single test once strength parameters exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DerivedTestQuantities {
    /// Mohr-Coulomb failure deviator stress (kPa).
    pub qf: f64,
    /// Experimental secant modulus at 50% of peak stress (kPa).
    pub e50_experimental: f64,
    /// Hyperbolic asymptotic deviator stress (kPa).
    pub qa: f64,
    /// Failure ratio qf/qa; `None` when qa is zero (excluded from averaging).
    pub rf: Option<f64>,
    /// Dilatancy angle, degrees; exactly 0 when the test never dilates.
    pub psi_deg: f64,
}

/// Stress-dependent stiffness law fit (stage-3 intermediate).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StiffnessFit {
    /// Power-law exponent.
    pub m: f64,
    /// Reference secant modulus back-calculated from the regression intercept (kPa).
    pub e50_ref: f64,
}

/// The complete Hardening Soil parameter set.
///
/// Immutable once assembled by the aggregator. Angular quantities are in
/// degrees; moduli, cohesion and pressures in kPa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalParameters {
    /// Friction angle (degrees).
    pub phi: f64,
    /// Cohesion (kPa).
    pub c: f64,
    /// Reference secant modulus from the stiffness-law fit (kPa).
    pub e50_ref: f64,
    /// Unloading-reloading modulus, fixed scaling 3 * e50_ref.
    pub eur_ref: f64,
    /// Oedometric modulus, fixed scaling 1 * e50_ref.
    pub eoed_ref: f64,
    /// Stiffness exponent (dimensionless).
    pub m: f64,
    /// Mean dilatancy angle across tests (degrees). Tests with no dilatant
    /// phase contribute 0 to this mean; see the aggregator notes.
    pub psi: f64,
    /// Unloading-reloading Poisson ratio (fixed constant).
    pub v_ur: f64,
    /// Reference pressure for the stiffness law (kPa, fixed constant).
    pub p_ref: f64,
    /// At-rest lateral stress coefficient, 1 - sin(phi).
    pub k0_nc: f64,
    /// Mean failure ratio across tests where Rf is defined.
    pub rf: f64,
    /// Mean of the per-test experimental secant moduli (diagnostic; the
    /// fitted `e50_ref` is what feeds the forward model).
    pub e50_mean_experimental: f64,
}

/// A synthetic stress-strain curve regenerated from `GlobalParameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeledCurve {
    /// Strain grid from 0 to the max observed strain of the source test.
    pub strain: Vec<f64>,
    /// Forward-model deviator stress on that grid (kPa).
    pub stress: Vec<f64>,
}

/// The presentation join for one confining pressure: raw data, derived
/// quantities, and the modeled curve, each produced by its own stage.
#[derive(Debug, Clone)]
pub struct TestRecord {
    pub series: TestSeries,
    pub derived: DerivedTestQuantities,
    pub modeled: ModeledCurve,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    pub csv_path: PathBuf,

    /// Reference pressure for the stiffness law (kPa).
    pub p_ref: f64,
    /// Points in each modeled strain grid.
    pub curve_points: usize,
    /// Optional extra prediction curve at a confining pressure not in the data.
    pub predict_pressure: Option<f64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_params: Option<PathBuf>,
    pub export_curves: Option<PathBuf>,
}

impl CalibrationConfig {
    /// Default unloading-reloading Poisson ratio.
    pub const V_UR: f64 = 0.2;
    /// Default reference pressure (kPa).
    pub const P_REF: f64 = 100.0;
    /// Default modeled-curve resolution.
    pub const CURVE_POINTS: usize = 100;
}

/// A saved parameter file (JSON). The "portable" representation of a run:
/// the parameter set plus enough metadata to replot against the source data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterFile {
    pub tool: String,
    pub parameters: GlobalParameters,
    /// Confining pressures of the calibrated tests (kPa), ascending.
    pub confining_pressures: Vec<f64>,
}
