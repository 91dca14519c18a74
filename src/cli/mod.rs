//! Command-line parsing for the Hardening Soil calibrator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "hsc",
    version,
    about = "Hardening Soil parameter calibration from triaxial test data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calibrate parameters from a CSV dataset, print the report, plot, export.
    Calibrate(CalibrateArgs),
    /// Print the parameter table only (useful for scripting).
    Params(CalibrateArgs),
    /// Replot a saved parameter JSON against its source dataset.
    Plot(PlotArgs),
}

/// Common options for calibration runs.
#[derive(Debug, Parser, Clone)]
pub struct CalibrateArgs {
    /// Triaxial dataset CSV (confining_pressure, strain, stress, volumetric_strain).
    pub csv: PathBuf,

    /// Reference pressure for the stiffness law (kPa).
    #[arg(long, default_value_t = 100.0)]
    pub p_ref: f64,

    /// Points in each modeled stress-strain curve.
    #[arg(long, default_value_t = 100)]
    pub curve_points: usize,

    /// Also model a prediction curve at this confining pressure (kPa).
    #[arg(long, value_name = "KPA")]
    pub predict: Option<f64>,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the parameter set to JSON.
    #[arg(long = "export-params", value_name = "JSON")]
    pub export_params: Option<PathBuf>,

    /// Export modeled curves to CSV.
    #[arg(long = "export-curves", value_name = "CSV")]
    pub export_curves: Option<PathBuf>,
}

/// Options for replotting a saved parameter set.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Parameter JSON produced by `hsc calibrate --export-params`.
    #[arg(long, value_name = "JSON")]
    pub params: PathBuf,

    /// Triaxial dataset CSV to overlay the model curves on.
    pub csv: PathBuf,

    /// Points in each modeled stress-strain curve.
    #[arg(long, default_value_t = 100)]
    pub curve_points: usize,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
