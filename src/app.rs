//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and validates the dataset
//! - runs calibration
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{CalibrateArgs, Command, PlotArgs};
use crate::domain::CalibrationConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `hsc` binary.
pub fn run() -> Result<(), AppError> {
    // We want `hsc data.csv` to behave like `hsc calibrate data.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the short invocation.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Calibrate(args) => handle_calibrate(args, OutputMode::Full),
        Command::Params(args) => handle_calibrate(args, OutputMode::ParamsOnly),
        Command::Plot(args) => handle_plot(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    ParamsOnly,
}

fn handle_calibrate(args: CalibrateArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = calibration_config_from_args(&args);
    let ingest = crate::io::load_test_series(&config.csv_path)?;
    let output = pipeline::run_calibration(&ingest.series, &config)?;

    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(&ingest.stats, &output, &config)
            );
        }
        OutputMode::ParamsOnly => {
            println!(
                "{}",
                crate::report::format_parameter_table(&output.parameters)
            );
        }
    }

    if mode == OutputMode::Full && config.plot {
        let series: Vec<_> = output.records.iter().map(|r| r.series.clone()).collect();
        let curves: Vec<_> = output.records.iter().map(|r| r.modeled.clone()).collect();
        println!(
            "{}",
            crate::plot::render_stress_strain_plot(
                &series,
                &curves,
                output.prediction.as_ref(),
                config.plot_width,
                config.plot_height,
            )
        );
        println!(
            "{}",
            crate::plot::render_stress_path_plot(&series, config.plot_width, config.plot_height)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_params {
        let series: Vec<_> = output.records.iter().map(|r| r.series.clone()).collect();
        crate::io::write_parameters_json(path, &output.parameters, &series)?;
    }
    if let Some(path) = &config.export_curves {
        crate::io::write_curves_csv(path, &output.records, output.prediction.as_ref())?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let saved = crate::io::read_parameters_json(&args.params)?;
    let ingest = crate::io::load_test_series(&args.csv)?;

    // Rebuild model curves from the saved parameters; the dataset provides
    // the strain ranges and the experimental overlay.
    let curves: Vec<_> = ingest
        .series
        .iter()
        .map(|s| {
            crate::models::modeled_curve(
                s.confining_pressure,
                s.max_strain(),
                args.curve_points,
                &saved.parameters,
            )
        })
        .collect();

    println!(
        "{}",
        crate::plot::render_stress_strain_plot(
            &ingest.series,
            &curves,
            None,
            args.width,
            args.height,
        )
    );
    println!(
        "{}",
        crate::plot::render_stress_path_plot(&ingest.series, args.width, args.height)
    );
    Ok(())
}

pub fn calibration_config_from_args(args: &CalibrateArgs) -> CalibrationConfig {
    CalibrationConfig {
        csv_path: args.csv.clone(),
        p_ref: args.p_ref,
        curve_points: args.curve_points,
        predict_pressure: args.predict,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_params: args.export_params.clone(),
        export_curves: args.export_curves.clone(),
    }
}

/// Rewrite argv so `hsc data.csv` defaults to `hsc calibrate data.csv`.
///
/// Rules:
/// - `hsc`                     -> unchanged (clap prints the help)
/// - `hsc data.csv ...`        -> `hsc calibrate data.csv ...`
/// - `hsc --help/--version`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "calibrate" | "params" | "plot");
    if is_subcommand || arg1.starts_with('-') {
        return argv;
    }

    // First token is a path: treat it as `calibrate <path>`.
    argv.insert(1, "calibrate".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_path_rewrites_to_calibrate() {
        let out = rewrite_args(argv(&["hsc", "data.csv"]));
        assert_eq!(out, argv(&["hsc", "calibrate", "data.csv"]));
    }

    #[test]
    fn subcommands_and_flags_pass_through() {
        let out = rewrite_args(argv(&["hsc", "params", "data.csv"]));
        assert_eq!(out, argv(&["hsc", "params", "data.csv"]));

        let out = rewrite_args(argv(&["hsc", "--help"]));
        assert_eq!(out, argv(&["hsc", "--help"]));
    }
}
