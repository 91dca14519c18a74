//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: one digit marker per test (`1`, `2`, ...)
//! - modeled curves: `-` lines
//! - optional prediction curve: `*` line

use crate::domain::{ModeledCurve, TestSeries};

/// One drawable series: scattered markers or a connected line.
struct Layer {
    points: Vec<(f64, f64)>,
    marker: char,
    connect: bool,
}

/// Render experimental points overlaid on modeled stress-strain curves.
pub fn render_stress_strain_plot(
    series: &[TestSeries],
    curves: &[ModeledCurve],
    prediction: Option<&(f64, ModeledCurve)>,
    width: usize,
    height: usize,
) -> String {
    let mut layers = Vec::new();
    let mut legend = String::new();

    for (i, (s, curve)) in series.iter().zip(curves.iter()).enumerate() {
        let marker = test_marker(i);
        layers.push(Layer {
            points: curve
                .strain
                .iter()
                .zip(curve.stress.iter())
                .map(|(&x, &y)| (x, y))
                .collect(),
            marker: '-',
            connect: true,
        });
        layers.push(Layer {
            points: s
                .strain
                .iter()
                .zip(s.stress.iter())
                .map(|(&x, &y)| (x, y))
                .collect(),
            marker,
            connect: false,
        });
        legend.push_str(&format!(
            "  {marker} observed, - model (sigma_3={} kPa)\n",
            s.confining_pressure
        ));
    }

    if let Some((sigma_3, curve)) = prediction {
        layers.push(Layer {
            points: curve
                .strain
                .iter()
                .zip(curve.stress.iter())
                .map(|(&x, &y)| (x, y))
                .collect(),
            marker: '*',
            connect: true,
        });
        legend.push_str(&format!("  * prediction (sigma_3={sigma_3} kPa)\n"));
    }

    let mut out = String::from("Stress-strain curves (q vs eps_1):\n");
    out.push_str(&render_layers(&layers, width, height));
    out.push_str(&legend);
    out
}

/// Render stress paths `q` vs `p = sigma_3 + q/3`, one line per test.
pub fn render_stress_path_plot(series: &[TestSeries], width: usize, height: usize) -> String {
    let mut layers = Vec::new();
    let mut legend = String::new();

    for (i, s) in series.iter().enumerate() {
        let marker = test_marker(i);
        let mut points: Vec<(f64, f64)> = s
            .stress
            .iter()
            .map(|&q| (s.confining_pressure + q / 3.0, q))
            .collect();
        // Initial state: isotropic confinement before shearing.
        points.insert(0, (s.confining_pressure, 0.0));
        layers.push(Layer {
            points,
            marker,
            connect: true,
        });
        legend.push_str(&format!("  {marker} sigma_3={} kPa\n", s.confining_pressure));
    }

    let mut out = String::from("Stress paths (q vs p = sigma_3 + q/3):\n");
    out.push_str(&render_layers(&layers, width, height));
    out.push_str(&legend);
    out
}

fn test_marker(index: usize) -> char {
    const MARKERS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];
    MARKERS[index % MARKERS.len()]
}

fn render_layers(layers: &[Layer], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all: Vec<(f64, f64)> = layers.iter().flat_map(|l| l.points.iter().copied()).collect();
    let (x_min, x_max) = axis_range(all.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = axis_range(all.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so point markers can overlay them.
    for layer in layers.iter().filter(|l| l.connect) {
        draw_line(&mut grid, &layer.points, layer.marker, x_min, x_max, y_min, y_max);
    }
    for layer in layers.iter().filter(|l| !l.connect) {
        for &(x, y) in &layer.points {
            if let Some((col, row)) = to_cell(x, y, x_min, x_max, y_min, y_max, width, height) {
                grid[row][col] = layer.marker;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!("y: [{y_min:.1}, {y_max:.1}]\n"));
    for row in &grid {
        out.push('|');
        out.extend(row.iter());
        out.push('\n');
    }
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('\n');
    out.push_str(&format!("x: [{x_min:.2}, {x_max:.2}]\n"));
    out
}

fn draw_line(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    marker: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid.first().map(|r| r.len()).unwrap_or(0);
    if width == 0 {
        return;
    }

    // Dense sampling along each segment keeps steep sections connected.
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let steps = (width * 2).max(2);
        for s in 0..=steps {
            let u = s as f64 / steps as f64;
            let x = x0 + u * (x1 - x0);
            let y = y0 + u * (y1 - y0);
            if let Some((col, row)) = to_cell(x, y, x_min, x_max, y_min, y_max, width, height) {
                if grid[row][col] == ' ' {
                    grid[row][col] = marker;
                }
            }
        }
    }
}

fn to_cell(
    x: f64,
    y: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    if !(x.is_finite() && y.is_finite()) || x_max <= x_min || y_max <= y_min {
        return None;
    }
    let u = (x - x_min) / (x_max - x_min);
    let v = (y - y_min) / (y_max - y_min);
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    let col = ((u * (width as f64 - 1.0)).round() as usize).min(width - 1);
    let row_from_bottom = ((v * (height as f64 - 1.0)).round() as usize).min(height - 1);
    Some((col, height - 1 - row_from_bottom))
}

fn axis_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min <= max { Some((min, max)) } else { None }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs().max(1e-9);
    (min - span * frac, max + span * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> TestSeries {
        TestSeries {
            confining_pressure: 100.0,
            strain: vec![0.5, 1.0, 2.0, 4.0],
            stress: vec![100.0, 180.0, 260.0, 300.0],
            volumetric_strain: vec![0.0; 4],
        }
    }

    fn sample_curve() -> ModeledCurve {
        ModeledCurve {
            strain: vec![0.0, 1.0, 2.0, 3.0, 4.0],
            stress: vec![0.0, 170.0, 250.0, 290.0, 310.0],
        }
    }

    #[test]
    fn stress_strain_plot_contains_markers_and_legend() {
        let plot =
            render_stress_strain_plot(&[sample_series()], &[sample_curve()], None, 60, 15);
        assert!(plot.contains('1'));
        assert!(plot.contains('-'));
        assert!(plot.contains("sigma_3=100 kPa"));
    }

    #[test]
    fn prediction_curve_uses_star_marker() {
        let prediction = (600.0, sample_curve());
        let plot = render_stress_strain_plot(
            &[sample_series()],
            &[sample_curve()],
            Some(&prediction),
            60,
            15,
        );
        assert!(plot.contains('*'));
        assert!(plot.contains("prediction (sigma_3=600 kPa)"));
    }

    #[test]
    fn stress_path_plot_is_deterministic() {
        let a = render_stress_path_plot(&[sample_series()], 60, 15);
        let b = render_stress_path_plot(&[sample_series()], 60, 15);
        assert_eq!(a, b);
        assert!(a.contains("q vs p"));
    }

    #[test]
    fn renderer_survives_degenerate_input() {
        let series = TestSeries {
            confining_pressure: 100.0,
            strain: vec![1.0, 1.0],
            stress: vec![50.0, 50.0],
            volumetric_strain: vec![0.0, 0.0],
        };
        let plot = render_stress_path_plot(&[series], 20, 8);
        assert!(!plot.is_empty());
    }
}
