//! Ordinary least squares.
//!
//! Every regression in this project is a straight line through a handful of
//! points (peak stress vs confinement, log-stiffness vs log stress ratio,
//! the hyperbolic transform). We still go through a proper least-squares
//! solve rather than hand-rolled normal equations:
//!
//! - SVD handles near-collinear inputs without blowing up
//! - the same code path serves every estimator, so failure behavior is uniform
//!
//! Degenerate regressors (zero variance in x) are rejected *before* the
//! solve: a rank-deficient SVD would otherwise return a minimum-norm
//! solution and silently hide the degeneracy.

use nalgebra::{DMatrix, DVector};

/// Slope/intercept of a fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = slope * x + intercept` by ordinary least squares.
///
/// Returns `None` when:
/// - fewer than 2 points
/// - any input is non-finite
/// - `x` has (numerically) zero variance
/// - the solve itself fails
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<Line> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let mean = x.iter().sum::<f64>() / n as f64;
    let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
    if var <= f64::EPSILON * n as f64 * mean.abs().max(1.0) {
        return None;
    }

    let mut design = DMatrix::<f64>::zeros(n, 2);
    let mut obs = DVector::<f64>::zeros(n);
    for i in 0..n {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x[i];
        obs[i] = y[i];
    }

    let beta = solve_least_squares(&design, &obs)?;
    Some(Line {
        slope: beta[1],
        intercept: beta[0],
    })
}

/// Arithmetic mean. `None` for an empty slice, so callers have to decide what
/// an empty collection means instead of inheriting a NaN.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
