//! Weighted linear least squares via Cholesky factorization of the normal
//! equations.
//!
//! No linear-algebra crate is pulled in for this: the teacher's dependency
//! stack carries none, and the legacy analysis core solved the same normal
//! equations by hand (`Math/Matrix.h`'s `Matrix::lls`) rather than via an
//! external library, so this follows the same shape.

use crate::result::{Error, Result};

/// The result of a weighted LLS solve: fitted coefficients, their standard
/// errors, and the residual standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct LlsFit {
    pub coefficients: Vec<f32>,
    pub standard_errors: Vec<f32>,
    pub residual_std_dev: f32,
}

/// Solves the weighted least-squares problem `y = Xβ` for `β`, given a
/// design matrix `x` (one row per observation, one column per coefficient),
/// per-observation weights `w`, and observations `y`.
///
/// Internally accumulates in `f64` to keep the normal-equation solve
/// numerically stable, then returns `f32` to match the single-precision
/// convention used throughout the rest of the analysis core.
///
/// Returns `Err(Error::Singular)` if the normal-equation matrix's
/// Cholesky factorization encounters a non-positive diagonal pivot.
pub fn solve(x: &[Vec<f64>], w: &[f64], y: &[f64]) -> Result<LlsFit> {
    let n = y.len();
    assert_eq!(x.len(), n, "design matrix must have one row per observation");
    assert_eq!(w.len(), n, "weights must have one entry per observation");
    let m = x.first().map(|row| row.len()).unwrap_or(0);
    assert!(m > 0, "design matrix must have at least one column");
    assert!(n >= m, "need at least as many observations as coefficients");

    let mut xtwx = vec![vec![0.0f64; m]; m];
    let mut xtwy = vec![0.0f64; m];
    for row in 0..n {
        let wi = w[row];
        for a in 0..m {
            xtwy[a] += wi * x[row][a] * y[row];
            for b in 0..m {
                xtwx[a][b] += wi * x[row][a] * x[row][b];
            }
        }
    }

    let l = cholesky(&xtwx)?;
    let beta = solve_normal_equations(&l, &xtwy);

    let mut weighted_rss = 0.0;
    for row in 0..n {
        let predicted: f64 = (0..m).map(|a| x[row][a] * beta[a]).sum();
        let residual = y[row] - predicted;
        weighted_rss += w[row] * residual * residual;
    }
    let dof = (n as f64 - m as f64).max(1.0);
    let residual_variance = weighted_rss / dof;

    let mut standard_errors = vec![0.0f64; m];
    for col in 0..m {
        let mut unit = vec![0.0f64; m];
        unit[col] = 1.0;
        let inverse_col = solve_normal_equations(&l, &unit);
        standard_errors[col] = (residual_variance * inverse_col[col]).sqrt();
    }

    Ok(LlsFit {
        coefficients: beta.iter().map(|v| *v as f32).collect(),
        standard_errors: standard_errors.iter().map(|v| *v as f32).collect(),
        residual_std_dev: residual_variance.sqrt() as f32,
    })
}

/// Lower-triangular Cholesky factor `L` of a symmetric positive-definite
/// matrix such that `A = L Lᵀ`. Returns `Err(Error::Singular)` at the first
/// non-positive diagonal pivot.
fn cholesky(a: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let m = a.len();
    let mut l = vec![vec![0.0f64; m]; m];
    for i in 0..m {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return Err(Error::Singular);
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Ok(l)
}

/// Solves `L Lᵀ x = b` given `L`'s Cholesky factor, via forward then
/// backward substitution.
fn solve_normal_equations(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let m = l.len();

    let mut z = vec![0.0f64; m];
    for i in 0..m {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[i][k] * z[k];
        }
        z[i] = sum / l[i][i];
    }

    let mut x = vec![0.0f64; m];
    for i in (0..m).rev() {
        let mut sum = z[i];
        for k in (i + 1)..m {
            sum -= l[k][i] * x[k];
        }
        x[i] = sum / l[i][i];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line_without_noise() {
        // y = 2 + 3x
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![1.0, i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| 2.0 + 3.0 * i as f64).collect();
        let w = vec![1.0; 10];

        let fit = solve(&x, &w, &y).unwrap();
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-4);
        assert!((fit.coefficients[1] - 3.0).abs() < 1e-4);
        assert!(fit.residual_std_dev < 1e-4);
    }

    #[test]
    fn rank_deficient_design_is_singular() {
        // Second column is a multiple of the first: XtWX is singular.
        let x: Vec<Vec<f64>> = (0..5).map(|_| vec![1.0, 2.0]).collect();
        let y: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let w = vec![1.0; 5];

        assert_eq!(solve(&x, &w, &y), Err(Error::Singular));
    }

    #[test]
    fn weighting_pulls_fit_toward_heavier_observations() {
        let x: Vec<Vec<f64>> = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![1.0, 2.0]];
        let y = vec![0.0, 10.0, 0.0];
        let w_uniform = vec![1.0, 1.0, 1.0];
        let w_weighted = vec![1.0, 100.0, 1.0];

        let uniform = solve(&x, &w_uniform, &y).unwrap();
        let weighted = solve(&x, &w_weighted, &y).unwrap();

        // Predicted value at x=1 should be much closer to 10 when that
        // observation is heavily weighted.
        let predict = |fit: &LlsFit, xi: f64| fit.coefficients[0] as f64 + fit.coefficients[1] as f64 * xi;
        assert!((predict(&weighted, 1.0) - 10.0).abs() < (predict(&uniform, 1.0) - 10.0).abs());
    }
}
