//! Non-negative least squares by the Lawson-Hanson active-set method.
//!
//! Solves `min ||A x - b||_2` subject to `x >= 0` for small dense systems.
//! Each active-set step solves an unconstrained least-squares subproblem on
//! the free ("passive") columns with a column-pivoted Householder QR, so
//! linearly dependent columns are handled by pinning them at zero.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{MealError, Result};

/// Dense matrix stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ColumnMatrix {
    /// Build from columns of equal length.
    pub fn from_columns<I, C>(rows: usize, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[f64]>,
    {
        let mut data = Vec::new();
        let mut cols = 0;
        for column in columns {
            let column = column.as_ref();
            debug_assert_eq!(column.len(), rows);
            data.extend_from_slice(column);
            cols += 1;
        }
        Self { rows, cols, data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn column(&self, j: usize) -> &[f64] {
        &self.data[j * self.rows..(j + 1) * self.rows]
    }

    /// `A x`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.rows];
        for (j, &xj) in x.iter().enumerate().take(self.cols) {
            for (o, &a) in out.iter_mut().zip(self.column(j)) {
                *o += a * xj;
            }
        }
        out
    }

    /// `A^T v`.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.cols).map(|j| dot(self.column(j), v)).collect()
    }

    /// Maximum absolute column sum.
    pub fn norm_one(&self) -> f64 {
        (0..self.cols)
            .map(|j| self.column(j).iter().map(|a| a.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|a| a.is_finite())
    }
}

/// Converged NNLS result.
#[derive(Debug, Clone, PartialEq)]
pub struct NnlsSolution {
    pub x: Vec<f64>,
    /// Least-squares subproblems solved.
    pub iterations: usize,
    pub residual_norm: f64,
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `b - A x`.
pub fn residual(a: &ColumnMatrix, b: &[f64], x: &[f64]) -> Vec<f64> {
    a.mul_vec(x)
        .into_iter()
        .zip(b)
        .map(|(ax, bi)| bi - ax)
        .collect()
}

/// Least squares restricted to the given columns.
///
/// Returns one coefficient per entry of `columns`. Columns that are
/// numerically dependent on earlier pivots get a coefficient of 0.
pub fn least_squares_on(a: &ColumnMatrix, b: &[f64], columns: &[usize]) -> Vec<f64> {
    let m = a.rows();
    let k = columns.len();

    let mut work: Vec<Vec<f64>> = columns.iter().map(|&j| a.column(j).to_vec()).collect();
    let mut rhs = b.to_vec();
    let mut perm: Vec<usize> = (0..k).collect();

    let max_norm = work.iter().map(|c| norm(c)).fold(0.0, f64::max);
    let rank_tol = max_norm * f64::EPSILON * (m.max(k) as f64) * 10.0;

    let mut rank = 0;
    for s in 0..m.min(k) {
        let pivot = (s..k)
            .map(|j| (j, norm(&work[j][s..])))
            .max_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal));
        let Some((p, col_norm)) = pivot else {
            break;
        };
        if col_norm <= rank_tol {
            break;
        }

        work.swap(s, p);
        perm.swap(s, p);

        let alpha = if work[s][s] >= 0.0 { -col_norm } else { col_norm };
        let mut v = work[s][s..].to_vec();
        v[0] -= alpha;
        let v_norm_sq = dot(&v, &v);

        if v_norm_sq > 0.0 {
            for column in work.iter_mut().skip(s) {
                let scale = 2.0 * dot(&v, &column[s..]) / v_norm_sq;
                for (c, vi) in column[s..].iter_mut().zip(&v) {
                    *c -= scale * vi;
                }
            }
            let scale = 2.0 * dot(&v, &rhs[s..]) / v_norm_sq;
            for (r, vi) in rhs[s..].iter_mut().zip(&v) {
                *r -= scale * vi;
            }
        }
        rank += 1;
    }

    // Back substitution on the leading rank x rank triangle.
    let mut z = vec![0.0; rank];
    for i in (0..rank).rev() {
        let mut sum = rhs[i];
        for (j, zj) in z.iter().enumerate().skip(i + 1) {
            sum -= work[j][i] * zj;
        }
        z[i] = sum / work[i][i];
    }

    let mut out = vec![0.0; k];
    for (i, zi) in z.into_iter().enumerate() {
        out[perm[i]] = zi;
    }
    out
}

/// Solve `min ||A x - b||` subject to `x >= 0`.
///
/// `tolerance_scale` multiplies machine epsilon in the dual feasibility
/// test; `max_iterations` caps the number of subproblem solves. On hitting
/// the cap the last feasible iterate is returned inside the error.
pub fn nnls(
    a: &ColumnMatrix,
    b: &[f64],
    tolerance_scale: f64,
    max_iterations: usize,
) -> Result<NnlsSolution> {
    let n = a.cols();
    let tol = tolerance_scale * f64::EPSILON * a.norm_one() * (a.rows().max(n) as f64);

    let mut x = vec![0.0; n];
    let mut passive = vec![false; n];
    // Columns whose entry would immediately go non-positive from the current x.
    let mut blocked = vec![false; n];
    let mut iterations = 0;

    loop {
        let w = a.transpose_mul_vec(&residual(a, b, &x));

        let candidate = (0..n)
            .filter(|&j| !passive[j] && !blocked[j] && w[j] > tol)
            .max_by(|&i, &j| w[i].partial_cmp(&w[j]).unwrap_or(Ordering::Equal));
        let Some(entering) = candidate else {
            break;
        };

        passive[entering] = true;
        let mut first_step = true;

        loop {
            if iterations >= max_iterations {
                return Err(MealError::SolveFailed {
                    reason: format!("no convergence after {} iterations", iterations),
                    last_iterate: Some(x),
                });
            }
            iterations += 1;

            let columns: Vec<usize> = (0..n).filter(|&j| passive[j]).collect();
            let sub = least_squares_on(a, b, &columns);
            let mut z = vec![0.0; n];
            for (&j, zj) in columns.iter().zip(sub) {
                z[j] = zj;
            }

            if first_step && z[entering] <= 0.0 {
                // Round-off made the entering column useless; try another one.
                passive[entering] = false;
                blocked[entering] = true;
                break;
            }
            first_step = false;

            if columns.iter().all(|&j| z[j] > 0.0) {
                x = z;
                blocked.iter_mut().for_each(|flag| *flag = false);
                break;
            }

            let step = columns
                .iter()
                .filter(|&&j| z[j] <= 0.0)
                .map(|&j| {
                    let denom = x[j] - z[j];
                    if denom > 0.0 { x[j] / denom } else { 0.0 }
                })
                .fold(f64::INFINITY, f64::min);

            for (xj, zj) in x.iter_mut().zip(&z) {
                *xj += step * (zj - *xj);
            }
            for &j in &columns {
                if x[j] <= tol {
                    x[j] = 0.0;
                    passive[j] = false;
                }
            }
            blocked.iter_mut().for_each(|flag| *flag = false);
        }
    }

    for xj in x.iter_mut() {
        if xj.is_nan() || *xj <= 0.0 {
            *xj = 0.0;
        }
    }

    let residual_norm = norm(&residual(a, b, &x));
    debug!(
        "NNLS converged: n={}, iterations={}, residual={:.6}",
        n, iterations, residual_norm
    );

    Ok(NnlsSolution {
        x,
        iterations,
        residual_norm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(columns: &[[f64; 3]]) -> ColumnMatrix {
        ColumnMatrix::from_columns(3, columns.iter())
    }

    /// Dual feasibility and complementary slackness at the returned point.
    fn assert_kkt(a: &ColumnMatrix, b: &[f64], x: &[f64]) {
        let w = a.transpose_mul_vec(&residual(a, b, x));
        for (j, (&xj, &wj)) in x.iter().zip(&w).enumerate() {
            assert!(xj >= 0.0, "x[{}] = {} is negative", j, xj);
            assert!(wj <= 1e-8, "gradient w[{}] = {} still points into feasible set", j, wj);
            if xj > 0.0 {
                assert!(wj.abs() <= 1e-8, "free variable {} has w = {}", j, wj);
            }
        }
    }

    #[test]
    fn test_least_squares_full_rank() {
        let a = matrix(&[[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 0.5]]);
        let z = least_squares_on(&a, &[4.0, 8.0, 1.0], &[0, 1, 2]);
        assert!((z[0] - 2.0).abs() < 1e-12);
        assert!((z[1] - 2.0).abs() < 1e-12);
        assert!((z[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_pins_dependent_column() {
        let a = matrix(&[[1.0, 1.0, 0.0], [2.0, 2.0, 0.0]]);
        let z = least_squares_on(&a, &[3.0, 3.0, 0.0], &[0, 1]);
        let fitted = a.mul_vec(&z);
        assert!((fitted[0] - 3.0).abs() < 1e-9);
        assert!((fitted[1] - 3.0).abs() < 1e-9);
        assert!(z.iter().filter(|&&v| v == 0.0).count() >= 1);
    }

    #[test]
    fn test_constraint_binds() {
        // Unconstrained optimum is (-4, 3); with x >= 0 it is (0, 1).
        let a = matrix(&[[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        let b = [-1.0, 3.0, 0.0];
        let sol = nnls(&a, &b, 10.0, 100).unwrap();
        assert_eq!(sol.x[0], 0.0);
        assert!((sol.x[1] - 1.0).abs() < 1e-12);
        assert_kkt(&a, &b, &sol.x);
    }

    #[test]
    fn test_zero_matrix_returns_zero() {
        let a = matrix(&[[0.0; 3], [0.0; 3]]);
        let sol = nnls(&a, &[5.0, 5.0, 5.0], 10.0, 100).unwrap();
        assert_eq!(sol.x, vec![0.0, 0.0]);
        assert_eq!(sol.iterations, 0);
        assert!((sol.residual_norm - 75.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_columns_stay_feasible() {
        let a = matrix(&[[0.2, 0.1, 0.05], [0.2, 0.1, 0.05], [0.0, 0.7, 0.0]]);
        let b = [20.0, 30.0, 5.0];
        let sol = nnls(&a, &b, 10.0, 100).unwrap();
        assert!(sol.x.iter().all(|&v| v >= 0.0));
        assert_kkt(&a, &b, &sol.x);
    }

    #[test]
    fn test_iteration_cap_reports_last_iterate() {
        let a = matrix(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let err = nnls(&a, &[1.0, 1.0, 0.0], 10.0, 1).unwrap_err();
        match err {
            MealError::SolveFailed { last_iterate, .. } => {
                let x = last_iterate.unwrap();
                assert_eq!(x.len(), 2);
                assert!(x.iter().all(|&v| v >= 0.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
