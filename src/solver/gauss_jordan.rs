//! Dense direct solver using Gauss-Jordan elimination with partial pivoting.
//!
//! Every pivot column is eliminated from all other rows, above and below the
//! pivot, so the right-hand side holds the solution once the sweep ends and no
//! back substitution is needed. Rows and columns before `first_index` are left
//! untouched and their unknowns are forced to zero (index 0 is ground).

use crate::dense::DenseMatrix;
use crate::error::{AmspiceError, Result};
use crate::Scalar;

/// Smallest pivot magnitude accepted before the system is declared singular.
pub const PIVOT_THRESHOLD: Scalar = 1e-9;

/// Gauss-Jordan solver for the MNA system.
#[derive(Debug, Clone, Copy)]
pub struct GaussJordanSolver {
    first_index: usize,
    pivot_threshold: Scalar,
}

impl GaussJordanSolver {
    /// Solver that skips the ground row and column.
    pub fn new() -> Self {
        Self {
            first_index: 1,
            pivot_threshold: PIVOT_THRESHOLD,
        }
    }

    /// Solver that starts elimination at `first_index` instead of 1.
    pub fn with_first_index(first_index: usize) -> Self {
        Self {
            first_index,
            ..Self::new()
        }
    }
}

impl Default for GaussJordanSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl super::LinearSolver for GaussJordanSolver {
    fn solve(&self, a: &mut DenseMatrix, rhs: &mut [Scalar]) -> Result<()> {
        let n = a.size();
        if rhs.len() != n {
            return Err(AmspiceError::InvalidAnalysis(format!(
                "dimension mismatch: matrix is {n}x{n}, rhs length is {}",
                rhs.len()
            )));
        }
        let first = self.first_index.min(n);

        for i in first..n {
            // Find pivot row
            let mut max_val = a[(i, i)].abs();
            let mut max_row = i;
            for k in (i + 1)..n {
                let v = a[(k, i)].abs();
                if v > max_val {
                    max_val = v;
                    max_row = k;
                }
            }

            if max_val < self.pivot_threshold {
                return Err(AmspiceError::SingularSystem { row: i });
            }

            if max_row != i {
                a.swap_rows(i, max_row);
                rhs.swap(i, max_row);
            }

            // Normalize the pivot row
            let pivot = a[(i, i)];
            for j in first..n {
                a[(i, j)] /= pivot;
            }
            rhs[i] /= pivot;

            // Eliminate column i from every other row
            for k in first..n {
                if k == i {
                    continue;
                }
                let factor = a[(k, i)];
                if factor == 0.0 {
                    continue;
                }
                for j in first..n {
                    let aij = a[(i, j)];
                    a[(k, j)] -= factor * aij;
                }
                rhs[k] -= factor * rhs[i];
            }
        }

        rhs[..first].fill(0.0);
        Ok(())
    }
}
