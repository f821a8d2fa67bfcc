//! Linear and nonlinear system solvers.

pub mod gauss_jordan;
pub mod newton;

use crate::dense::DenseMatrix;
use crate::error::Result;
use crate::Scalar;

pub use gauss_jordan::GaussJordanSolver;
pub use newton::{NewtonParams, NewtonSolver};

/// A solver for dense linear systems Ax = b.
pub trait LinearSolver {
    /// Solve in place: `a` is destroyed and `rhs` is overwritten with x.
    fn solve(&self, a: &mut DenseMatrix, rhs: &mut [Scalar]) -> Result<()>;
}
