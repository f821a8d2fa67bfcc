//! Dense square matrix.
//!
//! Holds the MNA coefficient matrix. Stored as one flat row-major buffer
//! addressed by `(row, col)`; row/column 0 belongs to the ground node.

use crate::Scalar;
use std::ops::{Index, IndexMut};

/// Square matrix in flat row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    size: usize,
    values: Vec<Scalar>,
}

impl DenseMatrix {
    /// Create a `size` x `size` matrix of zeros.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build a matrix from row slices. Every row must have `rows.len()` entries.
    pub fn from_rows(rows: &[&[Scalar]]) -> Self {
        let size = rows.len();
        let mut m = Self::zeros(size);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "row {i} has {} entries, expected {size}", row.len());
            m.row_mut(i).copy_from_slice(row);
        }
        m
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reset every entry to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    pub fn row(&self, row: usize) -> &[Scalar] {
        &self.values[row * self.size..(row + 1) * self.size]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [Scalar] {
        &mut self.values[row * self.size..(row + 1) * self.size]
    }

    /// Exchange two complete rows.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.values.split_at_mut(hi * self.size);
        head[lo * self.size..(lo + 1) * self.size].swap_with_slice(&mut tail[..self.size]);
    }

    /// Matrix-vector multiply: y = A * x
    pub fn mul_vec(&self, x: &[Scalar]) -> Vec<Scalar> {
        assert_eq!(x.len(), self.size, "mul_vec dimension mismatch");
        (0..self.size)
            .map(|row| self.row(row).iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = Scalar;

    fn index(&self, (row, col): (usize, usize)) -> &Scalar {
        &self.values[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Scalar {
        &mut self.values[row * self.size + col]
    }
}
