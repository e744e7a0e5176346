//! Dynamically sized matrix of `f32` entries.
//!
//! # Convention
//! - Storage is row-major, indexed as `m[(row, col)]`
//! - Points are **column vectors** on the right: a point is a 4x1 matrix `[x, y, z, 1]`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * p` applies B first, then A
//!
//! In practice the camera stage only ever builds 4x4 transforms and 4x1
//! points, but the dimensions are carried at runtime so both fit in one type.
//! Multiplying matrices whose inner dimensions differ is a programming error
//! and panics.

use std::ops::{Index, IndexMut, Mul};

use super::vec3::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Creates a `rows x cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Builds a matrix from fixed-width rows.
    pub fn from_rows<const C: usize>(rows: &[[f32; C]]) -> Self {
        Self {
            rows: rows.len(),
            cols: C,
            data: rows.iter().flatten().copied().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Access element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self[(row, col)]
    }

    /// Set element at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self[(row, col)] = value;
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                result[(col, row)] = self[(row, col)];
            }
        }
        result
    }

    /// Computes the inverse of a square matrix, if it exists.
    ///
    /// Uses Gauss-Jordan elimination with partial pivoting. Returns `None` if
    /// the matrix is singular (a pivot vanishes).
    ///
    /// # Panics
    /// Panics if the matrix is not square.
    pub fn inverse(&self) -> Option<Self> {
        assert_eq!(
            self.rows, self.cols,
            "cannot invert a {}x{} matrix",
            self.rows, self.cols
        );
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Self::identity(n);

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&a, &b| work[(a, col)].abs().total_cmp(&work[(b, col)].abs()))?;
            let pivot = work[(pivot_row, col)];
            if pivot.abs() < f32::EPSILON {
                return None;
            }
            work.swap_rows(col, pivot_row);
            inv.swap_rows(col, pivot_row);

            let inv_pivot = 1.0 / pivot;
            for c in 0..n {
                work[(col, c)] *= inv_pivot;
                inv[(col, c)] *= inv_pivot;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = work[(row, col)];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..n {
                    work[(row, c)] -= factor * work[(col, c)];
                    inv[(row, c)] -= factor * inv[(col, c)];
                }
            }
        }

        Some(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    /// Converts a 4x1 homogeneous point back to a `Vec3`, dividing by w.
    ///
    /// A zero w leaves the coordinates undivided.
    ///
    /// # Panics
    /// Panics if the matrix is not 4x1.
    pub fn to_point(&self) -> Vec3 {
        assert!(
            self.rows == 4 && self.cols == 1,
            "expected a 4x1 point, got {}x{}",
            self.rows,
            self.cols
        );
        let w = self.data[3];
        let p = Vec3::new(self.data[0], self.data[1], self.data[2]);
        if w != 0.0 && w != 1.0 {
            p / w
        } else {
            p
        }
    }

    /// Returns the homogeneous w a 4x4 transform assigns to point `v`.
    pub fn w_of(&self, v: Vec3) -> f32 {
        self[(3, 0)] * v.x + self[(3, 1)] * v.y + self[(3, 2)] * v.z + self[(3, 3)]
    }

    /// Transforms a point (w = 1) and applies the perspective divide.
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        (self * &Matrix::from(v)).to_point()
    }
}

/// Embeds a point as a 4x1 homogeneous column with w = 1.
impl From<Vec3> for Matrix {
    fn from(v: Vec3) -> Self {
        Self {
            rows: 4,
            cols: 1,
            data: vec![v.x, v.y, v.z, 1.0],
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}

/// Matrix multiplication.
///
/// # Panics
/// Panics if `lhs.cols != rhs.rows`.
impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        assert_eq!(
            self.cols, rhs.rows,
            "cannot multiply {}x{} by {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols
        );
        let mut result = Matrix::zeros(self.rows, rhs.cols);
        for row in 0..self.rows {
            for col in 0..rhs.cols {
                result[(row, col)] = (0..self.cols)
                    .map(|k| self[(row, k)] * rhs[(k, col)])
                    .sum();
            }
        }
        result
    }
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        &self * &rhs
    }
}
