//! Matrices backed by dense or sparse storage behind one `Matrix` contract.
//!
//! This module provides:
//! - `Matrix`: the shared access contract (shape, `get`, `set`)
//! - `DenseMatrix`: flat row-major storage with strict bounds checks
//! - `DenseViewMut`: a mutable window aliasing a `DenseMatrix`
//! - `SparseMatrix`: key/value storage where absent entries are zero and
//!   indices wrap around the matrix shape
//!
//! Every implementation shares the same pretty-printed form, produced by
//! [`pretty`].
//!
//! # Examples
//!
//! ## Dense views and copies
//! ```rust
//! use sparsefeat::{DenseMatrix, Matrix};
//!
//! let data: Vec<f64> = (1..=16).map(f64::from).collect();
//! let mut m = DenseMatrix::from_row_major(data, 4, 4).unwrap();
//!
//! // Row slices alias the parent.
//! m.row_slice_mut(0).unwrap()[0] = 100.0;
//! assert_eq!(m.get(0, 0).unwrap(), 100.0);
//!
//! // Submatrices are copies.
//! let mut sub = m.sub_matrix(1, 1, 2, 2).unwrap();
//! sub.set(0, 0, -1.0).unwrap();
//! assert_eq!(m.get(1, 1).unwrap(), 6.0);
//! assert_eq!(sub.to_string(), "{-1,  7,\n 10, 11}");
//! ```
//!
//! ## Sparse wraparound indexing
//! ```rust
//! use sparsefeat::{Matrix, SparseMatrix};
//!
//! let mut s = SparseMatrix::zeros(3, 3);
//! s.set(-1, 0, 5.0).unwrap();
//! assert_eq!(s.get(2, 0).unwrap(), 5.0);
//! assert_eq!(s.get(5, 3).unwrap(), 5.0);
//! ```

mod dense;
mod sparse;

pub use dense::{DenseMatrix, DenseViewMut};
pub use sparse::SparseMatrix;

use crate::error::{MathError, Result};

/// Shape and element access shared by every matrix storage.
pub trait Matrix {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn cols(&self) -> usize;

    /// Value at row `i`, column `j`.
    fn get(&self, i: isize, j: isize) -> Result<f64>;

    /// Stores `value` at row `i`, column `j`.
    fn set(&mut self, i: isize, j: isize, value: f64) -> Result<()>;

    fn num_elements(&self) -> usize {
        self.rows() * self.cols()
    }

    /// `(rows, cols)`
    fn dimension(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }
}

/// Renders any matrix as `{a, b,\n c, d}` with right-aligned cells.
///
/// Each value is printed with six decimals, then trailing zeros and a
/// dangling decimal point are trimmed. All cells are padded to the width
/// of the widest one.
pub fn pretty<M: Matrix + ?Sized>(m: &M) -> String {
    let (rows, cols) = m.dimension();
    let cells: Vec<String> = (0..rows)
        .flat_map(|i| (0..cols).map(move |j| (i, j)))
        .map(|(i, j)| condense(m.get(i as isize, j as isize).unwrap_or_default()))
        .collect();
    let width = cells.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::from("{");
    for i in 0..rows {
        for j in 0..cols {
            out.push_str(&format!("{:>width$}", cells[i * cols + j]));
            if i != rows - 1 || j != cols - 1 {
                out.push(',');
            }
            if j != cols - 1 {
                out.push(' ');
            }
        }
        if i != rows - 1 {
            out.push_str("\n ");
        }
    }
    out.push('}');
    out
}

fn condense(value: f64) -> String {
    let s = format!("{:.6}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0');
        trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
    } else {
        s
    }
}

/// Maps a logical `(i, j)` onto a flat buffer as `i * step + j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub step: usize,
}

impl Layout {
    pub fn compact(rows: usize, cols: usize) -> Self {
        Self { rows, cols, step: cols }
    }

    /// Smallest buffer length able to hold every logical element.
    pub fn span(&self) -> usize {
        if self.rows == 0 || self.cols == 0 {
            0
        } else {
            (self.rows - 1) * self.step + self.cols
        }
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.step + j
    }

    /// Bounds-checked offset of `(i, j)`.
    pub fn offset(&self, i: isize, j: isize) -> Result<usize> {
        if i < 0 || j < 0 || i as usize >= self.rows || j as usize >= self.cols {
            return Err(MathError::illegal_2d(i, j, self.rows, self.cols));
        }
        Ok(self.index(i as usize, j as usize))
    }

    /// Checks that a `rows` x `cols` block anchored at `(i, j)` fits.
    pub fn check_block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Result<()> {
        let fits_rows = i.checked_add(rows).is_some_and(|end| end <= self.rows);
        let fits_cols = j.checked_add(cols).is_some_and(|end| end <= self.cols);
        if fits_rows && fits_cols {
            Ok(())
        } else {
            Err(MathError::IllegalIndex {
                index: vec![i as isize, j as isize, rows as isize, cols as isize],
                shape: vec![self.rows, self.cols],
            })
        }
    }
}
