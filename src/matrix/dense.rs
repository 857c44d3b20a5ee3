use std::fmt;

use ndarray::Array2;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use rand::Rng;

use super::{Layout, Matrix, SparseMatrix, pretty};
use crate::error::{MathError, Result};

/// A matrix backed by a flat row-major buffer.
///
/// Element `(i, j)` lives at `i * step + j`. Owned matrices built by the
/// factories below are compact (`step == cols`); `from_strided` accepts a
/// wider `step` for buffers that pad their rows.
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    layout: Layout,
    elements: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 1.0)
    }

    fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            layout: Layout::compact(rows, cols),
            elements: vec![value; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.elements[i * n + i] = 1.0;
        }
        m
    }

    /// Square matrix with `values` on the diagonal.
    pub fn diagonal(values: &[f64]) -> Self {
        let n = values.len();
        let mut m = Self::zeros(n, n);
        for (i, &v) in values.iter().enumerate() {
            m.elements[i * n + i] = v;
        }
        m
    }

    /// Wraps `elements` laid out row after row.
    pub fn from_row_major(elements: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if elements.len() != rows * cols {
            return Err(MathError::DimensionMismatch {
                what: "row-major data length",
                expected: rows * cols,
                got: elements.len(),
            });
        }
        Ok(Self {
            layout: Layout::compact(rows, cols),
            elements,
        })
    }

    /// Wraps a buffer whose rows start `step` elements apart.
    pub fn from_strided(elements: Vec<f64>, rows: usize, cols: usize, step: usize) -> Result<Self> {
        if step < cols {
            return Err(MathError::DimensionMismatch {
                what: "row step",
                expected: cols,
                got: step,
            });
        }
        let layout = Layout { rows, cols, step };
        if elements.len() < layout.span() {
            return Err(MathError::DimensionMismatch {
                what: "strided data length",
                expected: layout.span(),
                got: elements.len(),
            });
        }
        Ok(Self { layout, elements })
    }

    /// Builds a matrix from equally sized rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut elements = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MathError::DimensionMismatch {
                    what: "row length",
                    expected: cols,
                    got: row.len(),
                });
            }
            elements.extend_from_slice(row);
        }
        Self::from_row_major(elements, rows.len(), cols)
    }

    /// Each element drawn independently from a standard normal distribution.
    pub fn random_normal(rows: usize, cols: usize) -> Self {
        Self::random_normal_using(rows, cols, &mut rand::thread_rng())
    }

    pub fn random_normal_using<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let draws = Array2::<f64>::random_using((rows, cols), StandardNormal, rng);
        Self::from_array2(&draws)
    }

    /// Dense copy of any matrix.
    pub fn from_matrix<M: Matrix + ?Sized>(m: &M) -> Self {
        let (rows, cols) = m.dimension();
        let mut out = Self::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                out.elements[i * cols + j] = m.get(i as isize, j as isize).unwrap_or_default();
            }
        }
        out
    }

    pub fn from_array2(array: &Array2<f64>) -> Self {
        let (rows, cols) = array.dim();
        Self {
            layout: Layout::compact(rows, cols),
            elements: array.iter().copied().collect(),
        }
    }

    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.layout.rows, self.layout.cols), |(i, j)| self.at(i, j))
    }

    /// Distance between the starts of consecutive rows.
    pub fn step(&self) -> usize {
        self.layout.step
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.elements[self.layout.index(i, j)]
    }

    /// Row-major copy of the logical elements, without row padding.
    pub fn array(&self) -> Vec<f64> {
        self.arrays().concat()
    }

    /// One slice per row, borrowed from this matrix.
    pub fn arrays(&self) -> Vec<&[f64]> {
        let Layout { rows, cols, step } = self.layout;
        if cols == 0 {
            return vec![&[][..]; rows];
        }
        self.elements
            .chunks(step)
            .take(rows)
            .map(|row| &row[..cols])
            .collect()
    }

    /// One mutable slice per row. Writes through them land in this matrix.
    pub fn arrays_mut(&mut self) -> Vec<&mut [f64]> {
        let Layout { rows, cols, step } = self.layout;
        if cols == 0 {
            return (0..rows).map(|_| <&mut [f64]>::default()).collect();
        }
        self.elements
            .chunks_mut(step)
            .take(rows)
            .map(|row| &mut row[..cols])
            .collect()
    }

    pub fn row_slice(&self, i: usize) -> Result<&[f64]> {
        let start = self.row_start(i)?;
        Ok(&self.elements[start..start + self.layout.cols])
    }

    /// Mutable slice over row `i`, aliasing this matrix.
    pub fn row_slice_mut(&mut self, i: usize) -> Result<&mut [f64]> {
        let start = self.row_start(i)?;
        Ok(&mut self.elements[start..start + self.layout.cols])
    }

    fn row_start(&self, i: usize) -> Result<usize> {
        if i >= self.layout.rows {
            return Err(MathError::illegal_2d(i as isize, 0, self.layout.rows, self.layout.cols));
        }
        Ok(i * self.layout.step)
    }

    /// Copies the `rows` x `cols` block whose top-left corner is `(i, j)`.
    pub fn sub_matrix(&self, i: usize, j: usize, rows: usize, cols: usize) -> Result<Self> {
        self.layout.check_block(i, j, rows, cols)?;
        let mut elements = Vec::with_capacity(rows * cols);
        for r in i..i + rows {
            let start = self.layout.index(r, j);
            elements.extend_from_slice(&self.elements[start..start + cols]);
        }
        Self::from_row_major(elements, rows, cols)
    }

    /// Copy of row `i` as a 1 x cols matrix.
    pub fn row_vector(&self, i: usize) -> Result<Self> {
        self.sub_matrix(i, 0, 1, self.layout.cols)
    }

    /// Copy of column `j` as a rows x 1 matrix.
    pub fn col_vector(&self, j: usize) -> Result<Self> {
        self.sub_matrix(0, j, self.layout.rows, 1)
    }

    /// Deep, compact copy.
    pub fn copy(&self) -> Self {
        Self {
            layout: Layout::compact(self.layout.rows, self.layout.cols),
            elements: self.array(),
        }
    }

    /// Mutable window over a block of this matrix. Writes land in `self`.
    pub fn view_mut(&mut self, i: usize, j: usize, rows: usize, cols: usize) -> Result<DenseViewMut<'_>> {
        self.layout.check_block(i, j, rows, cols)?;
        let layout = Layout { rows, cols, step: self.layout.step };
        let span = layout.span();
        let elements = if span == 0 {
            &mut self.elements[..0]
        } else {
            let start = self.layout.index(i, j);
            &mut self.elements[start..start + span]
        };
        Ok(DenseViewMut { layout, elements })
    }

    /// Mutable 1 x cols window over row `i`.
    pub fn row_view_mut(&mut self, i: usize) -> Result<DenseViewMut<'_>> {
        let cols = self.layout.cols;
        self.view_mut(i, 0, 1, cols)
    }

    /// Writes `other` into `self` with `other`'s `(0, 0)` landing on `(i, j)`.
    pub fn set_matrix<M: Matrix + ?Sized>(&mut self, i: usize, j: usize, other: &M) -> Result<()> {
        let (rows, cols) = other.dimension();
        if i.saturating_add(rows) > self.layout.rows {
            return Err(MathError::DimensionMismatch {
                what: "set_matrix rows",
                expected: self.layout.rows,
                got: i.saturating_add(rows),
            });
        }
        if j.saturating_add(cols) > self.layout.cols {
            return Err(MathError::DimensionMismatch {
                what: "set_matrix cols",
                expected: self.layout.cols,
                got: j.saturating_add(cols),
            });
        }
        for r in 0..rows {
            for c in 0..cols {
                let idx = self.layout.index(i + r, j + c);
                self.elements[idx] = other.get(r as isize, c as isize)?;
            }
        }
        Ok(())
    }

    /// `[self | other]`
    pub fn augment(&self, other: &DenseMatrix) -> Result<Self> {
        if self.layout.rows != other.layout.rows {
            return Err(MathError::DimensionMismatch {
                what: "augment rows",
                expected: self.layout.rows,
                got: other.layout.rows,
            });
        }
        let mut out = Self::zeros(self.layout.rows, self.layout.cols + other.layout.cols);
        out.set_matrix(0, 0, self)?;
        out.set_matrix(0, self.layout.cols, other)?;
        Ok(out)
    }

    /// `[self; other]`
    pub fn stack(&self, other: &DenseMatrix) -> Result<Self> {
        if self.layout.cols != other.layout.cols {
            return Err(MathError::DimensionMismatch {
                what: "stack cols",
                expected: self.layout.cols,
                got: other.layout.cols,
            });
        }
        let mut out = Self::zeros(self.layout.rows + other.layout.rows, self.layout.cols);
        out.set_matrix(0, 0, self)?;
        out.set_matrix(self.layout.rows, 0, other)?;
        Ok(out)
    }

    pub fn to_sparse(&self) -> SparseMatrix {
        SparseMatrix::from_matrix(self)
    }
}

impl Matrix for DenseMatrix {
    fn rows(&self) -> usize {
        self.layout.rows
    }

    fn cols(&self) -> usize {
        self.layout.cols
    }

    fn get(&self, i: isize, j: isize) -> Result<f64> {
        let idx = self.layout.offset(i, j)?;
        Ok(self.elements[idx])
    }

    fn set(&mut self, i: isize, j: isize, value: f64) -> Result<()> {
        let idx = self.layout.offset(i, j)?;
        self.elements[idx] = value;
        Ok(())
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.dimension() == other.dimension() && self.arrays() == other.arrays()
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty(self))
    }
}

/// A mutable window into a `DenseMatrix`.
///
/// The window keeps its parent's row step, so it addresses the parent's
/// buffer in place. It cannot outlive the borrow it was created from.
#[derive(Debug)]
pub struct DenseViewMut<'a> {
    layout: Layout,
    elements: &'a mut [f64],
}

impl DenseViewMut<'_> {
    pub fn step(&self) -> usize {
        self.layout.step
    }

    /// Compact owned copy of the window.
    pub fn to_dense(&self) -> DenseMatrix {
        DenseMatrix::from_matrix(self)
    }
}

impl Matrix for DenseViewMut<'_> {
    fn rows(&self) -> usize {
        self.layout.rows
    }

    fn cols(&self) -> usize {
        self.layout.cols
    }

    fn get(&self, i: isize, j: isize) -> Result<f64> {
        let idx = self.layout.offset(i, j)?;
        Ok(self.elements[idx])
    }

    fn set(&mut self, i: isize, j: isize, value: f64) -> Result<()> {
        let idx = self.layout.offset(i, j)?;
        self.elements[idx] = value;
        Ok(())
    }
}

impl fmt::Display for DenseViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty(self))
    }
}
