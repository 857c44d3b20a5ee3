use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use rand::Rng;

use super::{DenseMatrix, Layout, Matrix, pretty};
use crate::error::{MathError, Result};

/// A matrix holding only its non-zero entries.
///
/// Entry `(i, j)` is stored under the key `i * step + j + offset`; absent
/// keys read as zero and writing zero removes the key. `step` and `offset`
/// let a matrix address a window of a larger key space, which is how
/// [`SparseMatrix::from_parts`] describes a view. Every operation that
/// builds a new matrix produces a compact one (`step == cols`, `offset == 0`).
///
/// Unlike [`DenseMatrix`], indices wrap: `get(i, j)` reads
/// `(i mod rows, j mod cols)` using floor modulo, so `get(-1, 0)` is the
/// last row. Only an empty dimension rejects an index.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    layout: Layout,
    offset: usize,
    elements: BTreeMap<usize, f64>,
}

impl SparseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            layout: Layout::compact(rows, cols),
            offset: 0,
            elements: BTreeMap::new(),
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::from_map((0..rows * cols).map(|key| (key, 1.0)), rows, cols)
    }

    pub fn identity(n: usize) -> Self {
        Self::diagonal(&vec![1.0; n])
    }

    /// Square matrix with `values` on the diagonal; zeros stay absent.
    pub fn diagonal(values: &[f64]) -> Self {
        let n = values.len();
        Self::from_map(values.iter().enumerate().map(|(i, &v)| (i * n + i, v)), n, n)
    }

    /// Each element drawn independently from a standard normal distribution.
    pub fn random_normal(rows: usize, cols: usize) -> Self {
        Self::random_normal_using(rows, cols, &mut rand::thread_rng())
    }

    pub fn random_normal_using<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let draws = Array2::<f64>::random_using((rows, cols), StandardNormal, rng);
        Self::from_map(draws.iter().copied().enumerate(), rows, cols)
    }

    /// Compact matrix over row-major keys `i * cols + j`.
    ///
    /// Zero values and keys at or past `rows * cols` are dropped.
    pub fn from_map<I>(elements: I, rows: usize, cols: usize) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut m = Self::zeros(rows, cols);
        let len = rows * cols;
        for (key, value) in elements {
            if key < len {
                m.set_value(key, value);
            } else {
                log::debug!("from_map: key {} outside {}x{}, dropped", key, rows, cols);
            }
        }
        m
    }

    /// A matrix over an existing key space with an explicit affine embedding.
    ///
    /// Keys that fall outside the `rows` x `cols` window stay in storage but
    /// are invisible to reads, [`indices`](Self::indices) and every derived
    /// matrix.
    pub fn from_parts(
        elements: BTreeMap<usize, f64>,
        rows: usize,
        cols: usize,
        step: usize,
        offset: usize,
    ) -> Result<Self> {
        if step < cols {
            return Err(MathError::DimensionMismatch {
                what: "row step",
                expected: cols,
                got: step,
            });
        }
        log::debug!(
            "sparse view {}x{} (step {}, offset {}) over {} stored keys",
            rows,
            cols,
            step,
            offset,
            elements.len()
        );
        let elements = elements.into_iter().filter(|&(_, v)| v != 0.0).collect();
        Ok(Self {
            layout: Layout { rows, cols, step },
            offset,
            elements,
        })
    }

    /// Sparse copy of any matrix, skipping zero entries.
    pub fn from_matrix<M: Matrix + ?Sized>(m: &M) -> Self {
        let (rows, cols) = m.dimension();
        let mut out = Self::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let value = m.get(i as isize, j as isize).unwrap_or_default();
                out.set_value(i * cols + j, value);
            }
        }
        out
    }

    pub fn step(&self) -> usize {
        self.layout.step
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Storage key of the in-bounds position `(i, j)`.
    #[inline]
    fn key(&self, i: usize, j: usize) -> usize {
        self.layout.index(i, j) + self.offset
    }

    /// Splits a storage key into `(row, col)` under this matrix's embedding.
    ///
    /// The column may exceed `cols` when `step > cols`; use
    /// [`position`](Self::position) for a bounds-checked answer.
    pub fn row_col_index(&self, key: usize) -> Option<(usize, usize)> {
        let local = key.checked_sub(self.offset)?;
        if self.layout.step == 0 {
            return None;
        }
        Some((local / self.layout.step, local % self.layout.step))
    }

    /// `(row, col)` of `key` if it lies inside this matrix.
    pub fn position(&self, key: usize) -> Option<(usize, usize)> {
        self.row_col_index(key)
            .filter(|&(i, j)| i < self.layout.rows && j < self.layout.cols)
    }

    /// Raw lookup by storage key.
    pub fn get_value(&self, key: usize) -> f64 {
        self.elements.get(&key).copied().unwrap_or(0.0)
    }

    /// Raw store by storage key; zero removes the key.
    pub fn set_value(&mut self, key: usize, value: f64) {
        if value == 0.0 {
            self.elements.remove(&key);
        } else {
            self.elements.insert(key, value);
        }
    }

    /// Keys of the populated entries inside this matrix, in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements
            .keys()
            .copied()
            .filter(move |&key| self.position(key).is_some())
    }

    /// Populated entries inside this matrix as `(row, col, value)`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.elements
            .iter()
            .filter_map(move |(&key, &value)| self.position(key).map(|(i, j)| (i, j, value)))
    }

    /// Number of populated entries inside this matrix.
    pub fn nnz(&self) -> usize {
        self.indices().count()
    }

    fn wrap(&self, i: isize, j: isize) -> Result<(usize, usize)> {
        let Layout { rows, cols, .. } = self.layout;
        if rows == 0 || cols == 0 {
            return Err(MathError::illegal_2d(i, j, rows, cols));
        }
        Ok((
            i.rem_euclid(rows as isize) as usize,
            j.rem_euclid(cols as isize) as usize,
        ))
    }

    fn collect_entries<F>(&self, rows: usize, cols: usize, mut place: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<(usize, usize)>,
    {
        let mut out = Self::zeros(rows, cols);
        for (i, j, value) in self.entries() {
            if let Some((r, c)) = place(i, j) {
                out.elements.insert(r * cols + c, value);
            }
        }
        out
    }

    /// Copies the `rows` x `cols` block whose top-left corner is `(i, j)`.
    pub fn sub_matrix(&self, i: usize, j: usize, rows: usize, cols: usize) -> Result<Self> {
        self.layout.check_block(i, j, rows, cols)?;
        Ok(self.collect_entries(rows, cols, |r, c| {
            let inside = (i..i + rows).contains(&r) && (j..j + cols).contains(&c);
            inside.then(|| (r - i, c - j))
        }))
    }

    pub fn row_vector(&self, i: usize) -> Result<Self> {
        self.sub_matrix(i, 0, 1, self.layout.cols)
    }

    pub fn col_vector(&self, j: usize) -> Result<Self> {
        self.sub_matrix(0, j, self.layout.rows, 1)
    }

    /// `[self | other]`
    pub fn augment(&self, other: &SparseMatrix) -> Result<Self> {
        if self.layout.rows != other.layout.rows {
            return Err(MathError::DimensionMismatch {
                what: "augment rows",
                expected: self.layout.rows,
                got: other.layout.rows,
            });
        }
        let shift = self.layout.cols;
        let mut out = self.collect_entries(self.layout.rows, shift + other.layout.cols, |i, j| Some((i, j)));
        for (i, j, value) in other.entries() {
            out.elements.insert(i * out.layout.cols + j + shift, value);
        }
        Ok(out)
    }

    /// `[self; other]`
    pub fn stack(&self, other: &SparseMatrix) -> Result<Self> {
        if self.layout.cols != other.layout.cols {
            return Err(MathError::DimensionMismatch {
                what: "stack cols",
                expected: self.layout.cols,
                got: other.layout.cols,
            });
        }
        let shift = self.layout.rows;
        let cols = self.layout.cols;
        let mut out = self.collect_entries(shift + other.layout.rows, cols, |i, j| Some((i, j)));
        for (i, j, value) in other.entries() {
            out.elements.insert((i + shift) * cols + j, value);
        }
        Ok(out)
    }

    /// Entries on or below the diagonal.
    pub fn lower_triangular(&self) -> Self {
        self.collect_entries(self.layout.rows, self.layout.cols, |i, j| (i >= j).then_some((i, j)))
    }

    /// Entries on or above the diagonal.
    pub fn upper_triangular(&self) -> Self {
        self.collect_entries(self.layout.rows, self.layout.cols, |i, j| (i <= j).then_some((i, j)))
    }

    /// Compact copy with a zero offset.
    pub fn copy(&self) -> Self {
        self.collect_entries(self.layout.rows, self.layout.cols, |i, j| Some((i, j)))
    }

    pub fn to_dense(&self) -> DenseMatrix {
        let mut out = DenseMatrix::zeros(self.layout.rows, self.layout.cols);
        {
            let mut rows = out.arrays_mut();
            for (i, j, value) in self.entries() {
                rows[i][j] = value;
            }
        }
        out
    }
}

impl Matrix for SparseMatrix {
    fn rows(&self) -> usize {
        self.layout.rows
    }

    fn cols(&self) -> usize {
        self.layout.cols
    }

    fn get(&self, i: isize, j: isize) -> Result<f64> {
        let (i, j) = self.wrap(i, j)?;
        Ok(self.get_value(self.key(i, j)))
    }

    fn set(&mut self, i: isize, j: isize, value: f64) -> Result<()> {
        let (i, j) = self.wrap(i, j)?;
        let key = self.key(i, j);
        self.set_value(key, value);
        Ok(())
    }
}

impl PartialEq for SparseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.dimension() == other.dimension() && self.entries().eq(other.entries())
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty(self))
    }
}
