use std::collections::BTreeMap;

use ndarray::{Array1, Zip};

use crate::error::{MathError, Result};

/// A 1-D container that is either dense or sparse for its whole life.
///
/// A dense vector covers `[0, len)` and rejects indices past its end. A
/// sparse vector accepts any index, reads missing entries as zero and never
/// stores an explicit zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Dense(Array1<f64>),
    Sparse(BTreeMap<usize, f64>),
}

impl Vector {
    /// Dense vector of `len` zeros.
    pub fn dense(len: usize) -> Self {
        Vector::Dense(Array1::zeros(len))
    }

    /// Empty sparse vector.
    pub fn sparse() -> Self {
        Vector::Sparse(BTreeMap::new())
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Vector::Sparse(_))
    }

    /// True when both vectors are dense or both are sparse.
    pub fn is_homogeneous(&self, other: &Vector) -> bool {
        self.is_sparse() == other.is_sparse()
    }

    /// Length of a dense vector; `None` for a sparse one.
    pub fn dimension(&self) -> Option<usize> {
        match self {
            Vector::Dense(values) => Some(values.len()),
            Vector::Sparse(_) => None,
        }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        match self {
            Vector::Dense(values) => values.len(),
            Vector::Sparse(values) => values.len(),
        }
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        match self {
            Vector::Dense(values) => values
                .get(index)
                .copied()
                .ok_or_else(|| MathError::illegal_1d(index, values.len())),
            Vector::Sparse(values) => Ok(values.get(&index).copied().unwrap_or(0.0)),
        }
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        match self {
            Vector::Dense(values) => {
                let len = values.len();
                let slot = values
                    .get_mut(index)
                    .ok_or_else(|| MathError::illegal_1d(index, len))?;
                *slot = value;
            }
            Vector::Sparse(values) => store(values, index, value),
        }
        Ok(())
    }

    /// Zeroes a dense vector; empties a sparse one.
    pub fn clear(&mut self) {
        match self {
            Vector::Dense(values) => values.fill(0.0),
            Vector::Sparse(values) => values.clear(),
        }
    }

    /// Sets every dense entry, or every populated sparse entry, to `value`.
    pub fn set_all(&mut self, value: f64) {
        match self {
            Vector::Dense(values) => values.fill(value),
            Vector::Sparse(values) if value == 0.0 => values.clear(),
            Vector::Sparse(values) => values.values_mut().for_each(|v| *v = value),
        }
    }

    /// Overwrites a dense vector with `source`, which must match its length.
    pub fn set_values(&mut self, source: &[f64]) -> Result<()> {
        match self {
            Vector::Dense(values) => {
                if values.len() != source.len() {
                    return Err(MathError::DimensionMismatch {
                        what: "set_values length",
                        expected: values.len(),
                        got: source.len(),
                    });
                }
                values.assign(&ndarray::ArrayView1::from(source));
                Ok(())
            }
            Vector::Sparse(_) => Err(MathError::ModeMismatch { op: "set_values" }),
        }
    }

    /// `[0, len)` for a dense vector, the populated keys for a sparse one.
    pub fn indexes(&self) -> Vec<usize> {
        match self {
            Vector::Dense(values) => (0..values.len()).collect(),
            Vector::Sparse(values) => values.keys().copied().collect(),
        }
    }

    /// Stored `(index, value)` pairs in index order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (usize, f64)> + '_> {
        match self {
            Vector::Dense(values) => Box::new(values.iter().copied().enumerate()),
            Vector::Sparse(values) => Box::new(values.iter().map(|(&i, &v)| (i, v))),
        }
    }

    /// Replaces this vector's contents with `other`'s.
    pub fn copy_from(&mut self, other: &Vector) -> Result<()> {
        match (self, other) {
            (Vector::Dense(this), Vector::Dense(that)) => {
                check_len("copy_from length", this, that)?;
                this.assign(that);
                Ok(())
            }
            (Vector::Sparse(this), Vector::Sparse(that)) => {
                this.clone_from(that);
                Ok(())
            }
            _ => Err(MathError::ModeMismatch { op: "copy_from" }),
        }
    }

    /// `self[i] *= factor` for every stored entry.
    pub fn scale(&mut self, factor: f64) {
        match self {
            Vector::Dense(values) => *values *= factor,
            Vector::Sparse(values) if factor == 0.0 => values.clear(),
            Vector::Sparse(values) => values.values_mut().for_each(|v| *v *= factor),
        }
    }

    /// `self[i] += alpha * other[i]` for every index stored in `other`.
    pub fn increment(&mut self, other: &Vector, alpha: f64) -> Result<()> {
        match (self, other) {
            (Vector::Dense(this), Vector::Dense(that)) => {
                check_len("increment length", this, that)?;
                this.scaled_add(alpha, that);
                Ok(())
            }
            (Vector::Sparse(this), Vector::Sparse(that)) => {
                for (&i, &v) in that {
                    let current = this.get(&i).copied().unwrap_or(0.0);
                    store(this, i, current + alpha * v);
                }
                Ok(())
            }
            _ => Err(MathError::ModeMismatch { op: "increment" }),
        }
    }

    /// `self[i] = a * va[i] + b * vb[i]`. Dense operands only.
    pub fn weighted_sum(&mut self, a: f64, va: &Vector, b: f64, vb: &Vector) -> Result<()> {
        let (Vector::Dense(this), Vector::Dense(x), Vector::Dense(y)) = (self, va, vb) else {
            return Err(MathError::ModeMismatch { op: "weighted_sum" });
        };
        check_len("weighted_sum length", this, x)?;
        check_len("weighted_sum length", this, y)?;
        Zip::from(this)
            .and(x)
            .and(y)
            .for_each(|t, &p, &q| *t = a * p + b * q);
        Ok(())
    }

    /// Euclidean norm over the stored entries.
    pub fn norm(&self) -> f64 {
        match self {
            Vector::Dense(values) => values.dot(values).sqrt(),
            Vector::Sparse(values) => values.values().map(|v| v * v).sum::<f64>().sqrt(),
        }
    }

    /// Inner product. Sparse vectors sum over the keys populated in both.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        match (self, other) {
            (Vector::Dense(this), Vector::Dense(that)) => {
                check_len("dot length", this, that)?;
                Ok(this.dot(that))
            }
            (Vector::Sparse(this), Vector::Sparse(that)) => {
                let (small, large) = if this.len() <= that.len() { (this, that) } else { (that, this) };
                Ok(small
                    .iter()
                    .filter_map(|(i, v)| large.get(i).map(|w| v * w))
                    .sum())
            }
            _ => Err(MathError::ModeMismatch { op: "dot" }),
        }
    }
}

impl From<Array1<f64>> for Vector {
    fn from(values: Array1<f64>) -> Self {
        Vector::Dense(values)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::Dense(Array1::from(values))
    }
}

fn store(values: &mut BTreeMap<usize, f64>, index: usize, value: f64) {
    if value == 0.0 {
        values.remove(&index);
    } else {
        values.insert(index, value);
    }
}

fn check_len(what: &'static str, this: &Array1<f64>, that: &Array1<f64>) -> Result<()> {
    if this.len() != that.len() {
        return Err(MathError::DimensionMismatch {
            what,
            expected: this.len(),
            got: that.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sparse_of(pairs: &[(usize, f64)]) -> Vector {
        let mut v = Vector::sparse();
        for &(i, x) in pairs {
            v.set(i, x).unwrap();
        }
        v
    }

    #[test]
    fn test_dense_get_set() {
        let mut v = Vector::dense(3);
        v.set(1, 2.5).unwrap();
        assert_eq!(v.get(1).unwrap(), 2.5);
        assert_eq!(v.get(0).unwrap(), 0.0);
        assert!(matches!(v.get(3), Err(MathError::IllegalIndex { .. })));
        assert!(matches!(v.set(3, 1.0), Err(MathError::IllegalIndex { .. })));
        assert_eq!(v.dimension(), Some(3));
    }

    #[test]
    fn test_sparse_get_set() {
        let mut v = Vector::sparse();
        v.set(1_000_000, 4.0).unwrap();
        assert_eq!(v.get(1_000_000).unwrap(), 4.0);
        assert_eq!(v.get(7).unwrap(), 0.0);
        assert_eq!(v.nnz(), 1);

        v.set(1_000_000, 0.0).unwrap();
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.dimension(), None);
    }

    #[test]
    fn test_clear_and_set_all() {
        let mut d = Vector::from(vec![1.0, 2.0, 3.0]);
        d.set_all(7.0);
        assert_eq!(d.indexes(), vec![0, 1, 2]);
        assert!(d.iter().all(|(_, v)| v == 7.0));
        d.clear();
        assert_eq!(d.norm(), 0.0);

        let mut s = sparse_of(&[(2, 1.0), (9, -1.0)]);
        s.set_all(5.0);
        assert_eq!(s.indexes(), vec![2, 9]);
        assert_eq!(s.get(9).unwrap(), 5.0);
        s.clear();
        assert!(s.indexes().is_empty());
    }

    #[test]
    fn test_set_values() {
        let mut d = Vector::dense(2);
        d.set_values(&[3.0, 4.0]).unwrap();
        assert_eq!(d.get(1).unwrap(), 4.0);
        assert!(matches!(d.set_values(&[1.0]), Err(MathError::DimensionMismatch { .. })));
        assert!(matches!(Vector::sparse().set_values(&[1.0]), Err(MathError::ModeMismatch { .. })));
    }

    #[test]
    fn test_copy_from() {
        let mut d = Vector::dense(3);
        d.copy_from(&Vector::from(vec![1.0, 2.0, 3.0])).unwrap();
        assert_eq!(d, Vector::from(vec![1.0, 2.0, 3.0]));

        assert!(matches!(
            d.copy_from(&Vector::dense(2)),
            Err(MathError::DimensionMismatch { .. })
        ));
        assert!(matches!(d.copy_from(&Vector::sparse()), Err(MathError::ModeMismatch { .. })));

        let mut s = sparse_of(&[(5, 1.0)]);
        let source = sparse_of(&[(1, 2.0), (3, 4.0)]);
        s.copy_from(&source).unwrap();
        assert_eq!(s, source);
    }

    #[test]
    fn test_scale() {
        let mut d = Vector::from(vec![1.0, -2.0]);
        d.scale(3.0);
        assert_eq!(d, Vector::from(vec![3.0, -6.0]));

        let mut s = sparse_of(&[(4, 2.0)]);
        s.scale(0.5);
        assert_eq!(s.get(4).unwrap(), 1.0);
        s.scale(0.0);
        assert_eq!(s.nnz(), 0);
    }

    #[test]
    fn test_increment() {
        let mut d = Vector::from(vec![1.0, 1.0, 1.0]);
        d.increment(&Vector::from(vec![1.0, 2.0, 3.0]), 2.0).unwrap();
        assert_eq!(d, Vector::from(vec![3.0, 5.0, 7.0]));
        assert!(matches!(
            d.increment(&Vector::dense(4), 1.0),
            Err(MathError::DimensionMismatch { .. })
        ));

        let mut s = sparse_of(&[(0, 1.0), (3, 2.0)]);
        s.increment(&sparse_of(&[(3, 1.0), (8, 4.0)]), -2.0).unwrap();
        assert_eq!(s.indexes(), vec![0, 8]);
        assert_eq!(s.get(8).unwrap(), -8.0);

        assert!(matches!(s.increment(&d, 1.0), Err(MathError::ModeMismatch { .. })));
    }

    #[test]
    fn test_weighted_sum() {
        let mut out = Vector::dense(2);
        let a = Vector::from(vec![1.0, 2.0]);
        let b = Vector::from(vec![10.0, 20.0]);
        out.weighted_sum(2.0, &a, 0.5, &b).unwrap();
        assert_eq!(out, Vector::from(vec![7.0, 14.0]));

        let short = Vector::dense(1);
        assert!(matches!(
            out.weighted_sum(1.0, &a, 1.0, &short),
            Err(MathError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            out.weighted_sum(1.0, &a, 1.0, &Vector::sparse()),
            Err(MathError::ModeMismatch { .. })
        ));
        assert_eq!(out, Vector::from(vec![7.0, 14.0]));
    }

    #[test]
    fn test_norm_and_dot() {
        let a = Vector::from(vec![3.0, 4.0]);
        assert_abs_diff_eq!(a.norm(), 5.0);
        assert_abs_diff_eq!(a.dot(&Vector::from(vec![2.0, 0.5])).unwrap(), 8.0);
        assert!(matches!(a.dot(&Vector::dense(3)), Err(MathError::DimensionMismatch { .. })));

        let s = sparse_of(&[(1, 3.0), (10, 4.0)]);
        let t = sparse_of(&[(10, 2.0), (99, 7.0)]);
        assert_abs_diff_eq!(s.norm(), 5.0);
        assert_abs_diff_eq!(s.dot(&t).unwrap(), 8.0);
        assert_abs_diff_eq!(t.dot(&s).unwrap(), 8.0);
        assert!(matches!(s.dot(&a), Err(MathError::ModeMismatch { .. })));
    }

    #[test]
    fn test_homogeneity() {
        assert!(Vector::dense(1).is_homogeneous(&Vector::dense(5)));
        assert!(Vector::sparse().is_homogeneous(&Vector::sparse()));
        assert!(!Vector::dense(1).is_homogeneous(&Vector::sparse()));
    }
}
