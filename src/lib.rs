pub use ndarray::{Array1, Array2};

pub mod dictionary;
pub mod error;
pub mod features;
pub mod matrix;
pub mod vector;

pub use dictionary::Dictionary;
pub use error::{MathError, Result};
pub use features::{BIAS_INDEX, FeatureOptions, Instance, encode, encode_with};
pub use matrix::{DenseMatrix, DenseViewMut, Matrix, SparseMatrix, pretty};
pub use vector::Vector;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let m = DenseMatrix::zeros(3, 4);
        let s = SparseMatrix::zeros(3, 4);
        let v = Vector::dense(5);
        assert_eq!(m.dimension(), (3, 4));
        assert_eq!(s.dimension(), (3, 4));
        assert_eq!(v.dimension(), Some(5));
    }
}
