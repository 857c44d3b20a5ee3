/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, MathError>;

/// Reasons a matrix, vector or encoder operation can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    /// An index fell outside a bounds-checked structure.
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IllegalIndex { index: Vec<isize>, shape: Vec<usize> },

    /// Operand shapes are incompatible.
    #[error("dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Dense and sparse operands were mixed where the operation needs one kind.
    #[error("{op} requires operands of the same kind (dense or sparse)")]
    ModeMismatch { op: &'static str },

    /// A dictionary hands out ids that overlap the reserved bias index.
    #[error("dictionary ids start at {min_id}, which overlaps the bias index {bias}")]
    ReservedId { min_id: usize, bias: usize },

    /// A stored dictionary lists the same name twice.
    #[error("duplicate dictionary name {0:?}")]
    DuplicateName(String),

    /// The matrix has a singularity.
    #[error("matrix is singular")]
    Singular,

    /// The matrix is not positive semi-definite.
    #[error("matrix is not positive semidefinite")]
    NotPositiveSemiDefinite,
}

impl MathError {
    pub(crate) fn illegal_2d(i: isize, j: isize, rows: usize, cols: usize) -> Self {
        MathError::IllegalIndex {
            index: vec![i, j],
            shape: vec![rows, cols],
        }
    }

    pub(crate) fn illegal_1d(index: usize, len: usize) -> Self {
        MathError::IllegalIndex {
            index: vec![index as isize],
            shape: vec![len],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::illegal_2d(4, 0, 4, 4);
        assert_eq!(err.to_string(), "index [4, 0] out of bounds for shape [4, 4]");

        let err = MathError::DimensionMismatch {
            what: "augment rows",
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch in augment rows: expected 3, got 2"
        );

        let err = MathError::ModeMismatch { op: "dot" };
        assert!(err.to_string().starts_with("dot requires"));

        let err = MathError::ReservedId { min_id: 0, bias: 0 };
        assert_eq!(
            err.to_string(),
            "dictionary ids start at 0, which overlaps the bias index 0"
        );
        assert_eq!(
            MathError::DuplicateName("a".to_string()).to_string(),
            r#"duplicate dictionary name "a""#
        );
    }
}
