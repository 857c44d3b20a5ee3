use sparsefeat::{DenseMatrix, MathError, Matrix, SparseMatrix};

fn main() -> Result<(), MathError> {
    println!("=== Dense and Sparse Matrix Example ===\n");

    let data: Vec<f64> = (1..=16).map(f64::from).collect();
    let mut m = DenseMatrix::from_row_major(data, 4, 4)?;
    println!("M =\n{}", m);

    // Row views write through to the parent
    m.row_view_mut(0)?.set(0, 0, 100.0)?;
    println!("\nAfter writing 100 through a row view:\n{}", m);

    // Submatrices are independent copies
    let mut sub = m.sub_matrix(1, 1, 2, 2)?;
    sub.set(0, 0, -1.0)?;
    println!("\nSubmatrix (edited):\n{}", sub);
    println!("Parent (1, 1) is still {}", m.get(1, 1)?);

    let wide = m.augment(&DenseMatrix::identity(4))?;
    println!("\n[M | I] is {}x{}", wide.rows(), wide.cols());

    let sparse = SparseMatrix::random_normal(4, 4).lower_triangular();
    println!("\nRandom lower-triangular sparse matrix ({} non-zeros):\n{}", sparse.nnz(), sparse);
    println!("Wrapped read s(-1, -1) = {:.4}", sparse.get(-1, -1)?);

    match m.get(4, 0) {
        Ok(v) => println!("\nUnexpected value {}", v),
        Err(e) => println!("\nDense bounds check: {}", e),
    }

    Ok(())
}
