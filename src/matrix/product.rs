use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::rings::rational::Rational;
use crate::trace::{CellProduct, Recorder, Step, Trace, Traced};
use log::debug;
use num_traits::Zero;
use rayon::prelude::*;

fn shape_mismatch(left: &Matrix, right: &Matrix) -> MatrixError {
    MatrixError::ShapeMismatch {
        left_rows: left.rows(),
        left_cols: left.cols(),
        right_rows: right.rows(),
        right_cols: right.cols(),
    }
}

fn ensure_same_shape(left: &Matrix, right: &Matrix) -> Result<()> {
    if left.shape() != right.shape() {
        return Err(shape_mismatch(left, right));
    }
    Ok(())
}

fn ensure_chainable(left: &Matrix, right: &Matrix) -> Result<()> {
    if left.cols() != right.rows() {
        return Err(shape_mismatch(left, right));
    }
    Ok(())
}

/// Matrix product `left * right`, output rows computed in parallel.
pub fn multiply(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    ensure_chainable(left, right)?;
    debug!(
        "multiply {}x{} by {}x{}",
        left.rows(),
        left.cols(),
        right.rows(),
        right.cols()
    );

    let cols = right.cols();
    if left.rows() == 0 || cols == 0 {
        return Ok(Matrix::new(left.rows(), cols));
    }

    let inner = left.cols();
    let mut cells = vec![Rational::zero(); left.rows() * cols];
    cells
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(r, row)| {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..inner).map(|k| left.at(r, k) * right.at(k, c)).sum();
            }
        });

    Ok(Matrix::from_cells(left.rows(), cols, cells))
}

fn multiply_recorded<R: Recorder>(left: &Matrix, right: &Matrix, recorder: &mut R) -> Result<Matrix> {
    ensure_chainable(left, right)?;

    let mut cells = Vec::with_capacity(left.rows() * right.cols());
    for r in 0..left.rows() {
        let mut row = Vec::with_capacity(right.cols());
        for c in 0..right.cols() {
            let mut acc = Rational::zero();
            let mut factors = Vec::with_capacity(left.cols());
            let mut running = Vec::with_capacity(left.cols());
            for k in 0..left.cols() {
                acc = acc + left.at(r, k) * right.at(k, c);
                factors.push((left.at(r, k).clone(), right.at(k, c).clone()));
                running.push(acc.clone());
            }
            cells.push(acc);
            row.push(CellProduct {
                col: c,
                factors,
                running,
            });
        }
        recorder.record(|| Step::ProductRow { row: r, cells: row });
    }

    if cells.is_empty() {
        return Ok(Matrix::new(left.rows(), right.cols()));
    }
    Ok(Matrix::from_cells(left.rows(), right.cols(), cells))
}

/// Matrix product recording, row by row, the partial products of every cell.
pub fn multiply_traced(left: &Matrix, right: &Matrix) -> Traced<Matrix> {
    debug!(
        "traced multiply {}x{} by {}x{}",
        left.rows(),
        left.cols(),
        right.rows(),
        right.cols()
    );
    Traced::run(|trace: &mut Trace| multiply_recorded(left, right, trace))
}

pub fn elementwise_multiply(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    ensure_same_shape(left, right)?;
    Ok(Matrix::from_cells(
        left.rows(),
        left.cols(),
        left.cells()
            .par_iter()
            .zip(right.cells().par_iter())
            .map(|(a, b)| a * b)
            .collect(),
    ))
}

pub fn add(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    ensure_same_shape(left, right)?;
    Ok(Matrix::from_cells(
        left.rows(),
        left.cols(),
        left.cells()
            .iter()
            .zip(right.cells().iter())
            .map(|(a, b)| a + b)
            .collect(),
    ))
}

pub fn scale(matrix: &Matrix, factor: &Rational) -> Matrix {
    Matrix::from_cells(
        matrix.rows(),
        matrix.cols(),
        matrix.cells().iter().map(|x| x * factor).collect(),
    )
}

impl Matrix {
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        multiply(self, rhs)
    }

    pub fn elementwise_multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        elementwise_multiply(self, rhs)
    }

    pub fn scale(&self, factor: &Rational) -> Matrix {
        scale(self, factor)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m(rows: Vec<Vec<i64>>) -> Matrix {
        Matrix::from_integers(rows).unwrap()
    }

    #[test]
    fn test_multiply() {
        let a = Matrix::identity(2);
        let b = m(vec![vec![2, 3], vec![4, 5]]);
        assert_eq!(multiply(&a, &b).unwrap(), b);

        let a = m(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let b = m(vec![vec![7, 8], vec![9, 10], vec![11, 12]]);
        assert_eq!(
            multiply(&a, &b).unwrap(),
            m(vec![vec![58, 64], vec![139, 154]])
        );

        let v = Matrix::column_vector(vec![Rational::from(1), Rational::from(-1)]);
        assert_eq!(
            b.multiply(&v).unwrap(),
            Matrix::column_vector(vec![Rational::from(-1); 3])
        );
    }

    #[test]
    fn test_multiply_shape_mismatch() {
        let a = m(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let b = m(vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]);
        assert_eq!(
            multiply(&a, &b),
            Err(MatrixError::ShapeMismatch {
                left_rows: 2,
                left_cols: 3,
                right_rows: 4,
                right_cols: 2
            })
        );
        assert!(multiply_traced(&a, &b).outcome.is_err());
    }

    #[test]
    fn test_multiply_traced() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = m(vec![vec![5, 6], vec![7, 8]]);
        let traced = multiply_traced(&a, &b);
        assert_eq!(traced.outcome, multiply(&a, &b));
        assert_eq!(traced.trace.len(), 2);
        assert_eq!(
            traced.trace.to_string(),
            "1X5+2X7=19, 1X6+2X8=22\n3X5+4X7=43, 3X6+4X8=50"
        );
        match &traced.trace.steps()[1] {
            Step::ProductRow { row, cells } => {
                assert_eq!(*row, 1);
                assert_eq!(cells[0].running, vec![Rational::from(15), Rational::from(43)]);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_elementwise_and_scale() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = m(vec![vec![5, 6], vec![7, 8]]);
        assert_eq!(
            elementwise_multiply(&a, &b).unwrap(),
            m(vec![vec![5, 12], vec![21, 32]])
        );
        assert!(matches!(
            a.elementwise_multiply(&Matrix::identity(3)),
            Err(MatrixError::ShapeMismatch { .. })
        ));
        assert_eq!(
            a.scale(&Rational::new(1, 2).unwrap()).to_string(),
            "[[1/2 1]\n [3/2 2]]"
        );
        assert_eq!(add(&a, &b).unwrap(), m(vec![vec![6, 8], vec![10, 12]]));
    }

    fn small_matrix(rows: usize, cols: usize) -> impl Strategy<Value = Matrix> {
        proptest::collection::vec(-9i64..10, rows * cols).prop_map(move |cells| {
            Matrix::from_cells(rows, cols, cells.into_iter().map(Rational::from).collect())
        })
    }

    proptest! {
        #[test]
        fn transpose_of_product(a in small_matrix(2, 3), b in small_matrix(3, 4)) {
            let ab = multiply(&a, &b).unwrap();
            prop_assert_eq!(multiply(&b.transpose(), &a.transpose()).unwrap(), ab.transpose());
        }

        #[test]
        fn traced_product_matches(a in small_matrix(3, 2), b in small_matrix(2, 3)) {
            prop_assert_eq!(multiply_traced(&a, &b).outcome, multiply(&a, &b));
        }
    }
}
