use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::rings::rational::Rational;
use crate::trace::{CofactorTerm, Expansion, Recorder, Step, Trace, Traced};
use log::debug;
use num_traits::{One, Zero};

// `row` and `col` must lie inside `matrix`
fn minor(matrix: &Matrix, row: usize, col: usize) -> Matrix {
    let cells: Vec<Rational> = (0..matrix.rows())
        .filter(|&r| r != row)
        .flat_map(|r| {
            matrix
                .row(r)
                .iter()
                .enumerate()
                .filter(move |(c, _)| *c != col)
                .map(|(_, x)| x.clone())
        })
        .collect();

    if cells.is_empty() {
        return Matrix::default();
    }
    Matrix::from_cells(matrix.rows() - 1, matrix.cols() - 1, cells)
}

/// Minor of `matrix` without row `row` and column `col`.
pub fn cofactor(matrix: &Matrix, row: usize, col: usize) -> Result<Matrix> {
    if row >= matrix.rows() || col >= matrix.cols() {
        return Err(MatrixError::IndexOutOfRange {
            row,
            col,
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }
    Ok(minor(matrix, row, col))
}

// First row Laplace expansion of a square matrix. The 0x0 minor of a 1x1
// matrix counts as 1.
pub(crate) fn laplace(matrix: &Matrix) -> Rational {
    match matrix.rows() {
        0 => Rational::one(),
        1 => matrix.at(0, 0).clone(),
        2 => matrix.at(0, 0) * matrix.at(1, 1) - matrix.at(0, 1) * matrix.at(1, 0),
        n => (0..n)
            .filter(|&i| !matrix.at(0, i).is_zero())
            .map(|i| {
                let term = matrix.at(0, i) * &laplace(&minor(matrix, 0, i));
                if i % 2 == 0 {
                    term
                } else {
                    -term
                }
            })
            .sum(),
    }
}

// Signed cofactor `(-1)^(row+col) * det(minor)`
pub(crate) fn signed_cofactor(matrix: &Matrix, row: usize, col: usize) -> Rational {
    let minor = laplace(&minor(matrix, row, col));
    if (row + col) % 2 == 0 {
        minor
    } else {
        -minor
    }
}

/// Determinant by recursive cofactor expansion along the first row.
pub fn determinant(matrix: &Matrix) -> Result<Rational> {
    let n = matrix.square_size()?;
    debug!("determinant of {}x{} matrix", n, n);
    Ok(laplace(matrix))
}

pub(crate) fn determinant_recorded<R: Recorder>(
    matrix: &Matrix,
    recorder: &mut R,
) -> Result<Rational> {
    let n = matrix.square_size()?;

    // a single entry is its own determinant, nothing to show
    if n == 1 {
        return Ok(laplace(matrix));
    }
    if n == 2 {
        let value = laplace(matrix);
        recorder.record(|| {
            Step::Determinant(Expansion {
                matrix: matrix.clone(),
                terms: vec![],
                value: value.clone(),
            })
        });
        return Ok(value);
    }

    let mut running = Rational::zero();
    let terms: Vec<CofactorTerm> = (0..n)
        .map(|column| {
            let entry = matrix.at(0, column).clone();
            let minor = laplace(&minor(matrix, 0, column));
            let product = &entry * &minor;
            let signed = if column % 2 == 0 {
                product.clone()
            } else {
                -&product
            };
            running = &running + &signed;
            CofactorTerm {
                column,
                entry,
                minor,
                product,
                signed,
                running: running.clone(),
            }
        })
        .collect();

    recorder.record(|| {
        Step::Determinant(Expansion {
            matrix: matrix.clone(),
            terms,
            value: running.clone(),
        })
    });
    Ok(running)
}

/// Determinant together with the signed terms of the top level expansion.
pub fn determinant_traced(matrix: &Matrix) -> Traced<Rational> {
    debug!(
        "traced determinant of {}x{} matrix",
        matrix.rows(),
        matrix.cols()
    );
    Traced::run(|trace: &mut Trace| determinant_recorded(matrix, trace))
}

impl Matrix {
    pub fn determinant(&self) -> Result<Rational> {
        determinant(self)
    }

    pub fn cofactor(&self, row: usize, col: usize) -> Result<Matrix> {
        cofactor(self, row, col)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
