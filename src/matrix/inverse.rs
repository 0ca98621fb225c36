use crate::error::{MatrixError, Result};
use crate::matrix::determinant::{determinant_recorded, laplace, signed_cofactor};
use crate::matrix::matrix::Matrix;
use crate::rings::rational::Rational;
use crate::trace::{Heading, Recorder, Step, Trace, Traced};
use log::debug;
use num_traits::Zero;
use rayon::prelude::*;

/// `C[i][j] = (-1)^(i+j) * det(cofactor(m, i, j))`, cells computed in parallel.
pub fn cofactor_matrix(matrix: &Matrix) -> Result<Matrix> {
    let n = matrix.square_size()?;
    let cells = (0..n * n)
        .into_par_iter()
        .map(|idx| signed_cofactor(matrix, idx / n, idx % n))
        .collect();
    Ok(Matrix::from_cells(n, n, cells))
}

/// Transposed cofactor matrix.
pub fn adjugate(matrix: &Matrix) -> Result<Matrix> {
    Ok(cofactor_matrix(matrix)?.transpose())
}

fn divide_all(adjugate: &Matrix, determinant: &Rational) -> Result<Matrix> {
    if determinant.is_zero() {
        let n = adjugate.rows();
        return Err(MatrixError::divide_by_zero(format!(
            "adjugate of {}*{} matrix",
            n, n
        )));
    }
    let cells = adjugate
        .cells()
        .iter()
        .map(|x| x.checked_div(determinant))
        .collect::<Result<Vec<_>>>()?;
    Ok(Matrix::from_cells(adjugate.rows(), adjugate.cols(), cells))
}

/// Inverse as `adj(m) / det(m)`.
pub fn inverse_via_determinant(matrix: &Matrix) -> Result<Matrix> {
    let n = matrix.square_size()?;
    debug!("inverse via determinant of {}x{} matrix", n, n);
    let adjugate = adjugate(matrix)?;
    divide_all(&adjugate, &laplace(matrix))
}

fn inverse_recorded<R: Recorder>(matrix: &Matrix, recorder: &mut R) -> Result<Matrix> {
    let n = matrix.square_size()?;
    debug!("traced inverse via determinant of {}x{} matrix", n, n);

    let cofactors = Matrix::from_cells(
        n,
        n,
        (0..n)
            .flat_map(|i| (0..n).map(move |j| signed_cofactor(matrix, i, j)))
            .collect(),
    );
    recorder.record(|| Step::Cofactors(cofactors.clone()));

    let adjugate = cofactors.transpose();
    recorder.record(|| Step::Adjugate(adjugate.clone()));

    recorder.record(|| Step::Heading(Heading::InputDeterminant));
    let determinant = determinant_recorded(matrix, recorder)?;

    let result = divide_all(&adjugate, &determinant)?;
    recorder.record(|| Step::Divided {
        determinant,
        result: result.clone(),
    });
    Ok(result)
}

/// Traced inverse: cofactors, adjugate, determinant expansion, division.
pub fn inverse_via_determinant_traced(matrix: &Matrix) -> Traced<Matrix> {
    Traced::run(|trace: &mut Trace| inverse_recorded(matrix, trace))
}

impl Matrix {
    pub fn inverse(&self) -> Result<Matrix> {
        inverse_via_determinant(self)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
