use crate::error::{MatrixError, Result};
use crate::matrix::determinant::determinant_recorded;
use crate::matrix::matrix::Matrix;
use crate::rings::rational::Rational;
use crate::trace::{Heading, Recorder, Silent, Step, Trace, Traced};
use log::debug;
use num_traits::Zero;

fn cramer<R: Recorder>(matrix: &Matrix, rhs: &[Rational], recorder: &mut R) -> Result<Vec<Rational>> {
    let n = matrix.square_size()?;
    if rhs.len() != n {
        return Err(MatrixError::DimensionMismatch {
            expected: n,
            actual: rhs.len(),
        });
    }
    debug!("cramer's rule on {}x{} system", n, n);

    recorder.record(|| Step::Heading(Heading::CoefficientDeterminant));
    let determinant = determinant_recorded(matrix, recorder)?;

    let mut roots = Vec::with_capacity(n);
    for i in 0..n {
        let substituted = matrix.with_column(i, rhs);
        recorder.record(|| Step::Heading(Heading::Variable(i)));
        let numerator = determinant_recorded(&substituted, recorder)?;

        if determinant.is_zero() {
            return Err(MatrixError::divide_by_zero(format!(
                "det(A{}) = {}",
                i + 1,
                numerator
            )));
        }
        let root = numerator.checked_div(&determinant)?;
        recorder.record(|| Step::Root {
            variable: i,
            numerator,
            denominator: determinant.clone(),
            root: root.clone(),
        });
        roots.push(root);
    }
    Ok(roots)
}

/// Roots of `matrix * x = rhs`, root `i` being `det(A_i) / det(matrix)`
/// where `A_i` has column `i` replaced by `rhs`.
pub fn solve_cramer(matrix: &Matrix, rhs: &[Rational]) -> Result<Vec<Rational>> {
    cramer(matrix, rhs, &mut Silent)
}

pub fn solve_cramer_traced(matrix: &Matrix, rhs: &[Rational]) -> Traced<Vec<Rational>> {
    Traced::run(|trace: &mut Trace| cramer(matrix, rhs, trace))
}

impl Matrix {
    pub fn solve_cramer(&self, rhs: &[Rational]) -> Result<Vec<Rational>> {
        solve_cramer(self, rhs)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
