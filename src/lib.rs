use pyo3::prelude::*;

pub mod engine;
pub mod error;
pub mod matrix {
    pub mod cramer;
    pub mod determinant;
    pub mod gauss;
    pub mod inverse;
    #[allow(clippy::module_inception)]
    pub mod matrix;
    pub mod product;
}
pub mod rings {
    pub mod rational;
}

pub mod python;
pub mod trace;
pub mod utils;

pub use error::{MatrixError, Result};
pub use matrix::matrix::Matrix;
pub use rings::rational::Rational;

/// Exact rational matrices for Python.
#[pymodule]
fn rational_matrix(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = env_logger::try_init();
    m.add_class::<python::RationalMatrix>()?;
    m.add_function(wrap_pyfunction!(python::mul_step_by_step, m)?)?;
    m.add_function(wrap_pyfunction!(python::run, m)?)?;
    Ok(())
}
