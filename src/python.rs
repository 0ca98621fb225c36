use crate::engine::{execute, EngineConfig, Request};
use crate::error::MatrixError;
use crate::matrix::cramer::{solve_cramer, solve_cramer_traced};
use crate::matrix::determinant::{determinant, determinant_traced};
use crate::matrix::gauss::{gauss_eliminate, gauss_eliminate_traced};
use crate::matrix::inverse::{inverse_via_determinant, inverse_via_determinant_traced};
use crate::matrix::matrix::Matrix;
use crate::matrix::product::{elementwise_multiply, multiply, multiply_traced, scale};
use crate::rings::rational::Rational;
use crate::trace::Traced;
use pyo3::exceptions::{PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;
use pyo3::types::PyType;

impl From<MatrixError> for PyErr {
    fn from(error: MatrixError) -> PyErr {
        match error {
            MatrixError::DivideByZero { .. } => {
                PyZeroDivisionError::new_err(format!("Error : {}.", error))
            }
            _ => PyValueError::new_err(error.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
#[pyclass(frozen)]
pub struct RationalMatrix {
    pub inner: Matrix,
}

impl From<Matrix> for RationalMatrix {
    fn from(inner: Matrix) -> Self {
        RationalMatrix { inner }
    }
}

fn integers(values: Vec<i64>) -> Vec<Rational> {
    values.into_iter().map(Rational::from).collect()
}

fn strings(values: Vec<Rational>) -> Vec<String> {
    values.iter().map(|x| x.to_string()).collect()
}

// Value and rendered trace of a traced run
fn with_text<T, U>(traced: Traced<T>, f: impl FnOnce(T) -> U) -> PyResult<(U, String)> {
    let (value, trace) = traced.into_result()?;
    Ok((f(value), trace.to_string()))
}

#[pymethods]
impl RationalMatrix {
    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<i64>>) -> PyResult<Self> {
        Ok(Matrix::from_integers(lines)?.into())
    }

    #[classmethod]
    pub fn parse(_cls: &Bound<PyType>, text: &str) -> PyResult<Self> {
        Ok(Matrix::parse(text)?.into())
    }

    #[classmethod]
    pub fn identity(_cls: &Bound<PyType>, n: usize) -> Self {
        Matrix::identity(n).into()
    }

    pub fn to_list(&self) -> Vec<Vec<String>> {
        self.inner.to_list().into_iter().map(strings).collect()
    }

    #[getter]
    #[allow(non_snake_case)]
    pub fn T(&self) -> RationalMatrix {
        self.inner.transpose().into()
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    #[getter]
    pub fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    #[getter]
    pub fn det(&self) -> PyResult<String> {
        Ok(determinant(&self.inner)?.to_string())
    }

    pub fn det_step_by_step(&self) -> PyResult<(String, String)> {
        with_text(determinant_traced(&self.inner), |d| d.to_string())
    }

    pub fn __matmul__(&self, rhs: &RationalMatrix) -> PyResult<RationalMatrix> {
        Ok(multiply(&self.inner, &rhs.inner)?.into())
    }

    // Elementwise, never a matrix product
    pub fn __mul__(&self, rhs: &RationalMatrix) -> PyResult<RationalMatrix> {
        Ok(elementwise_multiply(&self.inner, &rhs.inner)?.into())
    }

    pub fn scale(&self, factor: &str) -> PyResult<RationalMatrix> {
        let factor: Rational = factor.parse()?;
        Ok(scale(&self.inner, &factor).into())
    }

    pub fn __invert__(&self) -> PyResult<RationalMatrix> {
        Ok(inverse_via_determinant(&self.inner)?.into())
    }

    #[pyo3(signature = (other=None))]
    pub fn gauss_elim(&self, other: Option<PyRef<RationalMatrix>>) -> PyResult<RationalMatrix> {
        let rhs = other.as_ref().map(|o| &o.inner);
        Ok(gauss_eliminate(&self.inner, rhs)?.into())
    }

    #[pyo3(signature = (other=None))]
    pub fn gauss_elim_step_by_step(
        &self,
        other: Option<PyRef<RationalMatrix>>,
    ) -> PyResult<(RationalMatrix, String)> {
        let rhs = other.as_ref().map(|o| &o.inner);
        with_text(gauss_eliminate_traced(&self.inner, rhs), RationalMatrix::from)
    }

    pub fn inv_using_det(&self) -> PyResult<RationalMatrix> {
        Ok(inverse_via_determinant(&self.inner)?.into())
    }

    pub fn inv_using_det_step_by_step(&self) -> PyResult<(RationalMatrix, String)> {
        with_text(
            inverse_via_determinant_traced(&self.inner),
            RationalMatrix::from,
        )
    }

    pub fn cramer(&self, vals: Vec<i64>) -> PyResult<Vec<String>> {
        Ok(strings(solve_cramer(&self.inner, &integers(vals))?))
    }

    pub fn cramer_step_by_step(&self, vals: Vec<i64>) -> PyResult<(Vec<String>, String)> {
        with_text(solve_cramer_traced(&self.inner, &integers(vals)), strings)
    }

    pub fn __eq__(&self, other: &RationalMatrix) -> bool {
        self.inner == other.inner
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }

    pub fn __repr__(&self) -> String {
        format!("RationalMatrix({:?})", self.to_list())
    }
}

#[pyfunction]
pub fn mul_step_by_step(
    first: &RationalMatrix,
    second: &RationalMatrix,
) -> PyResult<(RationalMatrix, String)> {
    with_text(
        multiply_traced(&first.inner, &second.inner),
        RationalMatrix::from,
    )
}

/// Runs a named operation (`multiply`, `gauss`, `inverse`, `determinant`,
/// `cramer`, `transpose`, `elementwise`, `scale:<factor>`) and returns the
/// rendered value with the rendered trace when `step_by_step` is set.
#[pyfunction]
#[pyo3(signature = (operation, left, right=None, step_by_step=false))]
pub fn run(
    operation: &str,
    left: &RationalMatrix,
    right: Option<PyRef<RationalMatrix>>,
    step_by_step: bool,
) -> PyResult<(String, Option<String>)> {
    let mut request = Request::new(operation.parse()?, left.inner.clone());
    if let Some(right) = right {
        request = request.with_right(right.inner.clone());
    }
    let config = EngineConfig {
        trace: step_by_step,
        ..EngineConfig::default()
    };

    let response = execute(&request, &config);
    let trace = response.render_trace(&config.render);
    Ok((response.outcome?.to_string(), trace))
}
