//! Request/response boundary of the matrix engine.
//!
//! A caller names an [`Operation`], hands over its operands and gets back a
//! [`Response`] holding the value or the error, plus the step trace when
//! tracing is switched on in [`EngineConfig`].

use crate::error::{MatrixError, Result};
use crate::matrix::cramer::{solve_cramer, solve_cramer_traced};
use crate::matrix::determinant::{determinant, determinant_traced};
use crate::matrix::gauss::{gauss_eliminate, gauss_eliminate_traced};
use crate::matrix::inverse::{inverse_via_determinant, inverse_via_determinant_traced};
use crate::matrix::matrix::Matrix;
use crate::matrix::product::{elementwise_multiply, multiply, multiply_traced, scale};
use crate::rings::rational::Rational;
use crate::trace::{RenderConfig, Trace, Traced};
use itertools::Itertools;
use log::debug;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Multiply,
    ElementwiseMultiply,
    Scale(Rational),
    Transpose,
    Determinant,
    GaussEliminate,
    Inverse,
    Cramer,
}

impl FromStr for Operation {
    type Err = MatrixError;

    /// Accepts the operation names, `scale:<factor>` for scaling.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(factor) = s.strip_prefix("scale:") {
            return Ok(Operation::Scale(factor.parse()?));
        }
        match s {
            "multiply" => Ok(Operation::Multiply),
            "elementwise" => Ok(Operation::ElementwiseMultiply),
            "transpose" => Ok(Operation::Transpose),
            "determinant" => Ok(Operation::Determinant),
            "gauss" => Ok(Operation::GaussEliminate),
            "inverse" => Ok(Operation::Inverse),
            "cramer" => Ok(Operation::Cramer),
            _ => Err(MatrixError::UnknownOperation {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub operation: Operation,
    pub left: Matrix,
    pub right: Option<Matrix>,
}

impl Request {
    pub fn new(operation: Operation, left: Matrix) -> Self {
        Request {
            operation,
            left,
            right: None,
        }
    }

    pub fn with_right(mut self, right: Matrix) -> Self {
        self.right = Some(right);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Matrix(Matrix),
    Scalar(Rational),
    Roots(Vec<Rational>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Matrix(m) => write!(f, "{}", m),
            Value::Scalar(x) => write!(f, "{}", x),
            Value::Roots(roots) => write!(f, "({})", roots.iter().join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub outcome: Result<Value>,
    /// `Some` when the request ran with tracing on
    pub trace: Option<Trace>,
}

impl Response {
    pub fn render_trace(&self, config: &RenderConfig) -> Option<String> {
        self.trace.as_ref().map(|t| t.render(config))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub trace: bool,
    pub render: RenderConfig,
}

impl EngineConfig {
    pub fn traced() -> Self {
        EngineConfig {
            trace: true,
            ..EngineConfig::default()
        }
    }
}

// Values of an Nx1 or 1xN operand, none for an absent one
fn vector_values(left: &Matrix, right: &Matrix) -> Result<Vec<Rational>> {
    if right.is_empty() || right.cols() == 1 || right.rows() == 1 {
        return Ok(right.cells().to_vec());
    }
    Err(MatrixError::DimensionMismatch {
        expected: left.rows(),
        actual: right.rows() * right.cols(),
    })
}

fn respond<T>(traced: Traced<T>, wrap: fn(T) -> Value) -> Response {
    let traced = traced.map(wrap);
    Response {
        outcome: traced.outcome,
        trace: Some(traced.trace),
    }
}

fn untraced(outcome: Result<Value>, config: &EngineConfig) -> Response {
    Response {
        outcome,
        trace: config.trace.then(Trace::new),
    }
}

pub fn execute(request: &Request, config: &EngineConfig) -> Response {
    let empty = Matrix::default();
    let left = &request.left;
    let right = request.right.as_ref().unwrap_or(&empty);
    debug!(
        "execute {:?} on {}x{} and {}x{} (trace: {})",
        request.operation,
        left.rows(),
        left.cols(),
        right.rows(),
        right.cols(),
        config.trace
    );

    let gauss_rhs = request.right.as_ref();
    match (&request.operation, config.trace) {
        (Operation::Multiply, false) => untraced(multiply(left, right).map(Value::Matrix), config),
        (Operation::Multiply, true) => respond(multiply_traced(left, right), Value::Matrix),
        (Operation::ElementwiseMultiply, _) => {
            untraced(elementwise_multiply(left, right).map(Value::Matrix), config)
        }
        (Operation::Scale(factor), _) => untraced(Ok(Value::Matrix(scale(left, factor))), config),
        (Operation::Transpose, _) => untraced(Ok(Value::Matrix(left.transpose())), config),
        (Operation::Determinant, false) => untraced(determinant(left).map(Value::Scalar), config),
        (Operation::Determinant, true) => respond(determinant_traced(left), Value::Scalar),
        (Operation::GaussEliminate, false) => {
            untraced(gauss_eliminate(left, gauss_rhs).map(Value::Matrix), config)
        }
        (Operation::GaussEliminate, true) => {
            respond(gauss_eliminate_traced(left, gauss_rhs), Value::Matrix)
        }
        (Operation::Inverse, false) => {
            untraced(inverse_via_determinant(left).map(Value::Matrix), config)
        }
        (Operation::Inverse, true) => {
            respond(inverse_via_determinant_traced(left), Value::Matrix)
        }
        (Operation::Cramer, traced) => match vector_values(left, right) {
            Err(error) => untraced(Err(error), config),
            Ok(rhs) if traced => respond(solve_cramer_traced(left, &rhs), Value::Roots),
            Ok(rhs) => untraced(solve_cramer(left, &rhs).map(Value::Roots), config),
        },
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<i64>>) -> Matrix {
        Matrix::from_integers(rows).unwrap()
    }

    fn sample() -> Matrix {
        m(vec![vec![1, 2, 3], vec![2, 5, 3], vec![1, 0, 8]])
    }

    #[test]
    fn test_operation_from_str() {
        assert_eq!("gauss".parse::<Operation>().unwrap(), Operation::GaussEliminate);
        assert_eq!(
            "scale:-3/4".parse::<Operation>().unwrap(),
            Operation::Scale(Rational::new(-3, 4).unwrap())
        );
        assert_eq!(
            "rotate".parse::<Operation>(),
            Err(MatrixError::UnknownOperation {
                name: "rotate".into()
            })
        );
        assert!("scale:x".parse::<Operation>().is_err());
    }

    #[test]
    fn test_execute_untraced() {
        let config = EngineConfig::default();
        let response = execute(&Request::new(Operation::Determinant, sample()), &config);
        assert_eq!(response.outcome, Ok(Value::Scalar(Rational::from(-1))));
        assert_eq!(response.trace, None);

        let response = execute(&Request::new(Operation::Inverse, sample()), &config);
        assert_eq!(
            response.outcome.unwrap().to_string(),
            "[[-40 16  9]\n [ 13 -5 -3]\n [  5 -2 -1]]"
        );

        let rhs = Matrix::column_vector(vec![5, 2, 1].into_iter().map(Rational::from).collect());
        let response = execute(
            &Request::new(Operation::Cramer, sample()).with_right(rhs.clone()),
            &config,
        );
        assert_eq!(response.outcome.unwrap().to_string(), "(-159, 52, 20)");

        let response = execute(
            &Request::new(Operation::Cramer, sample()).with_right(rhs.transpose()),
            &config,
        );
        assert_eq!(
            response.outcome,
            Ok(Value::Roots(
                vec![-159, 52, 20].into_iter().map(Rational::from).collect()
            ))
        );

        let response = execute(
            &Request::new(Operation::Scale(Rational::from(2)), m(vec![vec![1, -2]])),
            &config,
        );
        assert_eq!(response.outcome, Ok(Value::Matrix(m(vec![vec![2, -4]]))));
    }

    #[test]
    fn test_execute_errors() {
        let config = EngineConfig::default();
        let left = m(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let right = m(vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]);
        let response = execute(&Request::new(Operation::Multiply, left).with_right(right), &config);
        assert_eq!(
            response.outcome,
            Err(MatrixError::ShapeMismatch {
                left_rows: 2,
                left_cols: 3,
                right_rows: 4,
                right_cols: 2
            })
        );

        let response = execute(
            &Request::new(Operation::Cramer, m(vec![vec![1, 2], vec![3, 4]]))
                .with_right(m(vec![vec![1, 9], vec![2, 9]])),
            &config,
        );
        assert_eq!(
            response.outcome,
            Err(MatrixError::DimensionMismatch {
                expected: 2,
                actual: 4
            })
        );

        let response = execute(&Request::new(Operation::Cramer, sample()), &config);
        assert_eq!(
            response.outcome,
            Err(MatrixError::DimensionMismatch {
                expected: 3,
                actual: 0
            })
        );
    }

    #[test]
    fn test_execute_traced() {
        let config = EngineConfig::traced();
        let response = execute(&Request::new(Operation::GaussEliminate, sample()), &config);
        assert!(response.outcome.is_ok());
        let text = response.render_trace(&config.render).unwrap();
        assert!(text.starts_with("1 2 3 | 1 0 0\n"));

        let response = execute(&Request::new(Operation::Transpose, sample()), &config);
        assert_eq!(response.outcome, Ok(Value::Matrix(sample().transpose())));
        assert_eq!(response.trace, Some(Trace::new()));

        let response = execute(
            &Request::new(Operation::Inverse, m(vec![vec![1, 2], vec![2, 4]])),
            &config,
        );
        assert!(matches!(
            response.outcome,
            Err(MatrixError::DivideByZero { .. })
        ));
        assert_eq!(response.trace.map(|t| t.len()), Some(4));
    }
}
