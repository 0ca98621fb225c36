use thiserror::Error;

/// Errors reported by the matrix engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("Matrix must be square, but given matrix is {rows}*{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error(
        "Attempt to combine {left_rows}*{left_cols} matrix with {right_rows}*{right_cols} matrix"
    )]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("Length of argument is {actual}, while length of given matrix is {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `context` names the quantity that was being divided
    #[error("Attempt to divide {context} with 0")]
    DivideByZero { context: String },

    #[error("Row {row} has {actual} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{token} is not a number")]
    InvalidNumber { token: String },

    #[error("Unknown operation {name}")]
    UnknownOperation { name: String },

    #[error("Cannot remove row {row} and column {col} from {rows}*{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

impl MatrixError {
    pub fn divide_by_zero(context: impl Into<String>) -> Self {
        MatrixError::DivideByZero {
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatrixError>;

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
