use crate::error::{MatrixError, Result};
use crate::rings::rational::Rational;
use crate::utils::{align_columns, bracketed};
use num_traits::{One, Zero};
use std::fmt;

/// Rectangular matrix of exact rationals, stored row by row.
///
/// The empty (0x0) matrix is the default value and stands for an absent
/// operand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<Rational>,
}

impl Matrix {
    /// Zero matrix of the given shape. Any shape with no cells is the empty
    /// matrix.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        if rows == 0 || cols == 0 {
            return Matrix::default();
        }
        Matrix {
            rows,
            cols,
            cells: vec![Rational::zero(); rows * cols],
        }
    }

    // `cells` must hold exactly `rows * cols` entries
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Rational>) -> Matrix {
        debug_assert_eq!(cells.len(), rows * cols);
        Matrix { rows, cols, cells }
    }

    pub fn from_list(lines: Vec<Vec<Rational>>) -> Result<Matrix> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if let Some((row, line)) = lines.iter().enumerate().find(|(_, l)| l.len() != cols) {
            return Err(MatrixError::RaggedRows {
                row,
                expected: cols,
                actual: line.len(),
            });
        }
        if cols == 0 {
            return Ok(Matrix::default());
        }

        Ok(Matrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    pub fn from_integers(lines: Vec<Vec<i64>>) -> Result<Matrix> {
        Matrix::from_list(
            lines
                .into_iter()
                .map(|l| l.into_iter().map(Rational::from).collect())
                .collect(),
        )
    }

    /// 1xN matrix.
    pub fn row_vector(values: Vec<Rational>) -> Matrix {
        if values.is_empty() {
            return Matrix::default();
        }
        Matrix::from_cells(1, values.len(), values)
    }

    /// Nx1 matrix.
    pub fn column_vector(values: Vec<Rational>) -> Matrix {
        if values.is_empty() {
            return Matrix::default();
        }
        Matrix::from_cells(values.len(), 1, values)
    }

    pub fn identity(n: usize) -> Matrix {
        Matrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| {
                    (0..n).map(move |j| {
                        if i == j {
                            Rational::one()
                        } else {
                            Rational::zero()
                        }
                    })
                })
                .collect(),
        }
    }

    /// Reads one row per non empty line, entries separated by whitespace,
    /// each entry an integer or `p/q`.
    pub fn parse(text: &str) -> Result<Matrix> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| {
                l.split_whitespace()
                    .map(str::parse::<Rational>)
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Matrix::from_list(lines)
    }

    pub fn to_list(&self) -> Vec<Vec<Rational>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_square(&self) -> bool {
        !self.is_empty() && self.rows == self.cols
    }

    /// Size of a non empty square matrix, `NotSquare` otherwise.
    pub fn square_size(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.rows)
    }

    pub fn cells(&self) -> &[Rational] {
        &self.cells
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> &Rational {
        &self.cells[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[Rational] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Rational] {
        &mut self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn column(&self, col: usize) -> Vec<Rational> {
        (0..self.rows).map(|r| self.at(r, col).clone()).collect()
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.cols {
            self.cells.swap(a * self.cols + k, b * self.cols + k);
        }
    }

    /// Copy with column `col` replaced by `values`.
    pub(crate) fn with_column(&self, col: usize, values: &[Rational]) -> Matrix {
        let mut result = self.clone();
        for (r, value) in values.iter().enumerate().take(self.rows) {
            result.cells[r * self.cols + col] = value.clone();
        }
        result
    }

    pub fn transpose(&self) -> Matrix {
        Matrix {
            rows: self.cols,
            cols: self.rows,
            cells: (0..self.cols)
                .flat_map(|c| (0..self.rows).map(move |r| self.at(r, c).clone()))
                .collect(),
        }
    }

    // Aligned text rows without brackets
    pub(crate) fn aligned_rows(&self) -> Vec<String> {
        let text: Vec<Vec<String>> = (0..self.rows)
            .map(|r| self.row(r).iter().map(|x| x.to_string()).collect())
            .collect();
        align_columns(&text)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bracketed(&self.aligned_rows()))
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn q(num: i64, den: i64) -> Rational {
        Rational::new(num, den).unwrap()
    }

    #[test]
    fn test_matrix_from_list() {
        let m = Matrix::from_integers(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(*m.at(1, 2), 6);
        assert_eq!(m.row(0), &[q(1, 1), q(2, 1), q(3, 1)]);
        assert_eq!(m.column(1), vec![q(2, 1), q(5, 1)]);
        assert!(!m.is_square());

        assert_eq!(
            Matrix::from_integers(vec![vec![1, 2], vec![3]]),
            Err(MatrixError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(Matrix::from_list(vec![]).unwrap(), Matrix::default());
        assert!(Matrix::default().is_empty());
        assert!(!Matrix::default().is_square());
    }

    #[test]
    fn test_matrix_identity_and_vectors() {
        let id = Matrix::identity(3);
        assert_eq!(
            id,
            Matrix::from_integers(vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]).unwrap()
        );
        assert_eq!(id.square_size().unwrap(), 3);

        let v = Matrix::row_vector(vec![q(1, 1), q(2, 1), q(3, 1)]);
        assert_eq!(v.shape(), (1, 3));
        assert_eq!(v.transpose().shape(), (3, 1));
        assert_eq!(v.transpose(), Matrix::column_vector(v.cells().to_vec()));
        assert_eq!(
            Matrix::new(2, 3).square_size(),
            Err(MatrixError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_matrix_transpose() {
        let m = Matrix::from_integers(vec![vec![1, 2, 5, 77], vec![3, 4, 7, 11], vec![4, 8, 9, 1]])
            .unwrap();
        assert_eq!(
            m.transpose(),
            Matrix::from_integers(vec![
                vec![1, 3, 4],
                vec![2, 4, 8],
                vec![5, 7, 9],
                vec![77, 11, 1]
            ])
            .unwrap()
        );
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn test_matrix_parse() {
        let m = Matrix::parse("1 2/4 3\n\n  -4 5 6/1\n").unwrap();
        assert_eq!(
            m.to_list(),
            vec![
                vec![q(1, 1), q(1, 2), q(3, 1)],
                vec![q(-4, 1), q(5, 1), q(6, 1)]
            ]
        );
        assert_eq!(
            Matrix::parse("1 x"),
            Err(MatrixError::InvalidNumber { token: "x".into() })
        );
        assert!(Matrix::parse("1 2\n3").is_err());
        assert_eq!(Matrix::parse("").unwrap(), Matrix::default());
    }

    #[test]
    fn test_matrix_empty_shapes() {
        assert_eq!(Matrix::new(0, 3), Matrix::default());
        assert_eq!(Matrix::new(4, 0), Matrix::default());
        assert_eq!(Matrix::new(0, 3).shape(), (0, 0));
        assert_eq!(Matrix::row_vector(vec![]), Matrix::new(0, 1));
        assert_eq!(Matrix::identity(0), Matrix::new(0, 0));
        assert_eq!(Matrix::new(2, 1).shape(), (2, 1));
    }

    #[test]
    fn test_matrix_display() {
        let m = Matrix::from_integers(vec![vec![-40, 16, 9], vec![13, -5, -3], vec![5, -2, -1]])
            .unwrap();
        assert_eq!(m.to_string(), "[[-40 16  9]\n [ 13 -5 -3]\n [  5 -2 -1]]");

        let v = Matrix::row_vector(vec![q(1, 2), q(-3, 1)]);
        assert_eq!(v.to_string(), "[[1/2 -3]]");
        assert_eq!(Matrix::default().to_string(), "[]");
    }

    #[test]
    fn test_matrix_row_helpers() {
        let mut m = Matrix::from_integers(vec![vec![1, 2], vec![3, 4]]).unwrap();
        m.swap_rows(0, 1);
        assert_eq!(m, Matrix::from_integers(vec![vec![3, 4], vec![1, 2]]).unwrap());
        let replaced = m.with_column(1, &[q(7, 1), q(8, 1)]);
        assert_eq!(
            replaced,
            Matrix::from_integers(vec![vec![3, 7], vec![1, 8]]).unwrap()
        );
        m.row_mut(0)[0] = q(1, 3);
        assert_eq!(*m.at(0, 0), q(1, 3));
    }
}
