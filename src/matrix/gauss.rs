use crate::error::{MatrixError, Result};
use crate::matrix::matrix::Matrix;
use crate::rings::rational::Rational;
use crate::trace::{Augmented, Recorder, Silent, Step, Trace, Traced};
use log::{debug, trace};
use num_traits::{One, Zero};

// Augmented pair `[A | B]`; every row operation hits both halves.
struct System<'r, R: Recorder> {
    left: Matrix,
    right: Matrix,
    recorder: &'r mut R,
}

fn snapshot(left: &Matrix, right: &Matrix) -> Augmented {
    Augmented {
        left: left.clone(),
        right: right.clone(),
    }
}

impl<'r, R: Recorder> System<'r, R> {
    fn swap(&mut self, first: usize, second: usize) {
        if first == second {
            return;
        }
        trace!("swap rows {} and {}", first, second);
        self.left.swap_rows(first, second);
        self.right.swap_rows(first, second);

        let (left, right) = (&self.left, &self.right);
        self.recorder.record(|| Step::RowSwap {
            first,
            second,
            state: snapshot(left, right),
        });
    }

    fn divide(&mut self, row: usize, divisor: Rational) -> Result<()> {
        if divisor.is_zero() {
            return Err(MatrixError::divide_by_zero(format!("row {}", row + 1)));
        }
        trace!("divide row {} by {}", row, divisor);
        for x in self.left.row_mut(row).iter_mut() {
            *x = x.checked_div(&divisor)?;
        }
        for x in self.right.row_mut(row).iter_mut() {
            *x = x.checked_div(&divisor)?;
        }

        let (left, right) = (&self.left, &self.right);
        self.recorder.record(|| Step::RowScale {
            row,
            divisor,
            state: snapshot(left, right),
        });
        Ok(())
    }

    // row `target` += `factor` * row `source`
    fn combine(&mut self, source: usize, factor: Rational, target: usize) {
        trace!("add row {} * {} to row {}", source, factor, target);
        for half in [&mut self.left, &mut self.right] {
            let src = half.row(source).to_vec();
            for (x, s) in half.row_mut(target).iter_mut().zip(src.iter()) {
                *x = &*x + &(s * &factor);
            }
        }

        let (left, right) = (&self.left, &self.right);
        self.recorder.record(|| Step::RowCombine {
            source,
            factor,
            target,
            state: snapshot(left, right),
        });
    }

    // Bring a 1 to the diagonal of column `pivot`. A row of `candidates`
    // holding a literal 1 is swapped in and wins outright. Otherwise the
    // current row is kept when its entry is non zero, else the first non zero
    // candidate is swapped in, and the row is divided by its pivot.
    fn normalize(&mut self, pivot: usize, candidates: &[usize]) -> Result<()> {
        if let Some(&row) = candidates
            .iter()
            .find(|&&r| self.left.at(r, pivot).is_one())
        {
            self.swap(pivot, row);
            return Ok(());
        }

        let fallback = if self.left.at(pivot, pivot).is_zero() {
            candidates
                .iter()
                .copied()
                .find(|&r| !self.left.at(r, pivot).is_zero())
                .unwrap_or(pivot)
        } else {
            pivot
        };
        self.swap(pivot, fallback);

        let divisor = self.left.at(pivot, pivot).clone();
        self.divide(pivot, divisor)
    }

    fn forward(&mut self) -> Result<()> {
        let n = self.left.rows();
        for i in 0..n {
            if !self.left.at(i, i).is_one() {
                let candidates: Vec<usize> = (i..n).collect();
                self.normalize(i, &candidates)?;
            }

            for j in i + 1..n {
                let below = self.left.at(j, i).clone();
                if below.is_zero() {
                    continue;
                }
                self.combine(i, -below, j);
            }
        }
        Ok(())
    }

    fn backward(&mut self) -> Result<()> {
        let n = self.left.rows();
        for i in (0..n).rev() {
            if !self.left.at(i, i).is_one() {
                let candidates: Vec<usize> = (0..=i).rev().collect();
                self.normalize(i, &candidates)?;
            }

            for j in (0..i).rev() {
                let above = self.left.at(j, i).clone();
                if above.is_zero() {
                    continue;
                }
                self.combine(i, -above, j);
            }
        }
        Ok(())
    }
}

// Right hand side as a matrix with one row per equation
fn right_hand_side(n: usize, rhs: Option<&Matrix>) -> Result<Matrix> {
    let rhs = match rhs {
        None => return Ok(Matrix::identity(n)),
        Some(rhs) => rhs,
    };
    // a flat vector is read as a column
    let rhs = if rhs.rows() == 1 && rhs.cols() == n && n != 1 {
        rhs.transpose()
    } else {
        rhs.clone()
    };
    if rhs.rows() != n {
        return Err(MatrixError::DimensionMismatch {
            expected: n,
            actual: rhs.rows(),
        });
    }
    Ok(rhs)
}

fn eliminate<R: Recorder>(a: &Matrix, b: Option<&Matrix>, recorder: &mut R) -> Result<Matrix> {
    let n = a.square_size()?;
    let right = right_hand_side(n, b)?;
    debug!(
        "gauss elimination of {}x{} system with {} right hand side column(s)",
        n,
        n,
        right.cols()
    );

    let mut system = System {
        left: a.clone(),
        right,
        recorder,
    };
    let (left, right) = (&system.left, &system.right);
    system
        .recorder
        .record(|| Step::Augmented(snapshot(left, right)));

    system.forward()?;
    system.backward()?;
    Ok(system.right)
}

/// Reduces `[a | b]` to `[I | b']` and returns `b'`, i.e. `a^-1 * b`.
/// `b` defaults to the identity, giving the inverse of `a`.
pub fn gauss_eliminate(a: &Matrix, b: Option<&Matrix>) -> Result<Matrix> {
    eliminate(a, b, &mut Silent)
}

pub fn gauss_eliminate_traced(a: &Matrix, b: Option<&Matrix>) -> Traced<Matrix> {
    Traced::run(|trace: &mut Trace| eliminate(a, b, trace))
}

impl Matrix {
    pub fn gauss_eliminate(&self, rhs: Option<&Matrix>) -> Result<Matrix> {
        gauss_eliminate(self, rhs)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
