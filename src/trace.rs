//! Step by step record of a computation.
//!
//! Every traced operation returns a [`Traced`] value holding the outcome and
//! the ordered [`Trace`] of the steps taken to get there. Steps are
//! structured; their `Display` gives the classroom style text.

use crate::error::Result;
use crate::matrix::matrix::Matrix;
use crate::rings::rational::Rational;
use itertools::Itertools;
use std::fmt;

/// `[A | B]` state of an elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmented {
    pub left: Matrix,
    pub right: Matrix,
}

/// One term of a first row Laplace expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CofactorTerm {
    pub column: usize,
    pub entry: Rational,
    pub minor: Rational,
    /// `entry * minor`, before the alternating sign
    pub product: Rational,
    pub signed: Rational,
    /// Sum of the signed terms up to and including this one
    pub running: Rational,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub matrix: Matrix,
    /// Empty for 2x2 matrices
    pub terms: Vec<CofactorTerm>,
    pub value: Rational,
}

/// Products summed into one output cell of a matrix product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellProduct {
    pub col: usize,
    pub factors: Vec<(Rational, Rational)>,
    pub running: Vec<Rational>,
}

impl CellProduct {
    pub fn sum(&self) -> Rational {
        self.running.last().cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    InputDeterminant,
    CoefficientDeterminant,
    Variable(usize),
}

/// Row indices are 0 based; the text rendering counts from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Augmented(Augmented),
    RowSwap {
        first: usize,
        second: usize,
        state: Augmented,
    },
    RowScale {
        row: usize,
        divisor: Rational,
        state: Augmented,
    },
    RowCombine {
        source: usize,
        factor: Rational,
        target: usize,
        state: Augmented,
    },
    ProductRow {
        row: usize,
        cells: Vec<CellProduct>,
    },
    Determinant(Expansion),
    Cofactors(Matrix),
    Adjugate(Matrix),
    Heading(Heading),
    Divided {
        determinant: Rational,
        result: Matrix,
    },
    Root {
        variable: usize,
        numerator: Rational,
        denominator: Rational,
        root: Rational,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub divider: String,
    pub step_separator: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            divider: " | ".into(),
            step_separator: "\n".into(),
        }
    }
}

fn render_augmented(state: &Augmented, config: &RenderConfig) -> String {
    state
        .left
        .aligned_rows()
        .into_iter()
        .zip(state.right.aligned_rows())
        .map(|(l, r)| format!("{}{}{}", l, config.divider, r))
        .join("\n")
}

fn render_expansion(expansion: &Expansion) -> String {
    let body = if expansion.terms.is_empty() {
        expansion.value.to_string()
    } else {
        let mut expr = String::new();
        for (i, term) in expansion.terms.iter().enumerate() {
            if i > 0 {
                expr.push_str(if i % 2 == 1 { " - " } else { " + " });
            }
            expr.push_str(&term.product.to_string());
        }
        format!("{} = {}", expr, expansion.value)
    };
    format!("Determinant of\n{}\nis {}", expansion.matrix, body)
}

impl Step {
    pub fn render(&self, config: &RenderConfig) -> String {
        match self {
            Step::Augmented(state) => render_augmented(state, config),
            Step::RowSwap {
                first,
                second,
                state,
            } => format!(
                "Change row {} with row {}\n{}",
                first + 1,
                second + 1,
                render_augmented(state, config)
            ),
            Step::RowScale {
                row,
                divisor,
                state,
            } => format!(
                "Divide row {} by {}\n{}",
                row + 1,
                divisor,
                render_augmented(state, config)
            ),
            Step::RowCombine {
                source,
                factor,
                target,
                state,
            } => format!(
                "Add row {} * {} to row {}\n{}",
                source + 1,
                factor,
                target + 1,
                render_augmented(state, config)
            ),
            Step::ProductRow { cells, .. } => cells
                .iter()
                .map(|cell| {
                    let products = cell
                        .factors
                        .iter()
                        .map(|(a, b)| format!("{}X{}", a, b))
                        .join("+");
                    format!("{}={}", products, cell.sum())
                })
                .join(", "),
            Step::Determinant(expansion) => render_expansion(expansion),
            Step::Cofactors(m) => format!("Get adjugate matrix before transpose\n{}", m),
            Step::Adjugate(m) => format!("Transpose it\n{}", m),
            Step::Heading(Heading::InputDeterminant) => "Get determinant of given matrix".into(),
            Step::Heading(Heading::CoefficientDeterminant) => {
                "Find Determinant of given matrix.".into()
            }
            Step::Heading(Heading::Variable(i)) => format!("Find for variable {}", i + 1),
            Step::Divided { result, .. } => format!("Divide\n{}", result),
            Step::Root {
                numerator,
                denominator,
                root,
                ..
            } => format!("Divide {} with {} : {}", numerator, denominator, root),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&RenderConfig::default()))
    }
}

/// Ordered, append only list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn render(&self, config: &RenderConfig) -> String {
        self.steps
            .iter()
            .map(|s| s.render(config))
            .join(&config.step_separator)
    }
}

impl IntoIterator for Trace {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&RenderConfig::default()))
    }
}

/// Sink for steps. Steps are built lazily so untraced runs never clone
/// intermediate matrices.
pub trait Recorder {
    fn record<F: FnOnce() -> Step>(&mut self, step: F);
}

/// Recorder that drops every step.
pub struct Silent;

impl Recorder for Silent {
    #[inline(always)]
    fn record<F: FnOnce() -> Step>(&mut self, _step: F) {}
}

impl Recorder for Trace {
    fn record<F: FnOnce() -> Step>(&mut self, step: F) {
        self.steps.push(step());
    }
}

/// Outcome of a traced operation. On failure the trace holds every step up
/// to the failing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traced<T> {
    pub outcome: Result<T>,
    pub trace: Trace,
}

impl<T> Traced<T> {
    pub fn run<F: FnOnce(&mut Trace) -> Result<T>>(f: F) -> Traced<T> {
        let mut trace = Trace::new();
        let outcome = f(&mut trace);
        Traced { outcome, trace }
    }

    pub fn into_result(self) -> Result<(T, Trace)> {
        let trace = self.trace;
        self.outcome.map(|value| (value, trace))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Traced<U> {
        Traced {
            outcome: self.outcome.map(f),
            trace: self.trace,
        }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
