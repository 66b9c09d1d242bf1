//! Safe evaluation of generated query expressions.
//!
//! Expressions are parsed into a small syntax tree and interpreted against the
//! loaded frame. Nothing is executed by a host interpreter: only `df` and `pd`
//! resolve, and every attribute and method goes through an allow-list. The
//! frame is borrowed immutably for the whole evaluation.

mod aggregate;
mod ast;
mod eval;
mod lexer;
mod methods;
mod ops;
mod parser;
mod value;

pub use ast::{BinOp, Expr, UnaryOp};
pub use eval::Evaluator;
pub use parser::parse;
pub use value::{format_list, QueryValue, Series};

use crate::dataset::{Dataset, Frame};
use crate::error::{AskError, Result};
use tracing::debug;

/// Evaluates `expression` against the dataset.
pub fn evaluate(expression: &str, dataset: &Dataset) -> Result<QueryValue> {
    evaluate_frame(expression, dataset.frame())
}

/// Evaluates `expression` with `df` bound to `frame`.
pub fn evaluate_frame(expression: &str, frame: &Frame) -> Result<QueryValue> {
    let expr = parse(expression).map_err(|e| AskError::evaluation(e, expression))?;
    debug!(expression, "Evaluating query expression");
    Evaluator::new(frame)
        .evaluate(&expr)
        .map_err(|e| AskError::evaluation(e, expression))
}
