//! Tree-walking evaluator for query expressions.
//!
//! The evaluator interprets an `Expr` against a [`ProvenanceStore`] and
//! produces an optional `Value`; `None` is nil.
//!
//! ## Design Principles
//!
//! - **Never panic**: type errors and the like are reported as diagnostics
//!   and the offending subexpression yields nil
//! - **Stack-safe**: depth tracking prevents stack overflow from deeply
//!   nested expressions
//! - **Bounded paths**: path evaluation stops at a step budget
//!
//! ## Example
//!
//! ```ignore
//! use osage_core::{evaluator, store::MemoryStore, syntax::Expr};
//!
//! let store = MemoryStore::new();
//! let expr = Expr::binary(OpCode::Add, Expr::int(1), Expr::int(2));
//! let result = evaluator::eval(&store, &expr).unwrap();
//! assert_eq!(result, Some(Value::Int(3)));
//! ```

mod builtins;
mod error;
mod eval;
mod operators;
mod path;

#[cfg(test)]
mod path_test;

pub use error::{ExecutionError, ResourceExceededError, RuntimeError};
pub use eval::{EvalResult, Evaluator};

use crate::{api::ExecutionOptions, store::ProvenanceStore, syntax::Expr};

/// Evaluate an expression with default limits, discarding diagnostics.
pub fn eval(store: &dyn ProvenanceStore, expr: &Expr) -> EvalResult {
    Evaluator::new(ExecutionOptions::default(), store).eval(expr)
}
