//! Evaluation errors.
//!
//! # Error Categories
//!
//! - **Runtime errors**: wrong operand tags, zero divisors, builtin arity
//!   problems and the like. These never unwind: the evaluator records them
//!   as diagnostics and the offending subexpression yields nil.
//!
//! - **Resource exceeded errors**: evaluation depth or path step budget
//!   exhausted. These abort the whole query.

use thiserror::Error;

use crate::store::LookupError;
use crate::values::{TypeMismatch, ValueTag};

/// Error that aborts evaluation of the whole query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceededError),
}

/// Query-level errors, reported as diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Operator applied to operands of unsupported tags.
    #[error("Invalid operand types for {op}: {}", tag_list(.left, .right))]
    InvalidOperands {
        op: &'static str,
        left: ValueTag,
        right: Option<ValueTag>,
    },

    /// Value of the wrong tag inserted into a list.
    #[error(transparent)]
    ListTypeMismatch(#[from] TypeMismatch),

    /// Reference to a variable with no live binding.
    #[error("Unbound variable #{var}")]
    UnboundVariable { var: u32 },

    #[error("Call of non-function ({found:?})")]
    NotCallable { found: ValueTag },

    #[error("Lookup applied to non-database ({found:?})")]
    NotAnIndex { found: ValueTag },

    #[error("Field reference on non-object ({found:?})")]
    NotAnObject { found: ValueTag },

    #[error("Field name must be a string, found {found:?}")]
    BadFieldName { found: ValueTag },

    #[error(transparent)]
    BadIndexKey(#[from] LookupError),

    #[error("{builtin} expects {expected}, found {found}")]
    BadArgument {
        builtin: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid glob pattern {pattern:?}")]
    BadPattern { pattern: String },

    /// A path position that cannot produce objects to start from.
    #[error("Path start must produce objects, found {found:?}")]
    BadPathStart { found: ValueTag },
}

/// Resource limits that terminate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceExceededError {
    /// Evaluation recursion depth exceeded.
    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    /// Path evaluation tested more neighbors than allowed.
    #[error("Path evaluation exceeded {max_steps} steps")]
    PathStepsExceeded { max_steps: usize },
}

impl RuntimeError {
    pub(crate) fn operands(op: &'static str, left: ValueTag, right: Option<ValueTag>) -> Self {
        RuntimeError::InvalidOperands { op, left, right }
    }
}

fn tag_list(left: &ValueTag, right: &Option<ValueTag>) -> String {
    match right {
        Some(right) => format!("{:?} and {:?}", left, right),
        None => format!("{:?}", left),
    }
}
