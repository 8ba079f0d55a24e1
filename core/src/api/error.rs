//! Public error types for the query API.
//!
//! Internal errors are converted to these types at API boundaries.

use core::fmt;

use crate::syntax::Span;

/// Error that stops a query from producing any result.
///
/// Query-level problems such as type errors do not surface here; they are
/// reported as [`Diagnostic`]s alongside the (possibly nil) result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Resource limits exceeded (stack depth, path step budget).
    ResourceExceeded(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ResourceExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message (error, warning, or info) with optional source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue, when the tree carries one.
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(span) = &self.span {
            write!(f, " (at {})", span)?;
        }
        Ok(())
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the subexpression produced nothing.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<crate::evaluator::ExecutionError> for Error {
    fn from(err: crate::evaluator::ExecutionError) -> Self {
        use crate::evaluator::ExecutionError::*;
        match err {
            ResourceExceeded(res_err) => Error::ResourceExceeded(format!("{}", res_err)),
        }
    }
}
