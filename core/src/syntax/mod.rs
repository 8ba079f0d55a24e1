//! Query abstract syntax.
//!
//! The tree is produced by an external front end (or built directly with the
//! constructors in this module) and rewritten by the optimizer and the
//! indexifier before evaluation.

mod build;
mod dump;
mod expr;
mod opcode;

pub use build::VarGen;
pub use dump::dump_expr;
pub use expr::{Expr, Span, Var, VarId};
pub use opcode::OpCode;
