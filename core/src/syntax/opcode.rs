use serde::{Deserialize, Serialize};

/// Operator codes of [`Expr::Op`](crate::syntax::Expr::Op).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    /// `index[key]`: point lookup in a database index.
    Lookup,
    /// `f(arg)`: lambda or builtin application.
    Func,
    /// `obj.NAME`: attribute of an object.
    Field,
    /// `a -> b`: one edge.
    Path,
    /// `a ->* b`: zero or more edges.
    LongPathZ,
    /// `a ->+ b`: one or more edges.
    LongPathNZ,
    Union,
    Intersect,
    LogAnd,
    LogOr,
    Eq,
    Ne,
    /// Glob match.
    Match,
    NoMatch,
    Lt,
    Gt,
    Le,
    Ge,
    Contains,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// String or list concatenation.
    StrCat,
    LogNot,
    Neg,
    /// Path marker: zero or one.
    Optional,
    /// Path marker: one or more.
    Repeat,
    /// Path marker: position contributes to the result.
    Extract,
}

impl OpCode {
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            OpCode::LogNot | OpCode::Neg | OpCode::Optional | OpCode::Repeat | OpCode::Extract
        )
    }

    pub fn is_path(self) -> bool {
        matches!(self, OpCode::Path | OpCode::LongPathZ | OpCode::LongPathNZ)
    }

    /// Mirror image under swapped operands, if the operator has one.
    pub fn swapped(self) -> Option<OpCode> {
        match self {
            OpCode::Eq
            | OpCode::Ne
            | OpCode::Add
            | OpCode::Mul
            | OpCode::Union
            | OpCode::Intersect
            | OpCode::LogAnd
            | OpCode::LogOr => Some(self),
            OpCode::Lt => Some(OpCode::Gt),
            OpCode::Gt => Some(OpCode::Lt),
            OpCode::Le => Some(OpCode::Ge),
            OpCode::Ge => Some(OpCode::Le),
            _ => None,
        }
    }

    /// Logical complement, if the operator has one.
    pub fn negated(self) -> Option<OpCode> {
        match self {
            OpCode::Eq => Some(OpCode::Ne),
            OpCode::Ne => Some(OpCode::Eq),
            OpCode::Match => Some(OpCode::NoMatch),
            OpCode::NoMatch => Some(OpCode::Match),
            OpCode::Lt => Some(OpCode::Ge),
            OpCode::Ge => Some(OpCode::Lt),
            OpCode::Gt => Some(OpCode::Le),
            OpCode::Le => Some(OpCode::Gt),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            OpCode::Lookup => "[]",
            OpCode::Func => "()",
            OpCode::Field => ".",
            OpCode::Path => "->",
            OpCode::LongPathZ => "->*",
            OpCode::LongPathNZ => "->+",
            OpCode::Union => "union",
            OpCode::Intersect => "intersect",
            OpCode::LogAnd => "&&",
            OpCode::LogOr => "||",
            OpCode::Eq => "==",
            OpCode::Ne => "!=",
            OpCode::Match => "~",
            OpCode::NoMatch => "!~",
            OpCode::Lt => "<",
            OpCode::Gt => ">",
            OpCode::Le => "<=",
            OpCode::Ge => ">=",
            OpCode::Contains => "contains",
            OpCode::Add => "+",
            OpCode::Sub | OpCode::Neg => "-",
            OpCode::Mul => "*",
            OpCode::Div => "/",
            OpCode::Mod => "%",
            OpCode::StrCat => "++",
            OpCode::LogNot => "!",
            OpCode::Optional => "?",
            OpCode::Repeat => "+",
            OpCode::Extract => "extract",
        }
    }
}
