use core::fmt;
use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::syntax::OpCode;
use crate::values::Value;

/// Byte range in the query text the node came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.0.start, self.0.end)
    }
}

/// Identity of a binding site. Names are for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub u32);

/// A variable introduced by a binding form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub id: VarId,
    pub name: String,
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id.0)
    }
}

/// Query expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `for var in source suchthat guard do body`
    For {
        var: Var,
        source: Box<Expr>,
        guard: Box<Expr>,
        body: Box<Expr>,
    },
    /// `let var = bound suchthat guard in body`
    Let {
        var: Var,
        bound: Box<Expr>,
        guard: Box<Expr>,
        body: Box<Expr>,
    },
    /// `\var. body`
    Lambda { var: Var, body: Box<Expr> },
    /// `if test then yes else no`. A missing branch is statically nil.
    Cond {
        test: Box<Expr>,
        yes: Option<Box<Expr>>,
        no: Option<Box<Expr>>,
    },
    /// Operator application; `right` is absent for unary operators.
    Op {
        op: OpCode,
        left: Box<Expr>,
        right: Option<Box<Expr>>,
        #[serde(default)]
        span: Option<Span>,
    },
    /// Tuple constructor. Dropped fields are `None`.
    Tuple(Vec<Option<Expr>>),
    Ref(VarId),
    Val(Value),
}

impl Expr {
    pub fn literal(&self) -> Option<&Value> {
        match self {
            Expr::Val(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Val(_))
    }

    pub fn literal_int(&self) -> Option<i64> {
        self.literal().and_then(Value::as_int)
    }

    pub fn is_true_literal(&self) -> bool {
        self.literal().is_some_and(Value::is_true)
    }

    pub fn is_false_literal(&self) -> bool {
        self.literal().is_some_and(|v| !v.is_true())
    }

    pub fn is_ref_to(&self, var: VarId) -> bool {
        matches!(self, Expr::Ref(id) if *id == var)
    }

    pub fn span(&self) -> Option<&Span> {
        match self {
            Expr::Op { span, .. } => span.as_ref(),
            _ => None,
        }
    }

    /// Whether `var` occurs anywhere in this tree.
    pub fn mentions(&self, var: VarId) -> bool {
        let mut found = false;
        self.walk(&mut |e| found |= e.is_ref_to(var));
        found
    }

    /// Largest variable id bound or referenced in this tree.
    pub fn max_var_id(&self) -> Option<VarId> {
        let mut max = None;
        self.walk(&mut |e| {
            let id = match e {
                Expr::For { var, .. } | Expr::Let { var, .. } | Expr::Lambda { var, .. } => {
                    var.id
                }
                Expr::Ref(id) => *id,
                Expr::Val(Value::Lambda(lambda)) => lambda.var.id,
                _ => return,
            };
            max = max.max(Some(id));
        });
        max
    }

    /// Pre-order traversal.
    pub fn walk(&self, f: &mut dyn FnMut(&Expr)) {
        f(self);
        match self {
            Expr::For {
                source,
                guard,
                body,
                ..
            } => {
                source.walk(f);
                guard.walk(f);
                body.walk(f);
            }
            Expr::Let {
                bound, guard, body, ..
            } => {
                bound.walk(f);
                guard.walk(f);
                body.walk(f);
            }
            Expr::Lambda { body, .. } => body.walk(f),
            Expr::Cond { test, yes, no } => {
                test.walk(f);
                for branch in [yes, no].into_iter().flatten() {
                    branch.walk(f);
                }
            }
            Expr::Op { left, right, .. } => {
                left.walk(f);
                if let Some(right) = right {
                    right.walk(f);
                }
            }
            Expr::Tuple(fields) => {
                for field in fields.iter().flatten() {
                    field.walk(f);
                }
            }
            Expr::Val(Value::Lambda(lambda)) => lambda.body.walk(f),
            Expr::Ref(_) | Expr::Val(_) => {}
        }
    }
}
