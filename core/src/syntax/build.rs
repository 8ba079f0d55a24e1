//! Constructors for building trees programmatically.

use crate::syntax::{Expr, OpCode, Var, VarId};
use crate::values::{IndexKind, Pnode, Value};

/// Allocates variables with distinct ids.
#[derive(Debug, Clone, Default)]
pub struct VarGen {
    next: u32,
}

impl VarGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose ids do not collide with any variable in `expr`.
    pub fn after(expr: &Expr) -> Self {
        Self {
            next: expr.max_var_id().map_or(0, |id| id.0 + 1),
        }
    }

    pub fn var(&mut self, name: &str) -> Var {
        let id = VarId(self.next);
        self.next += 1;
        Var {
            id,
            name: name.to_string(),
        }
    }
}

impl Expr {
    pub fn val(value: impl Into<Value>) -> Expr {
        Expr::Val(value.into())
    }

    pub fn int(i: i64) -> Expr {
        Expr::Val(Value::Int(i))
    }

    pub fn float(f: f64) -> Expr {
        Expr::Val(Value::Float(f))
    }

    pub fn string(s: &str) -> Expr {
        Expr::Val(Value::str(s))
    }

    pub fn pnode(p: Pnode) -> Expr {
        Expr::Val(Value::Pnode(p))
    }

    pub fn all() -> Expr {
        Expr::Val(Value::All)
    }

    pub fn index(kind: IndexKind) -> Expr {
        Expr::Val(Value::Index(kind))
    }

    pub fn var_ref(var: &Var) -> Expr {
        Expr::Ref(var.id)
    }

    pub fn binary(op: OpCode, left: Expr, right: Expr) -> Expr {
        Expr::Op {
            op,
            left: Box::new(left),
            right: Some(Box::new(right)),
            span: None,
        }
    }

    pub fn unary(op: OpCode, operand: Expr) -> Expr {
        Expr::Op {
            op,
            left: Box::new(operand),
            right: None,
            span: None,
        }
    }

    /// `obj.name`
    pub fn field(obj: Expr, name: &str) -> Expr {
        Expr::binary(OpCode::Field, obj, Expr::string(name))
    }

    pub fn call(func: Expr, arg: Expr) -> Expr {
        Expr::binary(OpCode::Func, func, arg)
    }

    pub fn tuple(fields: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Tuple(fields.into_iter().map(Some).collect())
    }

    pub fn for_in(var: Var, source: Expr, guard: Expr, body: Expr) -> Expr {
        Expr::For {
            var,
            source: Box::new(source),
            guard: Box::new(guard),
            body: Box::new(body),
        }
    }

    /// `let var = bound in body`, with an always-true guard.
    pub fn let_in(var: Var, bound: Expr, body: Expr) -> Expr {
        Expr::Let {
            var,
            bound: Box::new(bound),
            guard: Box::new(Expr::int(1)),
            body: Box::new(body),
        }
    }

    pub fn lambda(var: Var, body: Expr) -> Expr {
        Expr::Lambda {
            var,
            body: Box::new(body),
        }
    }

    pub fn cond(test: Expr, yes: Expr, no: Expr) -> Expr {
        Expr::Cond {
            test: Box::new(test),
            yes: Some(Box::new(yes)),
            no: Some(Box::new(no)),
        }
    }

    /// Attaches a source span to an operator node.
    pub fn with_span(mut self, start: usize, end: usize) -> Expr {
        if let Expr::Op { span, .. } = &mut self {
            *span = Some(crate::syntax::Span::new(start, end));
        }
        self
    }
}
