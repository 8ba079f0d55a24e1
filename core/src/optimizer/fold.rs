//! Node-level simplification rules.
//!
//! Each `fold_*` function receives already-simplified children, where `None`
//! stands for a statically nil child, and returns the simplified node.

use crate::optimizer::optimize_expr;
use crate::optimizer::subst::{kill, substitute};
use crate::syntax::{Expr, OpCode, Span, Var};
use crate::values::Value;

// ============================================================================
// Binding forms
// ============================================================================

pub(crate) fn fold_for(
    var: Var,
    source: Option<Expr>,
    guard: Option<Expr>,
    body: Option<Expr>,
) -> Option<Expr> {
    let (source, guard, body) = (source?, guard?, body?);
    if guard.is_false_literal() {
        return None;
    }
    if body.is_ref_to(var.id) && guard.is_true_literal() {
        return Some(source);
    }
    Some(Expr::For {
        var,
        source: Box::new(source),
        guard: Box::new(guard),
        body: Box::new(body),
    })
}

pub(crate) fn fold_let(
    var: Var,
    bound: Option<Expr>,
    guard: Option<Expr>,
    body: Option<Expr>,
) -> Option<Expr> {
    let body = body?;
    let guard = guard?;
    if !guard.is_true_literal() {
        // A real guard depends on the binding; leave the form alone.
        return Some(Expr::Let {
            var,
            bound: Box::new(bound?),
            guard: Box::new(guard),
            body: Box::new(body),
        });
    }
    if !body.mentions(var.id) {
        return Some(body);
    }
    let Some(bound) = bound else {
        return kill(body, var.id);
    };
    match bound {
        Expr::Ref(_) | Expr::Val(_) => optimize_expr(substitute(body, var.id, &bound)),
        _ if body.is_ref_to(var.id) => Some(bound),
        _ => Some(Expr::Let {
            var,
            bound: Box::new(bound),
            guard: Box::new(guard),
            body: Box::new(body),
        }),
    }
}

pub(crate) fn fold_cond(test: Option<Expr>, yes: Option<Expr>, no: Option<Expr>) -> Option<Expr> {
    let Some(test) = test else {
        // A nil test takes the yes branch.
        return yes;
    };
    if yes.is_none() && no.is_none() {
        return None;
    }
    if let Some(value) = test.literal() {
        return if value.is_true() { yes } else { no };
    }
    Some(Expr::Cond {
        test: Box::new(test),
        yes: yes.map(Box::new),
        no: no.map(Box::new),
    })
}

pub(crate) fn fold_tuple(fields: Vec<Option<Expr>>) -> Option<Expr> {
    let mut fields: Vec<Expr> = fields.into_iter().flatten().collect();
    match fields.len() {
        0 => None,
        1 => fields.pop(),
        _ if fields.iter().all(Expr::is_literal) => Some(Expr::Val(Value::Tuple(
            fields
                .into_iter()
                .filter_map(|f| match f {
                    Expr::Val(v) => Some(v),
                    _ => None,
                })
                .collect(),
        ))),
        _ => Some(Expr::Tuple(fields.into_iter().map(Some).collect())),
    }
}

// ============================================================================
// Operators
// ============================================================================

fn make_op(op: OpCode, left: Expr, right: Option<Expr>, span: Option<Span>) -> Expr {
    Expr::Op {
        op,
        left: Box::new(left),
        right: right.map(Box::new),
        span,
    }
}

pub(crate) fn fold_op(
    op: OpCode,
    left: Option<Expr>,
    right: Option<Expr>,
    span: Option<Span>,
) -> Option<Expr> {
    // Operators that tolerate a nil operand.
    match op {
        OpCode::Union => {
            return match (left, right) {
                (None, right) => right,
                (left, None) => left,
                (Some(left), Some(right)) => Some(make_op(op, left, Some(right), span)),
            };
        }
        OpCode::StrCat => {
            return match (left, right) {
                (None, right) => right,
                (left, None) => left,
                (Some(left), Some(right)) => Some(fold_strcat(left, right, span)),
            };
        }
        OpCode::LogAnd => {
            return Some(match (left, right) {
                (None, _) | (_, None) => Expr::int(0),
                (Some(left), Some(right)) if left.is_true_literal() => {
                    truth_of(op, left, right, span)
                }
                (Some(left), Some(_)) if left.is_false_literal() => Expr::int(0),
                (Some(left), right) => make_op(op, left, right, span),
            });
        }
        OpCode::LogOr => {
            return Some(match (left, right) {
                (Some(left), _) if left.is_true_literal() => Expr::int(1),
                (None, None) => Expr::int(0),
                (None, Some(right)) => truth_of(op, Expr::int(0), right, span),
                (Some(left), None) if left.is_false_literal() => Expr::int(0),
                (Some(left), Some(right)) if left.is_false_literal() => {
                    truth_of(op, left, right, span)
                }
                (Some(left), right) => make_op(op, left, right.or(Some(Expr::int(0))), span),
            });
        }
        _ => {}
    }

    let left = left?;
    if op.is_unary() {
        return Some(match op {
            OpCode::LogNot => fold_not(left, span),
            OpCode::Neg => fold_neg(left, span),
            _ => make_op(op, left, None, span),
        });
    }
    let right = right?;

    match op {
        OpCode::Eq => {
            if let (Expr::Ref(a), Expr::Ref(b)) = (&left, &right) {
                if a == b {
                    return Some(Expr::int(1));
                }
            }
            if let (Some(a), Some(b)) = (left.literal(), right.literal()) {
                return Some(Expr::int(a.equals(b) as i64));
            }
        }
        OpCode::Ne => {
            if let (Some(a), Some(b)) = (left.literal(), right.literal()) {
                return Some(Expr::int(!a.equals(b) as i64));
            }
        }
        OpCode::Add => {
            if left.literal_int() == Some(0) {
                return Some(right);
            }
            if right.literal_int() == Some(0) {
                return Some(left);
            }
            if right.is_literal() && !left.is_literal() {
                return int_constant_fold(op, right, left, span);
            }
        }
        OpCode::Sub => {
            if left.literal_int() == Some(0) {
                return Some(fold_neg(right, span));
            }
            if right.literal_int() == Some(0) {
                return Some(left);
            }
        }
        OpCode::Mul => {
            if left.literal_int() == Some(0) || right.literal_int() == Some(0) {
                return Some(Expr::int(0));
            }
            if left.literal_int() == Some(1) {
                return Some(right);
            }
            if right.literal_int() == Some(1) {
                return Some(left);
            }
            if right.is_literal() && !left.is_literal() {
                return int_constant_fold(op, right, left, span);
            }
        }
        OpCode::Div | OpCode::Mod => {
            if left.literal_int() == Some(0) {
                return Some(Expr::int(0));
            }
        }
        _ => {}
    }

    match op {
        OpCode::Lt
        | OpCode::Gt
        | OpCode::Le
        | OpCode::Ge
        | OpCode::Add
        | OpCode::Sub
        | OpCode::Mul
        | OpCode::Div
        | OpCode::Mod => int_constant_fold(op, left, right, span),
        _ => Some(make_op(op, left, Some(right), span)),
    }
}

fn fold_strcat(left: Expr, right: Expr, span: Option<Span>) -> Expr {
    let empty = |e: &Expr| e.literal().and_then(Value::as_str) == Some("");
    if empty(&left) {
        return right;
    }
    if empty(&right) {
        return left;
    }
    match (left, right) {
        (Expr::Val(Value::Str(a)), Expr::Val(Value::Str(b))) => Expr::Val(Value::Str(a + &b)),
        (left, right) => make_op(OpCode::StrCat, left, Some(right), span),
    }
}

/// `lit && right` or `lit || right` where `lit` no longer decides the
/// result. The operator yields Int 0/1, so `right` stands in for it only
/// when it is itself a literal or a never-nil logical operator.
fn truth_of(op: OpCode, left: Expr, right: Expr, span: Option<Span>) -> Expr {
    match right {
        Expr::Val(value) => Expr::int(value.is_true() as i64),
        Expr::Op {
            op: OpCode::LogAnd | OpCode::LogOr,
            ..
        } => right,
        right => make_op(op, left, Some(right), span),
    }
}

/// Operators whose result is Int 0/1 or nil.
fn yields_truth(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Op {
            op: OpCode::Eq
                | OpCode::Ne
                | OpCode::Lt
                | OpCode::Gt
                | OpCode::Le
                | OpCode::Ge
                | OpCode::Match
                | OpCode::NoMatch
                | OpCode::Contains
                | OpCode::LogNot
                | OpCode::LogAnd
                | OpCode::LogOr,
            ..
        }
    )
}

fn fold_not(operand: Expr, span: Option<Span>) -> Expr {
    match operand {
        Expr::Op {
            op: OpCode::LogNot,
            left,
            ..
        } if yields_truth(&left) => *left,
        Expr::Val(value) => Expr::int(!value.is_true() as i64),
        operand => make_op(OpCode::LogNot, operand, None, span),
    }
}

fn fold_neg(operand: Expr, span: Option<Span>) -> Expr {
    match operand {
        Expr::Op {
            op: OpCode::Neg,
            left,
            ..
        } => *left,
        Expr::Op {
            op: OpCode::Sub,
            left,
            right: Some(right),
            span: inner,
        } => make_op(OpCode::Sub, *right, Some(*left), inner),
        Expr::Val(Value::Int(i)) => Expr::int(i.wrapping_neg()),
        Expr::Val(Value::Float(f)) => Expr::float(-f),
        operand => make_op(OpCode::Neg, operand, None, span),
    }
}

/// Folds integer arithmetic and comparisons on two literals, and additions
/// or multiplications reaching one level into a partially constant operand.
fn int_constant_fold(op: OpCode, left: Expr, right: Expr, span: Option<Span>) -> Option<Expr> {
    let Some(a) = left.literal_int() else {
        return Some(make_op(op, left, Some(right), span));
    };
    if let Some(b) = right.literal_int() {
        let folded = match op {
            OpCode::Lt => Some((a < b) as i64),
            OpCode::Gt => Some((a > b) as i64),
            OpCode::Le => Some((a <= b) as i64),
            OpCode::Ge => Some((a >= b) as i64),
            OpCode::Add => Some(a.wrapping_add(b)),
            OpCode::Sub => Some(a.wrapping_sub(b)),
            OpCode::Mul => Some(a.wrapping_mul(b)),
            OpCode::Div if b != 0 => Some(a.wrapping_div(b)),
            OpCode::Mod if b != 0 => Some(a.wrapping_rem(b)),
            _ => None,
        };
        return Some(match folded {
            Some(n) => Expr::int(n),
            None => make_op(op, left, Some(right), span),
        });
    }

    match (op, right) {
        // a + (b + x) => (a+b) + x,  a + (b - x) => (a+b) - x
        (
            OpCode::Add,
            Expr::Op {
                op: inner @ (OpCode::Add | OpCode::Sub),
                left: inner_left,
                right: Some(inner_right),
                span: inner_span,
            },
        ) if inner_left.literal_int().is_some() => {
            let b = inner_left.literal_int().unwrap_or(0);
            fold_op(
                inner,
                Some(Expr::int(a.wrapping_add(b))),
                Some(*inner_right),
                inner_span,
            )
        }
        // a + (x - b) => x - (b-a)
        (
            OpCode::Add,
            Expr::Op {
                op: OpCode::Sub,
                left: inner_left,
                right: Some(inner_right),
                span: inner_span,
            },
        ) if inner_right.literal_int().is_some() => {
            let b = inner_right.literal_int().unwrap_or(0);
            fold_op(
                OpCode::Sub,
                Some(*inner_left),
                Some(Expr::int(b.wrapping_sub(a))),
                inner_span,
            )
        }
        // a * (b * x) => (a*b) * x
        (
            OpCode::Mul,
            Expr::Op {
                op: OpCode::Mul,
                left: inner_left,
                right: Some(inner_right),
                span: inner_span,
            },
        ) if inner_left.literal_int().is_some() => {
            let b = inner_left.literal_int().unwrap_or(1);
            fold_op(
                OpCode::Mul,
                Some(Expr::int(a.wrapping_mul(b))),
                Some(*inner_right),
                inner_span,
            )
        }
        (op, right) => Some(make_op(op, left, Some(right), span)),
    }
}
