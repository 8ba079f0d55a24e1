//! Variable substitution and elimination.

use crate::optimizer::{fold_cond, fold_for, fold_let, fold_op, fold_tuple};
use crate::syntax::{Expr, VarId};

/// Replaces every reference to `var` with a copy of `with`.
pub(super) fn substitute(expr: Expr, var: VarId, with: &Expr) -> Expr {
    let sub = |e: Box<Expr>| Box::new(substitute(*e, var, with));
    match expr {
        Expr::Ref(id) if id == var => with.clone(),
        Expr::For {
            var: v,
            source,
            guard,
            body,
        } => Expr::For {
            var: v,
            source: sub(source),
            guard: sub(guard),
            body: sub(body),
        },
        Expr::Let {
            var: v,
            bound,
            guard,
            body,
        } => Expr::Let {
            var: v,
            bound: sub(bound),
            guard: sub(guard),
            body: sub(body),
        },
        Expr::Lambda { var: v, body } => Expr::Lambda {
            var: v,
            body: sub(body),
        },
        Expr::Cond { test, yes, no } => Expr::Cond {
            test: sub(test),
            yes: yes.map(sub),
            no: no.map(sub),
        },
        Expr::Op {
            op,
            left,
            right,
            span,
        } => Expr::Op {
            op,
            left: sub(left),
            right: right.map(sub),
            span,
        },
        Expr::Tuple(fields) => Expr::Tuple(
            fields
                .into_iter()
                .map(|f| f.map(|f| substitute(f, var, with)))
                .collect(),
        ),
        Expr::Ref(_) | Expr::Val(_) => expr,
    }
}

/// Removes every reference to `var`, re-simplifying each enclosing node so
/// that nil propagates upward exactly as it would at evaluation time.
pub(super) fn kill(expr: Expr, var: VarId) -> Option<Expr> {
    let k = |e: Box<Expr>| kill(*e, var);
    match expr {
        Expr::Ref(id) if id == var => None,
        Expr::For {
            var: v,
            source,
            guard,
            body,
        } => fold_for(v, k(source), k(guard), k(body)),
        Expr::Let {
            var: v,
            bound,
            guard,
            body,
        } => fold_let(v, k(bound), k(guard), k(body)),
        Expr::Lambda { var: v, body } => Some(Expr::Lambda {
            var: v,
            body: Box::new(k(body)?),
        }),
        Expr::Cond { test, yes, no } => fold_cond(k(test), yes.and_then(k), no.and_then(k)),
        Expr::Op {
            op,
            left,
            right,
            span,
        } => fold_op(op, k(left), right.and_then(k), span),
        Expr::Tuple(fields) => fold_tuple(
            fields
                .into_iter()
                .map(|f| f.and_then(|f| kill(f, var)))
                .collect(),
        ),
        Expr::Ref(_) | Expr::Val(_) => Some(expr),
    }
}
