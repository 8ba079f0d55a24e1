//! Basic optimizer: bottom-up algebraic simplification of query trees.
//!
//! [`optimize`] rewrites children first and then simplifies the parent. A
//! result of `None` means the expression is statically nil. The rewrites
//! include constant folding, identity and absorbing elements, dead and
//! identity binding elimination, copy propagation, short-circuit folding and
//! tuple squeezing.
//!
//! Running the pass on its own output leaves the tree unchanged.

mod fold;
mod subst;


use crate::syntax::Expr;

pub(crate) use fold::{fold_cond, fold_for, fold_let, fold_op, fold_tuple};

/// Optimize `expr`. `None` means the whole expression is statically nil.
pub fn optimize(expr: Expr) -> Option<Expr> {
    let result = optimize_expr(expr);
    tracing::debug!(nil = result.is_none(), "optimizer pass complete");
    result
}

pub(crate) fn optimize_expr(expr: Expr) -> Option<Expr> {
    match expr {
        Expr::For {
            var,
            source,
            guard,
            body,
        } => fold_for(
            var,
            optimize_expr(*source),
            optimize_expr(*guard),
            optimize_expr(*body),
        ),
        Expr::Let {
            var,
            bound,
            guard,
            body,
        } => fold_let(
            var,
            optimize_expr(*bound),
            optimize_expr(*guard),
            optimize_expr(*body),
        ),
        Expr::Lambda { var, body } => Some(Expr::Lambda {
            var,
            body: Box::new(optimize_expr(*body)?),
        }),
        Expr::Cond { test, yes, no } => fold_cond(
            optimize_expr(*test),
            yes.and_then(|e| optimize_expr(*e)),
            no.and_then(|e| optimize_expr(*e)),
        ),
        Expr::Op {
            op,
            left,
            right,
            span,
        } => fold_op(
            op,
            optimize_expr(*left),
            right.and_then(|e| optimize_expr(*e)),
            span,
        ),
        Expr::Tuple(fields) => fold_tuple(
            fields
                .into_iter()
                .map(|field| field.and_then(optimize_expr))
                .collect(),
        ),
        Expr::Ref(_) | Expr::Val(_) => Some(expr),
    }
}
