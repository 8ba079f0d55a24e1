//! Index selection for full scans.
//!
//! [`indexify`] looks for `for x in ALL suchthat P do body` and, when some
//! clause of `P` (in conjunctive form) can be answered from the database
//! indexes, replaces `ALL` with the concatenation of the index lookups for
//! that clause. The guard stays in place: approximate indexes such as the
//! ARGV substring index return a superset of the matching objects.
//!
//! Scores per recognized literal:
//!
//! | pattern              | index        | score |
//! |----------------------|--------------|-------|
//! | `x.PNODE == literal` | identity     | 100   |
//! | `x.INODE == e`       | inode→pnode  | 80    |
//! | `x.ARGV == e`        | argv         | 60    |
//! | `x.ARGV contains e`  | argv         | 40    |
//!
//! A clause scores the mean of its literals plus the literal count, and is
//! unusable if any literal is unrecognized.

mod logic;
mod plan;

#[cfg(test)]
mod indexify_test;

use crate::syntax::{Expr, OpCode, Var};
use crate::values::Value;

use logic::Logic;
use plan::{ClausePlan, compile_access, score_clause};

/// Rewrites indexable full scans anywhere in `expr`.
pub fn indexify(expr: Expr) -> Expr {
    match expr {
        Expr::For {
            var,
            source,
            guard,
            body,
        } => {
            let source = indexify(*source);
            let guard = indexify(*guard);
            let body = indexify(*body);
            let scans_all =
                matches!(source, Expr::Val(Value::All)) && matches!(guard, Expr::Op { .. });
            let source = if scans_all {
                plan_scan(&var, &guard).unwrap_or(source)
            } else {
                source
            };
            Expr::For {
                var,
                source: Box::new(source),
                guard: Box::new(guard),
                body: Box::new(body),
            }
        }
        Expr::Let {
            var,
            bound,
            guard,
            body,
        } => Expr::Let {
            var,
            bound: Box::new(indexify(*bound)),
            guard: Box::new(indexify(*guard)),
            body: Box::new(indexify(*body)),
        },
        Expr::Lambda { var, body } => Expr::Lambda {
            var,
            body: Box::new(indexify(*body)),
        },
        Expr::Cond { test, yes, no } => Expr::Cond {
            test: Box::new(indexify(*test)),
            yes: yes.map(|e| Box::new(indexify(*e))),
            no: no.map(|e| Box::new(indexify(*e))),
        },
        Expr::Op {
            op,
            left,
            right,
            span,
        } => Expr::Op {
            op,
            left: Box::new(indexify(*left)),
            right: right.map(|e| Box::new(indexify(*e))),
            span,
        },
        Expr::Tuple(fields) => Expr::Tuple(
            fields
                .into_iter()
                .map(|field| field.map(indexify))
                .collect(),
        ),
        Expr::Ref(_) | Expr::Val(_) => expr,
    }
}

/// Source expression replacing `ALL` for a scan over `var` filtered by
/// `guard`, if any clause is indexable.
fn plan_scan(var: &Var, guard: &Expr) -> Option<Expr> {
    let mut leaves = Vec::new();
    let clauses = Logic::build(guard, &mut leaves).normalize()?.clauses();

    let mut best: Option<ClausePlan> = None;
    for clause in &clauses {
        if let Some(plan) = score_clause(clause, &leaves, var.id) {
            if best.as_ref().is_none_or(|b| plan.score > b.score) {
                best = Some(plan);
            }
        }
    }
    let best = best?;
    tracing::debug!(
        var = %var,
        score = best.score,
        branches = best.branches.len(),
        "replacing full scan with index lookup"
    );

    best.branches
        .into_iter()
        .map(compile_access)
        .reduce(|acc, next| Expr::binary(OpCode::StrCat, acc, next))
}
