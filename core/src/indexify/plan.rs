//! Scoring guard literals against the available indexes.

use crate::indexify::logic::Literal;
use crate::syntax::{Expr, OpCode, VarId};
use crate::values::{IndexKind, Value, ValueList};

/// How one disjunct of a clause can be answered from an index.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Access {
    pub score: u32,
    pub index: IndexKind,
    pub op: OpCode,
    pub target: Expr,
}

/// The usable plan for one clause.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ClausePlan {
    pub score: u32,
    pub branches: Vec<Access>,
}

/// Scores a whole clause; `None` if any branch cannot use an index.
pub(super) fn score_clause(clause: &[Literal], leaves: &[&Expr], var: VarId) -> Option<ClausePlan> {
    let branches = clause
        .iter()
        .map(|lit| score_literal(leaves[lit.leaf], lit.negated, var))
        .collect::<Option<Vec<_>>>()?;
    if branches.is_empty() {
        return None;
    }
    let count = branches.len() as u32;
    let sum: u32 = branches.iter().map(|b| b.score).sum();
    Some(ClausePlan {
        score: sum / count + count,
        branches,
    })
}

/// Recognizes `var.FIELD op target` (in either operand order) for the
/// fields that have an index.
fn score_literal(leaf: &Expr, negated: bool, var: VarId) -> Option<Access> {
    let Expr::Op {
        op,
        left,
        right: Some(right),
        ..
    } = leaf
    else {
        return None;
    };
    let op = if negated { op.negated()? } else { *op };

    let (field, op, target) = if let Some(field) = induction_field(left, var) {
        (field, op, right.as_ref())
    } else if let Some(field) = induction_field(right, var) {
        (field, op.swapped()?, left.as_ref())
    } else {
        return None;
    };
    if target.mentions(var) {
        return None;
    }

    let (score, index, target) = match (op, field) {
        (OpCode::Eq, "PNODE") => {
            let pnode = match target.literal()? {
                Value::Int(i) => u64::try_from(*i).ok()?,
                Value::Pnode(p) => *p,
                _ => return None,
            };
            (100, IndexKind::Identity, Expr::pnode(pnode))
        }
        // A key of the wrong tag would fail the lookup where the scan
        // merely finds nothing, so only well-typed literals qualify.
        (OpCode::Eq, "INODE") if matches!(target.literal(), Some(Value::Int(_))) => {
            (80, IndexKind::InodeToPnode, target.clone())
        }
        (OpCode::Eq, "ARGV") if matches!(target.literal(), Some(Value::Str(_))) => {
            (60, IndexKind::Argv, target.clone())
        }
        (OpCode::Contains, "ARGV") if is_word_list(target) => {
            (40, IndexKind::Argv, target.clone())
        }
        _ => return None,
    };
    Some(Access {
        score,
        index,
        op,
        target,
    })
}

/// A string literal, or a tuple of them.
fn is_word_list(target: &Expr) -> bool {
    let is_word = |v: &Value| matches!(v, Value::Str(_));
    match target {
        Expr::Val(Value::Str(_)) => true,
        Expr::Val(Value::Tuple(words)) => words.iter().all(is_word),
        Expr::Tuple(words) => words
            .iter()
            .all(|w| w.as_ref().and_then(Expr::literal).is_some_and(is_word)),
        _ => false,
    }
}

/// `var.NAME` with a literal attribute name.
fn induction_field(expr: &Expr, var: VarId) -> Option<&str> {
    match expr {
        Expr::Op {
            op: OpCode::Field,
            left,
            right: Some(name),
            ..
        } if left.is_ref_to(var) => name.literal()?.as_str(),
        _ => None,
    }
}

/// Expression producing the objects that may satisfy one branch.
pub(super) fn compile_access(access: Access) -> Expr {
    let index = access.index;
    let lookup = move |key: Expr| Expr::binary(OpCode::Lookup, Expr::index(index), key);
    match (index, access.op, access.target) {
        (IndexKind::Identity, _, Expr::Val(pnode)) => Expr::Val(Value::List(ValueList::singleton(pnode))),
        (IndexKind::Argv, OpCode::Contains, target) => {
            let words: Vec<Expr> = match &target {
                Expr::Val(Value::Tuple(words)) => words.iter().cloned().map(Expr::Val).collect(),
                Expr::Tuple(words) => words.iter().flatten().cloned().collect(),
                _ => Vec::new(),
            };
            words
                .into_iter()
                .map(lookup)
                .reduce(|acc, next| Expr::binary(OpCode::Intersect, acc, next))
                .unwrap_or_else(|| lookup(target))
        }
        (_, _, target) => lookup(target),
    }
}
