//! Boolean skeleton of a guard, and its conversion to conjunctive form.
//!
//! Leaves are indices into a side table of the original predicates, so the
//! rewrites only ever clone small integer trees.

use crate::syntax::{Expr, OpCode};

/// Upper bound on rewrite steps before normalization gives up.
const MAX_REWRITES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Logic {
    And(Box<Logic>, Box<Logic>),
    Or(Box<Logic>, Box<Logic>),
    Not(Box<Logic>),
    Leaf(usize),
}

/// A leaf reference, possibly negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Literal {
    pub leaf: usize,
    pub negated: bool,
}

impl Logic {
    /// Splits `expr` on `&&`, `||` and `!`; every other node becomes a leaf.
    pub fn build<'e>(expr: &'e Expr, leaves: &mut Vec<&'e Expr>) -> Logic {
        match expr {
            Expr::Op {
                op: op @ (OpCode::LogAnd | OpCode::LogOr),
                left,
                right: Some(right),
                ..
            } => {
                let l = Box::new(Logic::build(left, leaves));
                let r = Box::new(Logic::build(right, leaves));
                if *op == OpCode::LogAnd {
                    Logic::And(l, r)
                } else {
                    Logic::Or(l, r)
                }
            }
            Expr::Op {
                op: OpCode::LogNot,
                left,
                right: None,
                ..
            } => Logic::Not(Box::new(Logic::build(left, leaves))),
            _ => {
                leaves.push(expr);
                Logic::Leaf(leaves.len() - 1)
            }
        }
    }

    /// Pushes negations to the leaves and distributes `||` over `&&` until
    /// the tree is a conjunction of disjunctions of literals.
    ///
    /// Returns `None` if the rewrite budget runs out.
    pub fn normalize(self) -> Option<Logic> {
        let mut current = self;
        for _ in 0..MAX_REWRITES {
            let (next, changed) = current.rewrite_once();
            if !changed {
                return Some(next);
            }
            current = next;
        }
        tracing::debug!("guard normalization did not converge");
        None
    }

    /// Applies the first applicable rule, searching top-down.
    fn rewrite_once(self) -> (Logic, bool) {
        use Logic::*;
        match self {
            Not(inner) => match *inner {
                Or(a, b) => (And(Box::new(Not(a)), Box::new(Not(b))), true),
                And(a, b) => (Or(Box::new(Not(a)), Box::new(Not(b))), true),
                Not(a) => (*a, true),
                leaf @ Leaf(_) => (Not(Box::new(leaf)), false),
            },
            Or(a, b) => match (*a, *b) {
                // (a && b) || c  =>  (a || c) && (b || c)
                (And(a, b), c) => {
                    let left = Or(a, Box::new(c.clone()));
                    let right = Or(b, Box::new(c));
                    (And(Box::new(left), Box::new(right)), true)
                }
                // a || (b && c)  =>  (a || b) && (a || c)
                (a, And(b, c)) => {
                    let left = Or(Box::new(a.clone()), b);
                    let right = Or(Box::new(a), c);
                    (And(Box::new(left), Box::new(right)), true)
                }
                (a, b) => {
                    let (a, changed) = a.rewrite_once();
                    if changed {
                        return (Or(Box::new(a), Box::new(b)), true);
                    }
                    let (b, changed) = b.rewrite_once();
                    (Or(Box::new(a), Box::new(b)), changed)
                }
            },
            And(a, b) => {
                let (a, changed) = (*a).rewrite_once();
                if changed {
                    return (And(Box::new(a), b), true);
                }
                let (b, changed) = (*b).rewrite_once();
                (And(Box::new(a), Box::new(b)), changed)
            }
            leaf @ Leaf(_) => (leaf, false),
        }
    }

    /// The conjuncts of a normalized tree, each as its list of literals.
    pub fn clauses(&self) -> Vec<Vec<Literal>> {
        let mut conjuncts = Vec::new();
        self.collect_ands(&mut conjuncts);
        conjuncts
            .into_iter()
            .map(|conjunct| {
                let mut literals = Vec::new();
                conjunct.collect_ors(&mut literals);
                literals
            })
            .collect()
    }

    fn collect_ands<'a>(&'a self, out: &mut Vec<&'a Logic>) {
        match self {
            Logic::And(a, b) => {
                a.collect_ands(out);
                b.collect_ands(out);
            }
            other => out.push(other),
        }
    }

    fn collect_ors(&self, out: &mut Vec<Literal>) {
        match self {
            Logic::Or(a, b) => {
                a.collect_ors(out);
                b.collect_ors(out);
            }
            Logic::Leaf(leaf) => out.push(Literal {
                leaf: *leaf,
                negated: false,
            }),
            Logic::Not(inner) => {
                if let Logic::Leaf(leaf) = **inner {
                    out.push(Literal {
                        leaf,
                        negated: true,
                    });
                }
            }
            // Not reachable after normalization.
            Logic::And(..) => {}
        }
    }
}
