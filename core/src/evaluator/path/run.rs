//! Breadth-first simulation of a path automaton over the live graph.

use bumpalo::Bump;

use super::{Direction, automaton::Automaton, entry::Matcher, entry::PathEntry};
use crate::{
    evaluator::{Evaluator, ExecutionError, ResourceExceededError, RuntimeError},
    syntax::Expr,
    values::{Pnode, Value},
};

/// One live partial match. Successors share their history through `prev`;
/// the whole chain lives in the per-evaluation arena.
struct Hypothesis<'h> {
    prev: Option<&'h Hypothesis<'h>>,
    /// Object matched by the previous state. `None` only for the anchor.
    pnode: Option<Pnode>,
    /// State the next neighbor must satisfy.
    state: usize,
}

/// Extracted objects of one accepted walk, most recent first.
pub(super) type Found = Vec<Pnode>;

impl Evaluator<'_> {
    pub(super) fn run_path(
        &mut self,
        entries: &[PathEntry<'_>],
        automaton: &Automaton,
        direction: Direction,
    ) -> Result<Vec<Found>, ExecutionError> {
        let arena = Bump::new();
        let mut live = Vec::new();

        for &start in &automaton.starts {
            self.tracer.step(format_args!("start state {}", start));
            self.tracer.enter();
            let seeds = self.seed(entries[start].matcher);
            self.tracer.leave();
            let seeds = seeds?;
            self.tracer
                .step(format_args!("seeding {} hypotheses", seeds.len()));
            for pnode in seeds {
                let anchor: &Hypothesis = arena.alloc(Hypothesis {
                    prev: None,
                    pnode: None,
                    state: start,
                });
                for &next in &automaton.states[start].next {
                    live.push(&*arena.alloc(Hypothesis {
                        prev: Some(anchor),
                        pnode: Some(pnode),
                        state: next,
                    }));
                }
            }
        }

        let mut found = Vec::new();
        while !live.is_empty() {
            tracing::trace!(live = live.len(), "path generation");
            self.tracer
                .step(format_args!("step: {} live hypotheses", live.len()));
            self.tracer.enter();
            let mut next_generation = Vec::new();
            for h in live {
                self.advance(&arena, h, entries, automaton, direction, &mut next_generation, &mut found)?;
            }
            self.tracer.leave();
            live = next_generation;
        }
        Ok(found)
    }

    #[allow(clippy::too_many_arguments)]
    fn advance<'h>(
        &mut self,
        arena: &'h Bump,
        h: &'h Hypothesis<'h>,
        entries: &[PathEntry<'_>],
        automaton: &Automaton,
        direction: Direction,
        next_generation: &mut Vec<&'h Hypothesis<'h>>,
        found: &mut Vec<Found>,
    ) -> Result<(), ExecutionError> {
        let Some(pnode) = h.pnode else {
            return Ok(());
        };
        let neighbors = match direction {
            Direction::LeftToRight => self.store.children(pnode),
            Direction::RightToLeft => self.store.parents(pnode),
        };
        self.tracer.step(format_args!(
            "(pnode {}) in state {}: {} neighbors",
            pnode,
            h.state,
            neighbors.len()
        ));

        let state = &automaton.states[h.state];
        for neighbor in neighbors {
            self.count_step()?;
            if !self.matches(neighbor, entries[h.state].matcher)? {
                continue;
            }
            if state.accepting {
                let result = extract(h, neighbor, entries);
                self.tracer
                    .step(format_args!("accept (pnode {}), {} values", neighbor, result.len()));
                found.push(result);
            }
            for &next in &state.next {
                next_generation.push(arena.alloc(Hypothesis {
                    prev: Some(h),
                    pnode: Some(neighbor),
                    state: next,
                }));
            }
        }
        Ok(())
    }

    fn count_step(&mut self) -> Result<(), ExecutionError> {
        self.path_steps += 1;
        if let Some(max_steps) = self.options.max_path_steps {
            if self.path_steps > max_steps {
                return Err(ResourceExceededError::PathStepsExceeded { max_steps }.into());
            }
        }
        Ok(())
    }

    /// Objects a start state's entry denotes.
    fn seed(&mut self, matcher: Matcher<'_>) -> Result<Vec<Pnode>, ExecutionError> {
        let value = match matcher {
            Matcher::Any => Some(Value::All),
            Matcher::Expr(expr) => self.eval_expr(expr)?,
        };
        let mut pnodes = Vec::new();
        match value {
            None => {}
            Some(Value::Pnode(pnode)) => pnodes.push(pnode),
            Some(Value::List(list)) => {
                for member in list {
                    match member {
                        Value::Pnode(pnode) => pnodes.push(pnode),
                        other => {
                            self.report(RuntimeError::BadPathStart { found: other.tag() }, None);
                        }
                    }
                }
            }
            Some(Value::All) => pnodes = self.all_objects()?,
            Some(Value::Lambda(predicate)) => {
                for pnode in self.all_objects()? {
                    if self
                        .call_lambda(&predicate, Value::Pnode(pnode))?
                        .is_some_and(|v| v.is_true())
                    {
                        pnodes.push(pnode);
                    }
                }
            }
            Some(other) => {
                self.report(RuntimeError::BadPathStart { found: other.tag() }, None);
            }
        }
        Ok(pnodes)
    }

    fn all_objects(&mut self) -> Result<Vec<Pnode>, ExecutionError> {
        let mut pnodes = Vec::new();
        self.store.evaluate_over_all(&mut |pnode| {
            pnodes.push(pnode);
            Ok(())
        })?;
        Ok(pnodes)
    }

    /// Test one candidate object against a matcher.
    ///
    /// `for x in ALL suchthat P do x` is tested by evaluating `P` with `x`
    /// bound to the candidate instead of enumerating every object.
    fn matches(&mut self, pnode: Pnode, matcher: Matcher<'_>) -> Result<bool, ExecutionError> {
        let expr = match matcher {
            Matcher::Any => return Ok(true),
            Matcher::Expr(Expr::Val(Value::All)) => return Ok(true),
            Matcher::Expr(expr) => expr,
        };

        if let Expr::For {
            var,
            source,
            guard,
            body,
        } = expr
        {
            if matches!(**source, Expr::Val(Value::All)) && body.is_ref_to(var.id) {
                self.scope_stack.push(var.id, Some(Value::Pnode(pnode)));
                let passed = self.eval_expr(guard);
                let popped = self.scope_stack.pop();
                debug_assert!(popped.is_ok(), "unbalanced scope stack");
                return Ok(passed?.is_some_and(|v| v.is_true()));
            }
        }

        let candidate = Value::Pnode(pnode);
        Ok(match self.eval_expr(expr)? {
            None => false,
            Some(Value::All) => true,
            Some(Value::List(list)) => list.contains(&candidate),
            Some(value) => value.equals(&candidate),
        })
    }
}

/// Values at result positions along the chain ending in `h` and `last`.
fn extract(h: &Hypothesis<'_>, last: Pnode, entries: &[PathEntry<'_>]) -> Found {
    let mut values = Vec::new();
    if entries[h.state].is_result {
        values.push(last);
    }
    let mut current = h;
    while let Some(prev) = current.prev {
        if entries[prev.state].is_result {
            if let Some(pnode) = current.pnode {
                values.push(pnode);
            }
        }
        current = prev;
    }
    values
}
