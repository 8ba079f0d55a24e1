//! Path expression evaluation.
//!
//! A path such as `A -> ** -> extract(B)` is evaluated in four steps:
//!
//! 1. **Collect** the joins into a flat sequence of `PathEntry` values,
//!    one per position, each with a repetition mode.
//! 2. **Orient**: walk from the end that does not match every object. The
//!    entries are reversed for a right-to-left walk so the compiler only
//!    handles one direction.
//! 3. **Compile** the entries into an [`Automaton`].
//! 4. **Run** it breadth-first against the store, one generation of
//!    hypotheses at a time, until no hypothesis survives.
//!
//! Results keep the order in which walks were accepted. Duplicate walks to
//! the same object are all reported. There is no cycle detection: a `*` or
//! `+` over a cyclic graph only stops at the step budget.

mod automaton;
mod entry;
mod run;

use automaton::Automaton;
use entry::Matcher;

use crate::{
    evaluator::{EvalResult, Evaluator},
    syntax::{Expr, OpCode},
    values::{Value, ValueList},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    /// Follow child edges.
    LeftToRight,
    /// Follow parent edges.
    RightToLeft,
}

impl Evaluator<'_> {
    pub(super) fn eval_path(&mut self, expr: &Expr) -> EvalResult {
        let mut entries = Vec::new();
        entry::collect(expr, &mut entries);

        let direction = match (entries.first(), entries.last()) {
            (_, Some(right)) if self.matches_everything(right.matcher) => Direction::LeftToRight,
            (Some(left), _) if self.matches_everything(left.matcher) => Direction::RightToLeft,
            _ => Direction::LeftToRight,
        };
        if direction == Direction::RightToLeft {
            entries.reverse();
        }

        let automaton = Automaton::compile(&entries);
        tracing::debug!(
            entries = entries.len(),
            starts = automaton.starts.len(),
            ?direction,
            "compiled path"
        );
        self.tracer
            .step(format_args!("path: {} entries, {:?}", entries.len(), direction));
        self.tracer.enter();
        if self.tracer.is_enabled() {
            for (i, entry) in entries.iter().enumerate() {
                self.tracer.step(format_args!("entry {}: {}", i, entry));
            }
            for line in automaton.to_string().lines() {
                self.tracer.step(format_args!("{}", line));
            }
        }
        let found = self.run_path(&entries, &automaton, direction);
        self.tracer.leave();

        let mut results = ValueList::new();
        for mut pnodes in found? {
            // Extraction walks backwards; right-to-left walks were already
            // reversed once.
            if direction == Direction::LeftToRight {
                pnodes.reverse();
            }
            let value = match pnodes.len() {
                0 => continue,
                1 => Value::Pnode(pnodes[0]),
                _ => Value::Tuple(pnodes.into_iter().map(Value::Pnode).collect()),
            };
            if let Err(mismatch) = results.push(value) {
                self.report(mismatch, expr.span());
            }
        }
        let result = Some(Value::List(results));
        self.tracer.step(format_args!(
            "path => {}",
            super::eval::Shown(&result)
        ));
        Ok(result)
    }

    /// Whether an entry statically denotes every object.
    fn matches_everything(&self, matcher: Matcher<'_>) -> bool {
        match matcher {
            Matcher::Any => true,
            Matcher::Expr(expr) => self.is_all_expr(expr),
        }
    }

    fn is_all_expr(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Val(Value::All) => true,
            Expr::Ref(var) => matches!(self.scope_stack.lookup(*var), Some(Some(Value::All))),
            Expr::For { source, guard, .. } => {
                matches!(**source, Expr::Val(Value::All))
                    && guard.literal().is_some_and(|g| g.is_true())
            }
            Expr::Op {
                op: OpCode::Extract,
                left,
                right: None,
                ..
            } => self.is_all_expr(left),
            _ => false,
        }
    }
}
