//! The query engine.

use super::{Diagnostic, EngineOptions, Error};
use crate::{
    evaluator::Evaluator,
    indexify::indexify,
    optimizer::optimize,
    store::ProvenanceStore,
    syntax::{Expr, dump_expr},
    values::Value,
};

/// Runs queries against one provenance store.
///
/// A query goes through `prepare` (optimize, indexify, optimize again, each
/// pass toggled by [`EngineOptions`]) and then `evaluate`.
///
/// # Example
///
/// ```
/// use osage_core::api::{Engine, EngineOptions};
/// use osage_core::store::MemoryStore;
/// use osage_core::syntax::{Expr, OpCode};
/// use osage_core::values::Value;
///
/// let store = MemoryStore::new();
/// let engine = Engine::new(&store, EngineOptions::default());
///
/// let query = Expr::binary(OpCode::Add, Expr::int(40), Expr::int(2));
/// let evaluation = engine.run(query).unwrap();
/// assert_eq!(evaluation.value, Some(Value::Int(42)));
/// ```
pub struct Engine<'s> {
    store: &'s dyn ProvenanceStore,
    options: EngineOptions,
}

/// A query after the rewrite passes.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// The rewritten tree; `None` when it is statically nil.
    pub expr: Option<Expr>,
    /// Tree dumps around each pass, if enabled.
    pub dump: String,
}

/// Outcome of evaluating one query.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The result; `None` is nil.
    pub value: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
    /// Evaluation trace, if enabled.
    pub trace: String,
    /// Tree dumps from `prepare`, if enabled.
    pub dump: String,
}

impl<'s> Engine<'s> {
    pub fn new(store: &'s dyn ProvenanceStore, options: EngineOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run the enabled rewrite passes over a query.
    pub fn prepare(&self, expr: Expr) -> Prepared {
        let mut dump = String::new();
        self.record(&mut dump, "input", Some(&expr));

        let mut expr = Some(expr);
        if self.options.optimize {
            expr = expr.and_then(optimize);
            self.record(&mut dump, "optimized", expr.as_ref());
        }
        if self.options.indexify {
            expr = expr.map(indexify);
            self.record(&mut dump, "indexified", expr.as_ref());
            if self.options.optimize {
                expr = expr.and_then(optimize);
                self.record(&mut dump, "reoptimized", expr.as_ref());
            }
        }
        Prepared { expr, dump }
    }

    fn record(&self, dump: &mut String, pass: &str, expr: Option<&Expr>) {
        if self.options.dump {
            dump.push_str(&format!("--- {} ---\n", pass));
            dump.push_str(&dump_expr(expr));
        }
    }

    /// Evaluate a prepared query. A statically nil query evaluates to nil.
    pub fn evaluate(&self, prepared: Prepared) -> Result<Evaluation, Error> {
        let mut evaluator = Evaluator::new(self.options.execution.clone(), self.store);
        let value = match &prepared.expr {
            Some(expr) => evaluator.eval(expr)?,
            None => None,
        };
        let (diagnostics, trace) = evaluator.finish();
        tracing::debug!(
            diagnostics = diagnostics.len(),
            nil = value.is_none(),
            "query evaluated"
        );
        Ok(Evaluation {
            value,
            diagnostics,
            trace,
            dump: prepared.dump,
        })
    }

    /// Prepare and evaluate a query.
    pub fn run(&self, expr: Expr) -> Result<Evaluation, Error> {
        self.evaluate(self.prepare(expr))
    }
}
