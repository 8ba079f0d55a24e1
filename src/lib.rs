//! Osage - a query engine for provenance graphs
//!
//! # Overview
//!
//! A provenance store records objects (files, processes, pipes) and the
//! ancestry edges between them. Osage evaluates queries over such a store.
//! A query arrives as an expression tree, is simplified by the optimizer,
//! has its point lookups rewritten to index probes, and is evaluated against
//! any implementation of [`ProvenanceStore`].
//!
//! # Quick Start
//!
//! ```ignore
//! use osage::{Engine, EngineOptions, MemoryStore};
//! use osage::syntax::{Expr, OpCode, VarGen};
//!
//! let mut store = MemoryStore::new();
//! store.set(1, "NAME", "foo").set(2, "NAME", "bar").add_input(2, 1);
//!
//! // for x in ALL where x.NAME == "foo" yield x
//! let mut vars = VarGen::new();
//! let x = vars.var("x");
//! let query = Expr::for_in(
//!     x.clone(),
//!     Expr::all(),
//!     Expr::binary(OpCode::Eq, Expr::field(Expr::var_ref(&x), "NAME"), Expr::string("foo")),
//!     Expr::var_ref(&x),
//! );
//!
//! let engine = Engine::new(&store, EngineOptions::default());
//! let evaluation = engine.run(query)?;
//! print!("{}", osage::render_result(&store, evaluation.value.as_ref()));
//! ```

// Re-export public API from osage_core
pub use osage_core::api::{
    Diagnostic, Engine, EngineOptions, Error, Evaluation, ExecutionOptions, Prepared, Severity,
};

// Re-export the building blocks
pub use osage_core::output::render_result;
pub use osage_core::store::{IndexKey, MemoryStore, ProvenanceStore};
pub use osage_core::values::{self, Pnode, Value, ValueList};
pub use osage_core::{indexify, optimizer, syntax};

// Re-export errors
pub use osage_core::evaluator::{ExecutionError, RuntimeError};
