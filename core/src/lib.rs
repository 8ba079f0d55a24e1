//! Provenance query engine.
//!
//! Queries arrive as an [`syntax::Expr`] tree, are rewritten by the
//! [`optimizer`] and the [`indexify`] pass, and are evaluated against a
//! [`store::ProvenanceStore`] by the [`evaluator`]. The [`api`] module ties
//! the stages together.

pub mod api;
pub mod evaluator;
pub mod indexify;
pub mod optimizer;
pub mod output;
pub mod scope_stack;
pub mod store;
pub mod syntax;
pub mod trace;
pub mod values;
