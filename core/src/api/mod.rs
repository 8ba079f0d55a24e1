//! Public API for running provenance queries.
//!
//! # Example
//!
//! ```ignore
//! use osage_core::api::{Engine, EngineOptions};
//! use osage_core::store::MemoryStore;
//!
//! let store: MemoryStore = serde_json::from_str(fixture)?;
//! let engine = Engine::new(&store, EngineOptions::default());
//! let evaluation = engine.run(query)?;
//! println!("{}", osage_core::output::render_result(&store, evaluation.value.as_ref()));
//! ```

pub mod engine;
pub mod error;
pub mod options;

pub use engine::{Engine, Evaluation, Prepared};
pub use error::{Diagnostic, Error, Severity};
pub use options::{EngineOptions, ExecutionOptions};
