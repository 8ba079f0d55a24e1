//! Configuration options for the query engine.

/// Configuration options for query execution.
///
/// These options control resource limits and tracing during evaluation.
///
/// # Example
///
/// ```
/// use osage_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 500,
///     max_path_steps: Some(10_000),
///     trace: false,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,

    /// Maximum number of neighbor tests across all path expressions of
    /// one query (if Some).
    ///
    /// Set to `None` for no limit. A `*` or `+` over a cyclic graph then
    /// never terminates.
    ///
    /// Default: Some(1_000_000)
    pub max_path_steps: Option<usize>,

    /// Record an indented trace of every evaluation step.
    ///
    /// Default: false
    pub trace: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_path_steps: Some(1_000_000),
            trace: false,
        }
    }
}

/// Configuration options for the engine.
///
/// # Example
///
/// ```
/// use osage_core::api::{EngineOptions, ExecutionOptions};
///
/// let options = EngineOptions {
///     indexify: false,
///     ..EngineOptions::default()
/// };
/// assert!(options.optimize);
/// ```
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Run the optimizer before and after the indexifier.
    pub optimize: bool,

    /// Replace full scans with index lookups where possible.
    pub indexify: bool,

    /// Dump the tree before and after each rewrite pass.
    pub dump: bool,

    pub execution: ExecutionOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            indexify: true,
            dump: false,
            execution: ExecutionOptions::default(),
        }
    }
}
