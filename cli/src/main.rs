use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use osage::syntax::Expr;
use osage::{Engine, EngineOptions, ExecutionOptions, MemoryStore, render_result};
use serde::de::DeserializeOwned;

/// Osage - evaluate provenance queries
#[derive(Parser, Debug)]
#[command(name = "osage")]
#[command(about = "Evaluate a provenance query against a store", long_about = None)]
struct Args {
    /// Query tree, as JSON
    query: PathBuf,

    /// Provenance store, as JSON
    store: PathBuf,

    /// Print the query tree before and after each rewrite pass
    #[arg(short, long)]
    dump: bool,

    /// Print an evaluation trace
    #[arg(short, long)]
    trace: bool,

    /// Skip the optimizer
    #[arg(long)]
    no_optimize: bool,

    /// Skip index rewriting
    #[arg(long)]
    no_indexify: bool,

    /// Limit on path steps per query (0 for no limit)
    #[arg(long, default_value_t = 1_000_000)]
    max_path_steps: usize,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text)
        .into_diagnostic()
        .wrap_err_with(|| format!("parsing {}", path.display()))
}

fn run(args: Args) -> Result<ExitCode> {
    let query: Expr = read_json(&args.query)?;
    let store: MemoryStore = read_json(&args.store)?;
    tracing::debug!(objects = store.len(), "store loaded");

    let options = EngineOptions {
        optimize: !args.no_optimize,
        indexify: !args.no_indexify,
        dump: args.dump,
        execution: ExecutionOptions {
            max_path_steps: (args.max_path_steps > 0).then_some(args.max_path_steps),
            trace: args.trace,
            ..ExecutionOptions::default()
        },
    };
    let engine = Engine::new(&store, options);

    let evaluation = match engine.run(query) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    print!("{}", evaluation.dump);
    print!("{}", evaluation.trace);
    for diagnostic in &evaluation.diagnostics {
        eprintln!("{}", diagnostic);
    }
    print!("{}", render_result(&store, evaluation.value.as_ref()));
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run(args)
}
