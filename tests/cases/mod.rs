#![allow(dead_code)]

use once_cell::sync::Lazy;
use osage::syntax::{Expr, OpCode, VarGen};
use osage::{Engine, EngineOptions, Evaluation, MemoryStore, render_result};

/// A small build:
///
/// ```text
/// main.c (1) ─┐
///             ├─> cc (3) -> main.o (4) -> ld (5) -> app (6)
/// util.c (2) ─┘
/// ```
pub static BUILD: Lazy<MemoryStore> = Lazy::new(|| {
    let mut store = MemoryStore::new();
    store
        .set(1, "NAME", "main.c")
        .set(1, "TYPE", "FILE")
        .set(1, "INODE", osage::Value::Int(100))
        .set(2, "NAME", "util.c")
        .set(2, "TYPE", "FILE")
        .set(2, "INODE", osage::Value::Int(101))
        .set(3, "NAME", "cc")
        .set(3, "TYPE", "PROC")
        .set(3, "ARGV", "cc -c main.c util.c")
        .add_input(3, 1)
        .add_input(3, 2)
        .set(4, "NAME", "main.o")
        .set(4, "TYPE", "FILE")
        .set(4, "INODE", osage::Value::Int(102))
        .add_input(4, 3)
        .set(5, "NAME", "ld")
        .set(5, "TYPE", "PROC")
        .set(5, "ARGV", "ld -o app main.o")
        .add_input(5, 4)
        .set(6, "NAME", "app")
        .set(6, "TYPE", "FILE")
        .set(6, "INODE", osage::Value::Int(103))
        .add_input(6, 5);
    store
});

/// Every combination of the rewrite passes.
pub fn pass_variants() -> Vec<EngineOptions> {
    [(true, true), (true, false), (false, true), (false, false)]
        .into_iter()
        .map(|(optimize, indexify)| EngineOptions {
            optimize,
            indexify,
            ..EngineOptions::default()
        })
        .collect()
}

pub fn run_with(query: Expr, options: EngineOptions) -> Evaluation {
    Engine::new(&*BUILD, options)
        .run(query)
        .expect("query stays within resource limits")
}

/// Runs `query` under `options` and renders the result the way the CLI does.
pub fn render_with(query: Expr, options: EngineOptions) -> String {
    let evaluation = run_with(query, options);
    render_result(&*BUILD, evaluation.value.as_ref())
}

/// `for x in ALL suchthat x.<attr> == <value> do x`
pub fn objects_where(vars: &mut VarGen, attr: &str, value: Expr) -> Expr {
    let x = vars.var("x");
    Expr::for_in(
        x.clone(),
        Expr::all(),
        Expr::binary(OpCode::Eq, Expr::field(Expr::var_ref(&x), attr), value),
        Expr::var_ref(&x),
    )
}

pub fn extract(expr: Expr) -> Expr {
    Expr::unary(OpCode::Extract, expr)
}

/// Declares a test that renders `query` against [`BUILD`] under every pass
/// combination and compares each rendering with `output`.
macro_rules! test_case {
    ($name:ident, query: $query:expr, output: $output:expr $(,)?) => {
        #[test]
        fn $name() {
            let query: osage::syntax::Expr = $query;
            for options in cases::pass_variants() {
                let label = format!(
                    "optimize={} indexify={}",
                    options.optimize, options.indexify
                );
                pretty_assertions::assert_eq!(
                    cases::render_with(query.clone(), options),
                    $output,
                    "{}",
                    label
                );
            }
        }
    };
}
