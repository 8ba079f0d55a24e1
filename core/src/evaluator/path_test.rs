//! Unit tests for path evaluation.

use super::*;
use crate::{
    api::{Diagnostic, ExecutionOptions},
    store::MemoryStore,
    syntax::{Expr, OpCode, VarGen},
    values::{IndexKind, Pnode, Value, ValueList},
};
use pretty_assertions::assert_eq;

/// a (1) has children c (2) and d (3); c also has child d.
fn diamond() -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .set(1, "NAME", "a")
        .set(2, "NAME", "c")
        .add_input(2, 1)
        .set(3, "NAME", "d")
        .add_input(3, 1)
        .add_input(3, 2);
    store
}

fn run_with(store: &MemoryStore, options: ExecutionOptions, expr: &Expr) -> Result<(Option<Value>, Vec<Diagnostic>), ExecutionError> {
    let mut evaluator = Evaluator::new(options, store);
    let value = evaluator.eval(expr)?;
    let (diagnostics, _) = evaluator.finish();
    Ok((value, diagnostics))
}

fn run(expr: &Expr) -> Value {
    let (value, diagnostics) = run_with(&diamond(), ExecutionOptions::default(), expr).unwrap();
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    value.expect("path yields a list")
}

fn pnodes(items: &[Pnode]) -> Value {
    Value::List(ValueList::from_pnodes(items.iter().copied()))
}

fn pairs(items: &[(Pnode, Pnode)]) -> Value {
    Value::List(
        ValueList::from_values(
            items
                .iter()
                .map(|(a, b)| Value::Tuple(vec![Value::Pnode(*a), Value::Pnode(*b)])),
        )
        .unwrap(),
    )
}

fn extract(expr: Expr) -> Expr {
    Expr::unary(OpCode::Extract, expr)
}

/// `for x in ALL suchthat x.NAME == name do x`
fn named(vars: &mut VarGen, name: &str) -> Expr {
    let x = vars.var("x");
    Expr::for_in(
        x.clone(),
        Expr::all(),
        Expr::binary(
            OpCode::Eq,
            Expr::field(Expr::var_ref(&x), "NAME"),
            Expr::string(name),
        ),
        Expr::var_ref(&x),
    )
}

#[test]
fn test_zero_or_more_reports_every_walk() {
    crate::test_utils::init_test_logging();
    let mut vars = VarGen::new();
    let path = Expr::binary(
        OpCode::LongPathZ,
        Expr::pnode(1),
        extract(named(&mut vars, "d")),
    );
    // a -> d directly and a -> c -> d both reach d.
    assert_eq!(run(&path), pnodes(&[3, 3]));
}

#[test]
fn test_one_or_more_needs_an_intermediate() {
    let mut vars = VarGen::new();
    let path = Expr::binary(
        OpCode::LongPathNZ,
        Expr::pnode(1),
        extract(named(&mut vars, "d")),
    );
    assert_eq!(run(&path), pnodes(&[3]));
}

#[test]
fn test_without_extract_results_are_discarded() {
    let mut vars = VarGen::new();
    let path = Expr::binary(OpCode::LongPathZ, Expr::pnode(1), named(&mut vars, "d"));
    assert_eq!(run(&path), pnodes(&[]));
}

#[test]
fn test_single_step_children() {
    let path = Expr::binary(OpCode::Path, Expr::pnode(1), extract(Expr::all()));
    assert_eq!(run(&path), pnodes(&[2, 3]));
}

#[test]
fn test_all_on_the_left_walks_parents() {
    let path = Expr::binary(OpCode::Path, extract(Expr::all()), Expr::pnode(3));
    assert_eq!(run(&path), pnodes(&[1, 2]));
}

#[test]
fn test_tuples_keep_source_order() {
    let forward = Expr::binary(OpCode::Path, extract(Expr::pnode(1)), extract(Expr::all()));
    assert_eq!(run(&forward), pairs(&[(1, 2), (1, 3)]));

    let backward = Expr::binary(OpCode::Path, extract(Expr::all()), extract(Expr::pnode(3)));
    assert_eq!(run(&backward), pairs(&[(1, 3), (2, 3)]));
}

#[test]
fn test_three_step_path() {
    let path = Expr::binary(
        OpCode::Path,
        Expr::binary(OpCode::Path, extract(Expr::pnode(1)), extract(Expr::all())),
        extract(Expr::all()),
    );
    assert_eq!(
        run(&path),
        Value::List(
            ValueList::from_values([Value::Tuple(vec![
                Value::Pnode(1),
                Value::Pnode(2),
                Value::Pnode(3)
            ])])
            .unwrap()
        )
    );
}

#[test]
fn test_matcher_can_be_a_list() {
    let d = Expr::binary(
        OpCode::Lookup,
        Expr::index(IndexKind::Name),
        Expr::string("d"),
    );
    let path = Expr::binary(OpCode::Path, Expr::pnode(2), extract(d));
    assert_eq!(run(&path), pnodes(&[3]));
}

#[test]
fn test_lambda_start_filters_all_objects() {
    let mut vars = VarGen::new();
    let x = vars.var("x");
    let is_a = Expr::lambda(
        x.clone(),
        Expr::binary(
            OpCode::Eq,
            Expr::field(Expr::var_ref(&x), "NAME"),
            Expr::string("a"),
        ),
    );
    let path = Expr::binary(OpCode::Path, is_a, extract(Expr::all()));
    assert_eq!(run(&path), pnodes(&[2, 3]));
}

#[test]
fn test_optional_entry_can_be_skipped() {
    let mut vars = VarGen::new();
    let path = Expr::binary(
        OpCode::Path,
        Expr::binary(
            OpCode::Path,
            Expr::pnode(1),
            Expr::unary(OpCode::Optional, named(&mut vars, "c")),
        ),
        extract(named(&mut vars, "d")),
    );
    // Skipping c reaches d directly; going through c reaches it again.
    assert_eq!(run(&path), pnodes(&[3, 3]));
}

#[test]
fn test_bad_start_is_reported() {
    let path = Expr::binary(OpCode::Path, Expr::int(5), extract(Expr::all()));
    let (value, diagnostics) = run_with(&diamond(), ExecutionOptions::default(), &path).unwrap();
    assert_eq!(value, Some(pnodes(&[])));
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_step_budget() {
    let mut vars = VarGen::new();
    let path = Expr::binary(
        OpCode::LongPathZ,
        Expr::pnode(1),
        extract(named(&mut vars, "d")),
    );
    let options = ExecutionOptions {
        max_path_steps: Some(2),
        ..ExecutionOptions::default()
    };
    let result = run_with(&diamond(), options, &path);
    assert_eq!(
        result.unwrap_err(),
        ExecutionError::ResourceExceeded(ResourceExceededError::PathStepsExceeded { max_steps: 2 })
    );
}

#[test]
fn test_cycles_stop_at_the_step_budget() {
    let mut store = MemoryStore::new();
    store.add_input(2, 1).add_input(1, 2);
    let path = Expr::binary(OpCode::LongPathZ, Expr::pnode(1), extract(Expr::pnode(99)));
    let options = ExecutionOptions {
        max_path_steps: Some(100),
        ..ExecutionOptions::default()
    };
    assert!(matches!(
        run_with(&store, options, &path),
        Err(ExecutionError::ResourceExceeded(
            ResourceExceededError::PathStepsExceeded { .. }
        ))
    ));
}
