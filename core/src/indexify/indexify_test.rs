//! Unit tests for index selection.

use pretty_assertions::assert_eq;

use crate::indexify::indexify;
use crate::syntax::{Expr, OpCode, Var, VarGen};
use crate::values::{IndexKind, Value, ValueList};

struct Scan {
    x: Var,
    x_ref: Expr,
}

impl Scan {
    fn new() -> Self {
        let x = VarGen::new().var("x");
        let x_ref = Expr::var_ref(&x);
        Self { x, x_ref }
    }

    fn field(&self, name: &str) -> Expr {
        Expr::field(self.x_ref.clone(), name)
    }

    fn over_all(&self, guard: Expr) -> Expr {
        Expr::for_in(self.x.clone(), Expr::all(), guard, self.x_ref.clone())
    }

    fn with_source(&self, source: Expr, guard: Expr) -> Expr {
        Expr::for_in(self.x.clone(), source, guard, self.x_ref.clone())
    }
}

fn eq(l: Expr, r: Expr) -> Expr {
    Expr::binary(OpCode::Eq, l, r)
}

fn lookup(index: IndexKind, key: Expr) -> Expr {
    Expr::binary(OpCode::Lookup, Expr::index(index), key)
}

#[test]
fn test_pnode_equality_uses_identity() {
    crate::test_utils::init_test_logging();
    let scan = Scan::new();
    let guard = eq(scan.field("PNODE"), Expr::int(2));
    let expected = Expr::Val(Value::List(ValueList::singleton(Value::Pnode(2))));
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(expected, guard)
    );
}

#[test]
fn test_operands_may_be_swapped() {
    let scan = Scan::new();
    let guard = eq(Expr::int(7), scan.field("INODE"));
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(lookup(IndexKind::InodeToPnode, Expr::int(7)), guard)
    );
}

#[test]
fn test_negated_inequality_is_equality() {
    let scan = Scan::new();
    let guard = Expr::unary(
        OpCode::LogNot,
        Expr::binary(OpCode::Ne, scan.field("INODE"), Expr::int(3)),
    );
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(lookup(IndexKind::InodeToPnode, Expr::int(3)), guard)
    );
}

#[test]
fn test_disjunction_concatenates_lookups() {
    let scan = Scan::new();
    let guard = Expr::binary(
        OpCode::LogOr,
        eq(scan.field("INODE"), Expr::int(7)),
        eq(scan.field("ARGV"), Expr::string("cat foo")),
    );
    let source = Expr::binary(
        OpCode::StrCat,
        lookup(IndexKind::InodeToPnode, Expr::int(7)),
        lookup(IndexKind::Argv, Expr::string("cat foo")),
    );
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(source, guard)
    );
}

#[test]
fn test_usable_conjunct_is_chosen() {
    let scan = Scan::new();
    let guard = Expr::binary(
        OpCode::LogAnd,
        eq(scan.field("NAME"), Expr::string("foo")),
        eq(scan.field("INODE"), Expr::int(7)),
    );
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(lookup(IndexKind::InodeToPnode, Expr::int(7)), guard)
    );
}

#[test]
fn test_highest_score_wins() {
    let scan = Scan::new();
    let guard = Expr::binary(
        OpCode::LogAnd,
        eq(scan.field("ARGV"), Expr::string("cat")),
        eq(scan.field("PNODE"), Expr::int(1)),
    );
    let expected = Expr::Val(Value::List(ValueList::singleton(Value::Pnode(1))));
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(expected, guard)
    );
}

#[test]
fn test_argv_contains_intersects_words() {
    let scan = Scan::new();
    let words = Expr::Val(Value::Tuple(vec![Value::str("cat"), Value::str("foo")]));
    let guard = Expr::binary(OpCode::Contains, scan.field("ARGV"), words);
    let source = Expr::binary(
        OpCode::Intersect,
        lookup(IndexKind::Argv, Expr::string("cat")),
        lookup(IndexKind::Argv, Expr::string("foo")),
    );
    assert_eq!(
        indexify(scan.over_all(guard.clone())),
        scan.with_source(source, guard)
    );
}

#[test]
fn test_unindexable_guards_are_left_alone() {
    let scan = Scan::new();
    let cases = vec![
        eq(scan.field("NAME"), Expr::string("foo")),
        eq(scan.field("INODE"), scan.field("PID")),
        Expr::binary(OpCode::Lt, scan.field("INODE"), Expr::int(3)),
        Expr::binary(
            OpCode::LogOr,
            eq(scan.field("INODE"), Expr::int(7)),
            eq(scan.field("NAME"), Expr::string("foo")),
        ),
        eq(scan.field("PNODE"), Expr::string("one")),
    ];
    for guard in cases {
        let scan_expr = scan.over_all(guard);
        assert_eq!(indexify(scan_expr.clone()), scan_expr);
    }
}

#[test]
fn test_mistyped_keys_keep_the_scan() {
    let scan = Scan::new();
    let y = VarGen::after(&scan.x_ref).var("y");
    let cases = vec![
        eq(scan.field("INODE"), Expr::float(100.0)),
        eq(scan.field("INODE"), Expr::string("100")),
        eq(scan.field("INODE"), Expr::var_ref(&y)),
        eq(scan.field("ARGV"), Expr::int(3)),
        Expr::binary(
            OpCode::Contains,
            scan.field("ARGV"),
            Expr::Val(Value::Tuple(vec![Value::str("cat"), Value::Int(1)])),
        ),
    ];
    for guard in cases {
        let scan_expr = scan.over_all(guard);
        assert_eq!(indexify(scan_expr.clone()), scan_expr);
    }
}

#[test]
fn test_non_scan_sources_are_left_alone() {
    let scan = Scan::new();
    let guard = eq(scan.field("PNODE"), Expr::int(2));
    let expr = scan.with_source(Expr::pnode(2), guard);
    assert_eq!(indexify(expr.clone()), expr);
}

#[test]
fn test_nested_scans_are_rewritten() {
    let scan = Scan::new();
    let guard = eq(scan.field("INODE"), Expr::int(9));
    let y = VarGen::after(&scan.x_ref).var("y");
    let expr = Expr::let_in(y.clone(), Expr::int(1), scan.over_all(guard.clone()));
    let expected = Expr::let_in(
        y,
        Expr::int(1),
        scan.with_source(lookup(IndexKind::InodeToPnode, Expr::int(9)), guard),
    );
    assert_eq!(indexify(expr), expected);
}
