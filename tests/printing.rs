//! How query results are rendered.

#[macro_use]
mod cases;

use indoc::indoc;
use osage::syntax::{Expr, OpCode, VarGen};
use osage::values::{Builtin, ValueList};
use osage::{EngineOptions, Value};

test_case!(
    nil_prints_nothing,
    query: Expr::field(Expr::pnode(1), "ARGV"),
    output: "NOTHING\n",
);

test_case!(
    object_prints_its_attributes,
    query: Expr::pnode(3),
    output: indoc! {r#"
        RESULT: object
        (pnode 3)
           NAME: "cc"
           TYPE: "PROC"
           ARGV: "cc -c main.c util.c"
           INPUT: (pnode 1)
           INPUT: (pnode 2)
    "#},
);

test_case!(
    synthetic_pnode_attribute,
    query: Expr::field(Expr::pnode(5), "PNODE"),
    output: "RESULT: int\n5\n",
);

test_case!(
    all_objects_are_enumerated,
    query: Expr::all(),
    output: indoc! {"
        RESULT: all objects
        (pnode 1)
        (pnode 2)
        (pnode 3)
        (pnode 4)
        (pnode 5)
        (pnode 6)
    "},
);

test_case!(
    tuple_fields_are_typed,
    query: Expr::tuple([Expr::field(Expr::pnode(1), "NAME"), Expr::field(Expr::pnode(1), "INODE")]),
    output: "RESULT: tuple of (string, int)\n(\"main.c\", 100)\n",
);

test_case!(
    ranges,
    query: Expr::val(Value::Range(2, 5)),
    output: "RESULT: range of int\n(2..5)\n",
);

test_case!(
    timestamps,
    query: Expr::call(Expr::val(Value::Builtin(Builtin::Ctime)), Expr::int(0)),
    output: "RESULT: string\n\"Thu Jan  1 00:00:00 1970\"\n",
);

test_case!(
    filtered_processes,
    query: {
        let mut vars = VarGen::new();
        let p = vars.var("p");
        let is_proc = Expr::lambda(
            p.clone(),
            Expr::binary(
                OpCode::Eq,
                Expr::field(Expr::var_ref(&p), "TYPE"),
                Expr::string("PROC"),
            ),
        );
        Expr::call(
            Expr::val(Value::Builtin(Builtin::Filter)),
            Expr::tuple([is_proc, Expr::val(ValueList::from_pnodes([1, 3, 5]))]),
        )
    },
    output: "RESULT: list of 2 object\n(pnode 3)\n(pnode 5)\n",
);

test_case!(
    pairs_share_their_prefix,
    query: {
        // for f in ALL suchthat f.TYPE == "FILE" && f.PNODE < 3 do (cc, f)
        let mut vars = VarGen::new();
        let f = vars.var("f");
        Expr::for_in(
            f.clone(),
            Expr::all(),
            Expr::binary(
                OpCode::LogAnd,
                Expr::binary(
                    OpCode::Eq,
                    Expr::field(Expr::var_ref(&f), "TYPE"),
                    Expr::string("FILE"),
                ),
                Expr::binary(
                    OpCode::Lt,
                    Expr::field(Expr::var_ref(&f), "PNODE"),
                    Expr::int(3),
                ),
            ),
            Expr::tuple([Expr::pnode(3), Expr::var_ref(&f)]),
        )
    },
    output: indoc! {"
        RESULT: list of 2 tuple of (object, object)
        {
           ((pnode 3), (pnode 1)),
           (           (pnode 2))
        }
    "},
);

#[test]
fn test_lambda_prints_its_body() {
    let mut vars = VarGen::new();
    let p = vars.var("p");
    let query = Expr::lambda(p.clone(), Expr::field(Expr::var_ref(&p), "NAME"));
    let rendered = cases::render_with(query, EngineOptions::default());
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("RESULT: lambda"));
    assert!(lines.next().is_some_and(|line| line.starts_with("<lambda ")));
    assert!(lines.next().is_some(), "lambda body is dumped");
}
