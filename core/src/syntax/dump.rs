use crate::syntax::Expr;
use crate::trace::IndentWriter;

/// Renders `expr` one node per line, children indented under their parent.
pub fn dump_expr(expr: Option<&Expr>) -> String {
    let mut w = IndentWriter::new();
    match expr {
        Some(expr) => dump_node(&mut w, expr),
        None => w.line(format_args!("NULL")),
    }
    w.finish()
}

fn dump_node(w: &mut IndentWriter, expr: &Expr) {
    match expr {
        Expr::For {
            var,
            source,
            guard,
            body,
        } => {
            w.line(format_args!("FOR {}", var));
            dump_labeled(w, "IN", source);
            dump_labeled(w, "SUCHTHAT", guard);
            dump_labeled(w, "DO", body);
        }
        Expr::Let {
            var,
            bound,
            guard,
            body,
        } => {
            w.line(format_args!("LET {}", var));
            dump_labeled(w, "=", bound);
            if !guard.is_true_literal() {
                dump_labeled(w, "SUCHTHAT", guard);
            }
            dump_labeled(w, "IN", body);
        }
        Expr::Lambda { var, body } => {
            w.line(format_args!("LAMBDA {}", var));
            dump_labeled(w, "DO", body);
        }
        Expr::Cond { test, yes, no } => {
            w.line(format_args!("IF"));
            dump_labeled(w, "TEST", test);
            dump_optional(w, "THEN", yes.as_deref());
            dump_optional(w, "ELSE", no.as_deref());
        }
        Expr::Op {
            op, left, right, ..
        } => {
            w.line(format_args!("OP {}", op.symbol()));
            w.indent();
            dump_node(w, left);
            if let Some(right) = right {
                dump_node(w, right);
            }
            w.unindent();
        }
        Expr::Tuple(fields) => {
            w.line(format_args!("TUPLE"));
            w.indent();
            for field in fields {
                match field {
                    Some(field) => dump_node(w, field),
                    None => w.line(format_args!("NULL")),
                }
            }
            w.unindent();
        }
        Expr::Ref(id) => w.line(format_args!("REF #{}", id.0)),
        Expr::Val(value) => w.line(format_args!("VAL {}", value)),
    }
}

fn dump_labeled(w: &mut IndentWriter, label: &str, expr: &Expr) {
    dump_optional(w, label, Some(expr));
}

fn dump_optional(w: &mut IndentWriter, label: &str, expr: Option<&Expr>) {
    w.indent();
    w.line(format_args!("{}", label));
    w.indent();
    match expr {
        Some(expr) => dump_node(w, expr),
        None => w.line(format_args!("NULL")),
    }
    w.unindent();
    w.unindent();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{OpCode, VarGen};
    use indoc::indoc;

    #[test]
    fn test_dump_for_loop() {
        let mut vars = VarGen::new();
        let x = vars.var("x");
        let guard = Expr::binary(
            OpCode::Eq,
            Expr::field(Expr::var_ref(&x), "NAME"),
            Expr::string("foo"),
        );
        let expr = Expr::for_in(x.clone(), Expr::all(), guard, Expr::var_ref(&x));
        assert_eq!(
            dump_expr(Some(&expr)),
            indoc! {r#"
                FOR x#0
                   IN
                      VAL **
                   SUCHTHAT
                      OP ==
                         OP .
                            REF #0
                            VAL "NAME"
                         VAL "foo"
                   DO
                      REF #0
            "#}
        );
    }

    #[test]
    fn test_dump_nil() {
        assert_eq!(dump_expr(None), "NULL\n");
    }
}
