//! Rendering query results for display.

use core::fmt::Write;

use crate::{
    output::TupleSet,
    store::ProvenanceStore,
    syntax::dump_expr,
    values::{Value, ValueList},
};

const INDENT: &str = "   ";

/// Renders a top-level result: `NOTHING` for nil, otherwise a
/// `RESULT: <type>` header followed by the value.
pub fn render_result(store: &dyn ProvenanceStore, value: Option<&Value>) -> String {
    let Some(value) = value else {
        return "NOTHING\n".to_string();
    };
    let mut out = format!("RESULT: {}\n", type_name(value));
    match value {
        Value::Pnode(pnode) => {
            let _ = writeln!(out, "{}", value);
            for (name, attr) in store.attributes(*pnode) {
                let _ = writeln!(out, "{}{}: {}", INDENT, name, attr);
            }
        }
        Value::List(list) => render_list(&mut out, list.clone()),
        Value::All => {
            let mut pnodes = Vec::new();
            // Enumeration only fails on a budget the visitor imposes.
            let _ = store.evaluate_over_all(&mut |pnode| {
                pnodes.push(pnode);
                Ok(())
            });
            render_list(&mut out, ValueList::from_pnodes(pnodes));
        }
        Value::Lambda(lambda) => {
            let _ = writeln!(out, "{}", value);
            out.push_str(&dump_expr(Some(&lambda.body)));
        }
        _ => {
            let _ = writeln!(out, "{}", value);
        }
    }
    out
}

/// Lists print sorted and without duplicates. A list of equal-width tuples
/// prints as a tuple set.
fn render_list(out: &mut String, mut list: ValueList) {
    list.sort_dedup();
    let tuples: Option<Vec<&[Value]>> = list
        .iter()
        .map(|member| match member {
            Value::Tuple(fields) => Some(fields.as_slice()),
            _ => None,
        })
        .collect();
    let set = tuples
        .filter(|t| !t.is_empty())
        .and_then(TupleSet::from_tuples);
    if let Some(set) = set {
        out.push_str(&set.render(|v| v.to_string()));
        out.push('\n');
        return;
    }
    for member in list.iter() {
        let _ = writeln!(out, "{}", member);
    }
}

/// Human-readable type of a value.
pub fn type_name(value: &Value) -> String {
    match value {
        Value::Int(_) => "int".to_string(),
        Value::Float(_) => "float".to_string(),
        Value::Str(_) => "string".to_string(),
        Value::Pnode(_) => "object".to_string(),
        Value::Range(..) => "range of int".to_string(),
        Value::Index(_) => "database-index".to_string(),
        Value::Builtin(_) => "builtin".to_string(),
        Value::Lambda(_) => "lambda".to_string(),
        Value::All => "all objects".to_string(),
        Value::Tuple(fields) => {
            let names: Vec<String> = fields.iter().map(type_name).collect();
            format!("tuple of ({})", names.join(", "))
        }
        Value::List(list) => match list.iter().next() {
            None => "list of nothing".to_string(),
            Some(first) => format!("list of {} {}", list.len(), type_name(first)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .set(1, "NAME", "foo")
            .set(2, "NAME", "cat")
            .add_input(2, 1);
        store
    }

    fn render(value: Option<Value>) -> String {
        render_result(&store(), value.as_ref())
    }

    #[test]
    fn test_nothing() {
        assert_eq!(render(None), "NOTHING\n");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(Some(Value::Int(3))), "RESULT: int\n3\n");
        assert_eq!(render(Some(Value::str("a"))), "RESULT: string\n\"a\"\n");
    }

    #[test]
    fn test_object_prints_attributes() {
        assert_eq!(
            render(Some(Value::Pnode(2))),
            indoc! {r#"
                RESULT: object
                (pnode 2)
                   NAME: "cat"
                   INPUT: (pnode 1)
            "#}
        );
    }

    #[test]
    fn test_list_is_sorted_and_deduplicated() {
        let list = ValueList::from_values([Value::Int(3), Value::Int(1), Value::Int(3)]).unwrap();
        assert_eq!(
            render(Some(Value::List(list))),
            "RESULT: list of 3 int\n1\n3\n"
        );
        assert_eq!(
            render(Some(Value::List(ValueList::new()))),
            "RESULT: list of nothing\n"
        );
    }

    #[test]
    fn test_list_of_tuples_prints_as_tuple_set() {
        let pair = |a, b| Value::Tuple(vec![Value::Pnode(a), Value::Pnode(b)]);
        let list = ValueList::from_values([pair(1, 3), pair(1, 2), pair(2, 3)]).unwrap();
        assert_eq!(
            render(Some(Value::List(list))),
            indoc! {"
                RESULT: list of 3 tuple of (object, object)
                {
                   ((pnode 1), (pnode 2)),
                   (           (pnode 3)),
                   ((pnode 2), (pnode 3))
                }
            "}
        );
    }

    #[test]
    fn test_all_lists_every_object() {
        assert_eq!(
            render(Some(Value::All)),
            "RESULT: all objects\n(pnode 1)\n(pnode 2)\n"
        );
    }
}
