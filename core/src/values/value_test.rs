use core::cmp::Ordering;

use pretty_assertions::assert_eq;

use crate::values::{Builtin, IndexKind, Value, ValueList, ValueTag};

fn int_list(items: &[i64]) -> ValueList {
    ValueList::from_values(items.iter().map(|i| Value::Int(*i))).unwrap()
}

#[test]
fn test_list_fixes_membertype_on_first_insert() {
    let mut list = ValueList::new();
    assert_eq!(list.membertype(), None);
    list.push(Value::Int(1)).unwrap();
    assert_eq!(list.membertype(), Some(ValueTag::Int));

    let err = list.push(Value::str("two")).unwrap_err();
    assert_eq!(err.expected, ValueTag::Int);
    assert_eq!(err.found, ValueTag::Str);
    assert_eq!(list.len(), 1);
}

#[test]
fn test_numeric_promotion_in_equality() {
    assert!(Value::Int(3).equals(&Value::Float(3.0)));
    assert!(Value::Float(3.0).equals(&Value::Int(3)));
    assert!(!Value::Int(3).equals(&Value::Float(3.5)));
    assert!(!Value::Int(3).equals(&Value::str("3")));
}

#[test]
fn test_equality_is_reflexive_and_symmetric() {
    let values = vec![
        Value::Int(7),
        Value::Float(2.5),
        Value::str("cat"),
        Value::Pnode(4),
        Value::Range(1, 3),
        Value::Tuple(vec![Value::Int(1), Value::str("a")]),
        Value::List(int_list(&[1, 2])),
        Value::All,
        Value::Index(IndexKind::Argv),
        Value::Builtin(Builtin::Filter),
    ];
    for a in &values {
        assert!(a.equals(a), "{} should equal itself", a);
        for b in &values {
            assert_eq!(a.equals(b), b.equals(a), "{} vs {}", a, b);
        }
    }
}

#[test]
fn test_list_equality_requires_same_membertype() {
    let ints = int_list(&[1]);
    let floats = ValueList::from_values([Value::Float(1.0)]).unwrap();
    assert!(Value::Int(1).equals(&Value::Float(1.0)));
    assert!(!ints.equals(&floats));
}

#[test]
fn test_truthiness() {
    assert!(!Value::Int(0).is_true());
    assert!(Value::Int(-2).is_true());
    assert!(!Value::Float(0.0).is_true());
    assert!(!Value::str("").is_true());
    assert!(Value::str("x").is_true());
    assert!(!Value::List(ValueList::new()).is_true());
    assert!(Value::List(int_list(&[0])).is_true());
    assert!(Value::Pnode(0).is_true());
    assert!(Value::Tuple(vec![]).is_true());
    assert!(Value::All.is_true());
}

#[test]
fn test_compare_orders_by_tag_then_content() {
    assert_eq!(Value::Float(100.0).compare(&Value::str("a")), Ordering::Less);
    assert_eq!(Value::str("b").compare(&Value::str("a")), Ordering::Greater);
    assert_eq!(Value::Pnode(3).compare(&Value::Pnode(3)), Ordering::Equal);
    assert_eq!(
        Value::Range(1, 5).compare(&Value::Range(1, 2)),
        Ordering::Greater
    );
    // Shorter tuples sort first regardless of content.
    let short = Value::Tuple(vec![Value::Int(9)]);
    let long = Value::Tuple(vec![Value::Int(1), Value::Int(1)]);
    assert_eq!(short.compare(&long), Ordering::Less);
    assert_eq!(
        Value::Builtin(Builtin::Ctime).compare(&Value::Builtin(Builtin::Third)),
        Ordering::Less
    );
}

#[test]
fn test_compare_promotes_numbers() {
    assert_eq!(Value::Int(100).compare(&Value::Float(0.5)), Ordering::Greater);
    assert_eq!(Value::Int(1).compare(&Value::Float(1.0)), Ordering::Equal);
    assert_eq!(Value::Float(-0.0).compare(&Value::Int(0)), Ordering::Equal);

    let mut pairs = ValueList::from_values([
        Value::Tuple(vec![Value::Int(1), Value::str("a")]),
        Value::Tuple(vec![Value::Float(0.5), Value::str("b")]),
        Value::Tuple(vec![Value::Float(1.0), Value::str("a")]),
    ])
    .unwrap();
    pairs.sort_dedup();
    assert_eq!(
        pairs.into_members(),
        vec![
            Value::Tuple(vec![Value::Float(0.5), Value::str("b")]),
            Value::Tuple(vec![Value::Int(1), Value::str("a")]),
        ]
    );
}

#[test]
fn test_deserialized_lists_stay_monomorphic() {
    let ok: ValueList =
        serde_json::from_str(r#"{"membertype": "Int", "members": [{"Int": 1}, {"Int": 2}]}"#)
            .unwrap();
    assert!(ok.equals(&int_list(&[1, 2])));

    let mixed = serde_json::from_str::<ValueList>(
        r#"{"membertype": "Int", "members": [{"Int": 1}, {"Str": "two"}]}"#,
    );
    assert!(mixed.is_err());

    let mislabeled =
        serde_json::from_str::<ValueList>(r#"{"membertype": "Str", "members": [{"Int": 1}]}"#);
    assert!(mislabeled.is_err());

    let empty: ValueList =
        serde_json::from_str(r#"{"membertype": "Str", "members": []}"#).unwrap();
    assert_eq!(empty.membertype(), None);
}

#[test]
fn test_concat_with_empty_side() {
    let empty = ValueList::new();
    let strings = ValueList::from_values([Value::str("a")]).unwrap();
    let joined = empty.concat(strings.clone()).unwrap();
    assert!(joined.equals(&strings));

    let mismatch = int_list(&[1]).concat(strings).unwrap_err();
    assert_eq!(mismatch.expected, ValueTag::Int);
}

#[test]
fn test_set_operations_sort_and_dedupe() {
    let left = int_list(&[3, 1, 3, 2]);
    let right = int_list(&[4, 2, 2]);

    let union = left.clone().union(right.clone()).unwrap();
    assert!(union.equals(&int_list(&[1, 2, 3, 4])));

    let intersect = left.clone().intersect(right.clone()).unwrap();
    assert!(intersect.equals(&int_list(&[2])));

    let difference = left.difference(right).unwrap();
    assert!(difference.equals(&int_list(&[1, 3])));
}

#[test]
fn test_display() {
    let tuple = Value::Tuple(vec![
        Value::Pnode(2),
        Value::str("cat\tfoo\n"),
        Value::Range(4, 1),
    ]);
    assert_eq!(tuple.to_string(), r#"((pnode 2), "cat\tfoo\n", (4..1))"#);
    assert_eq!(Value::List(int_list(&[1, 2])).to_string(), "[1, 2]");
    assert_eq!(Value::Index(IndexKind::Identity).to_string(), "<index (identity)>");
    assert_eq!(Value::All.to_string(), "**");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
}
