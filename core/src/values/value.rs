//! The runtime value type.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::syntax::{Expr, Var};
use crate::values::ValueList;

/// Opaque identifier of one object in the provenance graph.
pub type Pnode = u64;

/// Runtime tag of a [`Value`].
///
/// The declaration order is the ordering used by [`Value::compare`] for
/// values of different tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueTag {
    Int,
    Float,
    Str,
    Pnode,
    Range,
    Tuple,
    List,
    All,
    Index,
    Lambda,
    Builtin,
}

/// The database indexes a query can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// Echoes its key; an object id is its own index entry.
    Identity,
    /// Inode number to object.
    InodeToPnode,
    /// Exact object name.
    Name,
    /// Substring of a process's argument vector.
    Argv,
}

impl IndexKind {
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Identity => "(identity)",
            IndexKind::InodeToPnode => "I2P",
            IndexKind::Name => "NAME",
            IndexKind::Argv => "ARGV",
        }
    }
}

/// Functions built into the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    First,
    Second,
    Third,
    Filter,
    Ctime,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::First,
        Builtin::Second,
        Builtin::Third,
        Builtin::Filter,
        Builtin::Ctime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::First => "first",
            Builtin::Second => "second",
            Builtin::Third => "third",
            Builtin::Filter => "filter",
            Builtin::Ctime => "ctime",
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// A closure over an AST subtree.
///
/// Free variables in `body` are resolved against the bindings live at call
/// time. Two lambdas are equal only if they have the same `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lambda {
    pub id: u64,
    pub var: Var,
    pub body: Box<Expr>,
}

/// A runtime value. Compound values own their members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Pnode(Pnode),
    /// Inclusive integer range; iterates downwards when `left > right`.
    Range(i64, i64),
    Tuple(Vec<Value>),
    List(ValueList),
    /// Every object in the database.
    All,
    Index(IndexKind),
    Lambda(Lambda),
    Builtin(Builtin),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::Str(_) => ValueTag::Str,
            Value::Pnode(_) => ValueTag::Pnode,
            Value::Range(..) => ValueTag::Range,
            Value::Tuple(_) => ValueTag::Tuple,
            Value::List(_) => ValueTag::List,
            Value::All => ValueTag::All,
            Value::Index(_) => ValueTag::Index,
            Value::Lambda(_) => ValueTag::Lambda,
            Value::Builtin(_) => ValueTag::Builtin,
        }
    }

    /// Truthiness used by guards, conditionals and the logical operators.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            _ => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pnode(&self) -> Option<Pnode> {
        match self {
            Value::Pnode(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ValueList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Query-level equality.
    ///
    /// Ints and floats compare numerically across tags. Any other tag
    /// mismatch is unequal. Lists must also agree on their member tag, and
    /// lambdas are equal only when they share an id.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pnode(a), Value::Pnode(b)) => a == b,
            (Value::Range(al, ar), Value::Range(bl, br)) => al == bl && ar == br,
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Value::List(a), Value::List(b)) => a.equals(b),
            (Value::All, Value::All) => true,
            (Value::Index(a), Value::Index(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => a.id == b.id,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }

    /// Total order used for sorting and deduplication.
    ///
    /// Ints and floats order numerically across tags, agreeing with
    /// [`Value::equals`]. Other values of different tags order by tag.
    /// Tuples and lists order by length first, then elementwise.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => compare_numbers(*a, *b),
            (Value::Int(a), Value::Float(b)) => compare_numbers(*a as f64, *b),
            (Value::Float(a), Value::Int(b)) => compare_numbers(*a, *b as f64),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Pnode(a), Value::Pnode(b)) => a.cmp(b),
            (Value::Range(al, ar), Value::Range(bl, br)) => al.cmp(bl).then(ar.cmp(br)),
            (Value::Tuple(a), Value::Tuple(b)) => compare_seq(a, b),
            (Value::List(a), Value::List(b)) => compare_seq(a.members(), b.members()),
            (Value::All, Value::All) => Ordering::Equal,
            (Value::Index(a), Value::Index(b)) => a.cmp(b),
            (Value::Lambda(a), Value::Lambda(b)) => a.id.cmp(&b.id),
            (Value::Builtin(a), Value::Builtin(b)) => a.name().cmp(b.name()),
            _ => self.tag().cmp(&other.tag()),
        }
    }
}

/// Numeric order; NaN falls back to the IEEE total order.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn compare_seq(a: &[Value], b: &[Value]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(x, y)| x.compare(y))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ValueList> for Value {
    fn from(list: ValueList) -> Self {
        Value::List(list)
    }
}
