//! Runtime values of the query language.
//!
//! Every value exclusively owns its members; cloning deep-copies them.
//! Lists are monomorphic: the first insertion fixes the member tag and a
//! later insertion of a different tag is rejected with [`TypeMismatch`].

mod display;
mod list;
mod value;

#[cfg(test)]
mod value_test;

pub use list::{TypeMismatch, ValueList};
pub use value::{Builtin, IndexKind, Lambda, Pnode, Value, ValueTag};
