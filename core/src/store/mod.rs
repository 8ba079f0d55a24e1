//! Interface to the provenance database.
//!
//! The engine only reads from the store. [`ProvenanceStore`] is the whole
//! contract: edge traversal, attribute fetches, index lookups and the single
//! entry point allowed to enumerate every object.

mod memory;

pub use memory::MemoryStore;

use thiserror::Error;

use crate::evaluator::ExecutionError;
use crate::values::{IndexKind, Pnode, Value, ValueList, ValueTag};

/// A validated key for one of the non-identity indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey<'a> {
    Inode(i64),
    Name(&'a str),
    Argv(&'a str),
}

/// A lookup key whose tag does not suit the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {} requires a {expected:?} key, found {found:?}", index.name())]
pub struct LookupError {
    pub index: IndexKind,
    pub expected: ValueTag,
    pub found: ValueTag,
}

/// Read-only view of the provenance graph.
pub trait ProvenanceStore {
    /// Objects that list `pnode` as an input.
    fn children(&self, pnode: Pnode) -> Vec<Pnode>;

    /// Inputs of `pnode`.
    fn parents(&self, pnode: Pnode) -> Vec<Pnode>;

    /// First value of attribute `name`, if present.
    fn attribute(&self, pnode: Pnode, name: &str) -> Option<Value>;

    /// Every attribute of `pnode`, in storage order.
    fn attributes(&self, pnode: Pnode) -> Vec<(String, Value)>;

    /// Objects matching `key` in its index.
    fn find(&self, key: IndexKey<'_>) -> ValueList;

    /// Calls `visit` once per object in ascending id order. This is the only
    /// way to enumerate the whole object space.
    fn evaluate_over_all(
        &self,
        visit: &mut dyn FnMut(Pnode) -> Result<(), ExecutionError>,
    ) -> Result<(), ExecutionError>;

    /// Point lookup. The identity index echoes its key; the others check the
    /// key's tag and return a list of objects.
    fn lookup(&self, index: IndexKind, key: &Value) -> Result<Value, LookupError> {
        let mismatch = |expected| LookupError {
            index,
            expected,
            found: key.tag(),
        };
        let key = match (index, key) {
            (IndexKind::Identity, _) => return Ok(key.clone()),
            (IndexKind::InodeToPnode, Value::Int(inode)) => IndexKey::Inode(*inode),
            (IndexKind::InodeToPnode, _) => return Err(mismatch(ValueTag::Int)),
            (IndexKind::Name, Value::Str(name)) => IndexKey::Name(name),
            (IndexKind::Argv, Value::Str(word)) => IndexKey::Argv(word),
            (IndexKind::Name | IndexKind::Argv, _) => return Err(mismatch(ValueTag::Str)),
        };
        Ok(Value::List(self.find(key)))
    }
}
