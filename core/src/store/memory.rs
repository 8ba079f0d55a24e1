//! In-memory provenance store.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::evaluator::ExecutionError;
use crate::store::{IndexKey, ProvenanceStore};
use crate::values::{Pnode, Value, ValueList};

/// Attribute whose object-valued records are ancestry edges.
pub const INPUT: &str = "INPUT";

/// A provenance graph held in memory.
///
/// Each object carries an ordered list of `(name, value)` records. A record
/// named `INPUT` holding a pnode is an edge from the object to its parent.
/// Every object also answers the synthetic attribute `PNODE` with its own
/// id as an int.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "StoreFixture")]
pub struct MemoryStore {
    objects: BTreeMap<Pnode, Vec<(String, Value)>>,
    children: HashMap<Pnode, Vec<Pnode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object with no attributes.
    pub fn add_object(&mut self, pnode: Pnode) -> &mut Self {
        self.objects.entry(pnode).or_default();
        self
    }

    /// Appends an attribute record to `pnode`, creating the object if needed.
    pub fn set(&mut self, pnode: Pnode, name: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if let (INPUT, Value::Pnode(parent)) = (name, &value) {
            self.children.entry(*parent).or_default().push(pnode);
        }
        self.objects
            .entry(pnode)
            .or_default()
            .push((name.to_string(), value));
        self
    }

    /// Records that `child` was derived from `parent`.
    pub fn add_input(&mut self, child: Pnode, parent: Pnode) -> &mut Self {
        self.set(child, INPUT, Value::Pnode(parent))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn matching(&self, predicate: impl Fn(&str, &Value) -> bool) -> ValueList {
        ValueList::from_pnodes(
            self.objects
                .iter()
                .filter(|(_, records)| records.iter().any(|(name, value)| predicate(name, value)))
                .map(|(pnode, _)| *pnode),
        )
    }
}

fn argv_mentions(value: &Value, word: &str) -> bool {
    match value {
        Value::Str(argv) => argv.contains(word),
        Value::Tuple(items) => items.iter().any(|item| argv_mentions(item, word)),
        Value::List(items) => items.iter().any(|item| argv_mentions(item, word)),
        _ => false,
    }
}

impl ProvenanceStore for MemoryStore {
    fn children(&self, pnode: Pnode) -> Vec<Pnode> {
        self.children.get(&pnode).cloned().unwrap_or_default()
    }

    fn parents(&self, pnode: Pnode) -> Vec<Pnode> {
        self.objects
            .get(&pnode)
            .into_iter()
            .flatten()
            .filter(|(name, _)| name == INPUT)
            .filter_map(|(_, value)| value.as_pnode())
            .collect()
    }

    fn attribute(&self, pnode: Pnode, name: &str) -> Option<Value> {
        let records = self.objects.get(&pnode)?;
        if name == "PNODE" {
            return i64::try_from(pnode).ok().map(Value::Int);
        }
        records
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.clone())
    }

    fn attributes(&self, pnode: Pnode) -> Vec<(String, Value)> {
        self.objects.get(&pnode).cloned().unwrap_or_default()
    }

    fn find(&self, key: IndexKey<'_>) -> ValueList {
        match key {
            IndexKey::Inode(inode) => self.matching(|name, value| {
                name == "INODE" && value.as_int() == Some(inode)
            }),
            IndexKey::Name(wanted) => {
                self.matching(|name, value| name == "NAME" && value.as_str() == Some(wanted))
            }
            IndexKey::Argv(word) => {
                self.matching(|name, value| name == "ARGV" && argv_mentions(value, word))
            }
        }
    }

    fn evaluate_over_all(
        &self,
        visit: &mut dyn FnMut(Pnode) -> Result<(), ExecutionError>,
    ) -> Result<(), ExecutionError> {
        for pnode in self.objects.keys() {
            visit(*pnode)?;
        }
        Ok(())
    }
}

/// JSON shape of a store: `{"objects": [{"pnode": 1, "attributes": [["NAME", {"Str": "foo"}]]}]}`.
#[derive(Debug, Deserialize)]
struct StoreFixture {
    objects: Vec<ObjectFixture>,
}

#[derive(Debug, Deserialize)]
struct ObjectFixture {
    pnode: Pnode,
    #[serde(default)]
    attributes: Vec<(String, Value)>,
}

impl From<StoreFixture> for MemoryStore {
    fn from(fixture: StoreFixture) -> Self {
        let mut store = MemoryStore::new();
        for object in fixture.objects {
            store.add_object(object.pnode);
            for (name, value) in object.attributes {
                store.set(object.pnode, &name, value);
            }
        }
        store
    }
}
