//! Monomorphic value lists.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::{Pnode, Value, ValueTag};

/// Rejected insertion of a value whose tag differs from the list's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("type mismatch adding {found:?} to list of {expected:?}")]
pub struct TypeMismatch {
    pub expected: ValueTag,
    pub found: ValueTag,
}

/// A list whose members all share one runtime tag.
///
/// The member tag is fixed by the first insertion. Deserialization applies
/// the same check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawList")]
pub struct ValueList {
    membertype: Option<ValueTag>,
    members: Vec<Value>,
}

/// Serialized shape of a [`ValueList`], checked on the way in.
#[derive(Deserialize)]
struct RawList {
    #[serde(default)]
    membertype: Option<ValueTag>,
    members: Vec<Value>,
}

impl TryFrom<RawList> for ValueList {
    type Error = TypeMismatch;

    fn try_from(raw: RawList) -> Result<Self, Self::Error> {
        // A declared tag binds only when there are members to check.
        let mut list = ValueList {
            membertype: raw.membertype.filter(|_| !raw.members.is_empty()),
            members: Vec::with_capacity(raw.members.len()),
        };
        for member in raw.members {
            list.push(member)?;
        }
        Ok(list)
    }
}

impl ValueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(value: Value) -> Self {
        Self {
            membertype: Some(value.tag()),
            members: vec![value],
        }
    }

    pub fn from_pnodes(pnodes: impl IntoIterator<Item = Pnode>) -> Self {
        let members: Vec<Value> = pnodes.into_iter().map(Value::Pnode).collect();
        Self {
            membertype: (!members.is_empty()).then_some(ValueTag::Pnode),
            members,
        }
    }

    /// Builds a list from values, stopping at the first mismatched tag.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Result<Self, TypeMismatch> {
        let mut list = Self::new();
        for value in values {
            list.push(value)?;
        }
        Ok(list)
    }

    pub fn membertype(&self) -> Option<ValueTag> {
        self.membertype
    }

    pub fn members(&self) -> &[Value] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Value> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.members.iter()
    }

    /// Appends `value`. On a tag mismatch the list is left unchanged.
    pub fn push(&mut self, value: Value) -> Result<(), TypeMismatch> {
        let tag = value.tag();
        match self.membertype {
            Some(expected) if expected != tag => Err(TypeMismatch {
                expected,
                found: tag,
            }),
            _ => {
                self.membertype = Some(tag);
                self.members.push(value);
                Ok(())
            }
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|m| m.equals(value))
    }

    pub fn equals(&self, other: &ValueList) -> bool {
        self.membertype == other.membertype
            && self.members.len() == other.members.len()
            && self.members.iter().zip(&other.members).all(|(a, b)| a.equals(b))
    }

    /// Sorts members by [`Value::compare`] and removes adjacent duplicates.
    pub fn sort_dedup(&mut self) {
        self.members.sort_by(Value::compare);
        self.members.dedup_by(|a, b| a.compare(b) == Ordering::Equal);
    }

    /// Concatenation. An empty side yields the other side unchanged.
    pub fn concat(mut self, other: ValueList) -> Result<ValueList, TypeMismatch> {
        if self.is_empty() {
            return Ok(other);
        }
        if other.is_empty() {
            return Ok(self);
        }
        if let (Some(expected), Some(found)) = (self.membertype, other.membertype) {
            if expected != found {
                return Err(TypeMismatch { expected, found });
            }
        }
        self.members.extend(other.members);
        Ok(self)
    }

    /// Sorted set union of both lists.
    pub fn union(self, other: ValueList) -> Result<ValueList, TypeMismatch> {
        self.merge(other, SetOp::Union)
    }

    /// Sorted set intersection of both lists.
    pub fn intersect(self, other: ValueList) -> Result<ValueList, TypeMismatch> {
        self.merge(other, SetOp::Intersect)
    }

    /// Sorted set difference, members of `self` not in `other`.
    pub fn difference(self, other: ValueList) -> Result<ValueList, TypeMismatch> {
        self.merge(other, SetOp::Difference)
    }

    /// Sort-and-dedupe both sides, then walk them in step.
    fn merge(mut self, mut other: ValueList, op: SetOp) -> Result<ValueList, TypeMismatch> {
        self.sort_dedup();
        other.sort_dedup();
        let (left, right) = (self.members, other.members);

        let mut result = ValueList::new();
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            match left[i].compare(&right[j]) {
                Ordering::Less => {
                    if op != SetOp::Intersect {
                        result.push(left[i].clone())?;
                    }
                    i += 1;
                }
                Ordering::Greater => {
                    if op == SetOp::Union {
                        result.push(right[j].clone())?;
                    }
                    j += 1;
                }
                Ordering::Equal => {
                    if op != SetOp::Difference {
                        result.push(left[i].clone())?;
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        if op != SetOp::Intersect {
            for value in &left[i..] {
                result.push(value.clone())?;
            }
        }
        if op == SetOp::Union {
            for value in &right[j..] {
                result.push(value.clone())?;
            }
        }
        Ok(result)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SetOp {
    Union,
    Intersect,
    Difference,
}

impl IntoIterator for ValueList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
