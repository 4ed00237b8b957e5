//! Write buffer for one layer of a layered view.
//!
//! A `Delta` records only what was written at its own layer. A delete is an
//! explicit entry with an empty value, which shadows any value further down
//! the stack; a register that was never written has no entry at all.

use std::collections::BTreeMap;

use ledgerlens_primitives::{RegisterId, RegisterValue};

/// Buffered register writes for one layer.
///
/// `BTreeMap` keeps iteration order stable, which makes merges and test
/// output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    writes: BTreeMap<RegisterId, RegisterValue>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write, replacing any earlier write to the same register.
    pub fn set(&mut self, id: RegisterId, value: RegisterValue) {
        self.writes.insert(id, value);
    }

    /// Record a delete.
    pub fn delete(&mut self, id: RegisterId) {
        self.writes.insert(id, RegisterValue::new());
    }

    /// Look up a register written at this layer.
    ///
    /// `Some(empty)` means the register was deleted here; `None` means this
    /// layer never touched it.
    pub fn get(&self, id: &RegisterId) -> Option<&RegisterValue> {
        self.writes.get(id)
    }

    pub fn contains(&self, id: &RegisterId) -> bool {
        self.writes.contains_key(id)
    }

    /// Copy every entry of `other` into this delta, `other` winning on
    /// collisions.
    pub fn merge_from(&mut self, other: &Delta) {
        for (id, value) in &other.writes {
            self.writes.insert(id.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegisterId, &RegisterValue)> {
        self.writes.iter()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
