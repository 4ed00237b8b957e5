//! In-memory register store for testing.
//!
//! `MemStore` implements `RegisterReader` using a `BTreeMap`. It also counts
//! reads so tests can assert how often the root fell through to it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use ledgerlens_primitives::{RegisterId, RegisterValue};

use crate::error::ViewError;
use crate::reader::RegisterReader;

/// In-memory register store backed by `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemStore {
    data: BTreeMap<RegisterId, RegisterValue>,
    reads: AtomicUsize,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: RegisterId, value: RegisterValue) {
        self.data.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of `read` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl RegisterReader for MemStore {
    fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.get(id).cloned().unwrap_or_default())
    }
}
