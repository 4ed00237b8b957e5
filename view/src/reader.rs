//! Fallback register reader for the root of a layered view.
//!
//! `RegisterReader` is the read side that sits underneath every overlay:
//! when no layer holds an entry for a register, the root asks its reader.
//!
//! Implementations:
//! - `MemStore` (this crate): in-memory map for tests
//! - `MeteredReader` / `LedgerReader` (fetcher crate): cached, metered
//!   reads against the remote ledger

use std::sync::Arc;

use ledgerlens_primitives::{RegisterId, RegisterValue};

use crate::error::ViewError;

/// Abstraction over the register source behind a root view.
///
/// An absent register is returned as an empty value, never as an error.
pub trait RegisterReader: Send + Sync {
    /// Resolve one register.
    fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError>;
}

impl<R: RegisterReader + ?Sized> RegisterReader for Arc<R> {
    fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError> {
        (**self).read(id)
    }
}

impl<R: RegisterReader + ?Sized> RegisterReader for Box<R> {
    fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError> {
        (**self).read(id)
    }
}
