//! Register view trait: the read/write contract the execution engine uses.
//!
//! The engine runs every script and transaction against a `RegisterView`.
//! It scopes nested invocations by asking for a child view, and commits a
//! child by merging it back into its parent (or throws it away by dropping
//! its delta).
//!
//! Views are shared by reference across the engine, so every method takes
//! `&self`; implementations use interior mutability for their deltas.

use std::any::Any;

use ledgerlens_primitives::{RegisterId, RegisterValue};

use crate::error::ViewError;

/// Read/write access to registers, as required by the execution engine.
pub trait RegisterView: Send + Sync {
    // ── Point access ──

    /// Read a register.
    ///
    /// An absent register is an empty value. Errors from the fallback
    /// reader are returned as-is, without retry.
    fn get(&self, owner: &[u8], key: &[u8]) -> Result<RegisterValue, ViewError>;

    /// Write a register into this view's own delta.
    fn set(&self, owner: &[u8], key: &[u8], value: RegisterValue) -> Result<(), ViewError>;

    /// Delete a register. Recorded as an explicit empty entry.
    fn delete(&self, owner: &[u8], key: &[u8]) -> Result<(), ViewError> {
        self.set(owner, key, RegisterValue::new())
    }

    /// Mark a register as touched without reading it.
    fn touch(&self, owner: &[u8], key: &[u8]) -> Result<(), ViewError>;

    // ── Scoping ──

    /// Create a child view layered on top of this one.
    fn new_child(&self) -> Box<dyn RegisterView>;

    /// Copy every entry of `child`'s delta into this view's delta.
    fn merge_view(&self, child: &dyn RegisterView) -> Result<(), ViewError>;

    /// Discard this view's own delta.
    fn drop_delta(&self);

    // ── Enumeration ──

    /// Every register known to the view.
    fn all_registers(&self) -> Result<Vec<RegisterId>, ViewError>;

    /// Every register written through the view, with its new value.
    fn register_updates(&self) -> Result<Vec<(RegisterId, RegisterValue)>, ViewError>;

    // ── Introspection ──

    /// Downcast support for `merge_view`.
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete view type, used in mismatch errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
