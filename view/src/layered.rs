//! Layered, remote-backed register view.
//!
//! A `LayeredView` is one node in a tree of overlays. Each node owns its
//! own `Delta`; the root additionally owns the fallback `RegisterReader`.
//! Children point at their parent through a `Weak` reference, so a child
//! never keeps its parent alive.
//!
//! Read path: this layer's delta, then each ancestor's delta up to the root,
//! then the root's reader. Writes only ever touch the layer they were issued
//! on; a parent sees them only after `merge_view`.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use ledgerlens_primitives::{RegisterId, RegisterValue};

use crate::delta::Delta;
use crate::error::ViewError;
use crate::reader::RegisterReader;
use crate::traits::RegisterView;

struct Layer {
    delta: RwLock<Delta>,
    origin: Origin,
}

enum Origin {
    /// Root layer: misses go to the reader.
    Remote(Arc<dyn RegisterReader>),
    /// Child layer: misses go to the parent.
    Parent(Weak<Layer>),
}

/// Handle to one layer of the view tree.
///
/// Cloning the handle shares the layer; it does not create a new one.
#[derive(Clone)]
pub struct LayeredView {
    layer: Arc<Layer>,
}

impl LayeredView {
    /// Create a root view that falls through to `remote`.
    pub fn new(remote: Arc<dyn RegisterReader>) -> Self {
        Self::with_origin(Origin::Remote(remote))
    }

    fn with_origin(origin: Origin) -> Self {
        Self {
            layer: Arc::new(Layer {
                delta: RwLock::new(Delta::new()),
                origin,
            }),
        }
    }

    /// Create a child layer on top of this one.
    pub fn child(&self) -> LayeredView {
        Self::with_origin(Origin::Parent(Arc::downgrade(&self.layer)))
    }

    pub fn is_root(&self) -> bool {
        matches!(self.layer.origin, Origin::Remote(_))
    }

    /// Snapshot of this layer's own writes.
    pub fn delta(&self) -> Delta {
        self.layer.delta.read().clone()
    }

    /// Resolve a register through the layer stack.
    pub fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError> {
        let mut layer = Arc::clone(&self.layer);
        loop {
            if let Some(value) = layer.delta.read().get(id) {
                return Ok(value.clone());
            }
            let parent = match &layer.origin {
                Origin::Remote(remote) => return remote.read(id),
                Origin::Parent(parent) => parent.upgrade().ok_or(ViewError::ParentDropped)?,
            };
            layer = parent;
        }
    }

    /// Record a write in this layer.
    pub fn write(&self, id: RegisterId, value: RegisterValue) {
        self.layer.delta.write().set(id, value);
    }

    /// Copy `child`'s delta into this layer.
    pub fn merge(&self, child: &LayeredView) {
        if Arc::ptr_eq(&self.layer, &child.layer) {
            return;
        }
        // Snapshot first so the two locks are never held together.
        let incoming = child.delta();
        self.layer.delta.write().merge_from(&incoming);
    }
}

impl fmt::Debug for LayeredView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredView")
            .field("root", &self.is_root())
            .field("delta_len", &self.layer.delta.read().len())
            .finish()
    }
}

impl RegisterView for LayeredView {
    fn get(&self, owner: &[u8], key: &[u8]) -> Result<RegisterValue, ViewError> {
        self.read(&RegisterId::new(owner, key))
    }

    fn set(&self, owner: &[u8], key: &[u8], value: RegisterValue) -> Result<(), ViewError> {
        self.write(RegisterId::new(owner, key), value);
        Ok(())
    }

    fn touch(&self, _owner: &[u8], _key: &[u8]) -> Result<(), ViewError> {
        Ok(())
    }

    fn new_child(&self) -> Box<dyn RegisterView> {
        Box::new(self.child())
    }

    fn merge_view(&self, child: &dyn RegisterView) -> Result<(), ViewError> {
        let child = child
            .as_any()
            .downcast_ref::<LayeredView>()
            .ok_or_else(|| ViewError::TypeMismatch {
                given: child.type_name(),
            })?;
        self.merge(child);
        Ok(())
    }

    fn drop_delta(&self) {
        self.layer.delta.write().clear();
    }

    fn all_registers(&self) -> Result<Vec<RegisterId>, ViewError> {
        tracing::warn!("engine asked a layered view for all registers");
        Err(ViewError::Unsupported("all_registers"))
    }

    fn register_updates(&self) -> Result<Vec<(RegisterId, RegisterValue)>, ViewError> {
        tracing::warn!("engine asked a layered view for its register updates");
        Err(ViewError::Unsupported("register_updates"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
