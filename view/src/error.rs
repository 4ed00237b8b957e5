//! Error types for register views.
//!
//! `ViewError` is what the execution engine sees when it talks to a view.
//! Remote read failures are carried through unchanged as the `source` of
//! `ReadFailed`, so callers further up can still inspect the cause.

use ledgerlens_primitives::RegisterId;

/// Boxed error for causes produced outside this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by `RegisterView` and `RegisterReader` methods.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// `merge_view` was handed a view from a different implementation.
    #[error("can not merge: view type mismatch (given: {given}, expected: LayeredView)")]
    TypeMismatch { given: &'static str },

    /// The operation needs full enumeration, which layered views never do.
    #[error("{0} is not implemented by layered views")]
    Unsupported(&'static str),

    /// A child view outlived the parent it reads through.
    #[error("parent view was dropped before its child")]
    ParentDropped,

    /// The fallback reader failed to resolve a register.
    #[error("could not read register {register}: {source}")]
    ReadFailed {
        register: String,
        #[source]
        source: BoxError,
    },
}

impl ViewError {
    /// Wrap a remote failure for the given register.
    pub fn read_failed(id: &RegisterId, source: impl Into<BoxError>) -> Self {
        Self::ReadFailed {
            register: id.to_string(),
            source: source.into(),
        }
    }
}
