//! `ledgerlens-view`: layered register views for script execution.
//!
//! This crate defines the read/write contract the execution engine runs
//! scripts against and the layered implementation of it. It provides:
//!
//! - `RegisterView` trait: what the engine calls into
//! - `RegisterReader` trait: the fallback read behind a root view
//! - `LayeredView`: copy-on-write overlay tree with delta merge
//! - `Delta`: one layer's buffered writes
//! - `StorageMeter`: per-account storage byte accounting
//! - `MemStore`: in-memory `RegisterReader` for testing
//! - `ViewError`: error type shared by views and readers

pub mod error;
pub mod traits;
pub mod reader;
pub mod delta;
pub mod layered;
pub mod storage_meter;
pub mod mem_store;

// Re-export commonly used types at the crate root.
pub use error::{BoxError, ViewError};
pub use traits::RegisterView;
pub use reader::RegisterReader;
pub use delta::Delta;
pub use layered::LayeredView;
pub use storage_meter::{register_size, StorageMeter, REGISTER_OVERHEAD_BYTES};
pub use mem_store::MemStore;
