//! `ledgerlens-primitives`: foundational types for ledgerlens.
//!
//! This crate provides the account address, register identifier and value
//! types, the versioned register → ledger path encoding used by the remote
//! ledger service, and the JSON-CDC value model the execution engine
//! speaks.

pub mod types;
pub mod error;
pub mod path;
pub mod value;

// Re-export commonly used types at the crate root for convenience.
pub use types::{Address, BlockHeight, RegisterId, RegisterValue, ADDRESS_LEN};
pub use error::{PrimitiveError, ValueError};
pub use path::{register_path, LedgerPath, PathVersion};
pub use value::{AccountInfo, Composite, Field, Value};
