//! `ledgerlens-fetcher`: enumerate every register an account owns.
//!
//! There is no index of registers per account on the ledger, so the fetcher
//! finds them by running code. It executes an account-info script and a
//! contract-removal transaction against a `LayeredView` whose misses go to a
//! remote ledger service, and reports each register the account owns the
//! first time execution reads it.
//!
//! - [`AccountRegisterFetcher`]: starts one fetch session per address
//! - [`FetchResult`]: the messages a session streams back
//! - [`RemoteLedger`] / [`LedgerReader`]: the remote history service boundary
//! - [`ExecutionEngine`]: the script/transaction executor boundary
//! - [`MeteredReader`]: per-session read-through cache and storage meter
//! - [`render`]: JSON line rendering for a client transport
//!
//! Not included: the engine itself, the network client for the ledger
//! service, and any server front end.

pub mod error;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod scripts;
pub mod result;
pub mod metered;
pub mod fetcher;
pub mod render;

pub use error::{FetchError, LedgerError, RenderError};
pub use config::FetcherConfig;
pub use engine::{
    ExecutionEngine, ProcedureError, ProcessError, Script, ScriptResult, TransactionBody,
    TransactionResult,
};
pub use ledger::{LedgerReader, MemLedger, RemoteLedger};
pub use result::{AccountRegister, FetchResult};
pub use metered::MeteredReader;
pub use fetcher::AccountRegisterFetcher;
