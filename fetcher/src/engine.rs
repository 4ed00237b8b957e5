//! Execution engine boundary.
//!
//! The fetcher does not interpret scripts itself. It hands a script or a
//! transaction plus a `RegisterView` to an `ExecutionEngine` and reads back
//! the outcome. Engines report two distinct failure domains:
//!
//! - a procedure error: the engine ran the code and the code failed
//!   (the inner `Result`)
//! - a process error: the engine could not run the code at all, including
//!   when a register read through the view failed (the outer `Result`)
//!
//! The engine is expected to run with unlimited computation and memory,
//! without authorization or sequence number checks, and with contract
//! removal allowed, since the cleanup transaction is never submitted.

use ledgerlens_primitives::{Address, Value};
use ledgerlens_view::{RegisterView, ViewError};

/// A read-only script and its JSON-CDC encoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub code: String,
    pub arguments: Vec<Vec<u8>>,
}

/// A transaction body. It is executed against a view, never submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBody {
    pub script: String,
    pub arguments: Vec<Vec<u8>>,
    pub authorizers: Vec<Address>,
}

/// Logic-level failure raised by the executed code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[Error Code: {code}] {message}")]
pub struct ProcedureError {
    pub code: u16,
    pub message: String,
}

impl ProcedureError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The engine could not execute the procedure.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// A view operation failed, typically a remote register read.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Any other engine-internal failure.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

/// Outcome of running a script.
pub type ScriptResult = Result<Result<Value, ProcedureError>, ProcessError>;

/// Outcome of running a transaction.
pub type TransactionResult = Result<Result<(), ProcedureError>, ProcessError>;

/// A synchronous script/transaction executor.
///
/// Calls are made from a blocking worker thread, one at a time. The engine
/// may create child views, merge them and drop their deltas as it sees fit.
pub trait ExecutionEngine: Send + Sync {
    /// Execute a script against `view` and return its decoded value.
    fn run_script(&self, view: &dyn RegisterView, script: &Script) -> ScriptResult;

    /// Execute a transaction against `view`.
    fn run_transaction(&self, view: &dyn RegisterView, tx: &TransactionBody) -> TransactionResult;
}
