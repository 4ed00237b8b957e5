//! Fetcher error types.
//!
//! `FetchError` is the single terminal error a fetch session reports. Each
//! variant names the stage that failed; the display strings are what a
//! consumer ends up showing.

use std::time::Duration;

use ledgerlens_primitives::{BlockHeight, ValueError};
use ledgerlens_view::BoxError;

use crate::engine::{ProcedureError, ProcessError};

/// Failures talking to the remote ledger service.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Transport or service error reported by the client.
    #[error("remote ledger request failed: {0}")]
    Request(#[source] BoxError),

    /// The session was cancelled while the request was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {0:?}")]
    DeadlineExceeded(Duration),

    /// The service answered with the wrong number of values.
    #[error("remote ledger returned {got} values for {expected} paths")]
    MalformedResponse { expected: usize, got: usize },

    /// The service does not have the requested height.
    #[error("height {0} is not available on the remote ledger")]
    HeightUnavailable(BlockHeight),
}

impl LedgerError {
    pub fn request(source: impl Into<BoxError>) -> Self {
        Self::Request(source.into())
    }
}

/// Terminal error of a fetch session.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not fetch a recent blockheight: {0}")]
    BlockHeight(#[source] LedgerError),

    #[error("could not build script: {0}")]
    ScriptBuild(#[source] ValueError),

    #[error("could not run script, script error: {0}")]
    ScriptLogic(#[source] ProcedureError),

    #[error("could not run script, script process error: {0}")]
    ScriptProcess(#[source] ProcessError),

    #[error("could not decode script result: {0}")]
    ScriptResult(#[source] ValueError),

    #[error("could not run fake tx, script error: {0}")]
    TransactionLogic(#[source] ProcedureError),

    #[error("could not run fake tx, script process error: {0}")]
    TransactionProcess(#[source] ProcessError),

    /// The blocking worker running the engine panicked or was cancelled.
    #[error("execution worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    /// Nobody is reading the result stream any more.
    #[error("result stream closed by consumer")]
    Disconnected,
}

/// Failures writing rendered results to a transport.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not encode message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not write message: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_block_height_message() {
        let err = FetchError::BlockHeight(LedgerError::DeadlineExceeded(Duration::from_secs(3)));
        assert_eq!(
            err.to_string(),
            "could not fetch a recent blockheight: request timed out after 3s"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_stage_messages_are_distinct() {
        let logic = ProcedureError::new(1101, "boom");
        let script = FetchError::ScriptLogic(logic.clone()).to_string();
        let tx = FetchError::TransactionLogic(logic).to_string();
        assert!(script.starts_with("could not run script, script error:"));
        assert!(tx.starts_with("could not run fake tx, script error:"));
        assert!(script.contains("boom"));
    }

    #[test]
    fn test_ledger_request_wraps_source() {
        let err = LedgerError::request("connection refused");
        assert_eq!(
            err.to_string(),
            "remote ledger request failed: connection refused"
        );
        let err = LedgerError::MalformedResponse {
            expected: 1,
            got: 0,
        };
        assert!(err.to_string().contains("0 values for 1 paths"));
    }
}
