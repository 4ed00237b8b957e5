//! Remote ledger boundary.
//!
//! `RemoteLedger` is the async client for the history service that answers
//! "latest height" and "values of these paths at height h". `LedgerReader`
//! adapts it to the synchronous `RegisterReader` the view needs: it runs on
//! the engine's blocking worker and re-enters the runtime for each request.
//!
//! Every request goes through [`guarded`], which races it against the
//! session's cancellation token and the configured deadline.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use ledgerlens_primitives::{
    register_path, BlockHeight, LedgerPath, PathVersion, RegisterId, RegisterValue,
};
use ledgerlens_view::{RegisterReader, ViewError};

use crate::error::LedgerError;

/// Client for the remote ledger history service.
#[async_trait]
pub trait RemoteLedger: Send + Sync {
    /// Latest height the service has indexed.
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError>;

    /// Register values at `height`, one per path, in request order.
    /// Absent registers come back as empty values.
    async fn register_values(
        &self,
        height: BlockHeight,
        paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError>;
}

/// Run a ledger request under a cancellation token and a deadline.
pub async fn guarded<T, F>(
    cancel: &CancellationToken,
    timeout: Duration,
    request: F,
) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LedgerError::Cancelled),
        result = tokio::time::timeout(timeout, request) => {
            result.unwrap_or(Err(LedgerError::DeadlineExceeded(timeout)))
        }
    }
}

/// Synchronous register reader backed by a `RemoteLedger` at a fixed height.
///
/// `read` blocks on the runtime handle, so it must only be called from a
/// blocking thread (`spawn_blocking`), never from async code.
pub struct LedgerReader {
    ledger: Arc<dyn RemoteLedger>,
    runtime: Handle,
    height: BlockHeight,
    path_version: PathVersion,
    cancel: CancellationToken,
    timeout: Duration,
}

impl LedgerReader {
    pub fn new(
        ledger: Arc<dyn RemoteLedger>,
        runtime: Handle,
        height: BlockHeight,
        path_version: PathVersion,
        cancel: CancellationToken,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            runtime,
            height,
            path_version,
            cancel,
            timeout,
        }
    }

    fn fetch(&self, path: LedgerPath) -> Result<RegisterValue, LedgerError> {
        let paths = [path];
        let request = self.ledger.register_values(self.height, &paths);
        let mut values = self
            .runtime
            .block_on(guarded(&self.cancel, self.timeout, request))?;
        if values.len() != paths.len() {
            return Err(LedgerError::MalformedResponse {
                expected: paths.len(),
                got: values.len(),
            });
        }
        Ok(values.swap_remove(0))
    }
}

impl RegisterReader for LedgerReader {
    fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError> {
        let path = register_path(id, self.path_version);
        self.fetch(path).map_err(|e| ViewError::read_failed(id, e))
    }
}

/// In-memory remote ledger for tests and local runs.
///
/// Holds a single snapshot; every height up to `latest` serves it.
#[derive(Debug, Default)]
pub struct MemLedger {
    latest: BlockHeight,
    path_version: PathVersion,
    registers: HashMap<LedgerPath, RegisterValue>,
    requests: AtomicUsize,
}

impl MemLedger {
    pub fn new(latest: BlockHeight) -> Self {
        Self {
            latest,
            ..Self::default()
        }
    }

    /// Index registers with a non-default path version.
    pub fn with_path_version(mut self, path_version: PathVersion) -> Self {
        self.path_version = path_version;
        self
    }

    pub fn insert(&mut self, id: &RegisterId, value: RegisterValue) {
        self.registers
            .insert(register_path(id, self.path_version), value);
    }

    /// Number of `register_values` calls served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteLedger for MemLedger {
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError> {
        Ok(self.latest)
    }

    async fn register_values(
        &self,
        height: BlockHeight,
        paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if height > self.latest {
            return Err(LedgerError::HeightUnavailable(height));
        }
        Ok(paths
            .iter()
            .map(|path| self.registers.get(path).cloned().unwrap_or_default())
            .collect())
    }
}
