//! Fetch orchestrator.
//!
//! One call to [`AccountRegisterFetcher::fetch`] starts one session task.
//! The session resolves the latest height, runs the account enumeration
//! script and then the contract cleanup transaction against a single root
//! view, and reports everything it finds on the returned channel.
//!
//! ```text
//! ResolveHeight ──► RunEnumeration ──► RunCleanup ──► Done
//!       │                 │                 │
//!       └─────────────────┴─────────────────┴──► Error
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use ledgerlens_primitives::{AccountInfo, Address, BlockHeight};
use ledgerlens_view::LayeredView;

use crate::config::FetcherConfig;
use crate::engine::ExecutionEngine;
use crate::error::FetchError;
use crate::ledger::{guarded, LedgerReader, RemoteLedger};
use crate::metered::MeteredReader;
use crate::result::FetchResult;
use crate::scripts::{account_info_script, remove_contracts_transaction};

/// Finds every register of an account by executing code against a remote
/// view of the ledger.
pub struct AccountRegisterFetcher {
    ledger: Arc<dyn RemoteLedger>,
    engine: Arc<dyn ExecutionEngine>,
    config: FetcherConfig,
}

impl AccountRegisterFetcher {
    pub fn new(
        ledger: Arc<dyn RemoteLedger>,
        engine: Arc<dyn ExecutionEngine>,
        config: FetcherConfig,
    ) -> Self {
        Self {
            ledger,
            engine,
            config,
        }
    }

    /// Start a fetch session for `address`.
    ///
    /// Must be called from within a tokio runtime. The receiver yields
    /// `BlockHeight`, then zero or more `Register`, then exactly one of
    /// `StorageUsed` or `Error`, and then closes. Dropping the receiver
    /// stops the session at its next emission.
    pub fn fetch(&self, address: Address, cancel: CancellationToken) -> mpsc::Receiver<FetchResult> {
        let (results, rx) = mpsc::channel(self.config.result_buffer.max(1));
        let session = Session {
            address,
            ledger: Arc::clone(&self.ledger),
            engine: Arc::clone(&self.engine),
            config: self.config.clone(),
            cancel,
            results,
        };
        tokio::spawn(session.run());
        rx
    }
}

struct Session {
    address: Address,
    ledger: Arc<dyn RemoteLedger>,
    engine: Arc<dyn ExecutionEngine>,
    config: FetcherConfig,
    cancel: CancellationToken,
    /// The only strong sender; dropping the session closes the stream.
    results: mpsc::Sender<FetchResult>,
}

impl Session {
    async fn run(self) {
        tracing::info!(address = %self.address, "fetch session started");
        match self.execute().await {
            Ok(()) => {}
            Err(err) if self.consumer_gone(&err) => {
                tracing::debug!(address = %self.address, error = %err, "consumer went away");
            }
            Err(err) => {
                tracing::warn!(address = %self.address, error = %err, "fetch session failed");
                if self.results.send(FetchResult::Error(err)).await.is_err() {
                    tracing::debug!(address = %self.address, "consumer went away before the error");
                }
            }
        }
    }

    /// A failed emission surfaces either as `Disconnected` or, from inside
    /// the engine, as a read failure; a closed stream covers both.
    fn consumer_gone(&self, err: &FetchError) -> bool {
        matches!(err, FetchError::Disconnected) || self.results.is_closed()
    }

    async fn execute(&self) -> Result<(), FetchError> {
        let height = self.resolve_height().await?;
        self.send(FetchResult::BlockHeight(height)).await?;

        let reader = Arc::new(MeteredReader::new(
            LedgerReader::new(
                Arc::clone(&self.ledger),
                Handle::current(),
                height,
                self.config.path_version,
                self.cancel.clone(),
                self.config.request_timeout,
            ),
            self.address,
            &self.results,
        ));
        let view = LayeredView::new(reader.clone());

        let info = self.enumerate(&view).await?;
        tracing::info!(
            address = %self.address,
            height,
            contracts = info.contracts.len(),
            registers = reader.registers_discovered(),
            "enumeration finished"
        );

        self.cleanup(&view, &info.contracts).await?;

        let computed = reader.storage_used();
        tracing::info!(
            address = %self.address,
            storage_used = info.storage_used,
            computed_storage_used = computed,
            "fetch session finished"
        );
        self.send(FetchResult::StorageUsed {
            storage_used: info.storage_used,
            computed_storage_used: computed,
        })
        .await
    }

    async fn resolve_height(&self) -> Result<BlockHeight, FetchError> {
        let height = guarded(
            &self.cancel,
            self.config.request_timeout,
            self.ledger.latest_height(),
        )
        .await
        .map_err(FetchError::BlockHeight)?;
        tracing::debug!(address = %self.address, height, "resolved block height");
        Ok(height)
    }

    async fn enumerate(&self, view: &LayeredView) -> Result<AccountInfo, FetchError> {
        let script = account_info_script(self.address).map_err(FetchError::ScriptBuild)?;
        let engine = Arc::clone(&self.engine);
        let view = view.clone();

        let value = run_blocking(move || engine.run_script(&view, &script))
            .await?
            .map_err(FetchError::ScriptProcess)?
            .map_err(FetchError::ScriptLogic)?;

        AccountInfo::try_from(value).map_err(FetchError::ScriptResult)
    }

    async fn cleanup(&self, view: &LayeredView, contracts: &[String]) -> Result<(), FetchError> {
        let tx = remove_contracts_transaction(self.address, contracts);
        let engine = Arc::clone(&self.engine);
        let view = view.clone();

        run_blocking(move || engine.run_transaction(&view, &tx))
            .await?
            .map_err(FetchError::TransactionProcess)?
            .map_err(FetchError::TransactionLogic)
    }

    async fn send(&self, result: FetchResult) -> Result<(), FetchError> {
        self.results
            .send(result)
            .await
            .map_err(|_| FetchError::Disconnected)
    }
}

/// Run a synchronous engine call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, FetchError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}
