//! Shared test helpers for integration tests.
//!
//! Provides a scripted in-memory execution engine with failure injection,
//! remote ledger fixtures, and helpers to drive a fetch session to its end.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use ledgerlens_fetcher::{
    AccountRegisterFetcher, ExecutionEngine, FetchResult, FetcherConfig, LedgerError,
    MemLedger, ProcedureError, RemoteLedger, Script, ScriptResult, TransactionBody,
    TransactionResult,
};
use ledgerlens_primitives::{
    register_path, AccountInfo, Address, BlockHeight, LedgerPath, PathVersion, RegisterId,
    RegisterValue, Value,
};
use ledgerlens_view::RegisterView;

// ── Accounts ──

/// The account every test fetches.
pub const TARGET: Address = Address::new([0, 0, 0, 0, 0, 0, 0, 0x01]);

/// An unrelated account the engine also touches.
pub const OTHER: Address = Address::new([0, 0, 0, 0, 0, 0, 0, 0x02]);

pub fn target_register(key: &str) -> RegisterId {
    RegisterId::account(&TARGET, key.as_bytes().to_vec())
}

pub fn other_register(key: &str) -> RegisterId {
    RegisterId::account(&OTHER, key.as_bytes().to_vec())
}

/// Register holding the code of a deployed contract.
pub fn code_key(contract: &str) -> String {
    format!("code.{contract}")
}

// ── Scripted Engine ──

/// Where the scripted engine should fail, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Failure {
    #[default]
    None,
    /// The script runs its reads, then reports a logic error.
    ScriptLogic,
    /// The script runs its reads, then the engine gives up.
    ScriptProcess,
    /// The script returns something other than an AccountInfo.
    ScriptResultShape,
    /// The transaction runs its reads, then reports a logic error.
    TransactionLogic,
    /// The transaction runs its reads, then the engine gives up.
    TransactionProcess,
    /// The engine panics inside the script.
    Panic,
}

/// Deterministic stand-in for a real execution engine.
///
/// The script reads each of `keys` from the target account through a
/// child view and then again through the root, touches one register of
/// `OTHER`, and returns an `AccountInfo` built from `storage_used` and
/// `contracts`. The transaction reads each contract's code register,
/// removes it in a child view and merges the child back.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    pub keys: Vec<String>,
    pub storage_used: u64,
    pub contracts: Vec<String>,
    pub failure: Failure,
    scripts: AtomicUsize,
    transactions: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(keys: &[&str], storage_used: u64, contracts: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            storage_used,
            contracts: contracts.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    pub fn scripts_run(&self) -> usize {
        self.scripts.load(Ordering::SeqCst)
    }

    pub fn transactions_run(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }
}

impl ExecutionEngine for ScriptedEngine {
    fn run_script(&self, view: &dyn RegisterView, script: &Script) -> ScriptResult {
        self.scripts.fetch_add(1, Ordering::SeqCst);
        assert_eq!(script.arguments.len(), 1, "script takes the address argument");

        let owner = TARGET.as_bytes();
        for key in &self.keys {
            let child = view.new_child();
            child.get(owner, key.as_bytes())?;
            view.get(owner, key.as_bytes())?;
        }
        view.get(OTHER.as_bytes(), b"storage")?;

        match self.failure {
            Failure::ScriptLogic => {
                return Ok(Err(ProcedureError::new(1101, "cannot find declaration")));
            }
            Failure::ScriptProcess => {
                return Err(anyhow::anyhow!("interpreter crashed").into());
            }
            Failure::ScriptResultShape => return Ok(Ok(Value::Bool(true))),
            Failure::Panic => panic!("engine bug"),
            Failure::None | Failure::TransactionLogic | Failure::TransactionProcess => {}
        }

        Ok(Ok(Value::from(AccountInfo {
            storage_used: self.storage_used,
            contracts: self.contracts.clone(),
        })))
    }

    fn run_transaction(&self, view: &dyn RegisterView, tx: &TransactionBody) -> TransactionResult {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        assert_eq!(tx.authorizers, vec![TARGET]);

        let owner = TARGET.as_bytes();
        let child = view.new_child();
        for contract in &self.contracts {
            assert!(
                tx.script.contains(&format!("import {contract} from")),
                "transaction imports {contract}"
            );
            let key = code_key(contract);
            child.get(owner, key.as_bytes())?;
            child.delete(owner, key.as_bytes())?;
        }

        match self.failure {
            Failure::TransactionLogic => {
                return Ok(Err(ProcedureError::new(1103, "contract removal failed")));
            }
            Failure::TransactionProcess => {
                return Err(anyhow::anyhow!("tx engine crashed").into());
            }
            _ => {}
        }

        view.merge_view(child.as_ref())?;
        Ok(Ok(()))
    }
}

// ── Ledger Fixtures ──

/// A `MemLedger` holding the given target-account registers.
pub fn ledger_with(height: BlockHeight, registers: &[(&str, &str)]) -> MemLedger {
    let mut ledger = MemLedger::new(height);
    for (key, value) in registers {
        ledger.insert(&target_register(key), value.as_bytes().to_vec());
    }
    ledger.insert(&other_register("storage"), b"not ours".to_vec());
    ledger
}

/// Ledger whose height lookup always fails.
pub struct UnreachableLedger;

#[async_trait]
impl RemoteLedger for UnreachableLedger {
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError> {
        Err(LedgerError::request("connection refused"))
    }

    async fn register_values(
        &self,
        _height: BlockHeight,
        _paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError> {
        Err(LedgerError::request("connection refused"))
    }
}

/// Ledger that answers the height but never answers register reads.
pub struct StalledReads {
    pub height: BlockHeight,
}

#[async_trait]
impl RemoteLedger for StalledReads {
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError> {
        Ok(self.height)
    }

    async fn register_values(
        &self,
        _height: BlockHeight,
        _paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError> {
        std::future::pending().await
    }
}

/// Ledger that never answers anything.
pub struct StalledLedger;

#[async_trait]
impl RemoteLedger for StalledLedger {
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError> {
        std::future::pending().await
    }

    async fn register_values(
        &self,
        _height: BlockHeight,
        _paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError> {
        std::future::pending().await
    }
}

/// Ledger that answers the height but fails every register read.
pub struct FailingReads {
    pub height: BlockHeight,
}

#[async_trait]
impl RemoteLedger for FailingReads {
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError> {
        Ok(self.height)
    }

    async fn register_values(
        &self,
        _height: BlockHeight,
        _paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError> {
        Err(LedgerError::request("archive unavailable"))
    }
}

/// Ledger that serves `inner` but fails any request touching one of the
/// given target registers.
pub struct FailingPaths {
    pub inner: MemLedger,
    pub failing: Vec<LedgerPath>,
}

impl FailingPaths {
    pub fn new(inner: MemLedger, keys: &[&str]) -> Self {
        let failing = keys
            .iter()
            .map(|key| register_path(&target_register(key), PathVersion::V1))
            .collect();
        Self { inner, failing }
    }
}

#[async_trait]
impl RemoteLedger for FailingPaths {
    async fn latest_height(&self) -> Result<BlockHeight, LedgerError> {
        self.inner.latest_height().await
    }

    async fn register_values(
        &self,
        height: BlockHeight,
        paths: &[LedgerPath],
    ) -> Result<Vec<RegisterValue>, LedgerError> {
        if paths.iter().any(|path| self.failing.contains(path)) {
            return Err(LedgerError::request("archive unavailable"));
        }
        self.inner.register_values(height, paths).await
    }
}

// ── Session Helpers ──

pub fn fetcher(ledger: Arc<dyn RemoteLedger>, engine: Arc<dyn ExecutionEngine>) -> AccountRegisterFetcher {
    AccountRegisterFetcher::new(ledger, engine, FetcherConfig::default())
}

/// Config with a short request deadline.
pub fn fast_config() -> FetcherConfig {
    FetcherConfig {
        request_timeout: Duration::from_millis(100),
        ..FetcherConfig::default()
    }
}

/// Run one session to completion and collect every message.
pub async fn collect(fetcher: &AccountRegisterFetcher, address: Address) -> Vec<FetchResult> {
    collect_with(fetcher, address, CancellationToken::new()).await
}

pub async fn collect_with(
    fetcher: &AccountRegisterFetcher,
    address: Address,
    cancel: CancellationToken,
) -> Vec<FetchResult> {
    let mut rx = fetcher.fetch(address, cancel);
    let mut out = Vec::new();
    while let Some(result) = rx.recv().await {
        out.push(result);
    }
    out
}

/// Keys of the `Register` messages, in stream order.
pub fn register_keys(results: &[FetchResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| match r {
            FetchResult::Register(reg) => Some(String::from_utf8_lossy(&reg.key).into_owned()),
            _ => None,
        })
        .collect()
}

/// Exactly one terminal message, and it is the last one.
pub fn assert_single_terminal(results: &[FetchResult]) {
    let terminal = results.iter().filter(|r| r.is_terminal()).count();
    assert_eq!(terminal, 1, "got {results:?}");
    assert!(results.last().is_some_and(FetchResult::is_terminal));
}

/// The terminal error message, if the session failed.
pub fn error_message(results: &[FetchResult]) -> Option<String> {
    match results.last() {
        Some(FetchResult::Error(err)) => Some(err.to_string()),
        _ => None,
    }
}
