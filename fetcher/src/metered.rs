//! Read-through register cache with storage metering.
//!
//! `MeteredReader` sits between the root view and the remote ledger. Each
//! distinct register is fetched at most once per session. The first time a
//! non-empty register owned by the target account is seen, its size is
//! charged to the session's `StorageMeter` and a `FetchResult::Register`
//! is pushed onto the result stream.
//!
//! The reader only holds a weak handle to the result channel. The session
//! task owns the one strong sender, so the stream closes as soon as the
//! session finishes even if an engine keeps a view alive.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use ledgerlens_primitives::{Address, RegisterId, RegisterValue};
use ledgerlens_view::{RegisterReader, StorageMeter, ViewError};

use crate::result::{AccountRegister, FetchResult};

struct FetchSession {
    address: Address,
    cache: HashMap<RegisterId, RegisterValue>,
    meter: StorageMeter,
}

/// Caching, metering `RegisterReader` for one fetch session.
///
/// `read` may block on the result channel, so like `LedgerReader` it must
/// only run on a blocking thread.
pub struct MeteredReader<R> {
    inner: R,
    session: Mutex<FetchSession>,
    results: mpsc::WeakSender<FetchResult>,
}

impl<R: RegisterReader> MeteredReader<R> {
    pub fn new(inner: R, address: Address, results: &mpsc::Sender<FetchResult>) -> Self {
        Self {
            inner,
            session: Mutex::new(FetchSession {
                address,
                cache: HashMap::new(),
                meter: StorageMeter::new(),
            }),
            results: results.downgrade(),
        }
    }

    /// Bytes charged for the target account so far.
    pub fn storage_used(&self) -> u64 {
        self.session.lock().meter.used()
    }

    /// Number of target registers discovered so far.
    pub fn registers_discovered(&self) -> u64 {
        self.session.lock().meter.registers()
    }

    fn emit(&self, id: &RegisterId, register: AccountRegister) -> Result<(), ViewError> {
        let sender = self
            .results
            .upgrade()
            .ok_or_else(|| ViewError::read_failed(id, "result stream closed"))?;
        sender
            .blocking_send(FetchResult::Register(register))
            .map_err(|_| ViewError::read_failed(id, "result stream closed"))
    }
}

impl<R: RegisterReader> RegisterReader for MeteredReader<R> {
    fn read(&self, id: &RegisterId) -> Result<RegisterValue, ViewError> {
        if let Some(value) = self.session.lock().cache.get(id) {
            return Ok(value.clone());
        }

        // Failed reads are not cached; the next read retries the remote.
        let value = self.inner.read(id)?;

        let mut session = self.session.lock();
        if let Some(cached) = session.cache.get(id) {
            return Ok(cached.clone());
        }
        session.cache.insert(id.clone(), value.clone());

        if value.is_empty() || id.owner_address() != session.address {
            return Ok(value);
        }

        let size = session.meter.charge(id, &value);
        tracing::debug!(
            address = %session.address,
            key = %String::from_utf8_lossy(&id.key),
            bytes = size,
            "discovered account register"
        );

        // Sent under the lock so stream order matches discovery order.
        self.emit(
            id,
            AccountRegister {
                address: session.address,
                key: id.key.clone(),
                value: value.clone(),
            },
        )?;
        Ok(value)
    }
}
