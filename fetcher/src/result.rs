//! Messages produced by a fetch session.

use ledgerlens_primitives::{Address, BlockHeight, RegisterValue};

use crate::error::FetchError;

/// One register discovered in the target account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRegister {
    pub address: Address,
    pub key: Vec<u8>,
    pub value: RegisterValue,
}

/// A message on a fetch session's result stream.
///
/// Order on the stream: `BlockHeight` first, then `Register` messages in
/// the order the registers were first read, then exactly one of
/// `StorageUsed` or `Error`.
#[derive(Debug)]
pub enum FetchResult {
    /// Height every register was read at.
    BlockHeight(BlockHeight),
    /// A non-empty register owned by the target account.
    Register(AccountRegister),
    /// Declared storage usage against the bytes actually observed.
    StorageUsed {
        storage_used: u64,
        computed_storage_used: u64,
    },
    /// The session failed; nothing follows.
    Error(FetchError),
}

impl FetchResult {
    /// Whether this message ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::StorageUsed { .. } | Self::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_messages() {
        assert!(!FetchResult::BlockHeight(1).is_terminal());
        assert!(!FetchResult::Register(AccountRegister {
            address: Address::ZERO,
            key: b"k".to_vec(),
            value: b"v".to_vec(),
        })
        .is_terminal());
        assert!(FetchResult::StorageUsed {
            storage_used: 1,
            computed_storage_used: 1,
        }
        .is_terminal());
        assert!(FetchResult::Error(FetchError::Disconnected).is_terminal());
    }
}
