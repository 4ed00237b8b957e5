//! Register → ledger path encoding.
//!
//! The remote ledger indexes registers by a 32-byte path derived from the
//! register id. The derivation is versioned and must stay byte-for-byte
//! compatible with the remote service:
//!
//! - V0: `SHA3-256(owner ++ key)`
//! - V1: `SHA3-256(canonical_key)` where the canonical key is
//!   `"/0/" ++ owner ++ "/2/" ++ key`

use core::fmt;

use sha3::{Digest, Sha3_256};

use crate::types::RegisterId;

/// Length of a ledger path in bytes.
pub const PATH_LEN: usize = 32;

/// Key part type tag for the register owner.
pub const KEY_PART_OWNER: u16 = 0;

/// Key part type tag for the register key.
pub const KEY_PART_KEY: u16 = 2;

/// A 32-byte ledger path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerPath(pub [u8; PATH_LEN]);

impl LedgerPath {
    pub fn as_bytes(&self) -> &[u8; PATH_LEN] {
        &self.0
    }
}

impl fmt::Display for LedgerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Path finder version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathVersion {
    V0,
    #[default]
    V1,
}

/// Canonical form of a register's ledger key: each key part is written as
/// `/<type>/<value>`.
pub fn canonical_key(id: &RegisterId) -> Vec<u8> {
    let parts: [(u16, &[u8]); 2] = [(KEY_PART_OWNER, &id.owner), (KEY_PART_KEY, &id.key)];
    let mut out = Vec::with_capacity(10 * parts.len() + id.owner.len() + id.key.len());
    for (kind, value) in parts {
        out.push(b'/');
        out.extend_from_slice(kind.to_string().as_bytes());
        out.push(b'/');
        out.extend_from_slice(value);
    }
    out
}

/// Derive the ledger path for a register.
pub fn register_path(id: &RegisterId, version: PathVersion) -> LedgerPath {
    let mut hasher = Sha3_256::new();
    match version {
        PathVersion::V0 => {
            hasher.update(&id.owner);
            hasher.update(&id.key);
        }
        PathVersion::V1 => hasher.update(canonical_key(id)),
    }
    LedgerPath(hasher.finalize().into())
}
