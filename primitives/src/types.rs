//! Core types and constants shared by the view and the fetcher.
//!
//! Registers are addressed by an `(owner, key)` pair of raw byte strings.
//! Keys are not guaranteed to be UTF-8 (internal keys start with `$` and
//! carry binary suffixes), so both halves are kept as bytes.

use core::fmt;

use crate::error::PrimitiveError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 8;

/// Block height on the remote ledger.
pub type BlockHeight = u64;

/// Opaque register contents. An empty value means "absent".
pub type RegisterValue = Vec<u8>;

/// Fixed-width account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a hex address, with or without a `0x` prefix.
    ///
    /// Odd-length input is left-padded with a zero nibble and short input
    /// is left-padded with zero bytes, so `"0x1"` is a valid address.
    pub fn from_hex(input: &str) -> Result<Self, PrimitiveError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let padded;
        let digits = if digits.len() % 2 == 1 {
            padded = format!("0{digits}");
            padded.as_str()
        } else {
            digits
        };

        let bytes = hex::decode(digits)
            .map_err(|e| PrimitiveError::InvalidAddress(format!("{input:?}: {e}")))?;
        if bytes.len() > ADDRESS_LEN {
            return Err(PrimitiveError::InvalidAddress(format!(
                "{input:?}: expected at most {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self::from_owner(&bytes))
    }

    /// Derive an address from a register owner.
    ///
    /// Keeps the right-most `ADDRESS_LEN` bytes; shorter owners are
    /// left-padded with zeroes. An empty owner maps to `Address::ZERO`.
    pub fn from_owner(owner: &[u8]) -> Self {
        let mut out = [0u8; ADDRESS_LEN];
        let take = owner.len().min(ADDRESS_LEN);
        out[ADDRESS_LEN - take..].copy_from_slice(&owner[owner.len() - take..]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Hex rendering with a `0x` prefix, e.g. `0x1654653399040a61`.
    pub fn hex_with_prefix(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

/// Identifies one register slot on the remote ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegisterId {
    pub owner: Vec<u8>,
    pub key: Vec<u8>,
}

impl RegisterId {
    pub fn new(owner: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            owner: owner.into(),
            key: key.into(),
        }
    }

    /// A register owned by an account address.
    pub fn account(address: &Address, key: impl Into<Vec<u8>>) -> Self {
        Self::new(address.as_bytes().to_vec(), key)
    }

    /// The account this register belongs to.
    pub fn owner_address(&self) -> Address {
        Address::from_owner(&self.owner)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}~{}",
            hex::encode(&self.owner),
            String::from_utf8_lossy(&self.key)
        )
    }
}
