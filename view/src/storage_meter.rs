//! Storage byte meter.
//!
//! Accumulates the ledger storage taken up by the registers observed for
//! one account. Each register is charged
//! `len(value) + len(key) + len(owner) + REGISTER_OVERHEAD_BYTES`, which is
//! the same formula the chain uses for its own `storageUsed` figure, so the
//! two totals can be compared directly.
//!
//! The meter does not deduplicate; callers charge each register once.

use ledgerlens_primitives::{RegisterId, RegisterValue};

/// Fixed per-register bookkeeping overhead, in bytes.
pub const REGISTER_OVERHEAD_BYTES: u64 = 4;

/// Bytes a register occupies in ledger storage.
pub fn register_size(id: &RegisterId, value: &RegisterValue) -> u64 {
    (value.len() as u64)
        .saturating_add(id.key.len() as u64)
        .saturating_add(id.owner.len() as u64)
        .saturating_add(REGISTER_OVERHEAD_BYTES)
}

/// Running storage total for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageMeter {
    used: u64,
    registers: u64,
}

impl StorageMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge one register. Empty values are not charged.
    ///
    /// Returns the number of bytes added to the total.
    pub fn charge(&mut self, id: &RegisterId, value: &RegisterValue) -> u64 {
        if value.is_empty() {
            return 0;
        }
        let size = register_size(id, value);
        self.used = self.used.saturating_add(size);
        self.registers += 1;
        size
    }

    /// Total bytes charged so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Number of registers charged so far.
    pub fn registers(&self) -> u64 {
        self.registers
    }
}
