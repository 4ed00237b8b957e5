//! Fetcher configuration.

use std::time::Duration;

use ledgerlens_primitives::PathVersion;

/// Configuration for an `AccountRegisterFetcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Deadline for each individual remote ledger request.
    pub request_timeout: Duration,

    /// Capacity of the result channel. 1 keeps the producer at most one
    /// message ahead of the consumer.
    pub result_buffer: usize,

    /// Register → ledger path encoding the remote service expects.
    pub path_version: PathVersion,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            result_buffer: 1,
            path_version: PathVersion::V1,
        }
    }
}
