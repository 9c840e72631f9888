//! Error types for berth-alloc.

use thiserror::Error;

use berth_transport::{NodeId, TransportError};

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of one allocation attempt.
///
/// Exactly one of these (or one node-ID) comes back per invocation; no
/// error is retried or swallowed internally. Note that an idle bus is
/// not a failure - silence just means every ID is free.
#[derive(Debug, Error)]
pub enum Error {
    /// The attempt was misconfigured; nothing was observed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The transport failed to open or faulted during observation.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Every claimable ID in `[min, max]` was observed as in use.
    #[error("address space exhausted: no free node-ID in [{min}, {max}]")]
    AddressSpaceExhausted { min: NodeId, max: NodeId },
}
