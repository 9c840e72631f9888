//! Error types for berth-transport.

use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while opening or observing a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport expression names a kind with no driver.
    #[error("unsupported transport: {0}")]
    Unsupported(String),

    /// The transport expression could not be parsed.
    #[error("malformed transport expression: {0}")]
    Malformed(String),

    /// Socket-level failure while opening or receiving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying link shut down while observing.
    #[error("transport closed")]
    Closed,
}
