//! Error types for p2pd-client

use thiserror::Error;

/// Result type for daemon client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the p2p daemon
#[derive(Debug, Error)]
pub enum Error {
    /// IO error (socket read/write/accept)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Protobuf decoding error
    #[error("Protobuf error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// Framing or message-shape violation on the control protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The daemon answered with an ERROR response
    #[error("Daemon error: {0}")]
    Daemon(String),

    /// Failed to reach an endpoint, or the endpoint multiaddr is unusable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Caller-side precondition violation; no daemon round trip was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation attempted after `Client::close`
    #[error("Client is closed")]
    Closed,

    /// Daemon subprocess error
    #[error("Daemon process error: {0}")]
    Process(String),

    /// Timeout while waiting on the daemon process
    #[error("Operation timed out")]
    Timeout,
}
