//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for dsec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dsec operations
///
/// Callers of the capability operations must treat every variant as a
/// denial: no capability bit is ever granted alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input supplied by the caller
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// No usable address is configured for the peer
    #[error("{peer} is unreachable: {message}")]
    Unreachable { peer: String, message: String },

    /// The session to the peer could not be opened
    #[error("failed to connect to '{path}': {source}")]
    ConnectFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A call on an open session failed before a reply arrived
    #[error("transport call '{operation}' failed: {source}")]
    Transport {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The peer closed the call without a reply
    #[error("no reply to '{operation}'")]
    NoReply { operation: String },

    /// The peer answered with a non-zero status
    #[error("'{operation}' failed remotely with status {status}")]
    RemoteFailure { operation: String, status: i32 },

    /// A reply decoded but did not have the expected shape
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}
