//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unreachable peer error
    #[must_use]
    pub fn unreachable(peer: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Unreachable {
            peer: peer.into(),
            message: message.into(),
        }
    }

    /// Create a connection failure error
    #[must_use]
    pub fn connect_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::ConnectFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a transport call error
    #[must_use]
    pub fn transport(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Create a missing reply error
    #[must_use]
    pub fn no_reply(operation: impl Into<String>) -> Self {
        Error::NoReply {
            operation: operation.into(),
        }
    }

    /// Create a remote failure error carrying the peer's status verbatim
    #[must_use]
    pub fn remote_failure(operation: impl Into<String>, status: i32) -> Self {
        Error::RemoteFailure {
            operation: operation.into(),
            status,
        }
    }

    /// Create a protocol violation error
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
