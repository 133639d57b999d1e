//! Unix socket transport
//!
//! Each envelope is one line of JSON. The body travels base64-encoded inside
//! the envelope.

use crate::session::{Connector, Session};
use crate::types::{Call, Response};
use dsec_core::{Error, Result};
use dsec_utils::tracing::drpc_span;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest reply line accepted from a peer, newline included
pub const MAX_REPLY_LEN: u64 = 1 << 20;

/// Connects to local Unix sockets
#[derive(Debug, Clone, Default)]
pub struct UnixConnector {
    timeout: Option<Duration>,
}

impl UnixConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `timeout` to every read and write on sessions opened later
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Connector for UnixConnector {
    type Session = UnixSession;

    fn connect(&self, path: &Path) -> Result<UnixSession> {
        let stream = UnixStream::connect(path).map_err(|e| Error::connect_failed(path, e))?;

        stream
            .set_read_timeout(self.timeout)
            .and_then(|()| stream.set_write_timeout(self.timeout))
            .map_err(|e| Error::connect_failed(path, e))?;

        debug!(path = %path.display(), "opened drpc session");
        Ok(UnixSession {
            stream,
            path: path.to_path_buf(),
        })
    }
}

/// An open connection to a local socket
#[derive(Debug)]
pub struct UnixSession {
    stream: UnixStream,
    path: PathBuf,
}

impl UnixSession {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Session for UnixSession {
    fn call(&mut self, call: &Call) -> Result<Option<Response>> {
        let _span = drpc_span(call.module, call.method).entered();
        let operation = format!("module {} method {}", call.module, call.method);

        let mut line = serde_json::to_string(call)
            .map_err(|e| Error::protocol(format!("failed to encode call: {e}")))?;
        line.push('\n');

        (&self.stream)
            .write_all(line.as_bytes())
            .and_then(|()| (&self.stream).flush())
            .map_err(|e| Error::transport(&operation, e))?;

        let mut reply = String::new();
        let read = BufReader::new((&self.stream).take(MAX_REPLY_LEN))
            .read_line(&mut reply)
            .map_err(|e| Error::transport(&operation, e))?;
        if read == 0 {
            debug!(%operation, "peer closed session without replying");
            return Ok(None);
        }
        if !reply.ends_with('\n') && read as u64 >= MAX_REPLY_LEN {
            warn!(%operation, limit = MAX_REPLY_LEN, "reply too long");
            return Err(Error::protocol(format!(
                "reply to {operation} exceeds {MAX_REPLY_LEN} bytes"
            )));
        }

        let response: Response = serde_json::from_str(reply.trim_end())
            .map_err(|e| Error::protocol(format!("malformed reply to {operation}: {e}")))?;

        if response.sequence != call.sequence {
            warn!(
                expected = call.sequence,
                received = response.sequence,
                "reply sequence mismatch"
            );
            return Err(Error::protocol(format!(
                "reply sequence {} does not match call sequence {}",
                response.sequence, call.sequence
            )));
        }

        debug!(
            %operation,
            status = ?response.status,
            body_len = response.body.len(),
            "drpc call completed"
        );
        Ok(Some(response))
    }
}

impl Drop for UnixSession {
    fn drop(&mut self) {
        // Best effort; the peer may already be gone
        let _ = self.stream.shutdown(Shutdown::Both);
        debug!(path = %self.path.display(), "closed drpc session");
    }
}
