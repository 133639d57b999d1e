//! Transport seam
//!
//! The credential flows only ever talk to these traits, which keeps them
//! testable without a live agent or server.

use crate::types::{Call, Response};
use dsec_core::Result;
use std::path::Path;

/// Opens sessions to a local socket
pub trait Connector {
    type Session: Session;

    /// Open a session to the socket at `path`
    fn connect(&self, path: &Path) -> Result<Self::Session>;
}

/// An open session; dropping it closes the connection
pub trait Session {
    /// Send `call` and wait for its reply
    ///
    /// `Ok(None)` means the peer closed the call without replying.
    fn call(&mut self, call: &Call) -> Result<Option<Response>>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Session = C::Session;

    fn connect(&self, path: &Path) -> Result<Self::Session> {
        (**self).connect(path)
    }
}
