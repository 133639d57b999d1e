//! Local request/response transport
//!
//! Calls are addressed by a module id and a method id and carry an opaque
//! body. A [`Connector`] opens a [`Session`] to a local socket; dropping the
//! session closes it.

pub mod ids;
pub mod session;
pub mod types;
pub mod unix;

pub use session::{Connector, Session};
pub use types::{Call, Response, ResponseStatus};
pub use unix::{UnixConnector, UnixSession, MAX_REPLY_LEN};
