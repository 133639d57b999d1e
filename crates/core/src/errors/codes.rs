//! Numeric result codes
//!
//! Every [`Error`](super::Error) maps onto one of these negative codes through
//! [`Error::code`](super::Error::code). A remote failure keeps the status the
//! peer reported instead.

use super::types::Error;

pub const SUCCESS: i32 = 0;
pub const NO_PERM: i32 = -1001;
pub const INVAL: i32 = -1003;
pub const UNREACH: i32 = -1006;
pub const NOMEM: i32 = -1009;
pub const PROTO: i32 = -1014;
pub const MISC: i32 = -1025;
pub const BADPATH: i32 = -1026;
pub const NOREPLY: i32 = -1036;

impl Error {
    /// Result code for this error
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument { .. } | Error::Configuration { .. } => INVAL,
            Error::Unreachable { .. } => UNREACH,
            Error::ConnectFailed { .. } | Error::FileSystem { .. } => BADPATH,
            Error::Transport { .. } => MISC,
            Error::NoReply { .. } => NOREPLY,
            Error::RemoteFailure { status, .. } => *status,
            Error::Protocol { .. } => PROTO,
        }
    }
}
