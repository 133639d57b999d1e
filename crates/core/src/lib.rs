//! Core error types and constants for the `dsec` authorization workspace.
//!
//! Every other crate in the workspace reports failures through the [`Error`]
//! enum defined here, so that a caller sees one taxonomy whether a check
//! failed on bad input, on the local transport, or on a malformed reply.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum, the `Result` alias and the numeric
//!   result codes returned by [`Error::code`].
//! - **`constants`**: well-known socket addresses, environment variable names
//!   and protocol limits shared by the other crates.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{codes, Error, Result},
};
