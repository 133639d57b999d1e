//! Error types and result codes for dsec operations

mod builders;
pub mod codes;
mod conversions;
mod types;

pub use types::{Error, Result};
