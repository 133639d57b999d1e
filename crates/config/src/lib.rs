//! Configuration for dsec
//!
//! This crate resolves the local socket addresses of the credential-issuing
//! agent and the credential-validating server, plus transport settings.

pub mod config;

pub use config::*;
