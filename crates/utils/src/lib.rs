//! Shared utilities for dsec
//!
//! Currently this is the tracing setup used by the binary and the span
//! helpers used by the library crates.

pub mod tracing;
