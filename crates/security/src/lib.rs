//! Credential handling and capability derivation
//!
//! The client side asks the local agent for a signed credential. The server
//! side has the local validator check a credential, resolves the resulting
//! identity against a resource ACL, and turns the permissions into the
//! capability bits the rest of the system checks.
//!
//! Every failure is a denial: no capability bit is returned alongside an
//! error.

pub mod capabilities;
pub mod client;
pub mod validator;
pub mod wire;

pub use capabilities::{
    container_capabilities_for, pool_capabilities_for, ContainerCapabilities, ContainerFlags,
    PoolCapabilities, PoolFlags,
};
pub use client::CredentialClient;
pub use validator::CredentialValidator;
pub use wire::{AuthSys, Credential, Flavor, Token};

#[cfg(test)]
pub(crate) mod mock;
