//! Access control for dsec resources
//!
//! This crate holds the data model for ACLs attached to pools and
//! containers, the text format used to write ACL entries by hand, and the
//! resolver that turns an ACL plus an identity into an effective permission
//! set.

pub mod ace;
pub mod acl;
pub mod ownership;
pub mod permissions;
pub mod principal;
pub mod resolver;

pub use ace::{AccessTypes, Ace, AceFlags, Principal, PrincipalType};
pub use acl::Acl;
pub use ownership::{Identity, Ownership};
pub use permissions::Permissions;
pub use resolver::{resolve_permissions, ResolvedPermissions};
