//! Effective permission resolution
//!
//! Walks an ACL for one identity using a fixed precedence: the owner entry,
//! then a named user entry, then the union of all matching group entries,
//! then the everyone entry. The first step that matches decides the result.
//! The owner additionally receives a resource-defined permission floor.

use crate::{
    ace::Principal,
    acl::Acl,
    ownership::{Identity, Ownership},
    permissions::Permissions,
};
use dsec_core::Result;
use tracing::debug;

/// Outcome of resolving an identity against an ACL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPermissions {
    pub perms: Permissions,
    pub is_owner: bool,
}

/// Which precedence step produced the permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matched {
    Owner,
    User,
    Groups,
    Everyone,
    Nothing,
}

/// Compute the permissions `identity` holds on a resource
///
/// An absent ACL grants nothing beyond `owner_min_perms`. Fails only when
/// `ownership` or `identity` is malformed, before the ACL is consulted.
pub fn resolve_permissions(
    acl: Option<&Acl>,
    ownership: &Ownership,
    identity: &Identity,
    owner_min_perms: Permissions,
) -> Result<ResolvedPermissions> {
    ownership.validate()?;
    identity.validate()?;

    let is_owner = identity.user == ownership.user;

    let (mut perms, matched) = match acl {
        Some(acl) => walk(acl, ownership, identity, is_owner),
        None => (Permissions::empty(), Matched::Nothing),
    };

    if is_owner {
        perms |= owner_min_perms;
    }

    debug!(
        user = %identity.user,
        is_owner,
        matched = ?matched,
        perms = %perms,
        "resolved ACL permissions"
    );

    Ok(ResolvedPermissions { perms, is_owner })
}

fn walk(
    acl: &Acl,
    ownership: &Ownership,
    identity: &Identity,
    is_owner: bool,
) -> (Permissions, Matched) {
    if is_owner {
        if let Some(perms) = granted(acl, &Principal::Owner) {
            return (perms, Matched::Owner);
        }
    }

    if let Some(perms) = granted(acl, &Principal::User(identity.user.clone())) {
        return (perms, Matched::User);
    }

    if let Some(perms) = group_permissions(acl, ownership, identity) {
        return (perms, Matched::Groups);
    }

    match granted(acl, &Principal::Everyone) {
        Some(perms) => (perms, Matched::Everyone),
        None => (Permissions::empty(), Matched::Nothing),
    }
}

/// Union of the owner-group entry and every named group entry the identity
/// belongs to, or `None` if none of them apply
fn group_permissions(acl: &Acl, ownership: &Ownership, identity: &Identity) -> Option<Permissions> {
    let owner_group = identity
        .is_member_of(&ownership.group)
        .then(|| granted(acl, &Principal::OwnerGroup))
        .flatten();

    let named = acl.iter().filter_map(|ace| match &ace.principal {
        Principal::Group(name) if identity.is_member_of(name) => ace.granted(),
        _ => None,
    });

    owner_group
        .into_iter()
        .chain(named)
        .reduce(|acc, perms| acc | perms)
}

fn granted(acl: &Acl, principal: &Principal) -> Option<Permissions> {
    acl.get_ace(principal).and_then(|ace| ace.granted())
}
