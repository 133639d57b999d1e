//! Principal name strings
//!
//! A principal name has the form `name@domain`, where the domain may be
//! empty for local accounts (`alice@`).

use dsec_core::{
    constants::{MAX_PRINCIPAL_LEN, PRINCIPAL_SEPARATOR},
    Error, Result,
};

/// Check whether `name` is a syntactically valid principal
///
/// The local part must be non-empty, the separator must appear exactly once,
/// and the whole string must fit in [`MAX_PRINCIPAL_LEN`] bytes without
/// whitespace.
pub fn is_valid(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_PRINCIPAL_LEN {
        return false;
    }
    if name.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = name.split(PRINCIPAL_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(_domain), None) => !local.is_empty(),
        _ => false,
    }
}

/// Principal name for a local user id
pub fn from_uid(uid: u32) -> Result<String> {
    let user = users::get_user_by_uid(uid)
        .ok_or_else(|| Error::invalid_argument(format!("no user with uid {uid}")))?;
    Ok(format!(
        "{}{PRINCIPAL_SEPARATOR}",
        user.name().to_string_lossy()
    ))
}

/// Principal name for a local group id
pub fn from_gid(gid: u32) -> Result<String> {
    let group = users::get_group_by_gid(gid)
        .ok_or_else(|| Error::invalid_argument(format!("no group with gid {gid}")))?;
    Ok(format!(
        "{}{PRINCIPAL_SEPARATOR}",
        group.name().to_string_lossy()
    ))
}
