//! Resource ownership and the identity being checked against it

use crate::principal;
use dsec_core::{Error, Result};

/// Owning user and group of a pool or container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub user: String,
    pub group: String,
}

impl Ownership {
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }

    /// Both owner names must be valid principals
    pub fn validate(&self) -> Result<()> {
        if !principal::is_valid(&self.user) {
            return Err(Error::invalid_argument(format!(
                "invalid owner user '{}'",
                self.user
            )));
        }
        if !principal::is_valid(&self.group) {
            return Err(Error::invalid_argument(format!(
                "invalid owner group '{}'",
                self.group
            )));
        }
        Ok(())
    }
}

/// A resolved principal: one user and the groups it belongs to
///
/// Built fresh for each authorization check and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub groups: Vec<String>,
}

impl Identity {
    pub fn new<I, S>(user: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user: user.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.user.is_empty() {
            return Err(Error::invalid_argument("identity has no user"));
        }
        Ok(())
    }
}
