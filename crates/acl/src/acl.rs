//! Access control lists

use crate::ace::{Ace, Principal};
use dsec_core::{Error, Result};
use std::collections::HashSet;

/// An ordered set of access control entries
///
/// Entries are kept grouped by principal type in the order owner, named
/// users, owner group, named groups, everyone. Within a type, entries keep
/// the order they were added in. At most one entry exists per principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acl {
    entries: Vec<Ace>,
}

impl Acl {
    /// An ACL with no entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an ACL from entries in any order
    ///
    /// A later entry for the same principal replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = Ace>) -> Self {
        let mut acl = Self::new();
        for ace in entries {
            acl.add_ace(ace);
        }
        acl
    }

    /// Insert an entry, replacing any existing entry for the same principal
    pub fn add_ace(&mut self, ace: Ace) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|existing| existing.principal == ace.principal)
        {
            *existing = ace;
            return;
        }

        let kind = ace.principal.principal_type();
        let position = self
            .entries
            .iter()
            .position(|existing| existing.principal.principal_type() > kind)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, ace);
    }

    /// Remove the entry for `principal`
    pub fn remove_ace(&mut self, principal: &Principal) -> Result<Ace> {
        let position = self
            .entries
            .iter()
            .position(|ace| &ace.principal == principal)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "no {} entry{} in ACL",
                    principal.principal_type(),
                    principal
                        .name()
                        .map(|name| format!(" for '{name}'"))
                        .unwrap_or_default()
                ))
            })?;
        Ok(self.entries.remove(position))
    }

    pub fn get_ace(&self, principal: &Principal) -> Option<&Ace> {
        self.entries.iter().find(|ace| &ace.principal == principal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ace> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that the ACL is well formed
    ///
    /// Every entry must be valid on its own, no principal may appear twice,
    /// and entries must be in principal type order.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut previous = None;

        for ace in &self.entries {
            ace.validate()?;

            if !seen.insert(&ace.principal) {
                return Err(Error::invalid_argument(format!(
                    "duplicate {} entry in ACL",
                    ace.principal.principal_type()
                )));
            }

            let kind = ace.principal.principal_type();
            if previous.is_some_and(|prev| prev > kind) {
                return Err(Error::invalid_argument("ACL entries are out of order"));
            }
            previous = Some(kind);
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Acl {
    type Item = &'a Ace;
    type IntoIter = std::slice::Iter<'a, Ace>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Ace> for Acl {
    fn from_iter<I: IntoIterator<Item = Ace>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
impl Acl {
    /// Build an ACL without reordering or deduplicating, for validation tests
    pub(crate) fn from_raw(entries: Vec<Ace>) -> Self {
        Self { entries }
    }
}
