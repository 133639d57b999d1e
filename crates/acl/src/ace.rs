//! Access control entries
//!
//! An entry names one principal and the permissions granted (or audited, or
//! alarmed) for it. Entries have a compact text form,
//! `access:flags:principal:perms`, for example `A::OWNER@:rw` or
//! `A:G:staff@:r`.

use crate::{permissions::Permissions, principal};
use bitflags::bitflags;
use dsec_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

const OWNER_TEXT: &str = "OWNER@";
const OWNER_GROUP_TEXT: &str = "GROUP@";
const EVERYONE_TEXT: &str = "EVERYONE@";

/// Kind of principal an entry applies to, in ACL storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrincipalType {
    Owner,
    User,
    OwnerGroup,
    Group,
    Everyone,
}

/// Principal an entry applies to
///
/// Only the named variants carry a principal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    /// Whoever owns the resource
    Owner,
    /// A named user
    User(String),
    /// Members of the owning group
    OwnerGroup,
    /// Members of a named group
    Group(String),
    /// Anyone not matched by a more specific entry
    Everyone,
}

impl Principal {
    pub fn principal_type(&self) -> PrincipalType {
        match self {
            Principal::Owner => PrincipalType::Owner,
            Principal::User(_) => PrincipalType::User,
            Principal::OwnerGroup => PrincipalType::OwnerGroup,
            Principal::Group(_) => PrincipalType::Group,
            Principal::Everyone => PrincipalType::Everyone,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Principal::User(name) | Principal::Group(name) => Some(name),
            Principal::Owner | Principal::OwnerGroup | Principal::Everyone => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Principal::OwnerGroup | Principal::Group(_))
    }

    fn text(&self) -> &str {
        match self {
            Principal::Owner => OWNER_TEXT,
            Principal::OwnerGroup => OWNER_GROUP_TEXT,
            Principal::Everyone => EVERYONE_TEXT,
            Principal::User(name) | Principal::Group(name) => name,
        }
    }

    fn parse(text: &str, group: bool) -> Result<Self> {
        let principal = match (text, group) {
            (OWNER_GROUP_TEXT, true) => Principal::OwnerGroup,
            (OWNER_TEXT, false) => Principal::Owner,
            (EVERYONE_TEXT, false) => Principal::Everyone,
            (OWNER_TEXT | EVERYONE_TEXT, true) => {
                return Err(Error::invalid_argument(format!(
                    "'{text}' cannot carry the group flag"
                )))
            }
            (OWNER_GROUP_TEXT, false) => {
                return Err(Error::invalid_argument(
                    "the owner group requires the group flag",
                ))
            }
            (name, true) => Principal::Group(name.to_string()),
            (name, false) => Principal::User(name.to_string()),
        };

        if let Some(name) = principal.name() {
            if !principal::is_valid(name) {
                return Err(Error::invalid_argument(format!(
                    "'{name}' is not a valid principal"
                )));
            }
        }
        Ok(principal)
    }
}

bitflags! {
    /// What an entry does when it matches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessTypes: u8 {
        const ALLOW = 1 << 0;
        const AUDIT = 1 << 1;
        const ALARM = 1 << 2;
    }
}

bitflags! {
    /// Modifiers on an entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AceFlags: u16 {
        /// Audit or alarm on successful access
        const SUCCESS = 1 << 0;
        /// Audit or alarm on failed access
        const FAIL = 1 << 1;
        /// Entry is inherited by containers created in the pool
        const POOL_INHERIT = 1 << 2;
    }
}

const ACCESS_LETTERS: [(char, AccessTypes); 3] = [
    ('A', AccessTypes::ALLOW),
    ('U', AccessTypes::AUDIT),
    ('L', AccessTypes::ALARM),
];

const GROUP_LETTER: char = 'G';

const FLAG_LETTERS: [(char, AceFlags); 3] = [
    ('S', AceFlags::SUCCESS),
    ('F', AceFlags::FAIL),
    ('P', AceFlags::POOL_INHERIT),
];

/// A single access control entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ace {
    pub principal: Principal,
    pub access: AccessTypes,
    pub flags: AceFlags,
    pub allow_perms: Permissions,
    pub audit_perms: Permissions,
    pub alarm_perms: Permissions,
}

impl Ace {
    /// Entry for `principal` with no access types and no permissions
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            access: AccessTypes::empty(),
            flags: AceFlags::empty(),
            allow_perms: Permissions::empty(),
            audit_perms: Permissions::empty(),
            alarm_perms: Permissions::empty(),
        }
    }

    /// Entry allowing `perms` to `principal`
    pub fn allow(principal: Principal, perms: Permissions) -> Self {
        Self {
            access: AccessTypes::ALLOW,
            allow_perms: perms,
            ..Self::new(principal)
        }
    }

    /// Permissions this entry grants, if it is an allow entry
    pub fn granted(&self) -> Option<Permissions> {
        self.access
            .contains(AccessTypes::ALLOW)
            .then_some(self.allow_perms)
    }

    /// Check the structural rules for a single entry
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.principal.name() {
            if !principal::is_valid(name) {
                return Err(Error::invalid_argument(format!(
                    "'{name}' is not a valid principal"
                )));
            }
        }

        if self.access.is_empty() {
            return Err(Error::invalid_argument(format!(
                "entry for {} has no access type",
                self.principal.text()
            )));
        }

        for (access, perms) in self.perms_by_access() {
            if perms.has_unknown_bits() {
                return Err(Error::invalid_argument(format!(
                    "entry for {} has unknown permission bits {:#x}",
                    self.principal.text(),
                    perms.bits()
                )));
            }
            if !self.access.contains(access) && !perms.is_empty() {
                return Err(Error::invalid_argument(format!(
                    "entry for {} sets permissions for an access type it does not have",
                    self.principal.text()
                )));
            }
        }

        let logs = self.access.intersects(AccessTypes::AUDIT | AccessTypes::ALARM);
        if logs && !self.flags.intersects(AceFlags::SUCCESS | AceFlags::FAIL) {
            return Err(Error::invalid_argument(
                "audit and alarm entries need a success or fail flag",
            ));
        }

        Ok(())
    }

    /// Render the entry in text form
    ///
    /// The text form carries one permission set for all access types, so an
    /// entry whose access types carry different permissions cannot be
    /// rendered.
    pub fn to_text(&self) -> Result<String> {
        let mut shared: Option<Permissions> = None;
        for (access, perms) in self.perms_by_access() {
            if !self.access.contains(access) {
                continue;
            }
            match shared {
                Some(existing) if existing != perms => {
                    return Err(Error::invalid_argument(
                        "entry has different permissions per access type",
                    ))
                }
                _ => shared = Some(perms),
            }
        }

        let mut text = String::new();
        for (letter, access) in ACCESS_LETTERS {
            if self.access.contains(access) {
                text.push(letter);
            }
        }
        text.push(':');
        if self.principal.is_group() {
            text.push(GROUP_LETTER);
        }
        for (letter, flag) in FLAG_LETTERS {
            if self.flags.contains(flag) {
                text.push(letter);
            }
        }
        text.push(':');
        text.push_str(self.principal.text());
        text.push(':');
        text.push_str(&shared.unwrap_or_default().to_string());
        Ok(text)
    }

    fn perms_by_access(&self) -> [(AccessTypes, Permissions); 3] {
        [
            (AccessTypes::ALLOW, self.allow_perms),
            (AccessTypes::AUDIT, self.audit_perms),
            (AccessTypes::ALARM, self.alarm_perms),
        ]
    }
}

impl FromStr for Ace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(':').collect();
        let [access_text, flags_text, principal_text, perms_text] = fields[..] else {
            return Err(Error::invalid_argument(format!(
                "'{s}' is not of the form access:flags:principal:perms"
            )));
        };

        let mut access = AccessTypes::empty();
        for c in access_text.chars() {
            let (_, bit) = ACCESS_LETTERS
                .iter()
                .find(|(letter, _)| *letter == c)
                .ok_or_else(|| Error::invalid_argument(format!("unknown access type '{c}'")))?;
            access |= *bit;
        }

        let mut group = false;
        let mut flags = AceFlags::empty();
        for c in flags_text.chars() {
            if c == GROUP_LETTER {
                group = true;
                continue;
            }
            let (_, bit) = FLAG_LETTERS
                .iter()
                .find(|(letter, _)| *letter == c)
                .ok_or_else(|| Error::invalid_argument(format!("unknown flag '{c}'")))?;
            flags |= *bit;
        }

        let principal = Principal::parse(principal_text, group)?;
        let perms = Permissions::from_letters(perms_text)?;
        let for_access = |bit: AccessTypes| {
            if access.contains(bit) {
                perms
            } else {
                Permissions::empty()
            }
        };

        Ok(Ace {
            principal,
            access,
            flags,
            allow_perms: for_access(AccessTypes::ALLOW),
            audit_perms: for_access(AccessTypes::AUDIT),
            alarm_perms: for_access(AccessTypes::ALARM),
        })
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrincipalType::Owner => "owner",
            PrincipalType::User => "user",
            PrincipalType::OwnerGroup => "owner-group",
            PrincipalType::Group => "group",
            PrincipalType::Everyone => "everyone",
        };
        f.write_str(name)
    }
}
