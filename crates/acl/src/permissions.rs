//! Raw ACL permission bits

use bitflags::bitflags;
use dsec_core::{Error, Result};
use std::fmt;

bitflags! {
    /// Permissions an ACL entry can grant on a pool or container.
    ///
    /// These are resource-neutral; the capability layer decides what each
    /// bit means for a given resource type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const CREATE_CONT = 1 << 2;
        const DEL_CONT = 1 << 3;
        const GET_PROP = 1 << 4;
        const SET_PROP = 1 << 5;
        const GET_ACL = 1 << 6;
        const SET_ACL = 1 << 7;
        const SET_OWNER = 1 << 8;
    }
}

/// Letter for each permission, in display order
const LETTERS: [(char, Permissions); 9] = [
    ('r', Permissions::READ),
    ('w', Permissions::WRITE),
    ('c', Permissions::CREATE_CONT),
    ('d', Permissions::DEL_CONT),
    ('t', Permissions::GET_PROP),
    ('T', Permissions::SET_PROP),
    ('a', Permissions::GET_ACL),
    ('A', Permissions::SET_ACL),
    ('o', Permissions::SET_OWNER),
];

impl Permissions {
    /// Parse the letter form used in ACE text (`"rw"`, `"rwcdtTaAo"`, `""`)
    pub fn from_letters(text: &str) -> Result<Self> {
        text.chars().try_fold(Self::empty(), |perms, c| {
            LETTERS
                .iter()
                .find(|(letter, _)| *letter == c)
                .map(|(_, bit)| perms | *bit)
                .ok_or_else(|| Error::invalid_argument(format!("unknown permission '{c}'")))
        })
    }

    /// Whether any bit outside the defined set is present
    #[must_use]
    pub fn has_unknown_bits(&self) -> bool {
        self.bits() & !Self::all().bits() != 0
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, bit) in LETTERS {
            if self.contains(bit) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(
            Permissions::from_letters("rw").unwrap(),
            Permissions::READ | Permissions::WRITE
        );
        assert_eq!(Permissions::from_letters("").unwrap(), Permissions::empty());
        assert_eq!(
            Permissions::from_letters("rwcdtTaAo").unwrap(),
            Permissions::all()
        );
    }

    #[test]
    fn test_unknown_letter() {
        assert!(matches!(
            Permissions::from_letters("rz"),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_display_uses_canonical_order() {
        let perms = Permissions::SET_OWNER | Permissions::READ | Permissions::GET_ACL;
        assert_eq!(perms.to_string(), "rao");
    }

    #[test]
    fn test_unknown_bits() {
        assert!(!Permissions::all().has_unknown_bits());
        assert!(Permissions::from_bits_retain(1 << 40).has_unknown_bits());
    }
}
