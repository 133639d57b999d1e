//! Capability bits and access modes for pools and containers
//!
//! Raw ACL permissions are mapped to resource-specific capabilities and then
//! filtered by the access mode the caller asked for. A read-write request
//! is all or nothing: permissions that only cover one side of it yield no
//! capabilities at all.

use bitflags::bitflags;
use dsec_acl::Permissions;
use dsec_core::{Error, Result};

bitflags! {
    /// Access mode requested when connecting to a pool
    ///
    /// Exactly one mode must be set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PoolFlags: u64 {
        const RO = 1 << 0;
        const RW = 1 << 1;
        const EX = 1 << 2;
    }
}

bitflags! {
    /// Access mode requested when opening a container
    ///
    /// Exactly one of `RO` and `RW`, optionally with `EX` and `EVICT_ALL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContainerFlags: u64 {
        const RO = 1 << 0;
        const RW = 1 << 1;
        const EX = 1 << 2;
        const EVICT_ALL = 1 << 3;
    }
}

bitflags! {
    /// Operations allowed on a connected pool
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PoolCapabilities: u64 {
        const READ = 1 << 0;
        const CREATE_CONTAINER = 1 << 1;
        const DELETE_CONTAINER = 1 << 2;
    }
}

bitflags! {
    /// Operations allowed on an open container
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContainerCapabilities: u64 {
        const READ_DATA = 1 << 0;
        const WRITE_DATA = 1 << 1;
        const GET_PROP = 1 << 2;
        const SET_PROP = 1 << 3;
        const GET_ACL = 1 << 4;
        const SET_ACL = 1 << 5;
        const SET_OWNER = 1 << 6;
        const DELETE = 1 << 7;
        const OPEN_EXCLUSIVE = 1 << 8;
        const EVICT_ALL = 1 << 9;
    }
}

impl PoolCapabilities {
    pub const RO_MASK: Self = Self::READ;

    pub fn can_connect(&self) -> bool {
        self.contains(Self::READ)
    }

    pub fn can_create_container(&self) -> bool {
        self.contains(Self::CREATE_CONTAINER)
    }

    pub fn can_delete_container(&self) -> bool {
        self.contains(Self::DELETE_CONTAINER)
    }
}

impl ContainerCapabilities {
    pub const RO_MASK: Self = Self::READ_DATA.union(Self::GET_PROP).union(Self::GET_ACL);

    pub const W_MASK: Self = Self::WRITE_DATA
        .union(Self::SET_PROP)
        .union(Self::SET_ACL)
        .union(Self::SET_OWNER)
        .union(Self::DELETE);

    /// Bits granted to owners regardless of ACL content
    pub const OWNER_ONLY: Self = Self::OPEN_EXCLUSIVE.union(Self::EVICT_ALL);

    pub fn can_read_data(&self) -> bool {
        self.contains(Self::READ_DATA)
    }

    pub fn can_write_data(&self) -> bool {
        self.contains(Self::WRITE_DATA)
    }

    pub fn can_get_props(&self) -> bool {
        self.contains(Self::GET_PROP)
    }

    pub fn can_set_props(&self) -> bool {
        self.contains(Self::SET_PROP)
    }

    pub fn can_get_acl(&self) -> bool {
        self.contains(Self::GET_ACL)
    }

    pub fn can_set_acl(&self) -> bool {
        self.contains(Self::SET_ACL)
    }

    pub fn can_set_owner(&self) -> bool {
        self.contains(Self::SET_OWNER)
    }

    pub fn can_delete(&self) -> bool {
        self.contains(Self::DELETE)
    }

    pub fn can_open_exclusive(&self) -> bool {
        self.contains(Self::OPEN_EXCLUSIVE)
    }

    pub fn can_evict_all(&self) -> bool {
        self.contains(Self::EVICT_ALL)
    }
}

impl PoolFlags {
    /// Check that exactly one known mode is requested
    pub fn validate(bits: u64) -> Result<Self> {
        let flags = Self::from_bits(bits)
            .ok_or_else(|| Error::invalid_argument(format!("unknown pool flags {bits:#x}")))?;
        if flags.bits().count_ones() != 1 {
            return Err(Error::invalid_argument(format!(
                "pool flags {bits:#x} must name exactly one of RO, RW, EX"
            )));
        }
        Ok(flags)
    }
}

impl ContainerFlags {
    /// Check that exactly one of RO and RW is requested, with no unknown bits
    pub fn validate(bits: u64) -> Result<Self> {
        let flags = Self::from_bits(bits).ok_or_else(|| {
            Error::invalid_argument(format!("unknown container flags {bits:#x}"))
        })?;
        if flags.contains(Self::RO) == flags.contains(Self::RW) {
            return Err(Error::invalid_argument(format!(
                "container flags {bits:#x} must name exactly one of RO, RW"
            )));
        }
        Ok(flags)
    }
}

/// Pool capabilities for already resolved permissions
pub fn pool_capabilities_for(perms: Permissions, flags: PoolFlags) -> PoolCapabilities {
    let mut capas = PoolCapabilities::empty();
    if perms.intersects(Permissions::READ | Permissions::GET_PROP) {
        capas |= PoolCapabilities::READ;
    }
    if perms.intersects(Permissions::WRITE | Permissions::CREATE_CONT) {
        capas |= PoolCapabilities::CREATE_CONTAINER;
    }
    if perms.intersects(Permissions::WRITE | Permissions::DEL_CONT) {
        capas |= PoolCapabilities::DELETE_CONTAINER;
    }

    if flags.contains(PoolFlags::RO) {
        return capas & PoolCapabilities::RO_MASK;
    }
    let read_side = capas & PoolCapabilities::RO_MASK;
    let write_side = capas - PoolCapabilities::RO_MASK;
    if read_side.is_empty() || write_side.is_empty() {
        return PoolCapabilities::empty();
    }
    capas
}

/// Container capabilities for already resolved permissions
pub fn container_capabilities_for(
    perms: Permissions,
    is_owner: bool,
    flags: ContainerFlags,
) -> ContainerCapabilities {
    const MAPPING: [(Permissions, ContainerCapabilities); 8] = [
        (Permissions::READ, ContainerCapabilities::READ_DATA),
        (Permissions::WRITE, ContainerCapabilities::WRITE_DATA),
        (Permissions::GET_PROP, ContainerCapabilities::GET_PROP),
        (Permissions::SET_PROP, ContainerCapabilities::SET_PROP),
        (Permissions::GET_ACL, ContainerCapabilities::GET_ACL),
        (Permissions::SET_ACL, ContainerCapabilities::SET_ACL),
        (Permissions::SET_OWNER, ContainerCapabilities::SET_OWNER),
        (Permissions::DEL_CONT, ContainerCapabilities::DELETE),
    ];

    let mut capas = MAPPING
        .iter()
        .filter(|(perm, _)| perms.contains(*perm))
        .fold(ContainerCapabilities::empty(), |acc, (_, capa)| acc | *capa);

    if flags.contains(ContainerFlags::RO) {
        capas &= ContainerCapabilities::RO_MASK;
    } else {
        let read_side = capas & ContainerCapabilities::RO_MASK;
        let write_side = capas & ContainerCapabilities::W_MASK;
        if read_side.is_empty() || write_side.is_empty() {
            capas = ContainerCapabilities::empty();
        }
    }

    if is_owner {
        capas |= ContainerCapabilities::OWNER_ONLY;
    }
    if !flags.contains(ContainerFlags::EX) {
        capas -= ContainerCapabilities::OPEN_EXCLUSIVE;
    }
    if !flags.contains(ContainerFlags::EVICT_ALL) {
        capas -= ContainerCapabilities::EVICT_ALL;
    }
    capas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(text: &str) -> Permissions {
        Permissions::from_letters(text).unwrap()
    }

    #[test]
    fn test_pool_flags_validation() {
        assert_eq!(PoolFlags::validate(1).unwrap(), PoolFlags::RO);
        assert_eq!(PoolFlags::validate(4).unwrap(), PoolFlags::EX);
        for bits in [0, 3, 5, 7, 8, 1 << 40] {
            assert!(
                matches!(PoolFlags::validate(bits), Err(Error::InvalidArgument { .. })),
                "{bits:#x} should be rejected"
            );
        }
    }

    #[test]
    fn test_container_flags_validation() {
        let ro_ex = ContainerFlags::validate(0b0101).unwrap();
        assert_eq!(ro_ex, ContainerFlags::RO | ContainerFlags::EX);
        assert!(ContainerFlags::validate(0b1010).is_ok());
        for bits in [0, 0b0011, 0b0100, 0b1100, 1 << 20] {
            assert!(
                matches!(ContainerFlags::validate(bits), Err(Error::InvalidArgument { .. })),
                "{bits:#x} should be rejected"
            );
        }
    }

    #[test]
    fn test_pool_read_only_permission_cannot_satisfy_rw() {
        assert_eq!(
            pool_capabilities_for(Permissions::READ, PoolFlags::RW),
            PoolCapabilities::empty()
        );
    }

    #[test]
    fn test_pool_mapping() {
        assert_eq!(
            pool_capabilities_for(Permissions::GET_PROP, PoolFlags::RO),
            PoolCapabilities::READ
        );
        assert_eq!(
            pool_capabilities_for(perms("rw"), PoolFlags::RW),
            PoolCapabilities::all()
        );
        assert_eq!(
            pool_capabilities_for(perms("rc"), PoolFlags::EX),
            PoolCapabilities::READ | PoolCapabilities::CREATE_CONTAINER
        );
        assert_eq!(
            pool_capabilities_for(perms("rd"), PoolFlags::RW),
            PoolCapabilities::READ | PoolCapabilities::DELETE_CONTAINER
        );
    }

    #[test]
    fn test_pool_ro_drops_write_side() {
        assert_eq!(
            pool_capabilities_for(perms("rw"), PoolFlags::RO),
            PoolCapabilities::READ
        );
        assert_eq!(
            pool_capabilities_for(Permissions::WRITE, PoolFlags::RO),
            PoolCapabilities::empty()
        );
    }

    #[test]
    fn test_pool_write_without_read_is_denied() {
        assert_eq!(
            pool_capabilities_for(Permissions::WRITE, PoolFlags::RW),
            PoolCapabilities::empty()
        );
    }

    #[test]
    fn test_container_owner_read_only_exclusive() {
        let capas = container_capabilities_for(
            Permissions::GET_ACL | Permissions::SET_ACL,
            true,
            ContainerFlags::RO | ContainerFlags::EX,
        );
        assert!(capas.can_get_acl());
        assert!(capas.can_open_exclusive());
        assert!(!capas.can_evict_all());
        assert!((capas & ContainerCapabilities::W_MASK).is_empty());
    }

    #[test]
    fn test_container_rw_is_all_or_nothing() {
        assert_eq!(
            container_capabilities_for(perms("rta"), false, ContainerFlags::RW),
            ContainerCapabilities::empty()
        );
        assert_eq!(
            container_capabilities_for(perms("wTAod"), false, ContainerFlags::RW),
            ContainerCapabilities::empty()
        );
        assert_eq!(
            container_capabilities_for(perms("rw"), false, ContainerFlags::RW),
            ContainerCapabilities::READ_DATA | ContainerCapabilities::WRITE_DATA
        );
    }

    #[test]
    fn test_container_full_mapping() {
        let capas = container_capabilities_for(
            Permissions::all(),
            true,
            ContainerFlags::RW | ContainerFlags::EX | ContainerFlags::EVICT_ALL,
        );
        assert_eq!(capas, ContainerCapabilities::all());
    }

    #[test]
    fn test_container_owner_bits_need_owner() {
        let capas = container_capabilities_for(
            Permissions::all(),
            false,
            ContainerFlags::RW | ContainerFlags::EX | ContainerFlags::EVICT_ALL,
        );
        assert!(!capas.can_open_exclusive());
        assert!(!capas.can_evict_all());
        assert!(capas.can_set_owner());
        assert!(capas.can_delete());
    }

    #[test]
    fn test_container_evict_all_needs_request() {
        let capas = container_capabilities_for(perms("rw"), true, ContainerFlags::RW);
        assert!(!capas.can_evict_all());
        assert!(!capas.can_open_exclusive());

        let capas = container_capabilities_for(
            perms("rw"),
            true,
            ContainerFlags::RW | ContainerFlags::EVICT_ALL,
        );
        assert!(capas.can_evict_all());
    }
}
