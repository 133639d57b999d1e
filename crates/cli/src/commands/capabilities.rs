use super::{credential::read_credential, parse_acl, CapabilityTarget};
use dsec_config::Config;
use dsec_security::{ContainerFlags, CredentialValidator, PoolFlags};
use eyre::bail;

pub fn execute_pool(config: &Config, target: &CapabilityTarget, flags: &str) -> eyre::Result<()> {
    let flags = parse_pool_flags(flags)?;
    let cred = read_credential(&target.cred)?;
    let acl = parse_acl(&target.aces)?;

    let capas = CredentialValidator::from_config(config).pool_capabilities(
        flags.bits(),
        &cred,
        &target.ownership(),
        Some(&acl),
    )?;
    println!("{}", names(capas.iter_names()));
    Ok(())
}

pub fn execute_container(
    config: &Config,
    target: &CapabilityTarget,
    flags: &str,
) -> eyre::Result<()> {
    let flags = parse_container_flags(flags)?;
    let cred = read_credential(&target.cred)?;
    let acl = parse_acl(&target.aces)?;

    let capas = CredentialValidator::from_config(config).container_capabilities(
        flags.bits(),
        &cred,
        &target.ownership(),
        Some(&acl),
    )?;
    println!("{}", names(capas.iter_names()));
    Ok(())
}

pub fn parse_pool_flags(text: &str) -> eyre::Result<PoolFlags> {
    match text.trim().to_ascii_lowercase().as_str() {
        "ro" => Ok(PoolFlags::RO),
        "rw" => Ok(PoolFlags::RW),
        "ex" => Ok(PoolFlags::EX),
        other => bail!("unknown pool access mode '{other}', expected ro, rw or ex"),
    }
}

pub fn parse_container_flags(text: &str) -> eyre::Result<ContainerFlags> {
    let mut flags = ContainerFlags::empty();
    for part in text.split(',').map(str::trim) {
        flags |= match part.to_ascii_lowercase().as_str() {
            "ro" => ContainerFlags::RO,
            "rw" => ContainerFlags::RW,
            "ex" => ContainerFlags::EX,
            "evict" => ContainerFlags::EVICT_ALL,
            other => bail!("unknown container access mode '{other}'"),
        };
    }
    Ok(ContainerFlags::validate(flags.bits())?)
}

/// Join flag names with commas, or `none` when there are none
fn names<T>(iter: impl Iterator<Item = (&'static str, T)>) -> String {
    let joined: Vec<&str> = iter.map(|(name, _)| name).collect();
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined.join(",")
    }
}
