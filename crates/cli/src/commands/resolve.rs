use super::parse_acl;
use dsec_acl::{resolve_permissions, Identity, Ownership, Permissions, ResolvedPermissions};

/// Print the permissions `user` holds under the given entries
pub fn execute(
    ownership: &Ownership,
    user: String,
    groups: Vec<String>,
    aces: &[String],
    owner_min: &str,
) -> eyre::Result<()> {
    let resolved = resolve(ownership, Identity::new(user, groups), aces, owner_min)?;
    println!("perms: {}", resolved.perms);
    println!("owner: {}", resolved.is_owner);
    Ok(())
}

fn resolve(
    ownership: &Ownership,
    identity: Identity,
    aces: &[String],
    owner_min: &str,
) -> eyre::Result<ResolvedPermissions> {
    let acl = parse_acl(aces)?;
    acl.validate()?;
    let owner_min = Permissions::from_letters(owner_min)?;
    Ok(resolve_permissions(
        Some(&acl),
        ownership,
        &identity,
        owner_min,
    )?)
}
