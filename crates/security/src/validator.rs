//! Credential validation and capability checks on the server side

use crate::capabilities::{
    container_capabilities_for, pool_capabilities_for, ContainerCapabilities, ContainerFlags,
    PoolCapabilities, PoolFlags,
};
use crate::wire::{
    self, AuthSys, Credential, Token, ValidateCredentialRequest, ValidateCredentialResponse,
};
use dsec_acl::{resolve_permissions, Acl, Identity, Ownership, Permissions};
use dsec_config::Config;
use dsec_core::{Error, Result};
use dsec_drpc::{
    ids::{METHOD_VALIDATE_CREDS, MODULE_SEC},
    Call, Connector, Session, UnixConnector,
};
use dsec_utils::tracing::authorization_span;
use std::path::PathBuf;
use tracing::{debug, warn};

const OPERATION: &str = "validate credential";

/// Validates credentials through the local validator and derives the
/// capabilities they carry on pools and containers
#[derive(Debug, Clone)]
pub struct CredentialValidator<C = UnixConnector> {
    connector: C,
    server_socket: Option<PathBuf>,
}

impl CredentialValidator<UnixConnector> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            UnixConnector::with_timeout(config.call_timeout()),
            config.server_socket.clone(),
        )
    }
}

impl<C: Connector> CredentialValidator<C> {
    pub fn new(connector: C, server_socket: Option<PathBuf>) -> Self {
        Self {
            connector,
            server_socket,
        }
    }

    /// Have the validator check `cred_bytes` and return the validated token
    ///
    /// The credential is decoded before any session is opened, so malformed
    /// input never reaches the validator.
    pub fn validate_credential(&self, cred_bytes: &[u8]) -> Result<Token> {
        let credential = Credential::from_bytes(cred_bytes)?;
        let path = self
            .server_socket
            .as_deref()
            .ok_or_else(|| Error::unreachable("server", "no server socket configured"))?;

        let body = wire::encode(&ValidateCredentialRequest { credential }, "validation request")?;
        let mut session = self.connector.connect(path)?;
        let call = Call::new(MODULE_SEC, METHOD_VALIDATE_CREDS, body);
        let response = session
            .call(&call)?
            .ok_or_else(|| Error::no_reply(OPERATION))?;

        let reply: ValidateCredentialResponse =
            wire::decode_reply(&response.into_body(OPERATION)?, "validation response")?;
        if reply.status != 0 {
            warn!(status = reply.status, "validator rejected credential");
            return Err(Error::remote_failure(OPERATION, reply.status));
        }

        let token = reply
            .token
            .ok_or_else(|| Error::protocol("validator returned no token"))?;
        if token.data.is_empty() {
            return Err(Error::protocol("validator returned an empty token"));
        }

        debug!(flavor = ?token.flavor, len = token.data.len(), "credential validated");
        Ok(token)
    }

    /// Capabilities the credential holder has on a pool
    pub fn pool_capabilities(
        &self,
        flags: u64,
        cred_bytes: &[u8],
        ownership: &Ownership,
        acl: Option<&Acl>,
    ) -> Result<PoolCapabilities> {
        let _span = authorization_span("pool", flags).entered();

        let flags = PoolFlags::validate(flags)?;
        let acl = checked_acl(ownership, acl)?;

        let token = self.validate_credential(cred_bytes)?;
        let identity = identity_from_token(&token)?;
        let resolved = resolve_permissions(Some(acl), ownership, &identity, Permissions::empty())?;

        let capas = pool_capabilities_for(resolved.perms, flags);
        debug!(user = %identity.user, ?capas, "pool capabilities");
        Ok(capas)
    }

    /// Capabilities the credential holder has on a container
    ///
    /// The credential was validated when the pool was connected, so it is
    /// only decoded here.
    pub fn container_capabilities(
        &self,
        flags: u64,
        cred_bytes: &[u8],
        ownership: &Ownership,
        acl: Option<&Acl>,
    ) -> Result<ContainerCapabilities> {
        let _span = authorization_span("container", flags).entered();

        let flags = ContainerFlags::validate(flags)?;
        let acl = checked_acl(ownership, acl)?;

        let credential = Credential::from_bytes(cred_bytes)?;
        let token = credential
            .token
            .ok_or_else(|| Error::invalid_argument("credential has no token"))?;
        let identity = identity_from_token(&token)?;

        let owner_min_perms = Permissions::GET_ACL | Permissions::SET_ACL;
        let resolved = resolve_permissions(Some(acl), ownership, &identity, owner_min_perms)?;

        let capas = container_capabilities_for(resolved.perms, resolved.is_owner, flags);
        debug!(
            user = %identity.user,
            is_owner = resolved.is_owner,
            ?capas,
            "container capabilities"
        );
        Ok(capas)
    }
}

fn checked_acl<'a>(ownership: &Ownership, acl: Option<&'a Acl>) -> Result<&'a Acl> {
    ownership.validate()?;
    let acl = acl.ok_or_else(|| Error::invalid_argument("no ACL supplied"))?;
    acl.validate()?;
    Ok(acl)
}

/// Identity from a Sys token: its user, primary group and supplementary
/// groups
fn identity_from_token(token: &Token) -> Result<Identity> {
    let AuthSys {
        user, group, groups, ..
    } = AuthSys::from_token(token)?;
    Ok(Identity::new(user, std::iter::once(group).chain(groups)))
}
