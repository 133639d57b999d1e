//! Credential requests to the local agent

use crate::wire::{self, Credential, RequestCredentialResponse};
use dsec_config::Config;
use dsec_core::{Error, Result};
use dsec_drpc::{
    ids::{MODULE_SEC_AGENT, METHOD_REQUEST_CREDS},
    Call, Connector, Session, UnixConnector,
};
use std::path::PathBuf;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

const OPERATION: &str = "request credential";

/// Guard over a decoded credential; wipes its verifier when it goes out of
/// scope
struct VerifierGuard<'a>(&'a mut Option<Credential>);

impl VerifierGuard<'_> {
    fn scrub(&mut self) {
        if let Some(verifier) = self.0.as_mut().and_then(|cred| cred.verifier.as_mut()) {
            verifier.zeroize();
        }
    }
}

impl Drop for VerifierGuard<'_> {
    fn drop(&mut self) {
        self.scrub();
    }
}

/// Obtains signed credentials from the credential-issuing agent
#[derive(Debug, Clone)]
pub struct CredentialClient<C = UnixConnector> {
    connector: C,
    agent_socket: Option<PathBuf>,
}

impl CredentialClient<UnixConnector> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            UnixConnector::with_timeout(config.call_timeout()),
            config.agent_socket.clone(),
        )
    }
}

impl<C: Connector> CredentialClient<C> {
    pub fn new(connector: C, agent_socket: Option<PathBuf>) -> Self {
        Self {
            connector,
            agent_socket,
        }
    }

    /// Ask the agent for a credential for the calling process
    ///
    /// The returned bytes are the encoded credential, ready to be sent to a
    /// server for validation. The session to the agent is closed on every
    /// path out of this function.
    pub fn request_credential(&self) -> Result<Vec<u8>> {
        let path = self
            .agent_socket
            .as_deref()
            .ok_or_else(|| Error::unreachable("agent", "no agent socket configured"))?;

        let mut session = self.connector.connect(path)?;
        let call = Call::new(MODULE_SEC_AGENT, METHOD_REQUEST_CREDS, Vec::new());
        let response = session
            .call(&call)?
            .ok_or_else(|| Error::no_reply(OPERATION))?;

        let body = Zeroizing::new(response.into_body(OPERATION)?);
        let RequestCredentialResponse {
            status,
            mut credential,
        } = wire::decode_reply(&body, "credential response")?;
        let guard = VerifierGuard(&mut credential);

        if status != 0 {
            warn!(status, "agent refused credential request");
            return Err(Error::remote_failure(OPERATION, status));
        }

        let credential = guard
            .0
            .as_ref()
            .ok_or_else(|| Error::protocol("agent returned no credential"))?;
        if credential.token.is_none() {
            return Err(Error::protocol("agent credential has no token"));
        }
        if credential.verifier.is_none() {
            return Err(Error::protocol("agent credential has no verifier"));
        }

        let bytes = credential.to_bytes()?;
        debug!(len = bytes.len(), "obtained credential from agent");
        Ok(bytes)
    }
}
