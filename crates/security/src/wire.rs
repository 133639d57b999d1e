//! Wire records exchanged with the agent and the validator
//!
//! Records are encoded with bincode. Decoding failures are reported as
//! invalid arguments for caller-supplied bytes and as protocol errors for
//! bytes that came back from a peer.

use dsec_core::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use zeroize::Zeroize;

/// Scheme that produced a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flavor {
    None,
    Sys,
}

/// A flavored, opaque payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct Token {
    #[zeroize(skip)]
    pub flavor: Flavor,
    pub data: Vec<u8>,
}

/// A signed credential: an identity token plus its verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: Option<Token>,
    pub verifier: Option<Token>,
}

/// Payload of a [`Flavor::Sys`] token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSys {
    pub user: String,
    pub group: String,
    pub groups: Vec<String>,
    pub secctx: Option<String>,
    pub machinename: String,
    pub stamp: u64,
}

/// Agent reply to a credential request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCredentialResponse {
    pub status: i32,
    pub credential: Option<Credential>,
}

/// Body of a validation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateCredentialRequest {
    pub credential: Credential,
}

/// Validator reply to a validation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateCredentialResponse {
    pub status: i32,
    pub token: Option<Token>,
}

pub(crate) fn encode<T: Serialize>(value: &T, what: &str) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| Error::protocol(format!("failed to encode {what}: {e}")))
}

/// Decode bytes received from a peer
pub(crate) fn decode_reply<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| Error::protocol(format!("malformed {what}: {e}")))
}

impl Credential {
    /// Decode caller-supplied credential bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_argument("credential is empty"));
        }
        bincode::deserialize(bytes)
            .map_err(|e| Error::invalid_argument(format!("malformed credential: {e}")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self, "credential")
    }
}

impl AuthSys {
    /// Decode the identity carried by a validated token
    pub fn from_token(token: &Token) -> Result<Self> {
        if token.flavor != Flavor::Sys {
            return Err(Error::protocol(format!(
                "expected a Sys token, got {:?}",
                token.flavor
            )));
        }
        decode_reply(&token.data, "Sys token payload")
    }

    pub fn to_token(&self) -> Result<Token> {
        Ok(Token {
            flavor: Flavor::Sys,
            data: encode(self, "Sys token payload")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authsys() -> AuthSys {
        AuthSys {
            user: "alice@".into(),
            group: "staff@".into(),
            groups: vec!["wheel@".into()],
            secctx: None,
            machinename: "node1".into(),
            stamp: 42,
        }
    }

    #[test]
    fn test_empty_credential_is_invalid_argument() {
        assert!(matches!(
            Credential::from_bytes(&[]),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_truncated_credential_is_invalid_argument() {
        let credential = Credential {
            token: Some(authsys().to_token().unwrap()),
            verifier: None,
        };
        let bytes = credential.to_bytes().unwrap();
        assert!(matches!(
            Credential::from_bytes(&bytes[..bytes.len() / 2]),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(Credential::from_bytes(&bytes).unwrap(), credential);
    }

    #[test]
    fn test_wrong_flavor_is_protocol_error() {
        let token = Token {
            flavor: Flavor::None,
            data: authsys().to_token().unwrap().data,
        };
        assert!(matches!(
            AuthSys::from_token(&token),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn test_junk_payload_is_protocol_error() {
        let token = Token {
            flavor: Flavor::Sys,
            data: vec![0xff; 8],
        };
        assert!(matches!(
            AuthSys::from_token(&token),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn test_zeroize_token_clears_data() {
        let mut token = Token {
            flavor: Flavor::Sys,
            data: vec![1, 2, 3],
        };
        token.zeroize();
        assert!(token.data.is_empty());
        assert_eq!(token.flavor, Flavor::Sys);
    }
}
