//! Call and response envelopes

use dsec_core::{codes, Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A request addressed to one method of one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub module: i32,
    pub method: i32,
    pub sequence: u64,
    #[serde(with = "base64_body", default)]
    pub body: Vec<u8>,
}

impl Call {
    /// Create a call with a fresh sequence number
    pub fn new(module: i32, method: i32, body: Vec<u8>) -> Self {
        Self {
            module,
            method,
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            body,
        }
    }
}

/// Outcome reported by the peer for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Submitted,
    Failure,
    UnknownModule,
    UnknownMethod,
    FailedUnmarshalCall,
    FailedUnmarshalPayload,
    FailedMarshal,
}

/// Reply to a [`Call`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub sequence: u64,
    pub status: ResponseStatus,
    #[serde(with = "base64_body", default)]
    pub body: Vec<u8>,
}

impl Response {
    pub fn success(sequence: u64, body: Vec<u8>) -> Self {
        Self {
            sequence,
            status: ResponseStatus::Success,
            body,
        }
    }

    /// The reply body, if the peer handled the call
    ///
    /// Any status other than `Success` is a remote failure with the generic
    /// `MISC` code, since the envelope carries no finer-grained status.
    pub fn into_body(self, operation: &str) -> Result<Vec<u8>> {
        match self.status {
            ResponseStatus::Success => Ok(self.body),
            status => {
                tracing::warn!(operation, ?status, "peer did not handle call");
                Err(Error::remote_failure(operation, codes::MISC))
            }
        }
    }
}

mod base64_body {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
