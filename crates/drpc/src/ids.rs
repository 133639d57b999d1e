//! Module and method identifiers known to dsec

/// Module served by the credential-issuing agent
pub const MODULE_SEC_AGENT: i32 = 1;
/// Ask the agent for a signed credential
pub const METHOD_REQUEST_CREDS: i32 = 101;

/// Security module served by the credential-validating server
pub const MODULE_SEC: i32 = 4;
/// Ask the server to validate a credential
pub const METHOD_VALIDATE_CREDS: i32 = 401;
