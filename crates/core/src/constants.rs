/// Constants used throughout the dsec codebase
// Well-known local socket addresses
pub const DEFAULT_AGENT_SOCKET: &str = "/var/run/daos_agent/daos_agent.sock";
pub const DEFAULT_SERVER_SOCKET: &str = "/var/run/daos_server/daos_server.sock";

// Environment variable names
pub const AGENT_SOCKET_VAR: &str = "DAOS_AGENT_DRPC_SOCKET";
pub const SERVER_SOCKET_VAR: &str = "DAOS_SERVER_DRPC_SOCKET";
pub const CALL_TIMEOUT_VAR: &str = "DSEC_CALL_TIMEOUT_MS";
pub const DSEC_LOG_VAR: &str = "DSEC_LOG";

// Principal strings
pub const MAX_PRINCIPAL_LEN: usize = 255;
pub const PRINCIPAL_SEPARATOR: char = '@';
