use base64::{engine::general_purpose::STANDARD, Engine as _};
use dsec_config::Config;
use dsec_security::CredentialClient;
use eyre::WrapErr;
use std::path::Path;

/// Print a fresh credential from the agent
pub fn execute(config: &Config) -> eyre::Result<()> {
    let cred = CredentialClient::from_config(config)
        .request_credential()
        .wrap_err("failed to obtain a credential from the agent")?;
    println!("{}", STANDARD.encode(cred));
    Ok(())
}

/// Read a credential written by `request-cred`
pub fn read_credential(path: &Path) -> eyre::Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read credential file {}", path.display()))?;
    STANDARD
        .decode(text.trim())
        .wrap_err_with(|| format!("{} does not hold a base64 credential", path.display()))
}
