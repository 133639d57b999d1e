use clap::Parser;
use dsec::Commands;
use dsec_config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dsec")]
#[command(about = "Credential, ACL and capability inspection", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file, used instead of the environment
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    dsec_utils::tracing::init().map_err(|e| eyre::eyre!(e))?;

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    tracing::debug!(?config, "using configuration");

    cli.command.execute(&config)
}
