use clap::Subcommand;
use dsec_acl::{Ace, Acl, Ownership};
use dsec_config::Config;
use std::path::PathBuf;

pub mod capabilities;
pub mod credential;
pub mod resolve;

#[derive(Subcommand)]
pub enum Commands {
    /// Request a credential from the local agent and print it as base64
    RequestCred,

    /// Resolve the permissions a user holds under an ACL, without contacting any peer
    Resolve {
        /// Owning user of the resource
        #[arg(long)]
        owner: String,

        /// Owning group of the resource
        #[arg(long)]
        owner_group: String,

        /// User to resolve permissions for
        #[arg(long)]
        user: String,

        /// Groups the user belongs to (can be specified multiple times)
        #[arg(long = "group")]
        groups: Vec<String>,

        /// ACL entry in text form, e.g. A::OWNER@:rw (can be specified multiple times)
        #[arg(long = "ace")]
        aces: Vec<String>,

        /// Permissions always granted to the owner, as letters (e.g. aA)
        #[arg(long, default_value = "")]
        owner_min: String,
    },

    /// Derive pool capabilities for a credential
    PoolCaps {
        #[command(flatten)]
        target: CapabilityTarget,

        /// Requested access mode: ro, rw or ex
        #[arg(long)]
        flags: String,
    },

    /// Derive container capabilities for a credential
    ContCaps {
        #[command(flatten)]
        target: CapabilityTarget,

        /// Requested access mode: ro or rw, optionally followed by ,ex and ,evict
        #[arg(long)]
        flags: String,
    },
}

/// Resource and credential a capability check applies to
#[derive(clap::Args)]
pub struct CapabilityTarget {
    /// File holding a base64 credential as printed by request-cred
    #[arg(long, value_name = "FILE")]
    pub cred: PathBuf,

    /// Owning user of the resource
    #[arg(long)]
    pub owner: String,

    /// Owning group of the resource
    #[arg(long)]
    pub owner_group: String,

    /// ACL entry in text form (can be specified multiple times)
    #[arg(long = "ace")]
    pub aces: Vec<String>,
}

impl CapabilityTarget {
    pub fn ownership(&self) -> Ownership {
        Ownership::new(&self.owner, &self.owner_group)
    }
}

impl Commands {
    pub fn execute(self, config: &Config) -> eyre::Result<()> {
        match self {
            Commands::RequestCred => credential::execute(config),
            Commands::Resolve {
                owner,
                owner_group,
                user,
                groups,
                aces,
                owner_min,
            } => {
                let ownership = Ownership::new(owner, owner_group);
                resolve::execute(&ownership, user, groups, &aces, &owner_min)
            }
            Commands::PoolCaps { target, flags } => {
                capabilities::execute_pool(config, &target, &flags)
            }
            Commands::ContCaps { target, flags } => {
                capabilities::execute_container(config, &target, &flags)
            }
        }
    }
}

/// Build an ACL from entries in text form
pub fn parse_acl(aces: &[String]) -> eyre::Result<Acl> {
    aces.iter()
        .map(|text| {
            text.parse::<Ace>()
                .map_err(|e| eyre::eyre!("bad ACL entry '{text}': {e}"))
        })
        .collect()
}
