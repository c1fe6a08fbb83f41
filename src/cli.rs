//! CLI argument parsing.
//!
//! The CLI only maps flags onto configuration and workflow options; empty flag
//! values are turned into `None` here so nothing downstream sees sentinels.
use crate::config::ConfigOverrides;
use crate::output::OutputFormat;
use crate::validator::{ValidatorOptions, DEFAULT_ACCOUNT};
use crate::workflow::CampaignUpdateOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "netlaunch",
    version,
    about = "Join chain launches as a validator and manage campaigns",
    after_help = "Examples:\n  netlaunch chain init 42 --validator-account alice\n  netlaunch campaign update 7 --name testnet\n  netlaunch campaign update 7 --total-supply 1000stake,50token --output json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to ~/.netlaunch/config.json when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// REST address of the coordination chain
    #[arg(long, global = true, value_name = "URL")]
    pub api: Option<String>,

    /// RPC address used to broadcast transactions
    #[arg(long, global = true, value_name = "URL")]
    pub rpc: Option<String>,

    /// Account that signs coordination transactions
    #[arg(long, global = true, value_name = "NAME")]
    pub from: Option<String>,

    /// Keyring backend (test, file, os)
    #[arg(long, global = true, value_name = "BACKEND")]
    pub keyring_backend: Option<String>,

    /// Keyring directory
    #[arg(long, global = true, value_name = "DIR")]
    pub keyring_dir: Option<PathBuf>,

    /// Emit debug logs on stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_address: present(self.api.as_deref()),
            rpc_address: present(self.rpc.as_deref()),
            from: present(self.from.as_deref()),
            keyring_backend: present(self.keyring_backend.as_deref()),
            keyring_dir: self.keyring_dir.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with chain launches
    #[command(subcommand)]
    Chain(ChainCommand),
    /// Work with campaigns
    #[command(subcommand)]
    Campaign(CampaignCommand),
}

#[derive(Subcommand, Debug)]
pub enum ChainCommand {
    /// Prepare a validator home and gentx for a launch
    Init(ChainInitArgs),
}

#[derive(Subcommand, Debug)]
pub enum CampaignCommand {
    /// Change a campaign's name, metadata or total supply
    Update(CampaignUpdateArgs),
}

#[derive(Args, Debug)]
pub struct ChainInitArgs {
    /// Launch ID of the chain to join
    #[arg(value_name = "LAUNCH_ID")]
    pub launch_id: String,

    /// Account that signs the gentx
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ACCOUNT)]
    pub validator_account: String,

    #[arg(long, value_name = "URL")]
    pub validator_website: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub validator_details: Option<String>,

    #[arg(long, value_name = "EMAIL")]
    pub validator_security_contact: Option<String>,

    /// Validator moniker, also used as the node moniker
    #[arg(long, value_name = "NAME")]
    pub validator_moniker: Option<String>,

    /// Identity signature (e.g. a keybase key)
    #[arg(long, value_name = "ID")]
    pub validator_identity: Option<String>,

    /// Minimum self delegation
    #[arg(long, value_name = "AMOUNT")]
    pub validator_self_delegation: Option<String>,

    /// Gas price for the gentx (defaults to 0<stake denom>)
    #[arg(long, value_name = "COIN")]
    pub validator_gas_price: Option<String>,

    /// Chain daemon command (defaults to the launch's source repository name + "d")
    #[arg(long, value_name = "CMD")]
    pub chain_binary: Option<String>,

    /// Node home directory (defaults to <networks_root>/<launch-id>)
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Overwrite an existing home without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ChainInitArgs {
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            account: present(Some(self.validator_account.as_str()))
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            moniker: present(self.validator_moniker.as_deref()),
            website: present(self.validator_website.as_deref()),
            details: present(self.validator_details.as_deref()),
            identity: present(self.validator_identity.as_deref()),
            security_contact: present(self.validator_security_contact.as_deref()),
            min_self_delegation: present(self.validator_self_delegation.as_deref()),
            gas_price: present(self.validator_gas_price.as_deref()),
        }
    }
}

#[derive(Args, Debug)]
pub struct CampaignUpdateArgs {
    /// Campaign ID to update
    #[arg(value_name = "CAMPAIGN_ID")]
    pub campaign_id: String,

    /// New campaign name
    #[arg(long)]
    pub name: Option<String>,

    /// New campaign metadata
    #[arg(long)]
    pub metadata: Option<String>,

    /// New total supply, e.g. "1000stake,50token"
    #[arg(long, value_name = "COINS")]
    pub total_supply: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

impl CampaignUpdateArgs {
    pub fn options(&self) -> CampaignUpdateOptions {
        CampaignUpdateOptions {
            campaign_id: self.campaign_id.clone(),
            name: present(self.name.as_deref()),
            metadata: present(self.metadata.as_deref()),
            total_supply: present(self.total_supply.as_deref()),
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_flags_become_absent() {
        let args = RootArgs::parse_from([
            "netlaunch",
            "campaign",
            "update",
            "7",
            "--name",
            "testnet",
            "--metadata",
            "",
        ]);
        let Command::Campaign(CampaignCommand::Update(update)) = args.command else {
            panic!("expected campaign update");
        };
        let options = update.options();
        assert_eq!(options.name.as_deref(), Some("testnet"));
        assert_eq!(options.metadata, None);
        assert_eq!(options.total_supply, None);
        assert_eq!(update.output, OutputFormat::Yaml);
    }

    #[test]
    fn chain_init_maps_validator_flags() {
        let args = RootArgs::parse_from([
            "netlaunch",
            "chain",
            "init",
            "42",
            "--validator-account",
            "alice",
            "--validator-website",
            " ",
            "--validator-moniker",
            "node-a",
            "--yes",
            "--verbose",
        ]);
        assert!(args.global.verbose);
        let Command::Chain(ChainCommand::Init(init)) = args.command else {
            panic!("expected chain init");
        };
        let options = init.validator_options();
        assert_eq!(options.account, "alice");
        assert_eq!(options.moniker.as_deref(), Some("node-a"));
        assert_eq!(options.website, None);
        assert!(init.yes);
    }

    #[test]
    fn global_flags_become_overrides() {
        let args = RootArgs::parse_from([
            "netlaunch",
            "campaign",
            "update",
            "7",
            "--name",
            "x",
            "--api",
            "https://api.example",
            "--from",
            "",
        ]);
        let overrides = args.global.overrides();
        assert_eq!(overrides.api_address.as_deref(), Some("https://api.example"));
        assert_eq!(overrides.from, None);
    }
}
