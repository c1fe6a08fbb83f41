//! Chain daemon operations used by the local workspace.
use crate::daemon::{path_to_string, Daemon, KeyringOptions};
use crate::error::Result;
use crate::network::ChainLaunch;
use crate::validator::ValidatorProfile;
use std::path::Path;

/// Chain-side tooling that owns genesis and gentx serialization.
pub trait ChainDaemon {
    /// Create a fresh node home with a generated genesis.
    fn init(&self, launch: &ChainLaunch, home: &Path, moniker: &str) -> Result<()>;

    /// Fund `address` with `amount` in the home's genesis.
    fn add_genesis_account(
        &self,
        launch: &ChainLaunch,
        home: &Path,
        address: &str,
        amount: &str,
    ) -> Result<()>;

    /// Write a signed gentx for `profile` to `output`.
    fn gentx(
        &self,
        launch: &ChainLaunch,
        home: &Path,
        profile: &ValidatorProfile,
        output: &Path,
    ) -> Result<()>;
}

/// Drives the launched chain's own daemon binary.
///
/// Gentx signing uses `keyring`, which must be the keyring the validator
/// account was verified in.
#[derive(Debug, Clone)]
pub struct DaemonChain {
    command: Option<String>,
    keyring: KeyringOptions,
}

impl DaemonChain {
    /// `command` overrides the daemon otherwise derived from the source URL.
    pub fn new(command: Option<String>, keyring: KeyringOptions) -> Self {
        Self { command, keyring }
    }

    /// Full `gentx` argument list, keyring flags included.
    pub fn gentx_command(
        &self,
        chain_id: &str,
        home: &Path,
        profile: &ValidatorProfile,
        output: &Path,
    ) -> Vec<String> {
        let mut args = gentx_args(chain_id, home, profile, output);
        args.extend(self.keyring.args());
        args
    }

    fn daemon_for(&self, launch: &ChainLaunch) -> Result<Daemon> {
        match &self.command {
            Some(command) => Daemon::from_command(command),
            None => Daemon::find(&default_daemon_name(&launch.source_url)),
        }
    }
}

impl ChainDaemon for DaemonChain {
    fn init(&self, launch: &ChainLaunch, home: &Path, moniker: &str) -> Result<()> {
        let daemon = self.daemon_for(launch)?;
        let args = vec![
            "init".to_string(),
            moniker.to_string(),
            "--chain-id".to_string(),
            launch.genesis_chain_id.clone(),
            "--home".to_string(),
            path_to_string(home),
        ];
        daemon.run_checked(&args)?;
        Ok(())
    }

    fn add_genesis_account(
        &self,
        launch: &ChainLaunch,
        home: &Path,
        address: &str,
        amount: &str,
    ) -> Result<()> {
        let daemon = self.daemon_for(launch)?;
        daemon.run_checked(&add_genesis_account_args(home, address, amount))?;
        Ok(())
    }

    fn gentx(
        &self,
        launch: &ChainLaunch,
        home: &Path,
        profile: &ValidatorProfile,
        output: &Path,
    ) -> Result<()> {
        let daemon = self.daemon_for(launch)?;
        daemon.run_checked(&self.gentx_command(&launch.genesis_chain_id, home, profile, output))?;
        Ok(())
    }
}

/// Daemon binary name for a chain source, e.g. `github.com/acme/orbit` -> `orbitd`.
pub fn default_daemon_name(source_url: &str) -> String {
    let repo = source_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git");
    format!("{}d", repo.to_lowercase())
}

/// Arguments for `<daemon> add-genesis-account`. An address needs no keyring.
pub fn add_genesis_account_args(home: &Path, address: &str, amount: &str) -> Vec<String> {
    vec![
        "add-genesis-account".to_string(),
        address.to_string(),
        amount.to_string(),
        "--home".to_string(),
        path_to_string(home),
    ]
}

/// Arguments for `<daemon> gentx`, without keyring flags.
pub fn gentx_args(
    chain_id: &str,
    home: &Path,
    profile: &ValidatorProfile,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "gentx".to_string(),
        profile.account.clone(),
        profile.staking_amount.clone(),
        "--chain-id".to_string(),
        chain_id.to_string(),
        "--home".to_string(),
        path_to_string(home),
        "--output-document".to_string(),
        path_to_string(output),
        "--commission-rate".to_string(),
        profile.commission_rate.clone(),
        "--commission-max-rate".to_string(),
        profile.commission_max_rate.clone(),
        "--commission-max-change-rate".to_string(),
        profile.commission_max_change_rate.clone(),
        "--gas-prices".to_string(),
        profile.gas_price.clone(),
    ];
    let optional = [
        ("--moniker", &profile.moniker),
        ("--website", &profile.website),
        ("--details", &profile.details),
        ("--identity", &profile.identity),
        ("--security-contact", &profile.security_contact),
        ("--min-self-delegation", &profile.min_self_delegation),
    ];
    for (flag, value) in optional {
        if let Some(value) = value {
            args.push(flag.to_string());
            args.push(value.clone());
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn daemon_name_follows_repository_name() {
        assert_eq!(default_daemon_name("https://github.com/acme/orbit"), "orbitd");
        assert_eq!(default_daemon_name("https://github.com/acme/Mars.git/"), "marsd");
    }

    #[test]
    fn genesis_account_is_funded_by_address() {
        let args = add_genesis_account_args(Path::new("/h"), "spn1alice", "50000000stake");
        assert_eq!(
            args,
            ["add-genesis-account", "spn1alice", "50000000stake", "--home", "/h"]
        );
    }

    #[test]
    fn gentx_signs_from_the_configured_keyring() {
        let chain = DaemonChain::new(
            None,
            KeyringOptions {
                backend: "test".to_string(),
                dir: Some(PathBuf::from("/root/.spn")),
            },
        );
        let profile = ValidatorProfile {
            account: "alice".to_string(),
            staking_amount: "1stake".to_string(),
            ..ValidatorProfile::default()
        };
        let args = chain.gentx_command("orbit-1", Path::new("/h"), &profile, Path::new("/h/g.json"));
        assert!(args.windows(2).any(|w| w == ["--keyring-backend", "test"]));
        assert!(args.windows(2).any(|w| w == ["--keyring-dir", "/root/.spn"]));
        assert!(args.windows(2).any(|w| w == ["--home", "/h"]));
    }

    #[test]
    fn gentx_args_skip_unset_display_fields() {
        let profile = ValidatorProfile {
            account: "alice".to_string(),
            moniker: Some("node-a".to_string()),
            gas_price: "0stake".to_string(),
            staking_amount: "50000000stake".to_string(),
            commission_rate: "0.10".to_string(),
            commission_max_rate: "0.20".to_string(),
            commission_max_change_rate: "0.01".to_string(),
            ..ValidatorProfile::default()
        };
        let args = gentx_args(
            "orbit-1",
            Path::new("/h"),
            &profile,
            Path::new("/h/config/gentx/gentx.json"),
        );
        assert_eq!(&args[..3], ["gentx", "alice", "50000000stake"]);
        assert!(args.windows(2).any(|w| w == ["--moniker", "node-a"]));
        assert!(args.windows(2).any(|w| w == ["--gas-prices", "0stake"]));
        assert!(!args.iter().any(|arg| arg == "--website"));
    }
}
