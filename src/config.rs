//! Layered configuration: defaults, config file, environment, flags.
use crate::daemon::KeyringOptions;
use crate::error::{Error, Result};
use crate::validator::DEFAULT_ACCOUNT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const SPN_HOME_DIR: &str = ".spn";

pub const ENV_API: &str = "NETLAUNCH_API";
pub const ENV_RPC: &str = "NETLAUNCH_RPC";
pub const ENV_FROM: &str = "NETLAUNCH_FROM";
pub const ENV_KEYRING_BACKEND: &str = "NETLAUNCH_KEYRING_BACKEND";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub schema_version: u32,
    /// REST endpoint of the coordination chain.
    pub api_address: String,
    /// RPC endpoint used to sign and broadcast.
    pub rpc_address: String,
    pub spn_chain_id: String,
    /// Coordination daemon command, split shell-style.
    pub spn_binary: String,
    /// Account that signs campaign updates.
    pub from: String,
    pub keyring_backend: String,
    /// Keyring location; defaults to the coordination daemon home `~/.spn`.
    pub keyring_dir: Option<PathBuf>,
    /// Base directory for per-launch chain homes.
    pub networks_root: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            api_address: "http://localhost:1317".to_string(),
            rpc_address: "http://localhost:26657".to_string(),
            spn_chain_id: "spn-1".to_string(),
            spn_binary: "spnd".to_string(),
            from: DEFAULT_ACCOUNT.to_string(),
            keyring_backend: "test".to_string(),
            keyring_dir: None,
            networks_root: None,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Keyring shared by the account check, transaction signing and gentx.
    ///
    /// The directory is always set; chain daemons would otherwise look for
    /// keys inside the fresh launch home.
    pub fn keyring(&self) -> KeyringOptions {
        let dir = self
            .keyring_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(SPN_HOME_DIR)));
        KeyringOptions {
            backend: self.keyring_backend.clone(),
            dir,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the base directory for chain homes, defaulting under `$HOME`.
    pub fn networks_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.networks_root {
            return Ok(root.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;
        Ok(home.join(".netlaunch").join("networks"))
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_address: Option<String>,
    pub rpc_address: Option<String>,
    pub from: Option<String>,
    pub keyring_backend: Option<String>,
    pub keyring_dir: Option<PathBuf>,
}

/// `~/.netlaunch/config.json`, when a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".netlaunch").join("config.json"))
}

/// Load configuration from `path`, or from the default path when present.
///
/// An explicit path must exist; a missing default file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };
    let bytes = fs::read(&path)
        .map_err(|err| Error::Config(format!("read {}: {err}", path.display())))?;
    let config: Config = serde_json::from_slice(&bytes)
        .map_err(|err| Error::Config(format!("parse {}: {err}", path.display())))?;
    Ok(config)
}

/// Apply environment overrides through `lookup`.
pub fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    if let Some(value) = non_empty(ENV_API) {
        config.api_address = value;
    }
    if let Some(value) = non_empty(ENV_RPC) {
        config.rpc_address = value;
    }
    if let Some(value) = non_empty(ENV_FROM) {
        config.from = value;
    }
    if let Some(value) = non_empty(ENV_KEYRING_BACKEND) {
        config.keyring_backend = value;
    }
}

pub fn apply_overrides(config: &mut Config, overrides: ConfigOverrides) {
    if let Some(value) = overrides.api_address {
        config.api_address = value;
    }
    if let Some(value) = overrides.rpc_address {
        config.rpc_address = value;
    }
    if let Some(value) = overrides.from {
        config.from = value;
    }
    if let Some(value) = overrides.keyring_backend {
        config.keyring_backend = value;
    }
    if let Some(value) = overrides.keyring_dir {
        config.keyring_dir = Some(value);
    }
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(Error::Config(format!(
            "unsupported config schema_version {}",
            config.schema_version
        )));
    }
    for (label, address) in [
        ("api_address", &config.api_address),
        ("rpc_address", &config.rpc_address),
    ] {
        if !(address.starts_with("http://") || address.starts_with("https://")) {
            return Err(Error::Config(format!(
                "{label} must be an http(s) URL (got {address:?})"
            )));
        }
    }
    if config.spn_binary.trim().is_empty() {
        return Err(Error::Config("spn_binary must not be empty".to_string()));
    }
    if config.from.trim().is_empty() {
        return Err(Error::Config("from must not be empty".to_string()));
    }
    if config.timeout_secs == 0 {
        return Err(Error::Config("timeout_secs must be greater than 0".to_string()));
    }
    Ok(())
}
