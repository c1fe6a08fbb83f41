//! Signing account lookup.
use crate::daemon::{Daemon, KeyringOptions};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A key known to the local keyring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub address: String,
}

pub trait AccountRegistry {
    /// Look up a key by name, failing with `NotFound` when it is unknown.
    fn get_by_name(&self, name: &str) -> Result<Account>;
}

/// Registry backed by `<daemon> keys show`.
#[derive(Debug, Clone)]
pub struct KeyringRegistry {
    daemon: Daemon,
    keyring: KeyringOptions,
}

impl KeyringRegistry {
    pub fn new(daemon: Daemon, keyring: KeyringOptions) -> Self {
        Self { daemon, keyring }
    }
}

impl AccountRegistry for KeyringRegistry {
    fn get_by_name(&self, name: &str) -> Result<Account> {
        let mut args = vec![
            "keys".to_string(),
            "show".to_string(),
            name.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        args.extend(self.keyring.args());
        let output = self.daemon.run(&args)?;
        if !output.status.success() {
            tracing::debug!(
                account = name,
                detail = %crate::daemon::failure_detail(&output),
                "key lookup failed"
            );
            return Err(Error::NotFound {
                what: "account",
                id: name.to_string(),
            });
        }
        parse_key_listing(name, &output.stdout)
    }
}

fn parse_key_listing(name: &str, stdout: &[u8]) -> Result<Account> {
    let account: Account = serde_json::from_slice(stdout).map_err(|err| Error::Daemon {
        program: "keys show".to_string(),
        detail: format!("parse key listing for {name}: {err}"),
    })?;
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_show_output() {
        let stdout = br#"{"name":"alice","type":"local","address":"spn1xyz","pubkey":"{}"}"#;
        let account = parse_key_listing("alice", stdout).unwrap();
        assert_eq!(account.name, "alice");
        assert_eq!(account.address, "spn1xyz");
    }

    #[cfg(unix)]
    #[test]
    fn failing_lookup_is_not_found() {
        let registry = KeyringRegistry::new(
            Daemon::new("false"),
            KeyringOptions {
                backend: "test".to_string(),
                dir: None,
            },
        );
        let err = registry.get_by_name("ghost").unwrap_err();
        assert_eq!(err.to_string(), "account ghost not found");
    }
}
