//! Campaign update transactions.
//!
//! A proposition batch becomes one transaction, so the chain applies all of
//! its messages or none of them.
use crate::account::{AccountRegistry, KeyringRegistry};
use crate::daemon::{path_to_string, Daemon, KeyringOptions};
use crate::error::{Error, Result};
use crate::proposal::Proposition;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;

const MSG_EDIT_CAMPAIGN: &str = "/tendermint.spn.campaign.MsgEditCampaign";
const MSG_UPDATE_TOTAL_SUPPLY: &str = "/tendermint.spn.campaign.MsgUpdateTotalSupply";
const DEFAULT_GAS_LIMIT: &str = "400000";

/// Signs and broadcasts transactions through the coordination daemon.
#[derive(Debug, Clone)]
pub struct TxSigner {
    daemon: Daemon,
    accounts: KeyringRegistry,
    from: String,
    chain_id: String,
    node: String,
    keyring: KeyringOptions,
}

impl TxSigner {
    pub fn new(
        daemon: Daemon,
        from: impl Into<String>,
        chain_id: impl Into<String>,
        node: impl Into<String>,
        keyring: KeyringOptions,
    ) -> Self {
        Self {
            accounts: KeyringRegistry::new(daemon.clone(), keyring.clone()),
            daemon,
            from: from.into(),
            chain_id: chain_id.into(),
            node: node.into(),
            keyring,
        }
    }

    pub(super) fn submit(&self, campaign_id: u64, propositions: &[Proposition]) -> Result<()> {
        if propositions.is_empty() {
            return Ok(());
        }
        let coordinator = self.accounts.get_by_name(&self.from)?;
        let unsigned = build_update_tx(&coordinator.address, campaign_id, propositions);

        let workdir = tempfile::tempdir().map_err(|err| Error::remote(format!("create tx dir: {err}")))?;
        let unsigned_path = workdir.path().join("unsigned.json");
        let signed_path = workdir.path().join("signed.json");
        let bytes = serde_json::to_vec_pretty(&unsigned)
            .map_err(|err| Error::remote(format!("serialize tx: {err}")))?;
        fs::write(&unsigned_path, bytes)
            .map_err(|err| Error::remote(format!("write {}: {err}", unsigned_path.display())))?;

        let mut sign_args = vec![
            "tx".to_string(),
            "sign".to_string(),
            path_to_string(&unsigned_path),
            "--from".to_string(),
            self.from.clone(),
            "--chain-id".to_string(),
            self.chain_id.clone(),
            "--node".to_string(),
            self.node.clone(),
            "--output-document".to_string(),
            path_to_string(&signed_path),
        ];
        sign_args.extend(self.keyring.args());
        self.daemon
            .run_checked(&sign_args)
            .map_err(|err| Error::remote(format!("sign campaign update: {err}")))?;

        let broadcast_args = vec![
            "tx".to_string(),
            "broadcast".to_string(),
            path_to_string(&signed_path),
            "--node".to_string(),
            self.node.clone(),
            "--broadcast-mode".to_string(),
            "block".to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        let stdout = self
            .daemon
            .run_checked(&broadcast_args)
            .map_err(|err| Error::remote(format!("broadcast campaign update: {err}")))?;
        let txhash = check_broadcast(&stdout)?;
        tracing::info!(
            campaign_id,
            txhash = %txhash,
            messages = propositions.len(),
            "campaign update committed"
        );
        Ok(())
    }
}

/// Build the unsigned transaction for a campaign update.
///
/// Name and metadata share one `MsgEditCampaign`; a total supply change adds
/// a `MsgUpdateTotalSupply`.
pub fn build_update_tx(coordinator: &str, campaign_id: u64, propositions: &[Proposition]) -> Value {
    let mut name = None;
    let mut metadata = None;
    let mut total_supply = None;
    for proposition in propositions {
        match proposition {
            Proposition::Name(value) => name = Some(value.as_str()),
            Proposition::Metadata(value) => metadata = Some(value.as_str()),
            Proposition::TotalSupply(coins) => total_supply = Some(coins),
        }
    }

    let mut messages = Vec::new();
    if name.is_some() || metadata.is_some() {
        let encoded = metadata
            .map(|text| base64::engine::general_purpose::STANDARD.encode(text.as_bytes()))
            .unwrap_or_default();
        messages.push(json!({
            "@type": MSG_EDIT_CAMPAIGN,
            "coordinator": coordinator,
            "campaignID": campaign_id.to_string(),
            "name": name.unwrap_or_default(),
            "metadata": encoded,
        }));
    }
    if let Some(coins) = total_supply {
        messages.push(json!({
            "@type": MSG_UPDATE_TOTAL_SUPPLY,
            "coordinator": coordinator,
            "campaignID": campaign_id.to_string(),
            "totalSupplyUpdate": coins,
        }));
    }

    json!({
        "body": {
            "messages": messages,
            "memo": "",
            "timeout_height": "0",
            "extension_options": [],
            "non_critical_extension_options": [],
        },
        "auth_info": {
            "signer_infos": [],
            "fee": {
                "amount": [],
                "gas_limit": DEFAULT_GAS_LIMIT,
                "payer": "",
                "granter": "",
            },
        },
        "signatures": [],
    })
}

#[derive(Deserialize)]
struct BroadcastResult {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    txhash: String,
    #[serde(default)]
    raw_log: String,
}

fn check_broadcast(stdout: &[u8]) -> Result<String> {
    let result: BroadcastResult = serde_json::from_slice(stdout)
        .map_err(|err| Error::remote(format!("decode broadcast result: {err}")))?;
    if result.code != 0 {
        return Err(Error::remote(format!(
            "transaction {} rejected (code {}): {}",
            result.txhash, result.code, result.raw_log
        )));
    }
    Ok(result.txhash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::Coins;
    use crate::error::ErrorKind;

    #[test]
    fn name_and_metadata_share_one_edit_message() {
        let tx = build_update_tx(
            "spn1coord",
            7,
            &[
                Proposition::Name("testnet".to_string()),
                Proposition::Metadata("hello".to_string()),
            ],
        );
        let messages = tx["body"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["@type"], MSG_EDIT_CAMPAIGN);
        assert_eq!(messages[0]["campaignID"], "7");
        assert_eq!(messages[0]["name"], "testnet");
        assert_eq!(messages[0]["metadata"], "aGVsbG8=");
    }

    #[test]
    fn total_supply_gets_its_own_message() {
        let supply = Coins::parse("1000token").unwrap();
        let tx = build_update_tx("spn1coord", 7, &[Proposition::TotalSupply(supply)]);
        let messages = tx["body"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["@type"], MSG_UPDATE_TOTAL_SUPPLY);
        assert_eq!(
            messages[0]["totalSupplyUpdate"],
            json!([{"denom": "token", "amount": "1000"}])
        );
    }

    #[test]
    fn rejected_broadcast_is_remote_failure() {
        let err = check_broadcast(br#"{"code":4,"txhash":"AB","raw_log":"unauthorized"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert_eq!(err.to_string(), "transaction AB rejected (code 4): unauthorized");
        assert_eq!(check_broadcast(br#"{"code":0,"txhash":"CD"}"#).unwrap(), "CD");
    }
}
