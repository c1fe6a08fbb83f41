use super::tx::TxSigner;
use super::{Campaign, ChainLaunch, InitialGenesis, Network};
use crate::coins::Coins;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::proposal::Proposition;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::{Duration, Instant};

/// gRPC status code the REST gateway reports for missing records.
const GRPC_NOT_FOUND: i64 = 5;
const GENESIS_LIMIT_BYTES: u64 = 256 * 1024 * 1024;

/// Coordination chain client: REST queries plus daemon-signed transactions.
pub struct SpnNetwork {
    api: String,
    agent: ureq::Agent,
    signer: TxSigner,
}

impl SpnNetwork {
    pub fn new(api_address: &str, timeout: Duration, signer: TxSigner) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            api: api_address.trim_end_matches('/').to_string(),
            agent: config.into(),
            signer,
        }
    }

    fn get(&self, ctx: &Context, url: &str, limit: Option<u64>) -> Result<(u16, Vec<u8>)> {
        ctx.ensure_active()?;
        let start = Instant::now();
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| Error::remote(format!("GET {url}: {err}")))?;
        let status = response.status().as_u16();
        let body = match limit {
            Some(limit) => response.body_mut().with_config().limit(limit).read_to_vec(),
            None => response.body_mut().read_to_vec(),
        }
        .map_err(|err| Error::remote(format!("read {url}: {err}")))?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            url,
            status,
            elapsed_ms,
            response_bytes = body.len(),
            "query complete"
        );
        ctx.ensure_active()?;
        Ok((status, body))
    }

    fn query<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        what: &'static str,
        id: u64,
        path: &str,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api);
        let (status, body) = self.get(ctx, &url, None)?;
        decode_query(what, id, status, &body)
    }
}

impl Network for SpnNetwork {
    fn fetch_chain_launch(&self, ctx: &Context, launch_id: u64) -> Result<ChainLaunch> {
        let response: ChainResponse = self.query(
            ctx,
            "launch",
            launch_id,
            &format!("/tendermint/spn/launch/chain/{launch_id}"),
        )?;
        Ok(response.chain.into_launch())
    }

    fn fetch_genesis(&self, ctx: &Context, url: &str) -> Result<Vec<u8>> {
        let (status, body) = self.get(ctx, url, Some(GENESIS_LIMIT_BYTES))?;
        if status >= 400 {
            return Err(Error::remote(format!("GET {url}: HTTP {status}")));
        }
        Ok(body)
    }

    fn fetch_campaign(&self, ctx: &Context, campaign_id: u64) -> Result<Campaign> {
        let response: CampaignResponse = self.query(
            ctx,
            "campaign",
            campaign_id,
            &format!("/tendermint/spn/campaign/campaign/{campaign_id}"),
        )?;
        Ok(response.campaign.into_campaign())
    }

    fn submit_campaign_update(
        &self,
        ctx: &Context,
        campaign_id: u64,
        propositions: &[Proposition],
    ) -> Result<()> {
        ctx.ensure_active()?;
        self.signer.submit(campaign_id, propositions)
    }
}

#[derive(Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

fn decode_query<T: DeserializeOwned>(
    what: &'static str,
    id: u64,
    status: u16,
    body: &[u8],
) -> Result<T> {
    if status >= 400 {
        let gateway: Option<GatewayError> = serde_json::from_slice(body).ok();
        let not_found = status == 404
            || gateway
                .as_ref()
                .is_some_and(|err| err.code == GRPC_NOT_FOUND);
        if not_found {
            return Err(Error::NotFound {
                what,
                id: id.to_string(),
            });
        }
        let message = gateway.map(|err| err.message).unwrap_or_default();
        return Err(Error::remote(format!(
            "query {what} {id}: HTTP {status} {message}"
        )));
    }
    serde_json::from_slice(body)
        .map_err(|err| Error::remote(format!("decode {what} {id}: {err}")))
}

#[derive(Debug, Deserialize)]
struct ChainResponse {
    chain: ChainWire,
}

#[derive(Debug, Deserialize)]
struct ChainWire {
    #[serde(rename = "launchID", deserialize_with = "u64_from_string")]
    launch_id: u64,
    #[serde(rename = "coordinatorID", deserialize_with = "u64_from_string")]
    coordinator_id: u64,
    #[serde(rename = "genesisChainID")]
    genesis_chain_id: String,
    #[serde(rename = "sourceURL", default)]
    source_url: String,
    #[serde(rename = "sourceHash", default)]
    source_hash: String,
    #[serde(rename = "initialGenesis", default)]
    initial_genesis: InitialGenesisWire,
    #[serde(rename = "hasCampaign", default)]
    has_campaign: bool,
    #[serde(rename = "campaignID", default, deserialize_with = "u64_from_string")]
    campaign_id: u64,
    #[serde(rename = "isMainnet", default)]
    is_mainnet: bool,
    #[serde(rename = "launchTriggered", default)]
    launch_triggered: bool,
}

impl ChainWire {
    fn into_launch(self) -> ChainLaunch {
        let initial_genesis = match self.initial_genesis.genesis_url {
            Some(genesis) => InitialGenesis::Url {
                url: genesis.url,
                hash: genesis.hash,
            },
            None => InitialGenesis::Default,
        };
        ChainLaunch {
            launch_id: self.launch_id,
            coordinator_id: self.coordinator_id,
            genesis_chain_id: self.genesis_chain_id,
            source_url: self.source_url,
            source_hash: self.source_hash,
            initial_genesis,
            campaign_id: self.has_campaign.then_some(self.campaign_id),
            is_mainnet: self.is_mainnet,
            launch_triggered: self.launch_triggered,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct InitialGenesisWire {
    #[serde(rename = "genesisURL", default)]
    genesis_url: Option<GenesisUrlWire>,
}

#[derive(Debug, Deserialize)]
struct GenesisUrlWire {
    url: String,
    #[serde(default)]
    hash: String,
}

#[derive(Debug, Deserialize)]
struct CampaignResponse {
    campaign: CampaignWire,
}

#[derive(Debug, Deserialize)]
struct CampaignWire {
    #[serde(rename = "campaignID", deserialize_with = "u64_from_string")]
    campaign_id: u64,
    #[serde(rename = "campaignName", default)]
    name: String,
    #[serde(rename = "coordinatorID", default, deserialize_with = "u64_from_string")]
    coordinator_id: u64,
    #[serde(rename = "mainnetID", default, deserialize_with = "u64_from_string")]
    mainnet_id: u64,
    #[serde(rename = "mainnetInitialized", default)]
    mainnet_initialized: bool,
    #[serde(rename = "totalSupply", default)]
    total_supply: Coins,
    #[serde(default)]
    metadata: String,
}

impl CampaignWire {
    fn into_campaign(self) -> Campaign {
        // Metadata is proto `bytes`, base64 on the wire.
        let metadata = base64::engine::general_purpose::STANDARD
            .decode(self.metadata.as_bytes())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or(self.metadata);
        Campaign {
            campaign_id: self.campaign_id,
            name: self.name,
            coordinator_id: self.coordinator_id,
            mainnet_id: self.mainnet_id,
            mainnet_initialized: self.mainnet_initialized,
            total_supply: self.total_supply,
            metadata,
        }
    }
}

/// Proto uint64 fields arrive as JSON strings; accept plain numbers too.
fn u64_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
