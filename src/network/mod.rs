//! Remote state of the coordination chain.
//!
//! Workflows read launch and campaign records and submit campaign changes
//! through the [`Network`] trait only; [`SpnNetwork`] is the REST + daemon
//! implementation used by the binary.
mod http;
mod tx;

pub use http::SpnNetwork;
pub use tx::{build_update_tx, TxSigner};

use crate::coins::Coins;
use crate::context::Context;
use crate::error::Result;
use crate::proposal::Proposition;
use serde::Serialize;

/// Where a launch takes its initial genesis from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialGenesis {
    /// The genesis produced by the chain daemon's own `init`.
    Default,
    /// A published genesis file, optionally pinned by SHA-256.
    Url { url: String, hash: String },
}

/// A proposed chain launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainLaunch {
    pub launch_id: u64,
    pub coordinator_id: u64,
    pub genesis_chain_id: String,
    pub source_url: String,
    pub source_hash: String,
    pub initial_genesis: InitialGenesis,
    pub campaign_id: Option<u64>,
    pub is_mainnet: bool,
    pub launch_triggered: bool,
}

/// A campaign record as stored on the coordination chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    pub campaign_id: u64,
    pub name: String,
    pub coordinator_id: u64,
    pub mainnet_id: u64,
    pub mainnet_initialized: bool,
    pub total_supply: Coins,
    pub metadata: String,
}

/// Remote boundary consumed by the workflows.
pub trait Network {
    fn fetch_chain_launch(&self, ctx: &Context, launch_id: u64) -> Result<ChainLaunch>;

    /// Download a published genesis file.
    fn fetch_genesis(&self, ctx: &Context, url: &str) -> Result<Vec<u8>>;

    fn fetch_campaign(&self, ctx: &Context, campaign_id: u64) -> Result<Campaign>;

    /// Apply every proposition or none of them.
    fn submit_campaign_update(
        &self,
        ctx: &Context,
        campaign_id: u64,
        propositions: &[Proposition],
    ) -> Result<()>;
}
