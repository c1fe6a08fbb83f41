//! Orchestration of the two launch workflows.
//!
//! Each workflow is a straight sequence of steps over injected
//! collaborators; the first failing step aborts the run and its error is
//! returned unchanged.
mod campaign_update;
mod chain_init;

pub use campaign_update::{run_campaign_update, CampaignUpdateOptions};
pub use chain_init::{run_chain_init, ChainInitOptions, ChainInitOutcome, ChainInitServices};
