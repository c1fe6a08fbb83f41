//! `campaign update`: submit name, metadata or supply changes.
use crate::context::Context;
use crate::error::{Error, Result};
use crate::id::parse_id;
use crate::network::{Campaign, Network};
use crate::proposal::{build_propositions, CampaignFields};

const UPDATE_FLAGS: [&str; 3] = ["name", "metadata", "total-supply"];

/// Raw update request; `None` and empty strings both mean "not provided".
#[derive(Debug, Clone, Default)]
pub struct CampaignUpdateOptions {
    pub campaign_id: String,
    pub name: Option<String>,
    pub metadata: Option<String>,
    pub total_supply: Option<String>,
}

/// Apply the requested changes and return the campaign as stored afterwards.
pub fn run_campaign_update(
    ctx: &Context,
    network: &dyn Network,
    options: &CampaignUpdateOptions,
) -> Result<Campaign> {
    let campaign_id = parse_id(&options.campaign_id)?;
    tracing::debug!(campaign_id, "identifier parsed");

    let fields = CampaignFields::from_raw(
        options.name.as_deref(),
        options.metadata.as_deref(),
        options.total_supply.as_deref(),
    )?;
    if fields.is_empty() {
        return Err(Error::NoFieldsProvided {
            flags: UPDATE_FLAGS.to_vec(),
        });
    }

    let propositions = build_propositions(&fields);
    tracing::debug!(
        campaign_id,
        propositions = ?propositions.iter().map(|p| p.label()).collect::<Vec<_>>(),
        "propositions built"
    );

    ctx.ensure_active()?;
    let current = network.fetch_campaign(ctx, campaign_id)?;
    tracing::debug!(campaign_id, name = %current.name, "campaign fetched");

    ctx.ensure_active()?;
    network.submit_campaign_update(ctx, campaign_id, &propositions)?;
    tracing::info!(campaign_id, count = propositions.len(), "campaign update submitted");

    ctx.ensure_active()?;
    network.fetch_campaign(ctx, campaign_id)
}
