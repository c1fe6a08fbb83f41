//! Campaign propositions built from optional update fields.
use crate::coins::Coins;
use crate::error::Result;
use serde::Serialize;

/// A single named change requested against a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Proposition {
    Name(String),
    Metadata(String),
    TotalSupply(Coins),
}

impl Proposition {
    pub fn label(&self) -> &'static str {
        match self {
            Proposition::Name(_) => "name",
            Proposition::Metadata(_) => "metadata",
            Proposition::TotalSupply(_) => "total-supply",
        }
    }
}

/// Requested campaign changes. `None` means the field was not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignFields {
    pub name: Option<String>,
    pub metadata: Option<String>,
    pub total_supply: Option<Coins>,
}

impl CampaignFields {
    /// Build fields from raw option values, parsing the total supply.
    ///
    /// Empty strings and an empty coin list count as not provided.
    pub fn from_raw(
        name: Option<&str>,
        metadata: Option<&str>,
        total_supply: Option<&str>,
    ) -> Result<Self> {
        let total_supply = match total_supply {
            Some(text) => Some(Coins::parse(text)?).filter(|coins| !coins.is_empty()),
            None => None,
        };
        Ok(Self {
            name: non_empty(name),
            metadata: non_empty(metadata),
            total_supply,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.metadata.is_none() && self.total_supply.is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|text| !text.is_empty()).map(str::to_string)
}

/// Build propositions in fixed order: name, metadata, total supply.
pub fn build_propositions(fields: &CampaignFields) -> Vec<Proposition> {
    let mut propositions = Vec::new();
    if let Some(name) = &fields.name {
        propositions.push(Proposition::Name(name.clone()));
    }
    if let Some(metadata) = &fields.metadata {
        propositions.push(Proposition::Metadata(metadata.clone()));
    }
    if let Some(total_supply) = fields.total_supply.as_ref().filter(|c| !c.is_empty()) {
        propositions.push(Proposition::TotalSupply(total_supply.clone()));
    }
    propositions
}
