//! Rendering of command results for the terminal.
use crate::network::Campaign;
use anyhow::{Context, Result};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Serialize an updated campaign in the requested format.
pub fn render_campaign(campaign: &Campaign, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(campaign).context("serialize campaign as yaml")?
        }
        OutputFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(campaign).context("serialize campaign as json")?;
            text.push('\n');
            text
        }
    };
    Ok(text)
}

/// Line printed after a successful chain init.
pub fn gentx_line(path: &std::path::Path) -> String {
    format!("⋆ Gentx generated: {}", path.display())
}
