//! `info` command: site metadata as JSON.

use anyhow::{Context, Result};

use crate::config::SiteConfig;

/// Render `[site.info]` as JSON.
pub fn metadata_json(config: &SiteConfig, pretty: bool) -> Result<String> {
    let metadata = config.metadata();
    let json = if pretty {
        serde_json::to_string_pretty(metadata)
    } else {
        serde_json::to_string(metadata)
    };
    json.context("Failed to serialize site metadata")
}

pub fn print_info(config: &SiteConfig, pretty: bool) -> Result<()> {
    println!("{}", metadata_json(config, pretty)?);
    Ok(())
}
