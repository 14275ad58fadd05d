//! Settings and agent seed file
//!
//! The registry is populated from a TOML file, never from data baked into
//! the core: `[[agents]]` tables plus an optional `[interaction]` section.

use anyhow::{Context, Result};
use scrapedeck_core::{Agent, InteractionConfig};
use serde::Deserialize;
use std::path::Path;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "scrapedeck.toml";

/// Environment variable overriding the simulated response delay
pub const ENV_RESPONSE_DELAY_MS: &str = "SCRAPEDECK_RESPONSE_DELAY_MS";

/// Parsed settings file.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Interaction controller configuration
    #[serde(default)]
    pub interaction: InteractionConfig,
    /// Agent seed list
    #[serde(default)]
    pub agents: Vec<Agent>,
}

impl Settings {
    /// Load settings from `path`, applying environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let mut settings =
            Self::from_toml(&raw).with_context(|| format!("parsing {}", path.display()))?;

        if let Ok(value) = std::env::var(ENV_RESPONSE_DELAY_MS) {
            settings.interaction.response_delay_ms = value
                .parse()
                .with_context(|| format!("parsing {}={}", ENV_RESPONSE_DELAY_MS, value))?;
        }
        Ok(settings)
    }

    /// Parse settings from a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
