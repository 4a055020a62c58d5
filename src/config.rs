use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::hetzner;

/// A single DNS record to keep pointed at this host, identified by the zone's
/// domain name and the record's name within that zone.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub zone: String,
    pub record: String,
}

#[derive(Deserialize)]
pub struct Config {
    pub api_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub targets: Vec<Target>,
}

fn default_api_url() -> String {
    hetzner::DEFAULT_API_URL.to_string()
}

// The token must never end up in log output, so Debug is written by hand.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"**********")
            .field("api_url", &self.api_url)
            .field("targets", &self.targets)
            .finish()
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
    let config = parse(&raw)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))?;
    if config.api_token.is_empty() {
        return Err(Error::config(format!(
            "api_token in {} must not be empty",
            path.display()
        )));
    }
    Ok(config)
}

fn parse(raw: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(raw)
}
