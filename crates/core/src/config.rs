//! Client configuration loaded from TOML

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub const DEFAULT_API_URL: &str = "https://skillsetzone-1.onrender.com";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Period of the background top-skills refresh
    #[serde(default = "default_top_skills_refresh_secs")]
    pub top_skills_refresh_secs: u64,
    #[serde(default)]
    pub search_policy: StalePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            top_skills_refresh_secs: default_top_skills_refresh_secs(),
            search_policy: StalePolicy::default(),
        }
    }
}

impl SyncConfig {
    pub fn top_skills_refresh(&self) -> Duration {
        Duration::from_secs(self.top_skills_refresh_secs.max(1))
    }
}

fn default_top_skills_refresh_secs() -> u64 {
    30
}

/// What a search stream does with a response that arrives after a newer query was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Drop responses from superseded queries
    #[default]
    DiscardStale,
    /// Whatever arrives last is displayed, even if it answers an older query
    LastArrivalWins,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Overrides the platform data directory for the stored credential
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
