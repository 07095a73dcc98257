use crate::error::{CatalogError, Result};
use crate::model::SpriteSelector;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_RESOURCE: &str = "pokemon";
pub const DEFAULT_LIMIT: usize = 151;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How per-item results are combined at the join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Any failed item fails the whole load
    #[default]
    AllOrNothing,
    /// Keep whatever loaded and report the rest
    Partial,
}

/// Catalog loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub resource: String,
    pub limit: usize,
    /// Per-request deadline in seconds, 0 disables it
    pub timeout_secs: u64,
    pub join_policy: JoinPolicy,
    /// JSON pointers into `sprites`, tried in order
    pub sprite_pointers: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            join_policy: JoinPolicy::default(),
            sprite_pointers: SpriteSelector::default().pointers().to_vec(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn sprite_selector(&self) -> SpriteSelector {
        SpriteSelector::new(self.sprite_pointers.iter().cloned())
    }

    /// Listing endpoint, without the query string
    pub fn index_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.resource.trim_matches('/')
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.resource.trim_matches('/').is_empty() {
            return Err(CatalogError::Config("resource must not be empty".into()));
        }
        if let Some(bad) = self.sprite_pointers.iter().find(|p| !p.starts_with('/')) {
            return Err(CatalogError::Config(format!(
                "sprite pointer '{}' must start with '/'",
                bad
            )));
        }
        Ok(())
    }
}
