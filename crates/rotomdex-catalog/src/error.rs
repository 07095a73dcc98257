//! Error types for catalog loading

use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classify a reqwest error. `timeout` is the deadline the client was built with.
    pub fn from_reqwest(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout(timeout.unwrap_or_default());
        }
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }
        if err.is_decode() {
            return FetchError::Decode(err.to_string());
        }
        FetchError::Transport(err.to_string())
    }
}

/// Catalog-level error: which stage of the load failed
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch index {url}")]
    IndexFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to fetch record for '{name}'")]
    ItemFetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CatalogError {
    /// Underlying fetch failure, if any
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            CatalogError::IndexFetch { source, .. } | CatalogError::ItemFetch { source, .. } => {
                Some(source)
            }
            CatalogError::Config(_) => None,
        }
    }

    /// Single-line description including the cause, for status lines and logs
    pub fn describe(&self) -> String {
        match self.fetch_error() {
            Some(cause) => format!("{}: {}", self, cause),
            None => self.to_string(),
        }
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
