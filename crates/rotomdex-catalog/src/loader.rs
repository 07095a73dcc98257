//! Index fetch, per-item fan-out and join

use crate::config::{CatalogConfig, JoinPolicy};
use crate::error::{CatalogError, FetchError, Result};
use crate::model::{CatalogEntry, DetailRecord, IndexPage, ResourceRef, SpriteSelector};
use crate::state::{ItemFailure, LoadReport, LoadState};
use reqwest::blocking::Client;
use std::time::{Duration, Instant};

/// Upstream the loader reads from
pub trait CatalogSource: Sync {
    /// Human-readable locator of the index, used in errors
    fn index_locator(&self) -> String;

    /// Up to `limit` references, in upstream order
    fn fetch_index(&self, limit: usize) -> Result<Vec<ResourceRef>, FetchError>;

    fn fetch_record(&self, reference: &ResourceRef) -> Result<DetailRecord, FetchError>;
}

/// PokeAPI-shaped HTTP upstream
pub struct HttpSource {
    client: Client,
    index_url: String,
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            index_url: config.index_url(),
            timeout,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        response
            .json()
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))
    }

    /// Raw bytes of an asset (sprites)
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;
        Ok(bytes.to_vec())
    }
}

impl CatalogSource for HttpSource {
    fn index_locator(&self) -> String {
        self.index_url.clone()
    }

    fn fetch_index(&self, limit: usize) -> Result<Vec<ResourceRef>, FetchError> {
        let page: IndexPage = self.get_json(&self.index_url, &[("limit", limit.to_string())])?;
        Ok(page.results)
    }

    fn fetch_record(&self, reference: &ResourceRef) -> Result<DetailRecord, FetchError> {
        self.get_json(&reference.url, &[])
    }
}

/// Runs one full load: index, fan-out, join
pub struct CatalogLoader<S> {
    source: S,
    policy: JoinPolicy,
    sprites: SpriteSelector,
}

impl CatalogLoader<HttpSource> {
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(Self::new(HttpSource::new(config)?)
            .with_policy(config.join_policy)
            .with_sprites(config.sprite_selector()))
    }
}

impl<S: CatalogSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: JoinPolicy::default(),
            sprites: SpriteSelector::default(),
        }
    }

    pub fn with_policy(mut self, policy: JoinPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sprites(mut self, sprites: SpriteSelector) -> Self {
        self.sprites = sprites;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load up to `limit` entries. Never panics on upstream failure; failures are
    /// reported through the returned status.
    pub fn load(&self, limit: usize) -> LoadState {
        if limit == 0 {
            return LoadState::ready(Vec::new(), LoadReport::default());
        }

        let start = Instant::now();
        let references = match self.source.fetch_index(limit) {
            Ok(mut refs) => {
                refs.truncate(limit);
                refs
            }
            Err(source) => {
                let err = CatalogError::IndexFetch {
                    url: self.source.index_locator(),
                    source,
                };
                log::error!("Failed to load catalog: {}", err.describe());
                return LoadState::failed(err.describe(), LoadReport::default());
            }
        };

        log::debug!(
            "Fetched index with {} references in {:.1}ms",
            references.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        let results = self.fetch_all(&references);
        let state = self.join(&references, results);

        log::info!(
            "Catalog load finished: {} ({:.1}ms)",
            state.report,
            start.elapsed().as_secs_f64() * 1000.0
        );
        state
    }

    /// One worker per reference, all started before any is joined.
    /// Results come back in index order.
    fn fetch_all(&self, references: &[ResourceRef]) -> Vec<Result<CatalogEntry, CatalogError>> {
        std::thread::scope(|s| {
            let handles: Vec<_> = references
                .iter()
                .map(|reference| s.spawn(move || self.fetch_entry(reference)))
                .collect();

            handles
                .into_iter()
                .zip(references)
                .map(|(handle, reference)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(CatalogError::ItemFetch {
                            name: reference.name.clone(),
                            source: FetchError::Transport("worker panicked".into()),
                        })
                    })
                })
                .collect()
        })
    }

    fn fetch_entry(&self, reference: &ResourceRef) -> Result<CatalogEntry> {
        let record = self
            .source
            .fetch_record(reference)
            .map_err(|source| CatalogError::ItemFetch {
                name: reference.name.clone(),
                source,
            })?;
        Ok(CatalogEntry::from_record(record, &self.sprites))
    }

    fn join(
        &self,
        references: &[ResourceRef],
        results: Vec<Result<CatalogEntry, CatalogError>>,
    ) -> LoadState {
        let mut entries = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (index, (reference, result)) in references.iter().zip(results).enumerate() {
            match result {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    log::warn!("{}", err.describe());
                    failures.push(ItemFailure {
                        index,
                        name: reference.name.clone(),
                        reason: err.fetch_error().map(ToString::to_string).unwrap_or_default(),
                    });
                }
            }
        }

        let report = LoadReport {
            requested: references.len(),
            loaded: entries.len(),
            failures,
        };

        match self.policy {
            JoinPolicy::AllOrNothing if !report.failures.is_empty() => {
                let first = &report.failures[0];
                let message = format!(
                    "failed to fetch record for '{}': {} ({} of {} failed)",
                    first.name,
                    first.reason,
                    report.failures.len(),
                    report.requested
                );
                log::error!("Failed to load catalog: {}", message);
                LoadState::failed(message, LoadReport { loaded: 0, ..report })
            }
            JoinPolicy::Partial if entries.is_empty() && report.requested > 0 => {
                let message = format!("no records could be fetched ({})", report);
                log::error!("Failed to load catalog: {}", message);
                LoadState::failed(message, report)
            }
            _ => LoadState::ready(entries, report),
        }
    }
}
