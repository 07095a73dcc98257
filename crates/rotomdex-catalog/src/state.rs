//! Load lifecycle and the catalog the presentation layer reads from

use crate::model::CatalogEntry;
use crate::search::SearchState;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Item that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Position in the index
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Outcome counts of one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub requested: usize,
    pub loaded: usize,
    pub failures: Vec<ItemFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.loaded == self.requested
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} loaded", self.loaded, self.requested)
    }
}

/// Result of a catalog load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState {
    pub status: LoadStatus,
    pub entries: Vec<CatalogEntry>,
    pub report: LoadReport,
}

impl LoadState {
    pub fn loading() -> Self {
        Self {
            status: LoadStatus::Loading,
            entries: Vec::new(),
            report: LoadReport::default(),
        }
    }

    pub fn ready(entries: Vec<CatalogEntry>, report: LoadReport) -> Self {
        Self {
            status: LoadStatus::Ready,
            entries,
            report,
        }
    }

    /// Failed loads never expose entries
    pub fn failed(message: impl Into<String>, report: LoadReport) -> Self {
        Self {
            status: LoadStatus::Failed(message.into()),
            entries: Vec::new(),
            report,
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Owned catalog: the current load plus the active search over it
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    load: LoadState,
    search: SearchState,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_load(load: LoadState) -> Self {
        let mut catalog = Self::new();
        catalog.apply(load);
        catalog
    }

    /// Install a (re)load result. The active query is re-applied to the new entries.
    ///
    /// A failed reload records its status and report but keeps the entries of the
    /// previous load; only a successful load replaces them.
    pub fn apply(&mut self, load: LoadState) {
        if load.status.failure().is_some() && !self.load.entries.is_empty() {
            self.load.status = load.status;
            self.load.report = load.report;
        } else {
            self.load = load;
        }
        self.search.refresh(&self.load.entries);
    }

    /// Go back to `Loading` for a reload, keeping the current entries visible
    pub fn begin_reload(&mut self) {
        self.load.status = LoadStatus::Loading;
    }

    pub fn status(&self) -> &LoadStatus {
        &self.load.status
    }

    pub fn report(&self) -> &LoadReport {
        &self.load.report
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.load.entries
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn is_filtered(&self) -> bool {
        self.search.is_filtered()
    }

    pub fn set_query(&mut self, query: &str) {
        self.search.set_query(query, &self.load.entries);
    }

    pub fn clear(&mut self) {
        self.search.clear();
    }

    pub fn results(&self) -> Vec<&CatalogEntry> {
        self.search.results(&self.load.entries)
    }

    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.search.visible(&self.load.entries)
    }
}
