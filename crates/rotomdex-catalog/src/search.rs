//! Name filter over the loaded entries

use crate::model::CatalogEntry;

/// Query plus the derived result set.
///
/// Results are stored as indices into the entry slice they were computed from, so the
/// filter never owns or mutates entries. Callers must hand the same slice back to
/// [`SearchState::results`] / [`SearchState::visible`], or call [`SearchState::refresh`]
/// after replacing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    results: Vec<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// A blank (empty or whitespace-only) query means "show everything"
    pub fn is_filtered(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn set_query(&mut self, query: &str, entries: &[CatalogEntry]) {
        self.query = query.to_string();
        self.refresh(entries);
    }

    /// Recompute results for the current query against `entries`
    pub fn refresh(&mut self, entries: &[CatalogEntry]) {
        self.results = if self.is_filtered() {
            filter_indices(entries, &self.query)
        } else {
            Vec::new()
        };
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
    }

    /// Matching entries; empty when unfiltered
    pub fn results<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        self.results.iter().filter_map(|&i| entries.get(i)).collect()
    }

    /// What the display shows: all entries when unfiltered, otherwise the results
    pub fn visible<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        if self.is_filtered() {
            self.results(entries)
        } else {
            entries.iter().collect()
        }
    }
}

/// Case-insensitive substring test. `needle` must already be lower-cased.
pub fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

/// Indices of entries whose name contains `query`, in entry order
pub fn filter_indices(entries: &[CatalogEntry], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| name_matches(&e.name, &needle))
        .map(|(i, _)| i)
        .collect()
}
