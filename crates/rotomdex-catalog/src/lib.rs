//! Catalog loading and name filtering.
//!
//! [`CatalogLoader`] fetches an index of references, fans out one request per
//! reference, and joins the records into a [`LoadState`] in index order.
//! [`Catalog`] owns the latest load together with a [`SearchState`] and exposes the
//! view the presentation layer renders via [`Catalog::visible`].

pub mod category;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod search;
pub mod state;

pub use category::{badge_text, category_color, category_color_or_fallback, Rgb};
pub use config::{CatalogConfig, JoinPolicy};
pub use error::{CatalogError, FetchError};
pub use loader::{CatalogLoader, CatalogSource, HttpSource};
pub use model::{CatalogEntry, DetailRecord, ResourceRef, SpriteSelector};
pub use search::SearchState;
pub use state::{Catalog, ItemFailure, LoadReport, LoadState, LoadStatus};
