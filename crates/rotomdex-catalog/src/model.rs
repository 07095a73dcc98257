//! Upstream wire types and the aggregated catalog entry

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lightweight reference returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    /// Locator of the full record
    pub url: String,
}

/// Listing endpoint response: `{ "results": [{ "name", "url" }, ...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct IndexPage {
    pub results: Vec<ResourceRef>,
}

/// `{ "name": ..., "url": ... }` as nested inside detail records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One entry of a record's `types` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Full record from the detail endpoint.
///
/// Only `name` and `types` are interpreted; every other field (including `sprites`)
/// lands in `rest` and is carried through to the entry untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailRecord {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Aggregated catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Sprite URL; `None` when the record lacks every configured variant
    pub image_ref: Option<String>,
    /// Category labels in upstream order
    pub categories: Vec<String>,
    /// Upstream fields not interpreted by the catalog
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_ref: None,
            categories: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Build an entry from a detail record, picking the sprite with `sprites`
    pub fn from_record(record: DetailRecord, sprites: &SpriteSelector) -> Self {
        let categories = record.types.into_iter().map(|t| t.kind.name).collect();
        let image_ref = record
            .rest
            .get("sprites")
            .and_then(|s| sprites.select(s))
            .map(str::to_string);

        Self {
            name: record.name,
            image_ref,
            categories,
            extra: record.rest,
        }
    }

    /// Numeric upstream id, when present
    pub fn id(&self) -> Option<u64> {
        self.extra.get("id").and_then(Value::as_u64)
    }

    /// Passthrough integer field (e.g. `height`, `weight`)
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(Value::as_u64)
    }
}

/// Picks a sprite URL out of a record's `sprites` object.
///
/// Pointers are tried in order; the first that resolves to a string wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSelector {
    pointers: Vec<String>,
}

impl SpriteSelector {
    pub const DIAMOND_PEARL_FRONT: &str =
        "/versions/generation-iv/diamond-pearl/front_default";
    pub const FRONT_DEFAULT: &str = "/front_default";

    pub fn new<I, S>(pointers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pointers: pointers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn pointers(&self) -> &[String] {
        &self.pointers
    }

    pub fn select<'a>(&self, sprites: &'a Value) -> Option<&'a str> {
        self.pointers
            .iter()
            .find_map(|p| sprites.pointer(p).and_then(Value::as_str))
    }
}

impl Default for SpriteSelector {
    fn default() -> Self {
        Self::new([Self::DIAMOND_PEARL_FRONT, Self::FRONT_DEFAULT])
    }
}
