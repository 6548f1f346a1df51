//! Item registry boundary: the host enumerates items and answers tag queries.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::CatalogError;
use crate::resource::ResourceLocation;

pub trait ItemCatalog {
    /// Every known item. Order carries no meaning.
    fn items(&self) -> Vec<ResourceLocation>;

    fn has_tag(&self, item: &ResourceLocation, tag: &ResourceLocation) -> bool;
}

#[derive(Deserialize)]
struct CatalogFile {
    items: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    id: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Item catalog read from a JSON dump of the host registry:
/// `{"items": [{"id": "create:zinc_ingot", "tags": ["c:ingots"]}]}`.
#[derive(Debug, Default, Clone)]
pub struct JsonCatalog {
    order: Vec<ResourceLocation>,
    tags: HashMap<ResourceLocation, HashSet<ResourceLocation>>,
}

impl JsonCatalog {
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let data: CatalogFile =
            serde_json::from_reader(file).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_entries(data.items))
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_entries(data.items))
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self::default();

        for entry in entries {
            let id = match entry.id.parse::<ResourceLocation>() {
                Ok(id) => id,
                Err(e) => {
                    debug!(id = %entry.id, error = %e, "skipping malformed item id");
                    continue;
                }
            };
            let tags = entry.tags.iter().filter_map(|t| t.parse().ok()).collect();
            catalog.insert(id, tags);
        }

        catalog
    }

    pub fn insert(&mut self, id: ResourceLocation, tags: HashSet<ResourceLocation>) {
        if !self.tags.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.tags.entry(id).or_default().extend(tags);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ItemCatalog for JsonCatalog {
    fn items(&self) -> Vec<ResourceLocation> {
        self.order.clone()
    }

    fn has_tag(&self, item: &ResourceLocation, tag: &ResourceLocation) -> bool {
        self.tags.get(item).is_some_and(|tags| tags.contains(tag))
    }
}
