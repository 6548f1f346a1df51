//! Finds ingots among the host's items and derives a metal name for each.

use std::sync::LazyLock;

use indexmap::IndexMap;
use indexmap::map::Entry;
use phf::phf_set;
use regex::Regex;
use tracing::{debug, trace};

use crate::catalog::ItemCatalog;
use crate::config::Settings;
use crate::paths::is_plain_file_stem;
use crate::resource::ResourceLocation;

/// Namespaces whose ingots already ship their own pile textures.
static BUILTIN_SKIPPED: phf::Set<&'static str> = phf_set! {
    "tfc",
};

static INGOT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(.+)_ingot|ingot_(.+))").expect("ingot pattern is a valid regex")
});

/// Metal name from an item path: `lead_ingot` and `ingot_lead` both give `lead`.
///
/// A leading `double_`, then a leading `raw_`, is dropped. Names that would
/// not be a single file name (nested paths, dots) give `None`.
pub fn extract_metal_name(path: &str) -> Option<String> {
    let captures = INGOT_PATTERN.captures(path)?;
    let raw = captures.get(1).or_else(|| captures.get(2))?.as_str();

    let name = raw.strip_prefix("double_").unwrap_or(raw);
    let name = name.strip_prefix("raw_").unwrap_or(name);

    is_plain_file_stem(name).then(|| name.to_string())
}

pub fn metal_name_for(item: &ResourceLocation) -> Option<String> {
    extract_metal_name(item.path())
}

/// Map each metal name to the first ingot item found for it.
pub fn discover_metals(
    catalog: &dyn ItemCatalog,
    settings: &Settings,
) -> IndexMap<String, ResourceLocation> {
    let ingot_tag = settings.ingot_tag_location().ok();
    let mut metals = IndexMap::new();

    for item in catalog.items() {
        let tagged = ingot_tag
            .as_ref()
            .is_some_and(|tag| catalog.has_tag(&item, tag));
        if !tagged && !item.path().contains("ingot") {
            continue;
        }

        let Some(metal) = metal_name_for(&item) else {
            trace!(%item, "ingot does not follow a naming convention");
            continue;
        };

        if is_skipped(item.namespace(), settings) {
            continue;
        }

        match metals.entry(metal) {
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
            Entry::Occupied(existing) => {
                trace!(metal = %existing.key(), kept = %existing.get(), ignored = %item, "duplicate metal");
            }
        }
    }

    debug!(count = metals.len(), "discovered metals");
    metals
}

fn is_skipped(namespace: &str, settings: &Settings) -> bool {
    BUILTIN_SKIPPED.contains(namespace) || settings.skip_namespaces.iter().any(|s| s == namespace)
}
