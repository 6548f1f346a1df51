//! Namespaced `namespace:path` identifiers shared by items and textures.

use std::fmt;
use std::str::FromStr;

use crate::error::ResourceError;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    pub fn new(namespace: &str, path: &str) -> Result<Self, ResourceError> {
        let display = format!("{namespace}:{path}");

        if namespace.is_empty() {
            return Err(ResourceError::Invalid(display, "empty namespace"));
        }
        if path.is_empty() {
            return Err(ResourceError::Invalid(display, "empty path"));
        }
        if !namespace.chars().all(|c| valid_char(c, false)) {
            return Err(ResourceError::Invalid(display, "illegal character in namespace"));
        }
        if !path.chars().all(|c| valid_char(c, true)) {
            return Err(ResourceError::Invalid(display, "illegal character in path"));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn valid_char(c: char, allow_slash: bool) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-') || (allow_slash && c == '/')
}

impl FromStr for ResourceLocation {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl serde::Serialize for ResourceLocation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ResourceLocation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Where an item's own inventory sprite lives, e.g. `create:textures/item/zinc_ingot.png`.
pub fn ingot_texture_location(item: &ResourceLocation) -> ResourceLocation {
    ResourceLocation {
        namespace: item.namespace.clone(),
        path: format!("textures/item/{}.png", item.path),
    }
}

/// Where the generated pile texture for `metal` is served from.
pub fn pile_texture_location(
    namespace: &str,
    prefix: &str,
    metal: &str,
) -> Result<ResourceLocation, ResourceError> {
    ResourceLocation::new(namespace, &format!("{prefix}{metal}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_ids() {
        let loc: ResourceLocation = "create:zinc_ingot".parse().unwrap();
        assert_eq!(loc.namespace(), "create");
        assert_eq!(loc.path(), "zinc_ingot");
        assert_eq!(loc.to_string(), "create:zinc_ingot");
    }

    #[test]
    fn bare_path_defaults_namespace() {
        let loc: ResourceLocation = "iron_ingot".parse().unwrap();
        assert_eq!(loc.namespace(), "minecraft");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", ":x", "mod:", "Mod:x", "mod:Zinc", "mod:a b", "a/b:c"] {
            assert!(bad.parse::<ResourceLocation>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn texture_locations() {
        let item: ResourceLocation = "mekanism:ingot_osmium".parse().unwrap();
        assert_eq!(
            ingot_texture_location(&item).to_string(),
            "mekanism:textures/item/ingot_osmium.png"
        );
        assert_eq!(
            pile_texture_location("tfc", "textures/block/metal/smooth/", "osmium")
                .unwrap()
                .to_string(),
            "tfc:textures/block/metal/smooth/osmium.png"
        );
    }
}
