//! Runtime settings, loaded from an optional JSON file.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::resource::{ResourceLocation, pile_texture_location};

/// Whether the template is decoded once per session or on every synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePolicy {
    #[default]
    Cached,
    /// For hosts that can swap assets while running.
    Reload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pack_name: String,
    pub pack_description: String,
    pub pack_format: u32,
    /// Namespace the generated textures are served under.
    pub pack_namespace: String,
    /// Directory prefix of generated textures, with a trailing `/`.
    pub texture_prefix: String,
    pub template: String,
    pub template_fallback: String,
    pub ingot_tag: String,
    /// Namespaces whose ingots are ignored in addition to the built-in ones.
    pub skip_namespaces: Vec<String>,
    pub template_policy: TemplatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pack_name: "TFC AutoIngots Generated".to_string(),
            pack_description: "Auto-generated TFC ingot pile textures".to_string(),
            pack_format: 34,
            pack_namespace: "tfc".to_string(),
            texture_prefix: "textures/block/metal/smooth/".to_string(),
            template: "tfcautoingots:textures/block/metal/smooth/template.png".to_string(),
            template_fallback: "tfc:textures/block/metal/smooth/copper.png".to_string(),
            ingot_tag: "c:ingots".to_string(),
            skip_namespaces: Vec::new(),
            template_policy: TemplatePolicy::Cached,
        }
    }
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pack_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "pack_name",
                reason: "must not be empty",
            });
        }
        if !self.texture_prefix.ends_with('/') {
            return Err(ConfigError::Invalid {
                field: "texture_prefix",
                reason: "must end with '/'",
            });
        }
        self.template_location()?;
        self.template_fallback_location()?;
        self.ingot_tag_location()?;
        // A probe name catches a bad namespace or prefix before any generation runs.
        pile_texture_location(&self.pack_namespace, &self.texture_prefix, "probe").map_err(
            |source| ConfigError::Location {
                field: "pack_namespace",
                source,
            },
        )?;
        Ok(())
    }

    pub fn template_location(&self) -> Result<ResourceLocation, ConfigError> {
        parse_field("template", &self.template)
    }

    pub fn template_fallback_location(&self) -> Result<ResourceLocation, ConfigError> {
        parse_field("template_fallback", &self.template_fallback)
    }

    pub fn ingot_tag_location(&self) -> Result<ResourceLocation, ConfigError> {
        parse_field("ingot_tag", &self.ingot_tag)
    }

    /// `texture_prefix` without its trailing slash, as used for directory listings.
    pub fn texture_dir(&self) -> &str {
        self.texture_prefix.trim_end_matches('/')
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<ResourceLocation, ConfigError> {
    raw.parse()
        .map_err(|source| ConfigError::Location { field, source })
}
