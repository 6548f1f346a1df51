//! Virtual resource pack that serves generated textures straight from memory.

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::assets::encode_png;
use crate::config::Settings;
use crate::resource::{ResourceLocation, pile_texture_location};
use crate::store::TextureStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackType {
    ClientResources,
    ServerData,
}

/// The `pack` metadata section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackMetadata {
    pub description: String,
    pub pack_format: u32,
}

#[derive(Serialize)]
struct McMeta<'a> {
    pack: &'a PackMetadata,
}

impl PackMetadata {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            description: settings.pack_description.clone(),
            pack_format: settings.pack_format,
        }
    }

    /// The `pack.mcmeta` document for this metadata.
    pub fn to_mcmeta_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&McMeta { pack: self })
    }
}

pub struct VirtualPack {
    store: Arc<TextureStore>,
    namespace: String,
    prefix: String,
    metadata: PackMetadata,
}

impl VirtualPack {
    pub fn new(store: Arc<TextureStore>, settings: &Settings) -> Self {
        Self {
            store,
            namespace: settings.pack_namespace.clone(),
            prefix: settings.texture_prefix.clone(),
            metadata: PackMetadata::from_settings(settings),
        }
    }

    /// PNG bytes for `<namespace>:<prefix><name>.png`, if `name` was generated.
    pub fn resource(&self, kind: PackType, location: &ResourceLocation) -> Option<Vec<u8>> {
        if kind != PackType::ClientResources || location.namespace() != self.namespace {
            return None;
        }

        let name = location
            .path()
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(".png")?;
        let texture = self.store.get(name)?;

        match encode_png(&texture) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(metal = name, error = %e, "failed to convert texture to bytes");
                None
            }
        }
    }

    /// Every generated texture under `dir`, which must be the texture prefix without its trailing `/`.
    pub fn list_resources(
        &self,
        kind: PackType,
        namespace: &str,
        dir: &str,
    ) -> Vec<(ResourceLocation, Vec<u8>)> {
        if kind != PackType::ClientResources
            || namespace != self.namespace
            || dir != self.prefix.trim_end_matches('/')
        {
            return Vec::new();
        }

        self.store
            .names()
            .into_iter()
            .filter_map(|name| pile_texture_location(&self.namespace, &self.prefix, &name).ok())
            .filter_map(|location| {
                let bytes = self.resource(kind, &location)?;
                Some((location, bytes))
            })
            .collect()
    }

    pub fn namespaces(&self, kind: PackType) -> Vec<&str> {
        match kind {
            PackType::ClientResources => vec![self.namespace.as_str()],
            PackType::ServerData => Vec::new(),
        }
    }

    pub fn metadata(&self, section: &str) -> Option<&PackMetadata> {
        (section == "pack").then_some(&self.metadata)
    }

    /// Nothing is served from the pack root.
    pub fn root_resource(&self, _path: &str) -> Option<Vec<u8>> {
        None
    }
}
