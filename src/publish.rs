//! Where finished textures go: the in-memory store or a resource pack on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info};

use crate::assets::encode_png;
use crate::config::Settings;
use crate::error::GenerateError;
use crate::pack::PackMetadata;
use crate::paths::{force_png_path, is_plain_file_stem};
use crate::store::TextureStore;

pub trait Publisher {
    /// Whether `name` has already been published.
    fn contains(&self, name: &str) -> bool;

    /// Publish a fully built texture under `name`.
    fn publish(&self, name: &str, texture: &RgbaImage) -> Result<(), GenerateError>;
}

/// Publishes into the session's [`TextureStore`], served by the virtual pack.
#[derive(Debug, Clone)]
pub struct MemoryPublisher {
    store: Arc<TextureStore>,
}

impl MemoryPublisher {
    pub fn new(store: Arc<TextureStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<TextureStore> {
        &self.store
    }
}

impl Publisher for MemoryPublisher {
    fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    fn publish(&self, name: &str, texture: &RgbaImage) -> Result<(), GenerateError> {
        if !is_plain_file_stem(name) {
            return Err(GenerateError::InvalidName(name.to_string()));
        }
        self.store.insert(name, texture.clone());
        Ok(())
    }
}

/// A resource pack under `<game_dir>/resourcepacks/<pack_name>`.
#[derive(Debug, Clone)]
pub struct DiskPack {
    root: PathBuf,
    texture_dir: PathBuf,
    metadata: PackMetadata,
}

impl DiskPack {
    pub fn new(game_dir: &Path, settings: &Settings) -> Self {
        let root = game_dir.join("resourcepacks").join(&settings.pack_name);
        let texture_dir = root
            .join("assets")
            .join(&settings.pack_namespace)
            .join(settings.texture_dir());

        Self {
            root,
            texture_dir,
            metadata: PackMetadata::from_settings(settings),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn texture_dir(&self) -> &Path {
        &self.texture_dir
    }

    /// Create the directory layout and write `pack.mcmeta` if it is missing.
    pub fn init(&self) -> Result<(), GenerateError> {
        fs::create_dir_all(&self.texture_dir).map_err(|source| GenerateError::Io {
            path: self.texture_dir.clone(),
            source,
        })?;

        let mcmeta = self.root.join("pack.mcmeta");
        if !mcmeta.exists() {
            fs::write(&mcmeta, self.metadata.to_mcmeta_json()?).map_err(|source| {
                GenerateError::Io {
                    path: mcmeta.clone(),
                    source,
                }
            })?;
            info!(path = %mcmeta.display(), "created pack descriptor");
        }

        Ok(())
    }

    /// Number of `.png` files currently in the texture directory.
    pub fn texture_count(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.texture_dir) else {
            return 0;
        };
        entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
            .count()
    }
}

impl Publisher for DiskPack {
    fn contains(&self, name: &str) -> bool {
        is_plain_file_stem(name) && force_png_path(&self.texture_dir, name).is_file()
    }

    fn publish(&self, name: &str, texture: &RgbaImage) -> Result<(), GenerateError> {
        // Names become file names; anything else could land outside the texture directory.
        if !is_plain_file_stem(name) {
            return Err(GenerateError::InvalidName(name.to_string()));
        }

        let bytes = encode_png(texture).map_err(|source| GenerateError::Encode {
            name: name.to_string(),
            source,
        })?;

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| GenerateError::Io { path, source }
        };

        fs::create_dir_all(&self.texture_dir).map_err(io_err(&self.texture_dir))?;

        // Write beside the target then rename, so a crash never leaves a torn PNG.
        let target = force_png_path(&self.texture_dir, name);
        let staging = target.with_extension("png.tmp");
        fs::write(&staging, &bytes).map_err(io_err(&staging))?;
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(io_err(&target)(e));
        }

        debug!(path = %target.display(), "wrote texture");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn memory_publisher_fills_store() {
        let store = Arc::new(TextureStore::new());
        let publisher = MemoryPublisher::new(store.clone());

        assert!(!publisher.contains("zinc"));
        publisher
            .publish("zinc", &RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])))
            .unwrap();

        assert!(publisher.contains("zinc"));
        assert_eq!(store.get("zinc").unwrap().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));

        assert!(matches!(
            publisher.publish("metal/lead", &RgbaImage::new(1, 1)),
            Err(GenerateError::InvalidName(_))
        ));
        assert!(!store.contains("metal/lead"));
    }
}
