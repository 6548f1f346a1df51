//! Asset byte loading and PNG coding.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageFormat, RgbaImage};
use tracing::{debug, trace};

use crate::config::TemplatePolicy;
use crate::error::GenerateError;
use crate::resource::ResourceLocation;

/// Source of raw asset bytes. `None` is the normal answer for most lookups.
pub trait AssetLoader {
    fn load(&self, location: &ResourceLocation) -> Option<Vec<u8>>;
}

/// Assets extracted to disk as `<root>/assets/<namespace>/<path>`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, location: &ResourceLocation) -> PathBuf {
        self.root
            .join("assets")
            .join(location.namespace())
            .join(location.path())
    }
}

impl AssetLoader for DirectoryAssets {
    fn load(&self, location: &ResourceLocation) -> Option<Vec<u8>> {
        let path = self.path_for(location);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "asset not loaded");
                None
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    entries: HashMap<ResourceLocation, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: ResourceLocation, bytes: Vec<u8>) {
        self.entries.insert(location, bytes);
    }
}

impl AssetLoader for MemoryAssets {
    fn load(&self, location: &ResourceLocation) -> Option<Vec<u8>> {
        self.entries.get(location).cloned()
    }
}

impl<L: AssetLoader + ?Sized> AssetLoader for &L {
    fn load(&self, location: &ResourceLocation) -> Option<Vec<u8>> {
        (**self).load(location)
    }
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// The shared template image, with one fallback location.
pub struct TemplateSource {
    primary: ResourceLocation,
    fallback: ResourceLocation,
    policy: TemplatePolicy,
    cached: Mutex<Option<RgbaImage>>,
}

impl TemplateSource {
    pub fn new(primary: ResourceLocation, fallback: ResourceLocation, policy: TemplatePolicy) -> Self {
        Self {
            primary,
            fallback,
            policy,
            cached: Mutex::new(None),
        }
    }

    /// Returns the template, loading it if needed. Failures are never cached.
    pub fn get(&self, loader: &dyn AssetLoader) -> Result<RgbaImage, GenerateError> {
        if self.policy == TemplatePolicy::Reload {
            return self.load(loader);
        }

        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(template) = cached.as_ref() {
            return Ok(template.clone());
        }

        let template = self.load(loader)?;
        *cached = Some(template.clone());
        Ok(template)
    }

    /// Drop the cached template so the next call reloads it.
    pub fn invalidate(&self) {
        *self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    fn load(&self, loader: &dyn AssetLoader) -> Result<RgbaImage, GenerateError> {
        let (location, bytes) = match loader.load(&self.primary) {
            Some(bytes) => (&self.primary, bytes),
            None => {
                debug!(primary = %self.primary, fallback = %self.fallback, "template not found, trying fallback");
                let bytes = loader.load(&self.fallback).ok_or_else(|| {
                    GenerateError::TemplateUnavailable {
                        primary: self.primary.clone(),
                        fallback: self.fallback.clone(),
                    }
                })?;
                (&self.fallback, bytes)
            }
        };

        decode_png(&bytes).map_err(|source| GenerateError::TemplateDecode {
            location: location.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn loc(s: &str) -> ResourceLocation {
        s.parse().unwrap()
    }

    fn png(color: [u8; 4]) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(2, 2, Rgba(color))).unwrap()
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 0]));
        img.put_pixel(2, 1, Rgba([200, 100, 50, 255]));
        img.put_pixel(1, 1, Rgba([7, 8, 9, 127]));

        assert_eq!(decode_png(&encode_png(&img).unwrap()).unwrap(), img);
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(decode_png(b"not a png").is_err());
    }

    #[test]
    fn template_falls_back_then_fails() {
        let primary = loc("mod:textures/template.png");
        let fallback = loc("tfc:textures/copper.png");
        let source = TemplateSource::new(primary.clone(), fallback.clone(), TemplatePolicy::Reload);

        let mut assets = MemoryAssets::new();
        assets.insert(fallback.clone(), png([10, 20, 30, 255]));
        let template = source.get(&assets).unwrap();
        assert_eq!(template.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));

        assets.insert(primary.clone(), png([90, 90, 90, 255]));
        let template = source.get(&assets).unwrap();
        assert_eq!(template.get_pixel(0, 0), &Rgba([90, 90, 90, 255]));

        let err = source.get(&MemoryAssets::new()).unwrap_err();
        assert!(matches!(err, GenerateError::TemplateUnavailable { .. }));
        assert!(err.to_string().contains("mod:textures/template.png"));
        assert!(err.to_string().contains("tfc:textures/copper.png"));
    }

    #[test]
    fn cached_template_ignores_later_asset_changes() {
        let primary = loc("mod:template.png");
        let source = TemplateSource::new(primary.clone(), loc("mod:fallback.png"), TemplatePolicy::Cached);

        assert!(source.get(&MemoryAssets::new()).is_err());

        let mut assets = MemoryAssets::new();
        assets.insert(primary.clone(), png([1, 1, 1, 255]));
        assert_eq!(source.get(&assets).unwrap().get_pixel(1, 1), &Rgba([1, 1, 1, 255]));

        assets.insert(primary.clone(), png([2, 2, 2, 255]));
        assert_eq!(source.get(&assets).unwrap().get_pixel(1, 1), &Rgba([1, 1, 1, 255]));

        source.invalidate();
        assert_eq!(source.get(&assets).unwrap().get_pixel(1, 1), &Rgba([2, 2, 2, 255]));
    }

    #[test]
    fn undecodable_template_is_reported() {
        let primary = loc("mod:template.png");
        let source = TemplateSource::new(primary.clone(), loc("mod:fallback.png"), TemplatePolicy::Reload);
        let mut assets = MemoryAssets::new();
        assets.insert(primary, b"junk".to_vec());

        assert!(matches!(
            source.get(&assets),
            Err(GenerateError::TemplateDecode { .. })
        ));
    }
}
