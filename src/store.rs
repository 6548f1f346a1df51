use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use image::RgbaImage;

/// Generated pile textures for the running session, keyed by metal name.
///
/// Created once at startup and shared (via `Arc`) between the generator and
/// the virtual pack. Images are inserted whole, so readers never see a
/// partially built texture.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: RwLock<BTreeMap<String, RgbaImage>>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<RgbaImage> {
        self.read().get(name).cloned()
    }

    pub fn insert(&self, name: &str, texture: RgbaImage) {
        self.write().insert(name.to_string(), texture);
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Forget everything, e.g. on a host resource reload.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, RgbaImage>> {
        self.textures
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, RgbaImage>> {
        self.textures
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
