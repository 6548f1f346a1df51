//! Entry points the host calls at fixed moments of its lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::assets::AssetLoader;
use crate::catalog::ItemCatalog;
use crate::config::Settings;
use crate::discovery::{discover_metals, metal_name_for};
use crate::error::GenerateError;
use crate::generator::{GenerationReport, Synthesis, TextureGenerator};
use crate::publish::{DiskPack, Publisher};
use crate::resource::ResourceLocation;

pub struct Lifecycle<C, L, P> {
    catalog: C,
    generator: TextureGenerator<L, P>,
    settings: Settings,
    disk_pack: Option<DiskPack>,
    ready: AtomicBool,
}

impl<C, L, P> Lifecycle<C, L, P>
where
    C: ItemCatalog,
    L: AssetLoader,
    P: Publisher,
{
    pub fn new(catalog: C, generator: TextureGenerator<L, P>, settings: Settings) -> Self {
        Self {
            catalog,
            generator,
            settings,
            disk_pack: None,
            ready: AtomicBool::new(false),
        }
    }

    /// Pre-create this pack's directory during early init.
    pub fn with_disk_pack(mut self, pack: DiskPack) -> Self {
        self.disk_pack = Some(pack);
        self
    }

    pub fn on_early_init(&self) {
        let Some(pack) = &self.disk_pack else {
            return;
        };
        match pack.init() {
            Ok(()) => info!(path = %pack.root().display(), "initialized resource pack directory"),
            Err(e) => warn!(error = %e, "could not initialize resource pack"),
        }
    }

    /// Bulk generation for every discovered metal. Runs once per session;
    /// later calls return `None`.
    pub fn on_ready(&self) -> Option<GenerationReport> {
        if self.ready.swap(true, Ordering::SeqCst) {
            return None;
        }

        info!("generating ingot textures");
        self.on_early_init();

        let metals = discover_metals(&self.catalog, &self.settings);
        info!(count = metals.len(), "found unique metals");

        let report = self.generator.generate_all(&metals);
        info!(
            generated = report.succeeded(),
            total = report.total,
            "generated textures for metals"
        );
        if report.succeeded() == 0 && report.total > 0 {
            warn!("no textures were generated, check the errors above");
        }

        Some(report)
    }

    /// On-demand generation for an item the player just used.
    ///
    /// Returns `None` for items that are not named like ingots.
    pub fn on_item_touched(
        &self,
        item: &ResourceLocation,
    ) -> Option<Result<Synthesis, GenerateError>> {
        let metal = metal_name_for(item)?;
        let result = self.generator.synthesize(&metal, item);
        if let Err(e) = &result {
            error!(metal = %metal, error = %e, "failed to generate texture");
        }
        Some(result)
    }

    /// Allow `on_ready` to run again, e.g. after a host resource reload.
    pub fn reset(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }
}
