//! Turns a discovered metal into a published pile texture.

use std::sync::Mutex;

use image::RgbaImage;
use indexmap::IndexMap;
use tracing::{debug, error};

use crate::assets::{AssetLoader, TemplateSource, decode_png};
use crate::color::{Color, DEFAULT_COLOR, average_color};
use crate::error::GenerateError;
use crate::publish::Publisher;
use crate::recolor::recolor;
use crate::resource::{ResourceLocation, ingot_texture_location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Synthesis {
    Generated,
    /// The name was already published; nothing was recomputed.
    AlreadyExists,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub total: usize,
    pub generated: usize,
    pub already_present: usize,
    /// Metal names whose synthesis failed, in processing order.
    pub failed: Vec<String>,
}

impl GenerationReport {
    pub fn succeeded(&self) -> usize {
        self.generated + self.already_present
    }
}

pub struct TextureGenerator<L, P> {
    loader: L,
    publisher: P,
    template: TemplateSource,
    // Held across check, build and publish so a name is never generated twice.
    in_progress: Mutex<()>,
}

impl<L: AssetLoader, P: Publisher> TextureGenerator<L, P> {
    pub fn new(loader: L, publisher: P, template: TemplateSource) -> Self {
        Self {
            loader,
            publisher,
            template,
            in_progress: Mutex::new(()),
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Generate and publish the pile texture for `metal`, coloured after `ingot`.
    ///
    /// Only a missing template fails the call; a missing ingot texture falls
    /// back to the default color.
    pub fn synthesize(
        &self,
        metal: &str,
        ingot: &ResourceLocation,
    ) -> Result<Synthesis, GenerateError> {
        let _guard = self
            .in_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.publisher.contains(metal) {
            return Ok(Synthesis::AlreadyExists);
        }

        let target = self.ingot_color(ingot);
        let pile = self.build(target)?;
        self.publisher.publish(metal, &pile)?;

        debug!(metal, %ingot, color = %target, "generated texture");
        Ok(Synthesis::Generated)
    }

    /// Average color of the ingot's own sprite, or the default if it cannot be read.
    pub fn ingot_color(&self, ingot: &ResourceLocation) -> Color {
        let location = ingot_texture_location(ingot);

        let Some(bytes) = self.loader.load(&location) else {
            debug!(%ingot, "no ingot texture, using default color");
            return DEFAULT_COLOR;
        };

        match decode_png(&bytes) {
            Ok(image) => average_color(&image),
            Err(e) => {
                debug!(%ingot, error = %e, "unreadable ingot texture, using default color");
                DEFAULT_COLOR
            }
        }
    }

    fn build(&self, target: Color) -> Result<RgbaImage, GenerateError> {
        let template = self.template.get(&self.loader)?;
        Ok(recolor(&template, target))
    }

    /// Synthesize every metal in order. A failure is logged and the loop moves on.
    pub fn generate_all(&self, metals: &IndexMap<String, ResourceLocation>) -> GenerationReport {
        let mut report = GenerationReport {
            total: metals.len(),
            ..GenerationReport::default()
        };

        for (metal, ingot) in metals {
            match self.synthesize(metal, ingot) {
                Ok(Synthesis::Generated) => report.generated += 1,
                Ok(Synthesis::AlreadyExists) => report.already_present += 1,
                Err(e) => {
                    error!(metal = %metal, error = %e, "failed to generate texture");
                    report.failed.push(metal.clone());
                }
            }
        }

        report
    }
}
