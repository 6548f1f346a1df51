//! Pile textures for ingots from any content pack.
//!
//! Each discovered ingot's sprite is averaged down to a single color, and a
//! shared template is recolored toward it while keeping the template's
//! shading. Results are served from memory through [`pack::VirtualPack`] or
//! written to an on-disk resource pack through [`publish::DiskPack`].

pub mod assets;
pub mod catalog;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod pack;
pub mod paths;
pub mod publish;
pub mod recolor;
pub mod resource;
pub mod store;

pub use color::{Color, DEFAULT_COLOR, VISIBILITY_THRESHOLD, average_color};
pub use recolor::recolor;
pub use resource::ResourceLocation;
