use std::path::PathBuf;

use crate::resource::ResourceLocation;

/// Malformed `namespace:path` strings.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("invalid resource location '{0}': {1}")]
    Invalid(String, &'static str),
}

/// Hex colors like "#RRGGBB".
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("hex color must be 6 characters long, got '{0}'")]
    Length(String),

    #[error("invalid {channel} value in '{hex}'")]
    Channel { channel: &'static str, hex: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read item catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse item catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse item catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that can stop a single metal's pile texture from being produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("template texture not found at {primary} or {fallback}")]
    TemplateUnavailable {
        primary: ResourceLocation,
        fallback: ResourceLocation,
    },

    #[error("template texture {location} could not be decoded: {source}")]
    TemplateDecode {
        location: ResourceLocation,
        source: image::ImageError,
    },

    #[error("failed to encode texture for '{name}': {source}")]
    Encode {
        name: String,
        source: image::ImageError,
    },

    #[error("'{0}' is not a plain texture name")]
    InvalidName(String),

    #[error("failed to serialize pack descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("setting '{field}': {source}")]
    Location {
        field: &'static str,
        source: ResourceError,
    },

    #[error("setting '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
