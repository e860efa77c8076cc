//! Error types for glyphdust

use thiserror::Error;

/// The main error type for glyphdust operations
#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Rasterization error: {0}")]
    RasterError(String),

    #[error("SVG error: {0}")]
    SvgError(String),

    #[error("Text zone is empty: no opaque pixels in a {width}x{height} image")]
    EmptyTextZone { width: u32, height: u32 },

    #[error("Behaviour fault: {0}")]
    BehaviourFault(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for glyphdust operations
pub type Result<T> = std::result::Result<T, GlyphError>;

impl From<toml::de::Error> for GlyphError {
    fn from(err: toml::de::Error) -> Self {
        GlyphError::TomlParseError(err.to_string())
    }
}
