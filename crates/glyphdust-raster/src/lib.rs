//! glyphdust Raster - text to pixels
//!
//! Turns a text string into an image the particle field can sample:
//! - Font fitting against a target box (`fit_font_size`)
//! - SVG document generation with XML escaping
//! - SVG rasterization through resvg (`SvgRasterizer`)
//! - A font-free fallback (`BlockRasterizer`)
//! - Generation-tagged asynchronous raster tasks (`RasterTask`)
//! - Revocable handles for finished images (`ImageStore`)

pub mod block;
pub mod fit;
pub mod store;
pub mod svg;
pub mod task;

use glyphdust_core::{CanvasSize, Result};
use image::RgbaImage;

pub use block::BlockRasterizer;
pub use fit::{fit_font_size, FitAxis, FontFit, TextExtent, FIT_RATIO, REFERENCE_FONT_SIZE};
pub use store::{ImageHandle, ImageStore};
pub use svg::SvgRasterizer;
pub use task::{LoadMode, RasterTask};

/// What to rasterize: a text string sized for a canvas
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRequest {
    pub text: String,
    pub size: CanvasSize,
}

impl RasterRequest {
    pub fn new(text: impl Into<String>, size: CanvasSize) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

/// A finished rasterization: the canvas-sized image and the font size used
#[derive(Debug, Clone)]
pub struct RasterOutput {
    pub image: RgbaImage,
    pub font_size: f32,
}

/// Produces a canvas-sized image of the requested text.
///
/// Implementations must be shareable with a worker thread.
pub trait TextRasterizer: Send + Sync {
    fn rasterize(&self, request: &RasterRequest) -> Result<RasterOutput>;
}
