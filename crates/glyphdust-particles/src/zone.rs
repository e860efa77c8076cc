//! Text zone: samples canvas points weighted by rendered glyph pixels

use crate::rand::ParticleRng;
use glyphdust_core::{CanvasSize, GlyphError, Result, Vec2};
use image::RgbaImage;

/// Read-only sampler over the opaque pixels of a rasterized text image.
///
/// Every pixel with alpha above the threshold is equally likely, so point
/// density follows the glyph shapes.
#[derive(Debug, Clone)]
pub struct TextZone {
    points: Vec<Vec2>,
    size: CanvasSize,
    offset: Vec2,
}

impl TextZone {
    /// Build a zone from `image`, placed at `offset` in canvas space.
    /// Fails when no pixel has alpha above `alpha_threshold`.
    pub fn from_image(image: &RgbaImage, offset: Vec2, alpha_threshold: u8) -> Result<Self> {
        let (width, height) = image.dimensions();
        let points: Vec<Vec2> = image
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0[3] > alpha_threshold)
            .map(|(x, y, _)| Vec2::new(x as f32, y as f32) + offset)
            .collect();

        if points.is_empty() {
            return Err(GlyphError::EmptyTextZone { width, height });
        }

        Ok(Self {
            points,
            size: CanvasSize::new(width, height),
            offset,
        })
    }

    /// Random canvas-space point on the text
    pub fn sample(&self, rng: &mut ParticleRng) -> Vec2 {
        self.points[rng.index(self.points.len())]
    }

    /// Number of opaque pixels
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensions of the source image
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}
