//! Font-free rasterizer that draws each character as a solid block

use crate::fit::{fit_font_size, TextExtent, REFERENCE_FONT_SIZE};
use crate::{RasterOutput, RasterRequest, TextRasterizer};
use glyphdust_core::{GlyphError, Result};
use image::{Rgba, RgbaImage};

/// Draws text as a row of filled cells, one per non-whitespace character.
///
/// Needs no fonts, so it works on headless machines and gives deterministic
/// images. Follows the same fitting rule as [`crate::SvgRasterizer`].
#[derive(Debug, Clone, Copy)]
pub struct BlockRasterizer {
    /// Cell width as a fraction of the font size
    pub advance: f32,
    /// Blank space on each side of a cell, as a fraction of the cell width
    pub gap: f32,
}

impl Default for BlockRasterizer {
    fn default() -> Self {
        Self {
            advance: 0.6,
            gap: 0.1,
        }
    }
}

impl BlockRasterizer {
    /// Extent of `text` at [`REFERENCE_FONT_SIZE`]
    pub fn measure(&self, text: &str) -> Option<TextExtent> {
        let n = text.chars().count();
        if n == 0 {
            return None;
        }
        Some(TextExtent::new(
            self.advance * REFERENCE_FONT_SIZE * n as f32,
            REFERENCE_FONT_SIZE,
        ))
    }
}

impl TextRasterizer for BlockRasterizer {
    fn rasterize(&self, request: &RasterRequest) -> Result<RasterOutput> {
        let size = request.size;
        if size.is_empty() {
            return Err(GlyphError::RasterError(format!(
                "canvas {}x{} has no area",
                size.width, size.height
            )));
        }

        let fit = fit_font_size(self.measure(&request.text), size);
        let cell = self.advance * fit.font_size;
        let count = request.text.chars().count() as f32;
        let left = (size.width as f32 - cell * count) / 2.0;
        let top = (size.height as f32 - fit.font_size) / 2.0;
        let inset = cell * self.gap;

        let mut image = RgbaImage::new(size.width, size.height);
        let ink = Rgba([0, 0, 0, 255]);
        for (i, ch) in request.text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = left + i as f32 * cell + inset;
            let x1 = left + (i as f32 + 1.0) * cell - inset;
            fill_rect(&mut image, x0, top, x1, top + fit.font_size, ink);
        }

        Ok(RasterOutput {
            image,
            font_size: fit.font_size,
        })
    }
}

fn fill_rect(image: &mut RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>) {
    let (w, h) = image.dimensions();
    let col0 = x0.max(0.0).round() as u32;
    let col1 = (x1.round().max(0.0) as u32).min(w);
    let row0 = y0.max(0.0).round() as u32;
    let row1 = (y1.round().max(0.0) as u32).min(h);
    for y in row0..row1 {
        for x in col0..col1 {
            image.put_pixel(x, y, color);
        }
    }
}
