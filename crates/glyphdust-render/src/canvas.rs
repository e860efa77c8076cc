//! Software RGBA drawing surface

use glyphdust_core::{CanvasSize, Color, GlyphError, Result, Vec2};
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// A resizable RGBA8 canvas with straight (non-premultiplied) alpha.
///
/// Supports the handful of operations the animation needs: clear, composite
/// an image, fill an antialiased circle, read pixels back, export PNG.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
        }
    }

    pub fn size(&self) -> CanvasSize {
        let (width, height) = self.image.dimensions();
        CanvasSize::new(width, height)
    }

    /// Resize to `size`. Contents are discarded, like an HTML canvas.
    pub fn resize(&mut self, size: CanvasSize) {
        if size != self.size() {
            log::debug!("[render] canvas resized to {}x{}", size.width, size.height);
        }
        self.image = RgbaImage::new(size.width, size.height);
    }

    /// Fill with `color`, or transparent black when `None`
    pub fn clear(&mut self, color: Option<Color>) {
        let fill = color.map(|c| c.to_rgba8()).unwrap_or([0; 4]);
        for px in self.pixels_mut() {
            *px = fill;
        }
    }

    /// Fill a circle with one pixel of edge antialiasing.
    /// `color` is straight rgba in 0..=1; parts outside the canvas are clipped.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        if !(radius > 0.0) || !center.is_finite() || color[3] <= 0.0 {
            return;
        }
        let size = self.size();
        if size.is_empty() {
            return;
        }
        let reach = radius + 1.0;
        let x0 = (center.x - reach).floor().max(0.0) as i64;
        let y0 = (center.y - reach).floor().max(0.0) as i64;
        let x1 = ((center.x + reach).ceil() as i64).min(size.width as i64 - 1);
        let y1 = ((center.y + reach).ceil() as i64).min(size.height as i64 - 1);

        let width = size.width as usize;
        let pixels = self.pixels_mut();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - pixel_center.distance(center)).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let src = [color[0], color[1], color[2], color[3] * coverage];
                blend(&mut pixels[y as usize * width + x as usize], src);
            }
        }
    }

    /// Pixel read-back; `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| GlyphError::ImageError(format!("{}: {e}", path.display())))
    }

    fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut *self.image)
    }
}

/// Source-over compositing of a straight-alpha color onto an RGBA8 pixel
fn blend(dst: &mut [u8; 4], src: [f32; 4]) {
    let sa = src[3].clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let dc = dst[i] as f32 / 255.0;
        dst[i] = to_u8((src[i] * sa + dc * da * (1.0 - sa)) / out_a);
    }
    dst[3] = to_u8(out_a);
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
