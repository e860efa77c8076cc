//! SVG text documents and their rasterization through resvg

use crate::fit::{fit_font_size, TextExtent, REFERENCE_FONT_SIZE};
use crate::{RasterOutput, RasterRequest, TextRasterizer};
use glyphdust_core::{CanvasSize, GlyphError, Result};
use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::sync::Arc;

/// Family requested in generated documents
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Canvas-sized SVG with `text` centered on both axes at `font_size`
pub fn text_document(text: &str, size: CanvasSize, font_size: f32, family: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="middle" font-family="{family}" font-size="{font_size}px">{text}</text>
</svg>"#,
        w = size.width,
        h = size.height,
        cx = size.width as f32 / 2.0,
        cy = size.height as f32 / 2.0,
        family = escape_xml(family),
        font_size = font_size,
        text = escape_xml(text),
    )
}

/// Document used to measure text at the reference font size
fn measure_document(text: &str, family: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100000" height="1000">
  <text x="0" y="{baseline}" font-family="{family}" font-size="{size}px">{text}</text>
</svg>"#,
        baseline = REFERENCE_FONT_SIZE * 2.0,
        family = escape_xml(family),
        size = REFERENCE_FONT_SIZE,
        text = escape_xml(text),
    )
}

/// Rasterizes text through an SVG document, the way a browser would load an
/// SVG blob into an image.
pub struct SvgRasterizer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl SvgRasterizer {
    /// Rasterizer backed by the fonts installed on this system
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        db.set_sans_serif_family(DEFAULT_FONT_FAMILY);
        log::debug!("[raster] Loaded {} system font face(s)", db.len());
        Self::with_fontdb(db)
    }

    /// Rasterizer backed by an explicit font database
    pub fn with_fontdb(db: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(db),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Number of font faces available for text layout
    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_family: self.font_family.clone(),
            ..usvg::Options::default()
        }
    }

    fn parse(&self, svg: &str) -> Result<usvg::Tree> {
        usvg::Tree::from_str(svg, &self.options()).map_err(|e| GlyphError::SvgError(e.to_string()))
    }

    /// Bounding box of `text` at [`REFERENCE_FONT_SIZE`].
    /// Returns `None` when nothing renders (blank text or no usable font).
    pub fn measure(&self, text: &str) -> Result<Option<TextExtent>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let tree = self.parse(&measure_document(text, &self.font_family))?;
        if !tree.root().has_children() {
            return Ok(None);
        }
        let bbox = tree.root().abs_bounding_box();
        let extent = TextExtent::new(bbox.width(), bbox.height());
        Ok(extent.aspect_ratio().map(|_| extent))
    }

    /// Render an SVG document into a straight-alpha RGBA image of `size`
    pub fn render_document(&self, svg: &str, size: CanvasSize) -> Result<RgbaImage> {
        let tree = self.parse(svg)?;
        let mut pixmap = Pixmap::new(size.width, size.height).ok_or_else(|| {
            GlyphError::RasterError(format!(
                "cannot allocate a {}x{} pixmap",
                size.width, size.height
            ))
        })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        let mut raw = Vec::with_capacity((size.width * size.height * 4) as usize);
        for px in pixmap.pixels() {
            let c = px.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(size.width, size.height, raw).ok_or_else(|| {
            GlyphError::RasterError("pixmap size does not match image buffer".into())
        })
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer for SvgRasterizer {
    fn rasterize(&self, request: &RasterRequest) -> Result<RasterOutput> {
        if request.size.is_empty() {
            return Err(GlyphError::RasterError(format!(
                "canvas {}x{} has no area",
                request.size.width, request.size.height
            )));
        }
        let measured = self.measure(&request.text)?;
        let fit = fit_font_size(measured, request.size);
        log::debug!(
            "[raster] '{}' in {}x{}: font size {:.1}px ({:?}-driven)",
            request.text,
            request.size.width,
            request.size.height,
            fit.font_size,
            fit.axis
        );
        let svg = text_document(&request.text, request.size, fit.font_size, &self.font_family);
        let image = self.render_document(&svg, request.size)?;
        Ok(RasterOutput {
            image,
            font_size: fit.font_size,
        })
    }
}
