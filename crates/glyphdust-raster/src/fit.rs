//! Font fitting: choose a font size so text fills 80% of a box on its binding axis

use glyphdust_core::CanvasSize;

/// Font size used when measuring the natural proportions of a string
pub const REFERENCE_FONT_SIZE: f32 = 100.0;

/// Fraction of the target box the fitted text may occupy
pub const FIT_RATIO: f32 = 0.8;

/// Bounding box of rendered text at some font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` for a degenerate extent
    pub fn aspect_ratio(&self) -> Option<f32> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

/// Which side of the target box limits the text size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// Result of fitting text into a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontFit {
    pub font_size: f32,
    pub axis: FitAxis,
}

/// Pick the font size for text whose extent at [`REFERENCE_FONT_SIZE`] is
/// `measured`, so that it fits inside `target`.
///
/// Text relatively wider than the box is width-driven
/// (`0.8 * width / text_ratio`); everything else, including strings that
/// could not be measured, is height-driven (`0.8 * height`).
pub fn fit_font_size(measured: Option<TextExtent>, target: CanvasSize) -> FontFit {
    let box_ratio = target.aspect_ratio();
    match measured.and_then(|e| e.aspect_ratio()) {
        Some(text_ratio) if text_ratio > box_ratio => FontFit {
            font_size: target.width as f32 * FIT_RATIO / text_ratio,
            axis: FitAxis::Width,
        },
        _ => FontFit {
            font_size: target.height as f32 * FIT_RATIO,
            axis: FitAxis::Height,
        },
    }
}
