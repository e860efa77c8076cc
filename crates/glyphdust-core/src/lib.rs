//! glyphdust Core - Foundational types for the particle text engine
//!
//! This crate provides the types that all other glyphdust crates depend on:
//! - `CanvasSize`, `Rect` - Canvas-space geometry
//! - `Generation` - Emitter generation identifiers
//! - `Color` - RGBA color with CSS hex parsing
//! - `clamp` / `clamp_to_canvas` - Scalar and vector clamping helpers
//! - Error types and Result alias

mod error;
mod math;
mod types;

pub use error::{GlyphError, Result};
pub use glam::Vec2;
pub use math::{axis_distance, clamp, clamp_to_canvas, within_axis_distance};
pub use types::{CanvasSize, Color, Generation, Rect};
