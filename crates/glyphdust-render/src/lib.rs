//! glyphdust render - CPU rasterization of particle frames
//!
//! A small RGBA canvas standing in for a browser 2D context, plus the
//! sprite renderer that paints one frame of particles onto it.

pub mod canvas;
pub mod renderer;

pub use canvas::Canvas;
pub use renderer::SpriteRenderer;
