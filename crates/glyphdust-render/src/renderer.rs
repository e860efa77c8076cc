//! Draws packed particle sprites onto a canvas

use crate::canvas::Canvas;
use glyphdust_core::Color;
use glyphdust_particles::ParticleSprite;

/// Clears the canvas and draws every sprite as a filled circle, in order
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteRenderer {
    /// Fill color applied before drawing; transparent when `None`
    pub background: Option<Color>,
}

impl SpriteRenderer {
    pub fn new(background: Option<Color>) -> Self {
        Self { background }
    }

    /// Render one frame. Returns how many sprites were visible.
    pub fn render(&self, canvas: &mut Canvas, sprites: &[ParticleSprite]) -> usize {
        canvas.clear(self.background);
        let mut drawn = 0;
        for sprite in sprites {
            let alpha = sprite.alpha().clamp(0.0, 1.0) * sprite.color[3];
            if alpha <= 0.0 {
                continue;
            }
            let [r, g, b, _] = sprite.color;
            canvas.fill_circle(sprite.position(), sprite.radius(), [r, g, b, alpha]);
            drawn += 1;
        }
        drawn
    }
}
