//! Per-particle behaviour trait and the palette behaviour

use crate::particle::Particle;
use crate::rand::ParticleRng;
use crate::tuning::{AnimationKind, AnimationTuning};
use glyphdust_core::{CanvasSize, Color, Result};

/// Emitter-level lifecycle notifications forwarded to every behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Initialize,
    Trigger,
    Reset,
}

/// Something an emitter reports back to its owner after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterEvent {
    AnimationEnded(AnimationKind),
}

/// Inputs shared by both animation behaviours
#[derive(Debug, Clone, Copy)]
pub struct BehaviourParams {
    pub canvas: CanvasSize,
    pub radius: f32,
    pub speed: f32,
    pub particle_count: usize,
    pub tuning: AnimationTuning,
}

/// A pair of per-particle rules: set up at creation, update once per tick.
///
/// `apply` returning an error kills that particle only; the emitter keeps
/// ticking the rest.
pub trait Behaviour {
    /// Called once when a particle is created
    fn initialize(&mut self, particle: &mut Particle, rng: &mut ParticleRng);

    /// Called once per live particle per tick
    fn apply(&mut self, particle: &mut Particle, rng: &mut ParticleRng) -> Result<()>;

    /// Called after every live particle was updated, before dead ones are dropped
    fn after_tick(&mut self, _particles: &mut [Particle], _events: &mut Vec<EmitterEvent>) {}

    /// Emitter lifecycle hook
    fn on_lifecycle(&mut self, _event: Lifecycle) {}

    /// Human-readable name for this behaviour
    fn name(&self) -> &str;
}

/// Gives each new particle a uniformly chosen palette color
pub struct ColorBehaviour {
    palette: Vec<Color>,
}

impl ColorBehaviour {
    /// Use `palette`, or the default particle color when it is empty
    pub fn new(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            vec![Color::DEFAULT_PARTICLE]
        } else {
            palette
        };
        Self { palette }
    }

    /// Parse CSS hex strings, skipping invalid entries
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Self {
        let palette = colors
            .iter()
            .filter_map(|c| match Color::parse_hex(c.as_ref()) {
                Ok(color) => Some(color),
                Err(e) => {
                    log::warn!("[particles] Ignoring palette entry: {e}");
                    None
                }
            })
            .collect();
        Self::new(palette)
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

impl Behaviour for ColorBehaviour {
    fn initialize(&mut self, particle: &mut Particle, rng: &mut ParticleRng) {
        particle.color = self.palette[rng.index(self.palette.len())];
    }

    fn apply(&mut self, _particle: &mut Particle, _rng: &mut ParticleRng) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "color"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphdust_core::Vec2;

    #[test]
    fn empty_palette_uses_default() {
        let b = ColorBehaviour::new(Vec::new());
        assert_eq!(b.palette(), &[Color::DEFAULT_PARTICLE]);
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let b = ColorBehaviour::from_hex(&["#FF0000", "nope", "#FFFFFF"]);
        assert_eq!(b.palette().len(), 2);

        let b = ColorBehaviour::from_hex(&["nope", ""]);
        assert_eq!(b.palette(), &[Color::DEFAULT_PARTICLE]);
    }

    #[test]
    fn picks_every_palette_color() {
        let mut b = ColorBehaviour::from_hex(&["#FF0000", "#00FF00", "#0000FF"]);
        let mut rng = ParticleRng::new(4);
        let mut seen = [false; 3];
        let mut p = Particle::dead();
        for _ in 0..300 {
            p.respawn(Vec2::ZERO);
            b.initialize(&mut p, &mut rng);
            let idx = b.palette().iter().position(|c| *c == p.color).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
