//! Emitter-level initialize / trigger / reset handlers for each animation kind

use crate::behaviour::Lifecycle;
use crate::emitter::Emitter;
use crate::tuning::AnimationKind;

/// What `initialize`, `trigger` and `reset` do to an emitter.
///
/// | kind     | initialize | trigger              | reset              |
/// |----------|------------|----------------------|--------------------|
/// | fade-in  | nothing    | clear + emit a batch | clear              |
/// | fade-out | emit       | start spreading      | clear + emit again |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationHandlers {
    kind: AnimationKind,
}

impl AnimationHandlers {
    pub fn new(kind: AnimationKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn initialize(&self, emitter: &mut Emitter) {
        emitter.notify(Lifecycle::Initialize);
        if self.kind == AnimationKind::FadeOut {
            emitter.emit_once();
        }
    }

    pub fn trigger(&self, emitter: &mut Emitter) {
        emitter.notify(Lifecycle::Trigger);
        match self.kind {
            AnimationKind::FadeIn => {
                emitter.remove_all_particles();
                emitter.emit_once();
            }
            AnimationKind::FadeOut => {
                for p in emitter.particles_mut() {
                    if let Some(state) = p.fade_out_mut() {
                        state.spreading = true;
                        state.spread_frames = 0;
                        state.spread_factor = 0.0;
                    }
                    p.alpha = 1.0;
                }
            }
        }
    }

    pub fn reset(&self, emitter: &mut Emitter) {
        emitter.remove_all_particles();
        emitter.notify(Lifecycle::Reset);
        if self.kind == AnimationKind::FadeOut {
            emitter.emit_once();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::BehaviourParams;
    use crate::emitter::EmitterConfig;
    use crate::fade_in::FadeIn;
    use crate::fade_out::FadeOut;
    use crate::tuning::AnimationTuning;
    use crate::zone::TextZone;
    use glyphdust_core::{CanvasSize, Generation, Vec2};
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    const COUNT: usize = 64;

    fn emitter(kind: AnimationKind) -> Emitter {
        let canvas = CanvasSize::new(120, 60);
        let mut img = RgbaImage::new(canvas.width, canvas.height);
        for y in 20..40 {
            for x in 30..90 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let zone = Arc::new(TextZone::from_image(&img, Vec2::ZERO, 0).unwrap());
        let params = BehaviourParams {
            canvas,
            radius: 5.0,
            speed: 2.3,
            particle_count: COUNT,
            tuning: AnimationTuning::default(),
        };
        let mut e = Emitter::new(
            Generation(3),
            EmitterConfig {
                rate: COUNT,
                spawn_zone: canvas.rect().expand(50.0),
                seed: 99,
            },
        );
        match kind {
            AnimationKind::FadeIn => e.add_behaviour(Box::new(FadeIn::new(zone, params))),
            AnimationKind::FadeOut => e.add_behaviour(Box::new(FadeOut::new(zone, params))),
        }
        e
    }

    #[test]
    fn fade_in_waits_for_trigger() {
        let handlers = AnimationHandlers::new(AnimationKind::FadeIn);
        let mut e = emitter(AnimationKind::FadeIn);
        handlers.initialize(&mut e);
        assert_eq!(e.alive_count(), 0);

        handlers.trigger(&mut e);
        assert_eq!(e.alive_count(), COUNT);
        e.update();

        // A second trigger restarts with a fresh batch, never more than one
        handlers.trigger(&mut e);
        assert_eq!(e.alive_count(), COUNT);

        handlers.reset(&mut e);
        assert_eq!(e.alive_count(), 0);
    }

    #[test]
    fn fade_out_trigger_then_reset() {
        let handlers = AnimationHandlers::new(AnimationKind::FadeOut);
        let mut e = emitter(AnimationKind::FadeOut);
        handlers.initialize(&mut e);
        assert_eq!(e.alive_count(), COUNT);
        e.update();

        handlers.trigger(&mut e);
        e.update();
        assert!(e
            .particles()
            .iter()
            .all(|p| p.fade_out().is_some_and(|s| s.spreading)));

        handlers.reset(&mut e);
        assert_eq!(e.alive_count(), COUNT);
        for p in e.particles() {
            let s = p.fade_out().unwrap();
            assert_eq!(p.alpha, 0.0);
            assert!(!s.spreading);
            assert_eq!(s.spread_factor, 1.0);
        }
    }
}
