//! Fade-out: particles orbit the text until triggered, then disperse off-canvas

use crate::behaviour::{Behaviour, BehaviourParams, EmitterEvent, Lifecycle};
use crate::curves::orbit_point;
use crate::particle::{FadeOutState, Particle, ParticleState};
use crate::rand::ParticleRng;
use crate::tuning::AnimationKind;
use crate::zone::TextZone;
use glyphdust_core::{clamp_to_canvas, GlyphError, Result, Vec2};
use std::f32::consts::PI;
use std::sync::Arc;

pub struct FadeOut {
    zone: Arc<TextZone>,
    params: BehaviourParams,
    max_orbit: f32,
    /// Spreading was triggered and the batch has not finished yet
    triggered: bool,
    /// New particles start invisible and fade back in (set by reset)
    reappear: bool,
}

impl FadeOut {
    pub fn new(zone: Arc<TextZone>, params: BehaviourParams) -> Self {
        let tuning = params.tuning;
        let max_orbit = tuning
            .max_orbit_radius
            .min(params.canvas.width as f32 / tuning.orbit_width_divisor);
        Self {
            zone,
            params,
            max_orbit,
            triggered: false,
            reappear: false,
        }
    }

    /// Exclusive upper bound of the orbit radius for this canvas
    pub fn max_orbit(&self) -> f32 {
        self.max_orbit
    }

    fn spread_step(&self, state: &FadeOutState, rng: &mut ParticleRng) -> Vec2 {
        let heading = state
            .direction
            .try_normalize()
            .unwrap_or_else(|| Vec2::from_angle(state.angle_offset));
        let half = self.params.tuning.spread_jitter / 2.0;
        let jitter = Vec2::new(rng.range(-half, half), rng.range(-half, half));
        (heading + jitter) * self.params.speed
    }
}

impl Behaviour for FadeOut {
    fn initialize(&mut self, particle: &mut Particle, rng: &mut ParticleRng) {
        let canvas = self.params.canvas;
        let state = FadeOutState {
            orbit_radius: rng.range(0.0, self.max_orbit),
            angle: rng.angle(),
            target: clamp_to_canvas(self.zone.sample(rng), canvas),
            direction: rng.unit_square(),
            angle_offset: (rng.next_f32() - 0.5) * PI,
            spreading: false,
            spread_frames: 0,
            spread_factor: 1.0,
        };
        particle.position = orbit_point(state.target, state.orbit_radius, state.angle);
        particle.radius = self.params.radius * self.params.tuning.radius_scale;
        particle.alpha = if self.reappear { 0.0 } else { 1.0 };
        particle.state = ParticleState::FadeOut(state);
    }

    fn apply(&mut self, particle: &mut Particle, rng: &mut ParticleRng) -> Result<()> {
        let ParticleState::FadeOut(mut state) = particle.state else {
            return Err(GlyphError::BehaviourFault(
                "fade-out applied to a particle without fade-out state".into(),
            ));
        };
        let tuning = self.params.tuning;
        let fade_step = 1.0 / tuning.fade_frames as f32;
        state.angle += tuning.orbit_step;

        if state.spreading {
            state.spread_frames += 1;
            state.spread_factor = (state.spread_factor + fade_step).min(1.0);
            particle.position += self.spread_step(&state, rng);
            if !particle.position.is_finite() {
                return Err(GlyphError::BehaviourFault(format!(
                    "non-finite position {:?}",
                    particle.position
                )));
            }
            if !self.params.canvas.contains_strict(particle.position) {
                particle.dead = true;
            }
        } else {
            particle.position = orbit_point(state.target, state.orbit_radius, state.angle);
            if particle.alpha < 1.0 {
                particle.alpha = (particle.alpha + fade_step).min(1.0);
            }
        }

        particle.state = ParticleState::FadeOut(state);
        Ok(())
    }

    fn after_tick(&mut self, particles: &mut [Particle], events: &mut Vec<EmitterEvent>) {
        if !self.triggered {
            return;
        }
        // Triggered with nothing on screen: there is no batch to finish
        if particles.is_empty() {
            self.triggered = false;
            log::debug!("[particles] fade-out triggered with no particles, ignoring");
            return;
        }
        if particles.iter().all(|p| p.dead) {
            self.triggered = false;
            log::debug!("[particles] fade-out complete");
            events.push(EmitterEvent::AnimationEnded(AnimationKind::FadeOut));
        }
    }

    fn on_lifecycle(&mut self, event: Lifecycle) {
        match event {
            Lifecycle::Initialize => {}
            Lifecycle::Trigger => self.triggered = true,
            Lifecycle::Reset => {
                self.triggered = false;
                self.reappear = true;
            }
        }
    }

    fn name(&self) -> &str {
        "fade-out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{Emitter, EmitterConfig};
    use crate::tuning::AnimationTuning;
    use glyphdust_core::{CanvasSize, Generation};
    use image::{Rgba, RgbaImage};
    use proptest::prelude::*;

    const CANVAS: CanvasSize = CanvasSize::new(300, 150);

    fn zone() -> Arc<TextZone> {
        let mut img = RgbaImage::new(CANVAS.width, CANVAS.height);
        for y in 60..90 {
            for x in 100..200 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        Arc::new(TextZone::from_image(&img, Vec2::ZERO, 0).unwrap())
    }

    fn params(speed: f32) -> BehaviourParams {
        BehaviourParams {
            canvas: CANVAS,
            radius: 5.0,
            speed,
            particle_count: 200,
            tuning: AnimationTuning::default(),
        }
    }

    fn emitter(speed: f32, seed: u32) -> Emitter {
        let mut e = Emitter::new(
            Generation(1),
            EmitterConfig {
                rate: 200,
                spawn_zone: CANVAS.rect().expand(50.0),
                seed,
            },
        );
        e.add_behaviour(Box::new(FadeOut::new(zone(), params(speed))));
        e
    }

    fn start_spreading(e: &mut Emitter) {
        e.notify(Lifecycle::Trigger);
        for p in e.particles_mut() {
            if let Some(s) = p.fade_out_mut() {
                s.spreading = true;
                s.spread_frames = 0;
                s.spread_factor = 0.0;
            }
            p.alpha = 1.0;
        }
    }

    #[test]
    fn orbit_radius_respects_canvas_width() {
        let b = FadeOut::new(zone(), params(2.3));
        assert!((b.max_orbit() - 2.0).abs() < 1e-6);

        let wide = BehaviourParams {
            canvas: CanvasSize::new(3000, 150),
            ..params(2.3)
        };
        let b = FadeOut::new(zone(), wide);
        assert!((b.max_orbit() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn initialize_sets_orbit_state() {
        let mut b = FadeOut::new(zone(), params(2.3));
        let mut rng = ParticleRng::new(21);
        let mut p = Particle::dead();
        p.respawn(Vec2::new(-50.0, -50.0));
        b.initialize(&mut p, &mut rng);

        let s = *p.fade_out().unwrap();
        assert!(s.orbit_radius >= 0.0 && s.orbit_radius < 2.0);
        assert!(s.direction.x >= -1.0 && s.direction.x < 1.0);
        assert!(s.direction.y >= -1.0 && s.direction.y < 1.0);
        assert!(s.angle_offset.abs() <= PI / 2.0);
        assert!(!s.spreading);
        assert_eq!(p.alpha, 1.0);
        assert!((p.position - s.target).length() <= s.orbit_radius + 1e-4);
    }

    #[test]
    fn trigger_spreads_every_particle_until_off_canvas() {
        let mut e = emitter(2.3, 5);
        e.emit_once();
        for _ in 0..10 {
            e.update();
        }
        start_spreading(&mut e);
        let events = e.update();
        assert!(events.is_empty());
        assert!(e
            .particles()
            .iter()
            .all(|p| p.fade_out().is_some_and(|s| s.spreading && s.spread_frames == 1)));

        let mut ended = 0;
        for _ in 0..400 {
            ended += e.update().len();
        }
        assert_eq!(e.alive_count(), 0);
        assert_eq!(ended, 1);
    }

    #[test]
    fn retrigger_after_dispersal_does_not_complete_again() {
        let mut e = emitter(2.3, 8);
        e.emit_once();
        start_spreading(&mut e);
        let mut ended = 0;
        for _ in 0..400 {
            ended += e.update().len();
        }
        assert_eq!(e.alive_count(), 0);
        assert_eq!(ended, 1);

        start_spreading(&mut e);
        assert!(e.update().is_empty());
        assert!(e.update().is_empty());

        // A fresh batch triggered later still completes once
        e.notify(Lifecycle::Reset);
        e.emit_once();
        start_spreading(&mut e);
        let mut ended = 0;
        for _ in 0..400 {
            ended += e.update().len();
        }
        assert_eq!(ended, 1);
    }

    #[test]
    fn spread_factor_grows_to_one() {
        let mut e = emitter(0.01, 6);
        e.emit_once();
        start_spreading(&mut e);
        for _ in 0..30 {
            e.update();
        }
        for p in e.particles() {
            let s = p.fade_out().unwrap();
            assert!((s.spread_factor - 0.5).abs() < 1e-3);
        }
        for _ in 0..60 {
            e.update();
        }
        assert!(e
            .particles()
            .iter()
            .all(|p| p.fade_out().unwrap().spread_factor == 1.0));
    }

    #[test]
    fn reset_batch_is_invisible_then_reappears() {
        let mut e = emitter(2.3, 7);
        e.emit_once();
        start_spreading(&mut e);
        e.update();

        e.remove_all_particles();
        e.notify(Lifecycle::Reset);
        e.emit_once();
        assert_eq!(e.alive_count(), 200);
        for p in e.particles() {
            let s = p.fade_out().unwrap();
            assert_eq!(p.alpha, 0.0);
            assert!(!s.spreading);
            assert_eq!(s.spread_factor, 1.0);
        }

        let fade = AnimationTuning::default().fade_frames;
        for _ in 0..fade {
            assert!(e.update().is_empty());
        }
        assert!(e.particles().iter().all(|p| (p.alpha - 1.0).abs() < 1e-4));
    }

    #[test]
    fn zero_direction_still_leaves_canvas() {
        let mut b = FadeOut::new(zone(), params(3.0));
        let mut rng = ParticleRng::new(9);
        let mut p = Particle::dead();
        p.respawn(Vec2::ZERO);
        b.initialize(&mut p, &mut rng);
        if let Some(s) = p.fade_out_mut() {
            s.direction = Vec2::ZERO;
            s.spreading = true;
        }
        for _ in 0..500 {
            b.apply(&mut p, &mut rng).unwrap();
            if p.dead {
                break;
            }
        }
        assert!(p.dead);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn orbit_stays_within_radius(seed in 1u32..u32::MAX) {
            let mut e = emitter(2.3, seed);
            e.emit_once();
            for _ in 0..100 {
                e.update();
                prop_assert_eq!(e.alive_count(), 200);
                for p in e.particles() {
                    let s = p.fade_out().unwrap();
                    prop_assert!((p.position - s.target).length() <= s.orbit_radius + 1e-3);
                }
            }
        }
    }
}
