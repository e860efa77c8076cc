//! Fade-in: particles converge onto the text, then fade away once enough arrived

use crate::behaviour::{Behaviour, BehaviourParams, EmitterEvent, Lifecycle};
use crate::curves::{ease_toward, lerp_f32};
use crate::particle::{FadeInPhase, FadeInState, Particle, ParticleState};
use crate::rand::ParticleRng;
use crate::tuning::AnimationKind;
use crate::zone::TextZone;
use glyphdust_core::{clamp_to_canvas, within_axis_distance, GlyphError, Result};
use std::sync::Arc;

pub struct FadeIn {
    zone: Arc<TextZone>,
    params: BehaviourParams,
    required: usize,
    arrivals: usize,
    completed: bool,
}

impl FadeIn {
    pub fn new(zone: Arc<TextZone>, params: BehaviourParams) -> Self {
        Self {
            required: params.tuning.required_arrivals(params.particle_count),
            zone,
            params,
            arrivals: 0,
            completed: false,
        }
    }

    /// First arrivals counted since the last trigger
    pub fn arrivals(&self) -> usize {
        self.arrivals
    }

    pub fn required_arrivals(&self) -> usize {
        self.required
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Behaviour for FadeIn {
    fn initialize(&mut self, particle: &mut Particle, rng: &mut ParticleRng) {
        let canvas = self.params.canvas;
        particle.position = rng.point_in(canvas.rect());
        particle.radius = self.params.radius * self.params.tuning.radius_scale;
        particle.alpha = 1.0;
        particle.state = ParticleState::FadeIn(FadeInState {
            target: clamp_to_canvas(self.zone.sample(rng), canvas),
            velocity: self.params.speed / 100.0,
            phase: FadeInPhase::Traveling,
            reached_target: false,
        });
    }

    fn apply(&mut self, particle: &mut Particle, _rng: &mut ParticleRng) -> Result<()> {
        let ParticleState::FadeIn(state) = &mut particle.state else {
            return Err(GlyphError::BehaviourFault(
                "fade-in applied to a particle without fade-in state".into(),
            ));
        };

        particle.position = ease_toward(particle.position, state.target, state.velocity);
        if !particle.position.is_finite() {
            return Err(GlyphError::BehaviourFault(format!(
                "non-finite position {:?}",
                particle.position
            )));
        }

        match state.phase {
            FadeInPhase::Traveling => {
                if !state.reached_target
                    && within_axis_distance(
                        particle.position,
                        state.target,
                        self.params.tuning.arrival_threshold,
                    )
                {
                    state.reached_target = true;
                    state.phase = FadeInPhase::Arrived;
                    self.arrivals += 1;
                }
            }
            FadeInPhase::Arrived => {}
            FadeInPhase::FadingOut { frames } => {
                let frames = frames + 1;
                let total = self.params.tuning.fade_frames;
                state.phase = FadeInPhase::FadingOut { frames };
                if frames >= total {
                    particle.alpha = 0.0;
                    particle.dead = true;
                } else {
                    particle.alpha = lerp_f32(1.0, 0.0, frames as f32 / total as f32);
                }
            }
        }
        Ok(())
    }

    fn after_tick(&mut self, particles: &mut [Particle], events: &mut Vec<EmitterEvent>) {
        if self.completed || self.arrivals < self.required {
            return;
        }
        self.completed = true;
        log::debug!(
            "[particles] fade-in complete: {}/{} arrived",
            self.arrivals,
            self.params.particle_count
        );
        events.push(EmitterEvent::AnimationEnded(AnimationKind::FadeIn));

        for p in particles.iter_mut().filter(|p| !p.dead) {
            if let ParticleState::FadeIn(state) = &mut p.state {
                state.phase = FadeInPhase::FadingOut { frames: 0 };
            }
        }
    }

    fn on_lifecycle(&mut self, event: Lifecycle) {
        if event == Lifecycle::Trigger {
            self.arrivals = 0;
            self.completed = false;
        }
    }

    fn name(&self) -> &str {
        "fade-in"
    }
}
