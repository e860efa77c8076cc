//! Emitter: one generation's particle pool plus the behaviours that drive it

use crate::behaviour::{Behaviour, EmitterEvent, Lifecycle};
use crate::particle::{Particle, ParticlePool};
use crate::rand::ParticleRng;
use glyphdust_core::{Generation, Rect};

/// Static emitter settings
#[derive(Debug, Clone, Copy)]
pub struct EmitterConfig {
    /// Particles created by one `emit_once`, and the pool capacity
    pub rate: usize,
    /// New particles start uniformly inside this rectangle
    pub spawn_zone: Rect,
    pub seed: u32,
}

/// Runtime state for one emitter generation
pub struct Emitter {
    generation: Generation,
    config: EmitterConfig,
    pool: ParticlePool,
    behaviours: Vec<Box<dyn Behaviour>>,
    rng: ParticleRng,
}

impl Emitter {
    pub fn new(generation: Generation, config: EmitterConfig) -> Self {
        Self {
            generation,
            pool: ParticlePool::new(config.rate),
            rng: ParticleRng::new(config.seed),
            config,
            behaviours: Vec::new(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn rate(&self) -> usize {
        self.config.rate
    }

    /// Behaviours run in insertion order, both at creation and every tick
    pub fn add_behaviour(&mut self, behaviour: Box<dyn Behaviour>) {
        self.behaviours.push(behaviour);
    }

    /// Drop every behaviour so nothing of this generation can run again
    pub fn clear_behaviours(&mut self) {
        self.behaviours.clear();
    }

    pub fn behaviour_names(&self) -> Vec<&str> {
        self.behaviours.iter().map(|b| b.name()).collect()
    }

    /// Create one batch of `rate` particles (fewer if live ones still occupy the pool).
    /// Returns how many were created.
    pub fn emit_once(&mut self) -> usize {
        let Self {
            config,
            pool,
            behaviours,
            rng,
            ..
        } = self;

        let mut created = 0;
        while pool.alive_count() < config.rate {
            let position = rng.point_in(config.spawn_zone);
            let Some(p) = pool.spawn(position) else {
                break;
            };
            for b in behaviours.iter_mut() {
                b.initialize(p, rng);
            }
            created += 1;
        }
        log::debug!(
            "[particles] {} emitted {created} particle(s)",
            self.generation
        );
        created
    }

    /// Remove all particles instantly, without any animation
    pub fn remove_all_particles(&mut self) {
        self.pool.clear();
    }

    /// Forward a lifecycle event to every behaviour
    pub fn notify(&mut self, event: Lifecycle) {
        for b in &mut self.behaviours {
            b.on_lifecycle(event);
        }
    }

    /// Advance every live particle by one frame, then drop the dead ones
    pub fn update(&mut self) -> Vec<EmitterEvent> {
        let mut events = Vec::new();
        let Self {
            generation,
            pool,
            behaviours,
            rng,
            ..
        } = self;

        for p in pool.alive_slice_mut() {
            for b in behaviours.iter_mut() {
                if p.dead {
                    break;
                }
                if let Err(e) = b.apply(p, rng) {
                    log::warn!(
                        "[particles] {generation}: '{}' failed, dropping particle: {e}",
                        b.name()
                    );
                    p.dead = true;
                }
            }
        }

        for b in behaviours.iter_mut() {
            b.after_tick(pool.alive_slice_mut(), &mut events);
        }

        pool.compact();
        events
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.alive_slice()
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.pool.alive_slice_mut()
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }
}
