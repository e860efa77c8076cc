//! Particle engine: owns the registered emitters and packs their draw data

use crate::behaviour::EmitterEvent;
use crate::emitter::Emitter;
use crate::particle::ParticleSprite;
use glyphdust_core::Generation;

/// Ticks every registered emitter and collects sprites for the renderer.
///
/// Normally holds a single emitter; during a rebuild the outgoing generation
/// is removed before the incoming one is added.
pub struct ParticleEngine {
    emitters: Vec<Emitter>,
    /// Pre-allocated sprite buffer, refilled by `pack_sprites`
    sprite_buffer: Vec<ParticleSprite>,
}

impl ParticleEngine {
    pub fn new() -> Self {
        Self {
            emitters: Vec::new(),
            sprite_buffer: Vec::new(),
        }
    }

    /// Register an emitter. A previous emitter of the same generation is replaced.
    pub fn add_emitter(&mut self, emitter: Emitter) {
        let generation = emitter.generation();
        self.remove_emitter(generation);
        log::debug!("[particles] registered emitter {generation}");
        self.emitters.push(emitter);
    }

    /// Unregister an emitter, clearing its particles and behaviours.
    /// Returns false when no emitter of that generation was registered.
    pub fn remove_emitter(&mut self, generation: Generation) -> bool {
        let Some(idx) = self
            .emitters
            .iter()
            .position(|e| e.generation() == generation)
        else {
            return false;
        };
        let mut emitter = self.emitters.remove(idx);
        emitter.remove_all_particles();
        emitter.clear_behaviours();
        log::debug!("[particles] unregistered emitter {generation}");
        true
    }

    pub fn emitter_mut(&mut self, generation: Generation) -> Option<&mut Emitter> {
        self.emitters
            .iter_mut()
            .find(|e| e.generation() == generation)
    }

    pub fn emitter(&self, generation: Generation) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.generation() == generation)
    }

    /// Advance every emitter by one frame
    pub fn update(&mut self) -> Vec<(Generation, EmitterEvent)> {
        let mut events = Vec::new();
        for emitter in &mut self.emitters {
            let generation = emitter.generation();
            events.extend(emitter.update().into_iter().map(|ev| (generation, ev)));
        }
        events
    }

    /// Pack live particles of all emitters into the sprite buffer.
    /// Call this after `update()`.
    pub fn pack_sprites(&mut self) -> &[ParticleSprite] {
        self.sprite_buffer.clear();
        for emitter in &self.emitters {
            self.sprite_buffer
                .extend(emitter.particles().iter().map(ParticleSprite::from_particle));
        }
        &self.sprite_buffer
    }

    /// Sprites from the last `pack_sprites`
    pub fn sprites(&self) -> &[ParticleSprite] {
        &self.sprite_buffer
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Total alive particles across all emitters
    pub fn total_alive(&self) -> usize {
        self.emitters.iter().map(|e| e.alive_count()).sum()
    }

    /// Drop every emitter and the sprite buffer
    pub fn destroy(&mut self) {
        for mut emitter in self.emitters.drain(..) {
            emitter.remove_all_particles();
            emitter.clear_behaviours();
        }
        self.sprite_buffer.clear();
    }
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new()
    }
}
