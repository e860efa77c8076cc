//! Particle types: simulation state and packed draw data

use bytemuck::{Pod, Zeroable};
use glyphdust_core::{Color, Vec2};

/// Progress of a fade-in particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeInPhase {
    /// Easing toward its target
    Traveling,
    /// Within the arrival threshold of its target
    Arrived,
    /// Completion reached; alpha drops over `frames` of the fade duration
    FadingOut { frames: u32 },
}

/// Scratch state owned by the fade-in behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeInState {
    pub target: Vec2,
    /// Fraction of the remaining distance covered per frame
    pub velocity: f32,
    pub phase: FadeInPhase,
    /// Set on the first arrival and never cleared
    pub reached_target: bool,
}

/// Scratch state owned by the fade-out behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOutState {
    pub target: Vec2,
    pub orbit_radius: f32,
    pub angle: f32,
    /// Spread heading; normalized only when used
    pub direction: Vec2,
    /// Fallback heading, radians, used when `direction` is zero
    pub angle_offset: f32,
    pub spreading: bool,
    /// Frames spent spreading since the last trigger
    pub spread_frames: u32,
    /// 0 right after a trigger, grows to 1 over the fade duration
    pub spread_factor: f32,
}

/// Behaviour-private state, selected by the active animation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParticleState {
    #[default]
    Unassigned,
    FadeIn(FadeInState),
    FadeOut(FadeOutState),
}

/// A live particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub radius: f32,
    pub color: Color,
    pub alpha: f32,
    pub dead: bool,
    pub state: ParticleState,
}

impl Particle {
    pub fn dead() -> Self {
        Self {
            position: Vec2::ZERO,
            radius: 0.0,
            color: Color::WHITE,
            alpha: 0.0,
            dead: true,
            state: ParticleState::Unassigned,
        }
    }

    /// Reset to a fresh, visible particle at `position`
    pub fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.radius = 1.0;
        self.color = Color::WHITE;
        self.alpha = 1.0;
        self.dead = false;
        self.state = ParticleState::Unassigned;
    }

    pub fn fade_in(&self) -> Option<&FadeInState> {
        match &self.state {
            ParticleState::FadeIn(s) => Some(s),
            _ => None,
        }
    }

    pub fn fade_out(&self) -> Option<&FadeOutState> {
        match &self.state {
            ParticleState::FadeOut(s) => Some(s),
            _ => None,
        }
    }

    pub fn fade_out_mut(&mut self) -> Option<&mut FadeOutState> {
        match &mut self.state {
            ParticleState::FadeOut(s) => Some(s),
            _ => None,
        }
    }
}

/// Draw data for one particle, consumed by the renderer.
/// 32 bytes: two rows of vec4.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleSprite {
    /// x, y = canvas position, z = radius, w = alpha
    pub pos_radius_alpha: [f32; 4],
    /// Straight (non-premultiplied) rgba
    pub color: [f32; 4],
}

impl ParticleSprite {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            pos_radius_alpha: [p.position.x, p.position.y, p.radius, p.alpha],
            color: p.color.to_array(),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pos_radius_alpha[0], self.pos_radius_alpha[1])
    }

    pub fn radius(&self) -> f32 {
        self.pos_radius_alpha[2]
    }

    pub fn alpha(&self) -> f32 {
        self.pos_radius_alpha[3]
    }
}

/// Swap-remove pool for O(1) particle kill and contiguous alive iteration.
///
/// Capacity is the configured particle count, so a pool can never hold more
/// live particles than one emission batch.
pub struct ParticlePool {
    particles: Vec<Particle>,
    alive_count: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let mut particles = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            particles.push(Particle::dead());
        }
        Self {
            particles,
            alive_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Spawn one particle at `position`, returning a mutable ref to initialize it.
    /// Returns None if pool is full.
    pub fn spawn(&mut self, position: Vec2) -> Option<&mut Particle> {
        if self.alive_count >= self.particles.len() {
            return None;
        }
        let idx = self.alive_count;
        self.particles[idx].respawn(position);
        self.alive_count += 1;
        Some(&mut self.particles[idx])
    }

    /// Drop particles flagged dead via swap-remove. Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.alive_count;
        let mut i = 0;
        while i < self.alive_count {
            if self.particles[i].dead {
                self.alive_count -= 1;
                if i < self.alive_count {
                    self.particles.swap(i, self.alive_count);
                }
                // Do not advance i: the swapped-in particle needs checking
            } else {
                i += 1;
            }
        }
        before - self.alive_count
    }

    /// Remove every particle immediately
    pub fn clear(&mut self) {
        for p in &mut self.particles[..self.alive_count] {
            p.dead = true;
        }
        self.alive_count = 0;
    }

    /// Access alive particles slice for reading (first `alive_count` elements)
    pub fn alive_slice(&self) -> &[Particle] {
        &self.particles[..self.alive_count]
    }

    /// Access alive particles mutably
    pub fn alive_slice_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.alive_count]
    }
}
