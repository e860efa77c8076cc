//! glyphdust particles - text-shaped particle fields
//!
//! Provides the particle side of a glyphdust animation:
//! - Swap-remove particle pool with per-particle behaviour state
//! - Text zone sampling weighted by glyph pixels
//! - Fade-in convergence and fade-out dispersal behaviours
//! - Per-kind initialize / trigger / reset handlers
//! - Sprite packing for the renderer

pub mod behaviour;
pub mod curves;
pub mod emitter;
pub mod engine;
pub mod fade_in;
pub mod fade_out;
pub mod lifecycle;
pub mod particle;
pub mod rand;
pub mod tuning;
pub mod zone;

pub use behaviour::{Behaviour, BehaviourParams, ColorBehaviour, EmitterEvent, Lifecycle};
pub use emitter::{Emitter, EmitterConfig};
pub use engine::ParticleEngine;
pub use fade_in::FadeIn;
pub use fade_out::FadeOut;
pub use lifecycle::AnimationHandlers;
pub use particle::{
    FadeInPhase, FadeInState, FadeOutState, Particle, ParticlePool, ParticleSprite, ParticleState,
};
pub use rand::ParticleRng;
pub use tuning::{AnimationKind, AnimationTuning};
pub use zone::TextZone;
