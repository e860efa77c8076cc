//! Animation kinds and their tuning constants

use glyphdust_core::{GlyphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two transition styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    /// Particles converge into the text, then fade away
    #[serde(alias = "fadeIn")]
    FadeIn,
    /// Particles orbit the text, then disperse off-canvas when triggered
    #[serde(alias = "fadeOut")]
    FadeOut,
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationKind::FadeIn => write!(f, "fade-in"),
            AnimationKind::FadeOut => write!(f, "fade-out"),
        }
    }
}

impl FromStr for AnimationKind {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fade-in" | "fadeIn" => Ok(AnimationKind::FadeIn),
            "fade-out" | "fadeOut" => Ok(AnimationKind::FadeOut),
            other => Err(GlyphError::InvalidConfig(format!(
                "unknown animation kind '{other}' (expected fade-in or fade-out)"
            ))),
        }
    }
}

/// Fixed tuning of the behaviours. The defaults reproduce the reference look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTuning {
    /// Max per-axis pixel distance at which a fade-in particle has arrived
    pub arrival_threshold: f32,
    /// Fraction of the configured particle count that must arrive
    pub completion_ratio: f32,
    /// Frames for a linear alpha fade (out after completion, in after reset)
    pub fade_frames: u32,
    /// Orbit angle increment per frame, radians
    pub orbit_step: f32,
    /// Upper bound on the orbit radius, pixels
    pub max_orbit_radius: f32,
    /// Orbit radius is also capped at `canvas_width / orbit_width_divisor`
    pub orbit_width_divisor: f32,
    /// Total width of the per-axis jitter added to the spread direction
    pub spread_jitter: f32,
    /// Particles spawn in the canvas rectangle grown by this many pixels
    pub spawn_margin: f32,
    /// Scale from configured radius to drawn particle radius
    pub radius_scale: f32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            arrival_threshold: 4.0,
            completion_ratio: 0.7,
            fade_frames: 60,
            orbit_step: 0.02,
            max_orbit_radius: 9.0,
            orbit_width_divisor: 150.0,
            spread_jitter: 0.1,
            spawn_margin: 50.0,
            radius_scale: 0.2,
        }
    }
}

impl AnimationTuning {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(GlyphError::InvalidConfig(format!(
                    "{name} must be a positive number, got {v}"
                )))
            }
        };
        positive("arrival_threshold", self.arrival_threshold)?;
        positive("orbit_width_divisor", self.orbit_width_divisor)?;
        positive("radius_scale", self.radius_scale)?;
        if !(self.completion_ratio > 0.0 && self.completion_ratio <= 1.0) {
            return Err(GlyphError::InvalidConfig(format!(
                "completion_ratio must be in (0, 1], got {}",
                self.completion_ratio
            )));
        }
        if self.fade_frames == 0 {
            return Err(GlyphError::InvalidConfig("fade_frames must be at least 1".into()));
        }
        for (name, v) in [
            ("orbit_step", self.orbit_step),
            ("max_orbit_radius", self.max_orbit_radius),
            ("spread_jitter", self.spread_jitter),
            ("spawn_margin", self.spawn_margin),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(GlyphError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Arrivals needed before a fade-in run completes: `ceil(ratio * count)`, at least 1
    pub fn required_arrivals(&self, particle_count: usize) -> usize {
        let exact = self.completion_ratio as f64 * particle_count as f64;
        // Shave rounding noise so 0.7 * 10 is 7, not 8
        ((exact - 1e-6).ceil() as usize).max(1)
    }
}
