//! Interpolation helpers shared by the animation behaviours

use glyphdust_core::Vec2;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One step of exponential smoothing: move `factor` of the way to `target`
pub fn ease_toward(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}

/// Point on a circle of `radius` around `center` at `angle` radians
pub fn orbit_point(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}
