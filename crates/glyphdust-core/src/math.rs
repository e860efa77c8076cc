//! Scalar and vector helpers used by the particle behaviours

use crate::types::CanvasSize;
use glam::Vec2;

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics when `min > max`; the upper bound
/// wins, matching `min(max(value, min), max)`.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Clamp a point into the canvas rectangle `[0, width] x [0, height]`
pub fn clamp_to_canvas(point: Vec2, size: CanvasSize) -> Vec2 {
    Vec2::new(
        clamp(point.x, 0.0, size.width as f32),
        clamp(point.y, 0.0, size.height as f32),
    )
}

/// Per-axis absolute distance between two points
pub fn axis_distance(a: Vec2, b: Vec2) -> Vec2 {
    (a - b).abs()
}

/// True when both axis distances are strictly below `threshold`
pub fn within_axis_distance(a: Vec2, b: Vec2, threshold: f32) -> bool {
    let d = axis_distance(a, b);
    d.x < threshold && d.y < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn clamp_inverted_range_prefers_max() {
        assert_eq!(clamp(5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn clamp_point_to_canvas() {
        let size = CanvasSize::new(100, 50);
        let p = clamp_to_canvas(Vec2::new(-3.0, 70.0), size);
        assert_eq!(p, Vec2::new(0.0, 50.0));
    }

    #[test]
    fn axis_threshold_requires_both_axes() {
        let a = Vec2::new(0.0, 0.0);
        assert!(within_axis_distance(a, Vec2::new(3.9, -3.9), 4.0));
        assert!(!within_axis_distance(a, Vec2::new(3.9, 4.0), 4.0));
        assert!(!within_axis_distance(a, Vec2::new(10.0, 0.0), 4.0));
    }
}
