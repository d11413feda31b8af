//! Numeric helpers for scoring and confidence normalization.

/// Linear interpolation between `a` and `b` at parameter `t`.
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps `value` into `[0, 1]`.
pub(crate) fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
