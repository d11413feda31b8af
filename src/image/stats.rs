//! Shared luminance and gradient statistics.
//!
//! The quality gate and the feature extractor both consume the edge-density
//! statistic computed here. They apply different downstream thresholds, so
//! they stay separate call sites, but routing both through this module keeps
//! their numeric output bit-identical.

use crate::image::RawImage;
use crate::util::math::clamp01;

/// Divisor mapping the mean gradient magnitude into [0, 1].
const EDGE_NORM_DIVISOR: f32 = 100.0;

/// Rec.601 luminance of one RGBA quad.
#[inline]
pub(crate) fn luminance(px: &[u8]) -> f32 {
    0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2])
}

/// Computes the per-pixel luminance plane in row-major order.
pub(crate) fn luma_plane(img: &RawImage) -> Vec<f32> {
    img.pixels().map(luminance).collect()
}

/// Mean central-difference gradient magnitude over interior pixels.
///
/// The 1-pixel border is excluded so both differences stay in bounds.
/// Grids with no interior (width or height below 3) yield 0.
pub(crate) fn mean_gradient(plane: &[f32], width: usize, height: usize) -> f32 {
    if width < 3 || height < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for y in 1..height - 1 {
        let row = y * width;
        for x in 1..width - 1 {
            let gx = plane[row + x + 1] - plane[row + x - 1];
            let gy = plane[row + width + x] - plane[row - width + x];
            sum += f64::from((gx * gx + gy * gy).sqrt());
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64) as f32
}

/// Normalized edge density: mean interior gradient divided by 100, clamped
/// to [0, 1].
pub(crate) fn edge_density(plane: &[f32], width: usize, height: usize) -> f32 {
    clamp01(mean_gradient(plane, width, height) / EDGE_NORM_DIVISOR)
}
