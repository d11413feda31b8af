//! Quality gate rejecting photos without enough visual structure.
//!
//! The gate runs before feature extraction so unusable photos (too dark, too
//! flat, or both) never cost a full scoring pass. Rejection is a soft
//! outcome: the query returns an empty result set so the caller can prompt
//! for a retake instead of surfacing an error.

use crate::image::stats::{edge_density, luma_plane};
use crate::image::RawImage;

/// Minimum mean luminance for a usable photo.
const MIN_MEAN_LUMA: f32 = 18.0;

/// Minimum luminance standard deviation for a usable photo.
const MIN_LUMA_STD: f32 = 10.0;

/// Minimum normalized edge density for a usable photo.
const MIN_EDGE_DENSITY: f32 = 0.02;

/// Scalar quality measurements and their threshold classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityMetrics {
    /// Mean luminance over the full grid.
    pub mean: f32,
    /// Luminance standard deviation over the full grid.
    pub std_dev: f32,
    /// Mean interior gradient magnitude divided by 100, clamped to [0, 1].
    pub edge_norm: f32,
    /// Mean luminance fell below the darkness threshold.
    pub too_dark: bool,
    /// Luminance spread fell below the flatness threshold.
    pub too_flat: bool,
    /// The photo carries too little structure to match meaningfully.
    pub too_blank: bool,
}

impl QualityMetrics {
    fn classify(mean: f32, std_dev: f32, edge_norm: f32) -> Self {
        let too_dark = mean < MIN_MEAN_LUMA;
        let too_flat = std_dev < MIN_LUMA_STD;
        // Mixed AND/OR check matches the thresholds the reference corpus was
        // tuned with; candidate for a single quality score if accuracy work
        // continues.
        let too_blank = (too_dark && too_flat) || edge_norm < MIN_EDGE_DENSITY;
        Self {
            mean,
            std_dev,
            edge_norm,
            too_dark,
            too_flat,
            too_blank,
        }
    }

    fn blank() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.0,
            edge_norm: 0.0,
            too_dark: true,
            too_flat: true,
            too_blank: true,
        }
    }
}

/// Measures luminance statistics and edge density for one image.
///
/// Zero-area grids short-circuit to an all-zero, `too_blank` result without
/// touching any pixel loop.
pub fn assess_quality(img: &RawImage) -> QualityMetrics {
    if img.is_empty() {
        return QualityMetrics::blank();
    }

    let plane = luma_plane(img);
    let count = plane.len() as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &l in &plane {
        sum += f64::from(l);
        sum_sq += f64::from(l) * f64::from(l);
    }
    let mean = sum / count;
    let variance = (sum_sq / count - mean * mean).max(0.0);
    let std_dev = variance.sqrt();

    let edge_norm = edge_density(&plane, img.width(), img.height());
    QualityMetrics::classify(mean as f32, std_dev as f32, edge_norm)
}
