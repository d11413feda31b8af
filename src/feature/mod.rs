//! Feature extraction: joint color histogram plus edge density.
//!
//! The descriptor is deliberately simple. Each color channel is quantized
//! into 4 equal-width bins and the three bin indices are flattened into one
//! of 64 buckets, giving a coarse joint color distribution; a single scalar
//! captures texture roughness independently of color. Extraction is a pure
//! function of the pixel data: identical input yields a bit-identical
//! vector.

use crate::image::stats::{edge_density, luma_plane};
use crate::image::RawImage;
use serde::{Deserialize, Serialize};

/// Number of joint histogram buckets.
pub const HIST_BUCKETS: usize = 64;

/// Equal-width quantization bins per color channel.
const BINS_PER_CHANNEL: usize = 4;

/// Loose histogram-sum tolerance for vectors round-tripped through disk.
const SUM_TOLERANCE: f32 = 1e-3;

/// Fixed-length visual signature of one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Joint RGB histogram: 64 non-negative weights summing to 1.
    pub hist: Vec<f32>,
    /// Normalized edge density in [0, 1].
    pub edge: f32,
}

impl FeatureVector {
    /// Checks the descriptor contract, returning the violated clause.
    ///
    /// Used when ingesting externally produced index documents; extracted
    /// vectors satisfy this by construction.
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.hist.len() != HIST_BUCKETS {
            return Err("histogram must hold exactly 64 buckets");
        }
        let mut sum = 0.0f32;
        for &w in &self.hist {
            if !w.is_finite() || w < 0.0 {
                return Err("histogram weights must be finite and non-negative");
            }
            sum += w;
        }
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err("histogram weights must sum to 1");
        }
        if !self.edge.is_finite() || !(0.0..=1.0).contains(&self.edge) {
            return Err("edge density must lie in [0, 1]");
        }
        Ok(())
    }
}

/// Quantizes one channel value into its equal-width bin index.
#[inline]
fn channel_bin(value: u8) -> usize {
    ((usize::from(value) * BINS_PER_CHANNEL) / 256).min(BINS_PER_CHANNEL - 1)
}

/// Extracts the feature vector for an image that passed the quality gate.
///
/// Every pixel increments exactly one histogram bucket; counts are then
/// normalized by the pixel count. The edge scalar reuses the same gradient
/// routine the quality gate runs, so both stages observe identical numbers.
pub fn extract_features(img: &RawImage) -> FeatureVector {
    let mut hist = vec![0.0f32; HIST_BUCKETS];
    let total = img.pixel_count();
    if total == 0 {
        // The gate rejects zero-area grids before extraction runs.
        return FeatureVector { hist, edge: 0.0 };
    }

    for px in img.pixels() {
        let r = channel_bin(px[0]);
        let g = channel_bin(px[1]);
        let b = channel_bin(px[2]);
        hist[(r * BINS_PER_CHANNEL + g) * BINS_PER_CHANNEL + b] += 1.0;
    }
    let norm = 1.0 / total as f32;
    for w in &mut hist {
        *w *= norm;
    }

    let plane = luma_plane(img);
    let edge = edge_density(&plane, img.width(), img.height());
    FeatureVector { hist, edge }
}
