//! Image preprocessing via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. The preprocessor
//! normalizes an arbitrary source photo into the small fixed-width grid the
//! rest of the pipeline expects: decode, scale to a 64-pixel width keeping
//! the aspect ratio, then round-trip through JPEG at a fixed quality factor
//! so every query sees the same compression characteristics the reference
//! corpus was built with.

use crate::image::RawImage;
use crate::trace::{trace_event, trace_span};
use crate::util::{TexMatchError, TexMatchResult};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// Width every query image is scaled to before feature extraction.
pub const TARGET_WIDTH: u32 = 64;

/// Quality factor for the lossy normalization round-trip.
const JPEG_QUALITY: u8 = 80;

/// Decodes and normalizes an image from raw encoded bytes.
pub fn preprocess_bytes(bytes: &[u8]) -> TexMatchResult<RawImage> {
    let decoded = image::load_from_memory(bytes).map_err(|err| TexMatchError::Decode {
        reason: err.to_string(),
    })?;
    preprocess_decoded(&decoded)
}

/// Loads, decodes and normalizes an image from disk.
pub fn preprocess_path<P: AsRef<Path>>(path: P) -> TexMatchResult<RawImage> {
    let decoded = image::open(path).map_err(|err| TexMatchError::Decode {
        reason: err.to_string(),
    })?;
    preprocess_decoded(&decoded)
}

/// Normalizes an already decoded image into a `RawImage`.
pub fn preprocess_decoded(img: &DynamicImage) -> TexMatchResult<RawImage> {
    let _span = trace_span!("preprocess", width = img.width(), height = img.height()).entered();

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(TexMatchError::InvalidDimensions { width, height });
    }

    let target_height =
        ((f64::from(height) * f64::from(TARGET_WIDTH)) / f64::from(width)).round() as u32;
    if target_height == 0 {
        return Err(TexMatchError::InvalidDimensions {
            width: TARGET_WIDTH,
            height: 0,
        });
    }
    let scaled = img.resize_exact(TARGET_WIDTH, target_height, FilterType::Triangle);

    // JPEG has no alpha channel, so the round-trip runs on RGB.
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&scaled.to_rgb8())
        .map_err(|err| TexMatchError::Decode {
            reason: err.to_string(),
        })?;
    let normalized = image::load_from_memory(&jpeg).map_err(|err| TexMatchError::Decode {
        reason: err.to_string(),
    })?;

    let (out_width, out_height) = (normalized.width(), normalized.height());
    if out_width == 0 || out_height == 0 {
        return Err(TexMatchError::InvalidDimensions {
            width: out_width,
            height: out_height,
        });
    }

    trace_event!(
        "preprocess_done",
        out_width = out_width,
        out_height = out_height
    );
    let rgba = normalized.to_rgba8();
    RawImage::from_rgba(rgba.into_raw(), out_width as usize, out_height as usize)
}
