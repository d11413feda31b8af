//! Owned RGBA pixel grids and the shared luminance statistics they feed.
//!
//! `RawImage` is the normalized input every pipeline stage consumes: a small
//! fixed-width grid produced once per query by the preprocessor and never
//! mutated afterwards. Zero-area grids are representable on purpose; the
//! quality gate short-circuits on them instead of this type rejecting them.

use crate::util::{TexMatchError, TexMatchResult};

#[cfg(feature = "image-io")]
pub mod io;
pub(crate) mod stats;

/// Number of bytes per RGBA pixel.
pub(crate) const CHANNELS: usize = 4;

/// Immutable owned RGBA8 pixel grid.
#[derive(Clone, Debug)]
pub struct RawImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RawImage {
    /// Creates an image from a tightly packed RGBA byte buffer.
    ///
    /// The buffer must hold exactly `width * height` four-byte quads.
    /// Zero-area dimensions are accepted with an empty buffer.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> TexMatchResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or(TexMatchError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            })?;
        if data.len() < needed {
            return Err(TexMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(TexMatchError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel count.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns true when the grid covers zero area.
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Returns the packed RGBA backing buffer.
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RGBA quad at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * CHANNELS;
        self.data.get(start..start + CHANNELS)
    }

    /// Iterates over pixels as RGBA quads in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }
}
