//! Front-to-back resolution of merged deep pixels into flat RGBA.

use crate::deep::row::DeepRow;
use crate::deep::sample::DeepSample;
use crate::foundation::error::{DeepError, DeepResult};

/// Accumulated opacity at which the remaining samples of a pixel are skipped.
const OPAQUE_EPSILON: f32 = 1e-3;

/// A flattened raster: premultiplied RGBA f32 values, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` floats, RGBA interleaved.
    pub data: Vec<f32>,
}

impl FlatImage {
    /// Allocate a zeroed raster.
    pub fn new(width: u32, height: u32) -> DeepResult<Self> {
        let floats = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| DeepError::allocation("flat raster size overflows"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(floats)
            .map_err(|e| DeepError::allocation(format!("flat raster of {floats} floats: {e}")))?;
        data.resize(floats, 0.0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// One scanline's RGBA values.
    pub fn row(&self, y: u32) -> &[f32] {
        let stride = self.width as usize * 4;
        &self.data[y as usize * stride..][..stride]
    }

    /// Mutable scanline access.
    pub fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let stride = self.width as usize * 4;
        &mut self.data[y as usize * stride..][..stride]
    }

    /// RGBA tuple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

fn accumulate(samples: impl Iterator<Item = DeepSample>) -> [f32; 4] {
    let mut acc = [0.0f32; 4];
    for s in samples {
        // "Over" directly on the premultiplied representation. Depth only
        // ordered the samples; the merger already split volumes, so each is
        // applied as if its absorption sat at its front.
        let inv = 1.0 - acc[3];
        acc[0] += s.red * inv;
        acc[1] += s.green * inv;
        acc[2] += s.blue * inv;
        acc[3] += s.alpha * inv;
        if acc[3] >= 1.0 - OPAQUE_EPSILON {
            break;
        }
    }
    acc
}

/// Resolve one deep pixel to a premultiplied RGBA tuple.
pub fn flatten_pixel(samples: &[DeepSample]) -> [f32; 4] {
    accumulate(samples.iter().copied())
}

/// Resolve a merged row into `out`, which must hold `width * 4` floats.
pub fn flatten_row(row: &DeepRow, out: &mut [f32]) {
    debug_assert_eq!(out.len(), row.width() * 4);
    for x in 0..row.width() {
        let acc = accumulate(row.pixel_iter(x));
        out[x * 4..x * 4 + 4].copy_from_slice(&acc);
    }
}

#[cfg(test)]
#[path = "../tests/unit/flatten.rs"]
mod tests;
