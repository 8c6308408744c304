use crate::deep::sample::DeepSample;
use crate::foundation::error::{DeepError, DeepResult};

/// Interleaved floats per sample: `R, G, B, A, Z, ZBack`.
pub const SAMPLE_STRIDE: usize = 6;

/// Channel offsets within one interleaved sample.
pub mod channel {
    /// Premultiplied red.
    pub const R: usize = 0;
    /// Premultiplied green.
    pub const G: usize = 1;
    /// Premultiplied blue.
    pub const B: usize = 2;
    /// Alpha.
    pub const A: usize = 3;
    /// Front depth.
    pub const Z: usize = 4;
    /// Back depth.
    pub const Z_BACK: usize = 5;
}

/// One layer's worth of deep data for a single scanline.
///
/// All samples live in one contiguous float buffer, interleaved per sample in
/// [`SAMPLE_STRIDE`] channel order. Pixel `x`'s samples start at sample index
/// `offsets[x]`, maintained as a prefix sum of `sample_counts`, so per-pixel
/// views are plain non-overlapping sub-slices.
///
/// A row is either *prepared* from known counts (loader path, the reader then
/// fills the buffer in place) or *built* pixel by pixel in x order (merger
/// path). Clearing keeps allocated capacity so ring slots can be recycled
/// without reallocating every window cycle.
#[derive(Clone, Debug, Default)]
pub struct DeepRow {
    width: usize,
    sample_counts: Vec<u32>,
    offsets: Vec<usize>,
    samples: Vec<f32>,
}

impl DeepRow {
    /// Empty row; size it with [`DeepRow::prepare`] or [`DeepRow::begin`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Width this row was last sized for.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Size the row from per-pixel sample counts, zero-filling the buffer.
    ///
    /// Used by the loader before handing the row to a
    /// [`DeepSource::read_row`](crate::source::DeepSource::read_row) call.
    pub fn prepare(&mut self, counts: &[u32]) -> DeepResult<()> {
        self.width = counts.len();

        self.sample_counts.clear();
        self.sample_counts.extend_from_slice(counts);

        self.offsets.clear();
        try_reserve(&mut self.offsets, counts.len() + 1)?;
        let mut total = 0usize;
        self.offsets.push(0);
        for &c in counts {
            total += c as usize;
            self.offsets.push(total);
        }

        let floats = total
            .checked_mul(SAMPLE_STRIDE)
            .ok_or_else(|| DeepError::allocation("row sample count overflows"))?;
        self.samples.clear();
        try_reserve(&mut self.samples, floats)?;
        self.samples.resize(floats, 0.0);
        Ok(())
    }

    /// Reset the row for pixel-by-pixel building, reserving room for
    /// `reserve_samples` samples up front.
    pub fn begin(&mut self, width: usize, reserve_samples: usize) -> DeepResult<()> {
        self.width = width;

        self.sample_counts.clear();
        self.sample_counts.resize(width, 0);

        self.offsets.clear();
        try_reserve(&mut self.offsets, width + 1)?;
        self.offsets.push(0);

        let floats = reserve_samples
            .checked_mul(SAMPLE_STRIDE)
            .ok_or_else(|| DeepError::allocation("row sample reserve overflows"))?;
        self.samples.clear();
        try_reserve(&mut self.samples, floats)?;
        Ok(())
    }

    /// Append the next pixel's samples. Pixels must arrive in x order after a
    /// [`DeepRow::begin`] call.
    pub fn push_pixel(&mut self, samples: &[DeepSample]) -> DeepResult<()> {
        let x = self.offsets.len() - 1;
        debug_assert!(x < self.width, "push_pixel past row width");

        try_reserve(&mut self.samples, samples.len() * SAMPLE_STRIDE)?;
        for s in samples {
            self.samples.extend_from_slice(&[
                s.red,
                s.green,
                s.blue,
                s.alpha,
                s.depth,
                s.depth_back,
            ]);
        }

        self.sample_counts[x] = samples.len() as u32;
        let total = self.offsets[x] + samples.len();
        self.offsets.push(total);
        Ok(())
    }

    /// Sample count for pixel `x`.
    pub fn sample_count(&self, x: usize) -> u32 {
        self.sample_counts[x]
    }

    /// Per-pixel sample counts.
    pub fn sample_counts(&self) -> &[u32] {
        &self.sample_counts
    }

    /// Total samples currently stored.
    pub fn total_samples(&self) -> usize {
        self.samples.len() / SAMPLE_STRIDE
    }

    /// Interleaved channel values for pixel `x`.
    ///
    /// Panics when `x` has not been sized or pushed yet.
    pub fn pixel_samples(&self, x: usize) -> &[f32] {
        let (a, b) = (self.offsets[x], self.offsets[x + 1]);
        &self.samples[a * SAMPLE_STRIDE..b * SAMPLE_STRIDE]
    }

    /// Mutable interleaved channel values for pixel `x` (prepared rows).
    pub fn pixel_samples_mut(&mut self, x: usize) -> &mut [f32] {
        let (a, b) = (self.offsets[x], self.offsets[x + 1]);
        &mut self.samples[a * SAMPLE_STRIDE..b * SAMPLE_STRIDE]
    }

    /// Decode pixel `x`'s samples.
    pub fn pixel_iter(&self, x: usize) -> impl Iterator<Item = DeepSample> + '_ {
        self.pixel_samples(x)
            .chunks_exact(SAMPLE_STRIDE)
            .map(|c| DeepSample {
                red: c[channel::R],
                green: c[channel::G],
                blue: c[channel::B],
                alpha: c[channel::A],
                depth: c[channel::Z],
                depth_back: c[channel::Z_BACK],
            })
    }

    /// The whole interleaved buffer.
    pub fn values(&self) -> &[f32] {
        &self.samples
    }

    /// Reset lengths, keeping capacity for slot reuse.
    pub fn clear(&mut self) {
        self.width = 0;
        self.sample_counts.clear();
        self.offsets.clear();
        self.samples.clear();
    }
}

fn try_reserve<T>(v: &mut Vec<T>, additional: usize) -> DeepResult<()> {
    v.try_reserve(additional)
        .map_err(|e| DeepError::allocation(format!("row buffer of {additional} entries: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/deep/row.rs"]
mod tests;
