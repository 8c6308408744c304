use std::cmp::Ordering;

use crate::foundation::error::{DeepError, DeepResult};

/// A single deep sample: a depth interval plus premultiplied RGBA.
///
/// `depth_back == depth` marks a point sample (hard surface); `depth_back >
/// depth` marks a volume sample (absorption/emission over the interval).
/// Colour channels are stored premultiplied: the stored value equals the true
/// colour times `alpha`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeepSample {
    /// Front Z, distance from camera.
    pub depth: f32,
    /// Back Z; equal to `depth` for point samples.
    pub depth_back: f32,
    /// Premultiplied red.
    pub red: f32,
    /// Premultiplied green.
    pub green: f32,
    /// Premultiplied blue.
    pub blue: f32,
    /// Coverage/opacity in `[0, 1]`.
    pub alpha: f32,
}

impl DeepSample {
    /// Zero-thickness sample at `depth`.
    pub fn point(depth: f32, red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            depth,
            depth_back: depth,
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Volumetric sample spanning `[depth, depth_back]`.
    pub fn volume(
        depth: f32,
        depth_back: f32,
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    ) -> Self {
        Self {
            depth,
            depth_back,
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Return `true` when the sample covers a non-empty depth interval.
    pub fn is_volume(&self) -> bool {
        self.depth_back > self.depth
    }

    /// Interval length; zero for point samples.
    pub fn thickness(&self) -> f32 {
        self.depth_back - self.depth
    }

    /// Front-to-back ordering: by `depth`, tie-broken on `depth_back`.
    pub fn depth_cmp(&self, other: &Self) -> Ordering {
        self.depth
            .total_cmp(&other.depth)
            .then(self.depth_back.total_cmp(&other.depth_back))
    }

    /// Return `true` when both interval bounds are within `epsilon` of
    /// `other`'s.
    pub fn is_near_depth(&self, other: &Self, epsilon: f32) -> bool {
        (self.depth - other.depth).abs() < epsilon
            && (self.depth_back - other.depth_back).abs() < epsilon
    }

    /// Reject NaN depths and inverted intervals with
    /// [`DeepError::InvalidSample`].
    pub fn validate(&self) -> DeepResult<()> {
        if self.depth.is_nan() || self.depth_back.is_nan() {
            return Err(DeepError::invalid_sample(format!(
                "NaN depth (z={}, z_back={})",
                self.depth, self.depth_back
            )));
        }
        if self.depth_back < self.depth {
            return Err(DeepError::invalid_sample(format!(
                "depth_back {} is in front of depth {}",
                self.depth_back, self.depth
            )));
        }
        Ok(())
    }

    /// Clamp `alpha` into `[0, 1]`, emitting a diagnostic when it was out of
    /// range. Pixel output is unaffected by the diagnostic.
    pub fn clamp_alpha(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.alpha) {
            tracing::warn!(alpha = self.alpha, depth = self.depth, "clamping sample alpha");
            self.alpha = self.alpha.clamp(0.0, 1.0);
        }
        self
    }
}

/// A pixel's samples, kept sorted front to back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeepPixel {
    samples: Vec<DeepSample>,
}

impl DeepPixel {
    /// Empty pixel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample, maintaining depth order.
    ///
    /// Appends and swaps backwards, so an already-sorted insertion is a
    /// single comparison and out-of-order input degrades to insertion sort.
    /// Inverted or NaN samples are rejected; out-of-range alpha is clamped.
    pub fn add_sample(&mut self, sample: DeepSample) -> DeepResult<()> {
        sample.validate()?;
        self.samples.push(sample.clamp_alpha());

        let mut i = self.samples.len() - 1;
        while i > 0 && self.samples[i].depth_cmp(&self.samples[i - 1]) == Ordering::Less {
            self.samples.swap(i, i - 1);
            i -= 1;
        }
        Ok(())
    }

    /// Insert several samples at once.
    pub fn add_samples(
        &mut self,
        samples: impl IntoIterator<Item = DeepSample>,
    ) -> DeepResult<()> {
        for s in samples {
            self.add_sample(s)?;
        }
        Ok(())
    }

    /// Number of samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Return `true` when the pixel holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in front-to-back order.
    pub fn samples(&self) -> &[DeepSample] {
        &self.samples
    }

    /// Mutable sample access. Callers that reorder depths must re-sort with
    /// [`DeepPixel::sort_by_depth`].
    pub fn samples_mut(&mut self) -> &mut [DeepSample] {
        &mut self.samples
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Smallest front depth, or `None` for an empty pixel.
    pub fn min_depth(&self) -> Option<f32> {
        self.samples.first().map(|s| s.depth)
    }

    /// Largest back depth, or `None` for an empty pixel.
    pub fn max_depth(&self) -> Option<f32> {
        self.samples
            .iter()
            .map(|s| s.depth_back)
            .max_by(f32::total_cmp)
    }

    /// Restore front-to-back order after external mutation.
    pub fn sort_by_depth(&mut self) {
        self.samples.sort_by(DeepSample::depth_cmp);
    }

    /// Return `true` when samples are in `(depth, depth_back)` order.
    pub fn is_sorted(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[0].depth_cmp(&w[1]) != Ordering::Greater)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deep/sample.rs"]
mod tests;
