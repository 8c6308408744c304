use std::cmp::Ordering;

use crate::deep::row::{SAMPLE_STRIDE, channel};
use crate::deep::sample::DeepSample;
use crate::foundation::error::{DeepError, DeepResult};

/// One layer's contribution to a pixel merge.
#[derive(Clone, Copy, Debug)]
pub struct PixelInput<'a> {
    /// Interleaved channel values, [`SAMPLE_STRIDE`] floats per sample.
    pub samples: &'a [f32],
    /// Additive depth offset applied to both interval bounds.
    pub z_offset: f32,
}

#[derive(Clone, Copy, Debug)]
struct Staged {
    sample: DeepSample,
    layer: u32,
}

fn cmp_staged(a: &Staged, b: &Staged) -> Ordering {
    a.sample.depth_cmp(&b.sample).then(a.layer.cmp(&b.layer))
}

/// Fuses per-layer sample lists for one pixel into a single sorted list.
///
/// Three phases: ingest-and-sort, volumetric split, coincidence merge. The
/// struct holds reusable staging buffers; create one per merge worker and
/// feed it every pixel of a scanline.
#[derive(Debug)]
pub struct PixelMerger {
    threshold: f32,
    staged: Vec<Staged>,
    cuts: Vec<f32>,
    split: Vec<Staged>,
}

impl PixelMerger {
    /// Create a merger with the given coincidence threshold (a depth epsilon
    /// in Z units; 0 disables fusion).
    pub fn new(threshold: f32) -> DeepResult<Self> {
        if !(threshold >= 0.0) {
            return Err(DeepError::invalid_config(format!(
                "merge threshold must be >= 0, got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            staged: Vec::new(),
            cuts: Vec::new(),
            split: Vec::new(),
        })
    }

    /// The configured depth epsilon.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Merge one pixel's layers into `out` (cleared first).
    ///
    /// Fails with [`DeepError::InvalidSample`] on NaN depths or inverted
    /// intervals; out-of-range alpha is clamped with a diagnostic.
    pub fn merge_pixel(
        &mut self,
        inputs: &[PixelInput<'_>],
        out: &mut Vec<DeepSample>,
    ) -> DeepResult<()> {
        out.clear();
        self.ingest(inputs)?;
        if self.staged.is_empty() {
            return Ok(());
        }
        self.split_volumes();
        self.fuse_coincident(out);
        Ok(())
    }

    /// Phase 1: decode every layer with its Z offset applied, validate, and
    /// sort by `(depth, depth_back)` with layer index as the final tiebreak.
    fn ingest(&mut self, inputs: &[PixelInput<'_>]) -> DeepResult<()> {
        self.staged.clear();
        for (li, input) in inputs.iter().enumerate() {
            debug_assert!(input.samples.len().is_multiple_of(SAMPLE_STRIDE));
            for c in input.samples.chunks_exact(SAMPLE_STRIDE) {
                let sample = DeepSample {
                    red: c[channel::R],
                    green: c[channel::G],
                    blue: c[channel::B],
                    alpha: c[channel::A],
                    depth: c[channel::Z] + input.z_offset,
                    depth_back: c[channel::Z_BACK] + input.z_offset,
                };
                sample.validate()?;
                self.staged.push(Staged {
                    sample: sample.clamp_alpha(),
                    layer: li as u32,
                });
            }
        }
        self.staged.sort_by(cmp_staged);
        Ok(())
    }

    /// Phase 2: slice volumes at every sample boundary strictly inside them,
    /// so surviving volume segments either coincide exactly or are disjoint.
    fn split_volumes(&mut self) {
        self.cuts.clear();
        for st in &self.staged {
            self.cuts.push(st.sample.depth);
            if st.sample.is_volume() {
                self.cuts.push(st.sample.depth_back);
            }
        }
        self.cuts.sort_by(f32::total_cmp);
        self.cuts.dedup();

        self.split.clear();
        for st in &self.staged {
            let s = st.sample;
            if !s.is_volume() {
                self.split.push(*st);
                continue;
            }

            let lo = self.cuts.partition_point(|&c| c <= s.depth);
            let hi = self.cuts.partition_point(|&c| c < s.depth_back);
            if lo == hi {
                self.split.push(*st);
                continue;
            }

            let mut front = s.depth;
            for i in lo..hi {
                let cut = self.cuts[i];
                self.split.push(Staged {
                    sample: resample(&s, front, cut),
                    layer: st.layer,
                });
                front = cut;
            }
            self.split.push(Staged {
                sample: resample(&s, front, s.depth_back),
                layer: st.layer,
            });
        }
        self.split.sort_by(cmp_staged);
    }

    /// Phase 3: fuse consecutive near-coincident samples of the same kind by
    /// "over" in arrival order. A point meeting a volume's front face is left
    /// alone; the sort already placed it in front of the slab.
    fn fuse_coincident(&self, out: &mut Vec<DeepSample>) {
        if self.threshold <= 0.0 {
            out.extend(self.split.iter().map(|st| st.sample));
            return;
        }

        for st in &self.split {
            let s = st.sample;
            if let Some(last) = out.last_mut()
                && last.is_volume() == s.is_volume()
                && last.is_near_depth(&s, self.threshold)
            {
                // Same formula for both kinds on the premultiplied
                // representation: a = 1 - (1-a1)(1-a2), c = c1 + c2*(1-a1).
                let inv = 1.0 - last.alpha;
                last.red += s.red * inv;
                last.green += s.green * inv;
                last.blue += s.blue * inv;
                last.alpha += s.alpha * inv;
                continue;
            }
            out.push(s);
        }
    }
}

/// Beer–Lambert re-sampling of `[front, back]` out of a parent volume: for
/// parent alpha `A` over length `L`, a slice of length `l` gets
/// `a' = 1 - (1 - A)^(l/L)` and premultiplied colour scaled by `a'/A`
/// (0 when `A` is 0).
fn resample(parent: &DeepSample, front: f32, back: f32) -> DeepSample {
    let frac = (back - front) / parent.thickness();
    let alpha = 1.0 - (1.0 - parent.alpha).powf(frac);
    let scale = if parent.alpha > 0.0 {
        alpha / parent.alpha
    } else {
        0.0
    };
    DeepSample {
        depth: front,
        depth_back: back,
        red: parent.red * scale,
        green: parent.green * scale,
        blue: parent.blue * scale,
        alpha,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/merge/pixel.rs"]
mod tests;
