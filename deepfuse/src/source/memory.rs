use crate::deep::image::DeepImage;
use crate::deep::row::{DeepRow, SAMPLE_STRIDE};
use crate::foundation::error::DeepResult;
use crate::source::{DeepSource, REQUIRED_CHANNELS, Z_BACK_CHANNEL};

/// A [`DeepSource`] over an in-memory [`DeepImage`].
///
/// Backs the JSON layer reader and doubles as the test stand-in for a real
/// deep-file reader. The advertised channel set is adjustable so preload
/// validation and the ZBack degrade path can be exercised.
#[derive(Clone, Debug)]
pub struct MemorySource {
    image: DeepImage,
    channels: Vec<String>,
    counts: Vec<u32>,
}

impl MemorySource {
    /// Source advertising the full `R,G,B,A,Z,ZBack` channel set.
    pub fn new(image: DeepImage) -> Self {
        let channels = REQUIRED_CHANNELS
            .iter()
            .copied()
            .chain([Z_BACK_CHANNEL])
            .map(str::to_owned)
            .collect();
        Self {
            image,
            channels,
            counts: Vec::new(),
        }
    }

    /// Source advertising only the given channels.
    pub fn with_channels(image: DeepImage, channels: Vec<String>) -> Self {
        Self {
            image,
            channels,
            counts: Vec::new(),
        }
    }

    /// Drop one advertised channel.
    pub fn without_channel(mut self, name: &str) -> Self {
        self.channels.retain(|c| c != name);
        self
    }

    /// The backing image.
    pub fn image(&self) -> &DeepImage {
        &self.image
    }
}

impl DeepSource for MemorySource {
    fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c == name)
    }

    fn fetch_sample_counts(&mut self, y: u32) -> DeepResult<&[u32]> {
        self.counts.clear();
        for x in 0..self.image.width() {
            self.counts.push(self.image.pixel(x, y).sample_count() as u32);
        }
        Ok(&self.counts)
    }

    fn read_row(&mut self, y: u32, row: &mut DeepRow) -> DeepResult<()> {
        let synthesize_zback = !self.has_channel(Z_BACK_CHANNEL);
        for x in 0..self.image.width() {
            let pixel = self.image.pixel(x, y);
            let dst = row.pixel_samples_mut(x as usize);
            debug_assert_eq!(dst.len(), pixel.sample_count() * SAMPLE_STRIDE);
            for (s, out) in pixel
                .samples()
                .iter()
                .zip(dst.chunks_exact_mut(SAMPLE_STRIDE))
            {
                let z_back = if synthesize_zback { s.depth } else { s.depth_back };
                out.copy_from_slice(&[s.red, s.green, s.blue, s.alpha, s.depth, z_back]);
            }
        }
        Ok(())
    }
}
