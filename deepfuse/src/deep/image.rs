use crate::deep::sample::{DeepPixel, DeepSample};

/// A width × height grid of [`DeepPixel`]s, stored row-major.
///
/// The streaming pipeline never materializes one of these for its inputs; the
/// type exists for synthetic layers, the in-memory source and sink, and
/// whole-image statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeepImage {
    width: u32,
    height: u32,
    pixels: Vec<DeepPixel>,
}

impl DeepImage {
    /// Create an empty image of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![DeepPixel::new(); (width as usize) * (height as usize)],
        }
    }

    /// Resize the image, clearing all existing data.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`.
    ///
    /// Panics when the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &DeepPixel {
        &self.pixels[self.index(x, y)]
    }

    /// Mutable pixel at `(x, y)`.
    ///
    /// Panics when the coordinate is outside the image.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut DeepPixel {
        let i = self.index(x, y);
        &mut self.pixels[i]
    }

    /// Total number of samples across all pixels.
    pub fn total_sample_count(&self) -> usize {
        self.pixels.iter().map(DeepPixel::sample_count).sum()
    }

    /// Mean samples per pixel; zero for an empty image.
    pub fn average_samples_per_pixel(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        self.total_sample_count() as f32 / self.pixels.len() as f32
    }

    /// Number of pixels holding at least one sample.
    pub fn non_empty_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_empty()).count()
    }

    /// Global `(min front depth, max back depth)`, or `None` when the image
    /// holds no samples.
    pub fn depth_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for p in &self.pixels {
            let (Some(lo), Some(hi)) = (p.min_depth(), p.max_depth()) else {
                continue;
            };
            range = Some(match range {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        range
    }

    /// Re-sort every pixel front to back.
    pub fn sort_all_pixels(&mut self) {
        for p in &mut self.pixels {
            p.sort_by_depth();
        }
    }

    /// Return `true` when every pixel is depth-sorted.
    pub fn validate(&self) -> bool {
        self.pixels.iter().all(DeepPixel::is_sorted)
    }

    /// Rough live-memory estimate in bytes.
    pub fn estimated_memory_bytes(&self) -> usize {
        let samples = self.total_sample_count() * std::mem::size_of::<DeepSample>();
        samples + self.pixels.len() * std::mem::size_of::<DeepPixel>()
    }

    /// Drop every pixel's samples, keeping dimensions.
    pub fn clear(&mut self) {
        for p in &mut self.pixels {
            p.clear();
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize) * (self.width as usize) + (x as usize)
    }
}
