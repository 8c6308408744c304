use std::path::PathBuf;

use crate::deep::image::DeepImage;
use crate::deep::row::DeepRow;
use crate::foundation::error::{DeepError, DeepResult};
use crate::source::layer::{Element, LayerSpec};

/// Consumer of merged deep rows.
///
/// Ordering contract: `push_row` is called in strictly increasing `y` order
/// between `begin` and `end`. The deep binary file writer is an external
/// collaborator implementing this trait.
pub trait DeepSink: Send {
    /// Called once before the first row.
    fn begin(&mut self, width: u32, height: u32) -> DeepResult<()>;
    /// Consume one merged scanline.
    fn push_row(&mut self, y: u32, row: &DeepRow) -> DeepResult<()>;
    /// Called once after the last row.
    fn end(&mut self) -> DeepResult<()>;
}

/// Collects merged rows into a [`DeepImage`], for tests and statistics.
#[derive(Debug, Default)]
pub struct MemoryDeepSink {
    image: Option<DeepImage>,
}

impl MemoryDeepSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected image, once `begin` has run.
    pub fn image(&self) -> Option<&DeepImage> {
        self.image.as_ref()
    }

    /// Consume the sink, returning the collected image.
    pub fn into_image(self) -> Option<DeepImage> {
        self.image
    }
}

impl DeepSink for MemoryDeepSink {
    fn begin(&mut self, width: u32, height: u32) -> DeepResult<()> {
        self.image = Some(DeepImage::new(width, height));
        Ok(())
    }

    fn push_row(&mut self, y: u32, row: &DeepRow) -> DeepResult<()> {
        let image = self
            .image
            .as_mut()
            .ok_or_else(|| DeepError::output_write("deep sink received a row before begin"))?;
        for x in 0..row.width() {
            let pixel = image.pixel_mut(x as u32, y);
            for s in row.pixel_iter(x) {
                pixel.add_sample(s)?;
            }
        }
        Ok(())
    }

    fn end(&mut self) -> DeepResult<()> {
        Ok(())
    }
}

/// Writes the merged deep image as a layer-interchange JSON file on `end`.
///
/// The output round-trips as an input layer for a later composite.
#[derive(Debug)]
pub struct JsonDeepSink {
    path: PathBuf,
    inner: MemoryDeepSink,
}

impl JsonDeepSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemoryDeepSink::new(),
        }
    }
}

impl DeepSink for JsonDeepSink {
    fn begin(&mut self, width: u32, height: u32) -> DeepResult<()> {
        self.inner.begin(width, height)
    }

    fn push_row(&mut self, y: u32, row: &DeepRow) -> DeepResult<()> {
        self.inner.push_row(y, row)
    }

    fn end(&mut self) -> DeepResult<()> {
        let image = self
            .inner
            .image()
            .ok_or_else(|| DeepError::output_write("deep sink ended before begin"))?;

        let mut elements = Vec::new();
        for y in 0..image.height() {
            for x in 0..image.width() {
                let pixel = image.pixel(x, y);
                if pixel.is_empty() {
                    continue;
                }
                elements.push(Element::Pixel {
                    x,
                    y,
                    samples: pixel
                        .samples()
                        .iter()
                        .map(|s| [s.depth, s.depth_back, s.red, s.green, s.blue, s.alpha])
                        .collect(),
                });
            }
        }

        let spec = LayerSpec {
            width: image.width(),
            height: image.height(),
            channels: None,
            elements,
        };
        let json = serde_json::to_string(&spec)
            .map_err(|e| DeepError::output_write(format!("serialize merged deep image: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| DeepError::output_write(format!("{}: {e}", self.path.display())))
    }
}
