//! JSON layer interchange: a deep layer described as analytic elements
//! and/or explicit per-pixel samples.
//!
//! Deep EXR has no Rust codec, so file-backed layers travel in this format;
//! the binary deep-file reader stays an external collaborator behind
//! [`DeepSource`](crate::source::DeepSource). A merged deep image written by
//! [`JsonDeepSink`](crate::output::sink::JsonDeepSink) round-trips as an
//! input layer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deep::image::DeepImage;
use crate::deep::sample::DeepSample;
use crate::foundation::error::{DeepError, DeepResult};
use crate::scene::{self, FogParams, SphereParams};
use crate::source::memory::MemorySource;

/// On-disk description of one deep layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels the layer advertises; `None` means the full
    /// `R,G,B,A,Z,ZBack` set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    /// Scene content, painted in order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// One paintable element of a layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Entry/exit point samples of a sphere (half opacity per surface).
    SphereSurfaces {
        /// Center in normalized `[0, 1]` coordinates.
        center: [f32; 2],
        /// Radius in normalized units.
        radius: f32,
        /// Entry depth of a central ray.
        depth_near: f32,
        /// Exit depth of a central ray.
        depth_far: f32,
        /// Straight colour.
        color: [f32; 3],
        /// Opacity.
        alpha: f32,
    },
    /// One volume sample per hit pixel spanning entry to exit.
    SphereVolume {
        /// Center in normalized `[0, 1]` coordinates.
        center: [f32; 2],
        /// Radius in normalized units.
        radius: f32,
        /// Entry depth of a central ray.
        depth_near: f32,
        /// Exit depth of a central ray.
        depth_far: f32,
        /// Straight colour.
        color: [f32; 3],
        /// Opacity.
        alpha: f32,
    },
    /// A circular volumetric slab at a fixed depth interval.
    FogSlab {
        /// Center in normalized `[0, 1]` coordinates.
        center: [f32; 2],
        /// Radius in normalized units.
        radius: f32,
        /// Front depth.
        depth_front: f32,
        /// Back depth.
        depth_back: f32,
        /// Straight colour.
        color: [f32; 3],
        /// Opacity over the slab.
        alpha: f32,
    },
    /// A full-frame point-sample plane.
    GroundPlane {
        /// Plane depth.
        depth: f32,
        /// Straight colour.
        color: [f32; 3],
        /// Opacity.
        alpha: f32,
    },
    /// Thin volume samples whose depth tracks the scanline index.
    DepthGradient {
        /// Depth grows with y when `true`, shrinks otherwise.
        ascending: bool,
        /// Straight colour.
        color: [f32; 3],
        /// Opacity.
        alpha: f32,
    },
    /// Explicit samples for one pixel, each `[z, z_back, r, g, b, a]` with
    /// premultiplied colour.
    Pixel {
        /// Pixel x.
        x: u32,
        /// Pixel y.
        y: u32,
        /// Samples, front values first.
        samples: Vec<[f32; 6]>,
    },
}

impl LayerSpec {
    /// Parse a layer file. Unreadable or malformed files are
    /// [`DeepError::MissingFile`]: the path is not a deep layer.
    pub fn from_path(path: &Path) -> DeepResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeepError::missing_file(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text).map_err(|e| {
            DeepError::missing_file(format!("{}: not a deep layer: {e}", path.display()))
        })
    }

    /// Materialize the described image.
    pub fn build(&self) -> DeepResult<DeepImage> {
        let mut img = DeepImage::new(self.width, self.height);
        for element in &self.elements {
            paint(&mut img, element)?;
        }
        Ok(img)
    }
}

fn paint(img: &mut DeepImage, element: &Element) -> DeepResult<()> {
    match *element {
        Element::SphereSurfaces {
            center,
            radius,
            depth_near,
            depth_far,
            color,
            alpha,
        } => scene::sphere_surfaces(
            img,
            &SphereParams {
                center_x: center[0],
                center_y: center[1],
                radius,
                depth_near,
                depth_far,
                color,
                alpha,
            },
        ),
        Element::SphereVolume {
            center,
            radius,
            depth_near,
            depth_far,
            color,
            alpha,
        } => scene::sphere_volume(
            img,
            &SphereParams {
                center_x: center[0],
                center_y: center[1],
                radius,
                depth_near,
                depth_far,
                color,
                alpha,
            },
        ),
        Element::FogSlab {
            center,
            radius,
            depth_front,
            depth_back,
            color,
            alpha,
        } => scene::fog_slab(
            img,
            &FogParams {
                center_x: center[0],
                center_y: center[1],
                radius,
                depth_front,
                depth_back,
                color,
                alpha,
            },
        ),
        Element::GroundPlane {
            depth,
            color,
            alpha,
        } => scene::ground_plane(img, depth, color, alpha),
        Element::DepthGradient {
            ascending,
            color,
            alpha,
        } => scene::depth_gradient(img, ascending, color, alpha),
        Element::Pixel { x, y, ref samples } => {
            if x >= img.width() || y >= img.height() {
                return Err(DeepError::invalid_sample(format!(
                    "pixel element ({x}, {y}) outside {}x{}",
                    img.width(),
                    img.height()
                )));
            }
            let pixel = img.pixel_mut(x, y);
            for &[z, z_back, r, g, b, a] in samples {
                pixel.add_sample(DeepSample::volume(z, z_back, r, g, b, a))?;
            }
            Ok(())
        }
    }
}

/// Open a layer file as a ready-to-read source.
pub fn open(path: &Path) -> DeepResult<MemorySource> {
    let spec = LayerSpec::from_path(path)?;
    let image = spec.build()?;
    Ok(match spec.channels {
        Some(channels) => MemorySource::with_channels(image, channels),
        None => MemorySource::new(image),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/source/layer.rs"]
mod tests;
