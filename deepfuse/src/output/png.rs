//! 8-bit PNG preview of the flattened composite.

use std::path::Path;

use crate::flatten::FlatImage;
use crate::foundation::error::{DeepError, DeepResult};

/// Write the raster as an RGBA8 PNG, clamping each channel into `[0, 1]`.
pub fn write_png(path: &Path, flat: &FlatImage) -> DeepResult<()> {
    if flat.width == 0 || flat.height == 0 {
        return Err(DeepError::output_write("cannot write an empty PNG"));
    }

    let bytes: Vec<u8> = flat
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    image::save_buffer_with_format(
        path,
        &bytes,
        flat.width,
        flat.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| DeepError::output_write(format!("{}: {e}", path.display())))
}
