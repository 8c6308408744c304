//! Flat EXR output for the flattened composite.

use std::path::Path;

use exr::prelude::*;

use crate::flatten::FlatImage;
use crate::foundation::error::{DeepError, DeepResult};

/// Write a premultiplied RGBA f32 raster as `R`, `G`, `B`, `A` channels.
pub fn write_flat_exr(path: &Path, flat: &FlatImage) -> DeepResult<()> {
    if flat.width == 0 || flat.height == 0 {
        return Err(DeepError::output_write("cannot write an empty EXR"));
    }

    let px = flat.width as usize * flat.height as usize;
    debug_assert_eq!(flat.data.len(), px * 4);

    let mut r = Vec::with_capacity(px);
    let mut g = Vec::with_capacity(px);
    let mut b = Vec::with_capacity(px);
    let mut a = Vec::with_capacity(px);
    for chunk in flat.data.chunks_exact(4) {
        r.push(chunk[0]);
        g.push(chunk[1]);
        b.push(chunk[2]);
        a.push(chunk[3]);
    }

    let mut list = SmallVec::<[AnyChannel<FlatSamples>; 4]>::new();
    for (name, data, quantize_linearly) in
        [("R", r, false), ("G", g, false), ("B", b, false), ("A", a, true)]
    {
        let name = Text::new_or_none(name)
            .ok_or_else(|| DeepError::output_write(format!("invalid EXR channel name: {name}")))?;
        list.push(AnyChannel {
            name,
            sample_data: FlatSamples::F32(data),
            quantize_linearly,
            sampling: Vec2(1, 1),
        });
    }

    let channels = AnyChannels::sort(list);
    Image::from_channels((flat.width as usize, flat.height as usize), channels)
        .write()
        .to_file(path)
        .map_err(|e| DeepError::output_write(format!("{}: {e}", path.display())))
}
