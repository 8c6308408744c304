//! Analytic deep-layer generators for demos and tests.
//!
//! Each painter adds samples into an existing [`DeepImage`]; element
//! positions are in normalized `[0, 1]` image coordinates so the same scene
//! description works at any resolution. Colours are given straight and
//! premultiplied here.

use crate::deep::image::DeepImage;
use crate::deep::sample::DeepSample;
use crate::foundation::error::DeepResult;

/// A sphere in normalized image coordinates with a linear depth span.
#[derive(Clone, Copy, Debug)]
pub struct SphereParams {
    /// Center X in `[0, 1]`.
    pub center_x: f32,
    /// Center Y in `[0, 1]`.
    pub center_y: f32,
    /// Radius in normalized units.
    pub radius: f32,
    /// Depth where a central ray enters the sphere.
    pub depth_near: f32,
    /// Depth where a central ray exits the sphere.
    pub depth_far: f32,
    /// Straight (non-premultiplied) colour.
    pub color: [f32; 3],
    /// Opacity.
    pub alpha: f32,
}

/// A circular fog slab spanning a fixed depth interval.
#[derive(Clone, Copy, Debug)]
pub struct FogParams {
    /// Center X in `[0, 1]`.
    pub center_x: f32,
    /// Center Y in `[0, 1]`.
    pub center_y: f32,
    /// Radius in normalized units.
    pub radius: f32,
    /// Front depth of the slab.
    pub depth_front: f32,
    /// Back depth of the slab.
    pub depth_back: f32,
    /// Straight colour.
    pub color: [f32; 3],
    /// Opacity over the full slab thickness.
    pub alpha: f32,
}

/// Entry/exit depths of the XY ray through `(x, y)`, or `None` on a miss.
fn ray_sphere_intersect(x: f32, y: f32, p: &SphereParams) -> Option<(f32, f32)> {
    let dx = x - p.center_x;
    let dy = y - p.center_y;
    let dist_sq = dx * dx + dy * dy;
    let radius_sq = p.radius * p.radius;
    if dist_sq > radius_sq {
        return None;
    }

    // z = sqrt(r^2 - d^2), rescaled into the sphere's depth span.
    let normalized_offset = (radius_sq - dist_sq).sqrt() / p.radius;
    let depth_center = (p.depth_near + p.depth_far) / 2.0;
    let depth_range = (p.depth_far - p.depth_near) / 2.0;
    Some((
        depth_center - normalized_offset * depth_range,
        depth_center + normalized_offset * depth_range,
    ))
}

fn norm_coords(x: u32, y: u32, img: &DeepImage) -> (f32, f32) {
    (
        (x as f32 + 0.5) / img.width() as f32,
        (y as f32 + 0.5) / img.height() as f32,
    )
}

/// Paint a sphere as entry/exit point samples.
///
/// Semi-transparent spheres get half the opacity on each surface; an opaque
/// sphere collapses to a single entry-surface sample.
pub fn sphere_surfaces(img: &mut DeepImage, p: &SphereParams) -> DeepResult<()> {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let (nx, ny) = norm_coords(x, y, img);
            let Some((entry, exit)) = ray_sphere_intersect(nx, ny, p) else {
                continue;
            };
            let pixel = img.pixel_mut(x, y);
            if p.alpha < 0.99 {
                let a = p.alpha * 0.5;
                pixel.add_sample(DeepSample::point(
                    entry,
                    p.color[0] * a,
                    p.color[1] * a,
                    p.color[2] * a,
                    a,
                ))?;
                pixel.add_sample(DeepSample::point(
                    exit,
                    p.color[0] * a,
                    p.color[1] * a,
                    p.color[2] * a,
                    a,
                ))?;
            } else {
                pixel.add_sample(DeepSample::point(
                    entry, p.color[0], p.color[1], p.color[2], 1.0,
                ))?;
            }
        }
    }
    Ok(())
}

/// Paint a sphere as one volume sample per hit pixel spanning entry to exit.
pub fn sphere_volume(img: &mut DeepImage, p: &SphereParams) -> DeepResult<()> {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let (nx, ny) = norm_coords(x, y, img);
            let Some((entry, exit)) = ray_sphere_intersect(nx, ny, p) else {
                continue;
            };
            img.pixel_mut(x, y).add_sample(DeepSample::volume(
                entry,
                exit,
                p.color[0] * p.alpha,
                p.color[1] * p.alpha,
                p.color[2] * p.alpha,
                p.alpha,
            ))?;
        }
    }
    Ok(())
}

/// Paint a volumetric fog slab over a circular footprint.
pub fn fog_slab(img: &mut DeepImage, p: &FogParams) -> DeepResult<()> {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let (nx, ny) = norm_coords(x, y, img);
            let dx = nx - p.center_x;
            let dy = ny - p.center_y;
            if dx * dx + dy * dy > p.radius * p.radius {
                continue;
            }
            img.pixel_mut(x, y).add_sample(DeepSample::volume(
                p.depth_front,
                p.depth_back,
                p.color[0] * p.alpha,
                p.color[1] * p.alpha,
                p.color[2] * p.alpha,
                p.alpha,
            ))?;
        }
    }
    Ok(())
}

/// Paint a full-frame plane as one point sample per pixel.
pub fn ground_plane(
    img: &mut DeepImage,
    depth: f32,
    color: [f32; 3],
    alpha: f32,
) -> DeepResult<()> {
    for y in 0..img.height() {
        for x in 0..img.width() {
            img.pixel_mut(x, y).add_sample(DeepSample::point(
                depth,
                color[0] * alpha,
                color[1] * alpha,
                color[2] * alpha,
                alpha,
            ))?;
        }
    }
    Ok(())
}

/// Paint thin volume samples whose depth tracks the scanline index, ascending
/// or descending. Handy for eyeballing depth-sort behaviour.
pub fn depth_gradient(
    img: &mut DeepImage,
    ascending: bool,
    color: [f32; 3],
    alpha: f32,
) -> DeepResult<()> {
    let max_y = img.height().saturating_sub(1) as f32;
    for y in 0..img.height() {
        let z = if ascending {
            y as f32
        } else {
            max_y - y as f32
        };
        for x in 0..img.width() {
            img.pixel_mut(x, y).add_sample(DeepSample::volume(
                z,
                z + 0.1,
                color[0] * alpha,
                color[1] * alpha,
                color[2] * alpha,
                alpha,
            ))?;
        }
    }
    Ok(())
}
