use super::*;

fn encode(samples: &[DeepSample]) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples.len() * SAMPLE_STRIDE);
    for s in samples {
        out.extend_from_slice(&[s.red, s.green, s.blue, s.alpha, s.depth, s.depth_back]);
    }
    out
}

fn merge(threshold: f32, layers: &[&[DeepSample]]) -> Vec<DeepSample> {
    merge_with_offsets(threshold, layers, &vec![0.0; layers.len()])
}

fn merge_with_offsets(
    threshold: f32,
    layers: &[&[DeepSample]],
    offsets: &[f32],
) -> Vec<DeepSample> {
    let encoded: Vec<Vec<f32>> = layers.iter().map(|l| encode(l)).collect();
    let inputs: Vec<PixelInput<'_>> = encoded
        .iter()
        .zip(offsets)
        .map(|(samples, &z_offset)| PixelInput { samples, z_offset })
        .collect();

    let mut merger = PixelMerger::new(threshold).unwrap();
    let mut out = Vec::new();
    merger.merge_pixel(&inputs, &mut out).unwrap();
    out
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn negative_threshold_is_invalid_config() {
    assert!(matches!(
        PixelMerger::new(-0.5),
        Err(crate::foundation::error::DeepError::InvalidConfig(_))
    ));
    assert!(PixelMerger::new(f32::NAN).is_err());
}

#[test]
fn empty_layers_merge_to_empty() {
    assert!(merge(0.01, &[&[], &[]]).is_empty());
    assert!(merge(0.01, &[]).is_empty());
}

#[test]
fn single_layer_against_empty_is_identity() {
    let layer = [
        DeepSample::point(5.0, 0.7, 0.0, 0.0, 0.7),
        DeepSample::point(9.0, 0.0, 0.0, 0.3, 0.3),
    ];
    let merged = merge(0.01, &[&layer, &[]]);
    assert_eq!(merged, layer.to_vec());
}

#[test]
fn samples_sort_across_layers() {
    let a = [DeepSample::point(10.0, 0.0, 0.0, 0.7, 0.7)];
    let b = [DeepSample::point(5.0, 0.7, 0.0, 0.0, 0.7)];
    let merged = merge(0.0, &[&a, &b]);
    let depths: Vec<f32> = merged.iter().map(|s| s.depth).collect();
    assert_eq!(depths, vec![5.0, 10.0]);
}

#[test]
fn layer_order_breaks_exact_depth_ties() {
    let a = [DeepSample::point(3.0, 1.0, 0.0, 0.0, 1.0)];
    let b = [DeepSample::point(3.0, 0.0, 1.0, 0.0, 1.0)];
    let merged = merge(0.0, &[&a, &b]);
    assert_eq!(merged[0].red, 1.0);
    assert_eq!(merged[1].green, 1.0);
}

#[test]
fn coincident_points_fuse_with_over() {
    let a = [DeepSample::point(3.0, 0.5, 0.0, 0.0, 0.5)];
    let b = [DeepSample::point(3.005, 0.5, 0.0, 0.0, 0.5)];
    let merged = merge(0.01, &[&a, &b]);

    assert_eq!(merged.len(), 1);
    assert!(close(merged[0].alpha, 0.75));
    assert!(close(merged[0].red, 0.75));
    assert_eq!(merged[0].depth, 3.0);
}

#[test]
fn zero_threshold_disables_fusion() {
    let a = [DeepSample::point(3.0, 0.5, 0.0, 0.0, 0.5)];
    let b = [DeepSample::point(3.0, 0.5, 0.0, 0.0, 0.5)];
    assert_eq!(merge(0.0, &[&a, &b]).len(), 2);
}

#[test]
fn overlapping_volumes_split_into_three_segments() {
    let a = [DeepSample::volume(0.0, 10.0, 0.5, 0.0, 0.0, 0.5)];
    let b = [DeepSample::volume(5.0, 15.0, 0.0, 0.0, 0.5, 0.5)];
    let merged = merge(1e-4, &[&a, &b]);

    assert_eq!(merged.len(), 3);
    assert_eq!((merged[0].depth, merged[0].depth_back), (0.0, 5.0));
    assert_eq!((merged[1].depth, merged[1].depth_back), (5.0, 10.0));
    assert_eq!((merged[2].depth, merged[2].depth_back), (10.0, 15.0));

    // Each half of a 0.5-alpha volume carries 1 - sqrt(0.5).
    let half = 1.0 - (0.5f32).sqrt();
    assert!(close(merged[0].alpha, half));
    assert!(close(merged[2].alpha, half));
    // The overlap region holds both halves fused: 1 - (1-h)^2 = 0.5.
    assert!(close(merged[1].alpha, 0.5));
    // Both layers contribute colour in the overlap.
    assert!(merged[1].red > 0.0 && merged[1].blue > 0.0);
}

#[test]
fn point_inside_volume_splits_the_slab() {
    let fog = [DeepSample::volume(0.0, 10.0, 0.6, 0.6, 0.6, 0.6)];
    let wall = [DeepSample::point(5.0, 0.0, 1.0, 0.0, 1.0)];
    let merged = merge(1e-4, &[&fog, &wall]);

    assert_eq!(merged.len(), 3);
    assert_eq!((merged[0].depth, merged[0].depth_back), (0.0, 5.0));
    assert!(!merged[1].is_volume());
    assert_eq!(merged[1].depth, 5.0);
    assert_eq!((merged[2].depth, merged[2].depth_back), (5.0, 10.0));
}

#[test]
fn point_on_volume_front_face_stays_in_front() {
    let vol = [DeepSample::volume(5.0, 10.0, 0.0, 0.0, 0.5, 0.5)];
    let point = [DeepSample::point(5.0, 0.5, 0.0, 0.0, 0.5)];
    let merged = merge(0.1, &[&vol, &point]);

    // Mixed kinds never fuse; the point sorts before the slab it sits on.
    assert_eq!(merged.len(), 2);
    assert!(!merged[0].is_volume());
    assert!(merged[1].is_volume());
}

#[test]
fn nan_depth_is_invalid_sample() {
    let bad = encode(&[DeepSample::point(f32::NAN, 0.0, 0.0, 0.0, 0.5)]);
    let inputs = [PixelInput {
        samples: &bad,
        z_offset: 0.0,
    }];
    let mut merger = PixelMerger::new(0.0).unwrap();
    let mut out = Vec::new();
    assert!(matches!(
        merger.merge_pixel(&inputs, &mut out),
        Err(crate::foundation::error::DeepError::InvalidSample(_))
    ));
}

#[test]
fn inverted_interval_is_invalid_sample() {
    let bad = encode(&[DeepSample {
        depth: 6.0,
        depth_back: 2.0,
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.5,
    }]);
    let inputs = [PixelInput {
        samples: &bad,
        z_offset: 0.0,
    }];
    let mut merger = PixelMerger::new(0.0).unwrap();
    let mut out = Vec::new();
    assert!(merger.merge_pixel(&inputs, &mut out).is_err());
}

#[test]
fn zero_alpha_samples_are_preserved() {
    let emission = [DeepSample::point(4.0, 0.9, 0.4, 0.1, 0.0)];
    let other = [DeepSample::point(8.0, 0.0, 0.0, 0.0, 1.0)];
    let merged = merge(0.01, &[&emission, &other]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].alpha, 0.0);
    assert_eq!(merged[0].red, 0.9);
}

#[test]
fn z_offsets_shift_both_interval_bounds() {
    let a = [DeepSample::volume(1.0, 2.0, 0.1, 0.1, 0.1, 0.3)];
    let merged = merge_with_offsets(0.0, &[&a], &[10.0]);
    assert_eq!(merged[0].depth, 11.0);
    assert_eq!(merged[0].depth_back, 12.0);
}

#[test]
fn resample_follows_beer_lambert() {
    let parent = DeepSample::volume(0.0, 10.0, 0.75, 0.0, 0.0, 0.75);
    let front = resample(&parent, 0.0, 5.0);

    // Half the length of a 0.75-alpha slab: 1 - 0.25^0.5 = 0.5.
    assert!(close(front.alpha, 0.5));
    assert!(close(front.red, 0.75 * (0.5 / 0.75)));

    // Splicing the two halves back together restores the parent alpha.
    let back = resample(&parent, 5.0, 10.0);
    let rejoined = front.alpha + back.alpha * (1.0 - front.alpha);
    assert!(close(rejoined, 0.75));
}

#[test]
fn opaque_volume_slices_stay_opaque() {
    let parent = DeepSample::volume(0.0, 4.0, 1.0, 1.0, 1.0, 1.0);
    let slice = resample(&parent, 1.0, 2.0);
    assert!(close(slice.alpha, 1.0));
    assert!(close(slice.red, 1.0));
}

#[test]
fn zero_alpha_volume_slices_lose_colour() {
    let parent = DeepSample::volume(0.0, 4.0, 0.8, 0.0, 0.0, 0.0);
    let slice = resample(&parent, 0.0, 2.0);
    assert_eq!(slice.alpha, 0.0);
    assert_eq!(slice.red, 0.0);
}
