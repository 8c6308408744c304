use super::*;

#[test]
fn prepare_sizes_buffer_from_counts() {
    let mut row = DeepRow::new();
    row.prepare(&[2, 0, 3]).unwrap();

    assert_eq!(row.width(), 3);
    assert_eq!(row.total_samples(), 5);
    assert_eq!(row.values().len(), 5 * SAMPLE_STRIDE);
    assert_eq!(row.pixel_samples(0).len(), 2 * SAMPLE_STRIDE);
    assert!(row.pixel_samples(1).is_empty());
    assert_eq!(row.pixel_samples(2).len(), 3 * SAMPLE_STRIDE);
}

#[test]
fn pixel_slices_are_contiguous_and_disjoint() {
    let mut row = DeepRow::new();
    row.prepare(&[1, 2]).unwrap();

    row.pixel_samples_mut(0).fill(1.0);
    row.pixel_samples_mut(1).fill(2.0);

    assert!(row.pixel_samples(0).iter().all(|&v| v == 1.0));
    assert!(row.pixel_samples(1).iter().all(|&v| v == 2.0));
    assert_eq!(&row.values()[..SAMPLE_STRIDE], row.pixel_samples(0));
}

#[test]
fn push_pixel_builds_counts_and_offsets() {
    let mut row = DeepRow::new();
    row.begin(3, 4).unwrap();

    row.push_pixel(&[DeepSample::point(1.0, 0.1, 0.2, 0.3, 0.4)])
        .unwrap();
    row.push_pixel(&[]).unwrap();
    row.push_pixel(&[
        DeepSample::volume(2.0, 3.0, 0.0, 0.0, 0.0, 0.5),
        DeepSample::point(7.0, 0.0, 0.0, 0.0, 1.0),
    ])
    .unwrap();

    assert_eq!(row.sample_counts(), &[1, 0, 2]);
    assert_eq!(row.total_samples(), 3);

    let decoded: Vec<DeepSample> = row.pixel_iter(2).collect();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].depth, 2.0);
    assert_eq!(decoded[0].depth_back, 3.0);
    assert_eq!(decoded[1].depth, 7.0);
}

#[test]
fn pixel_iter_round_trips_channel_order() {
    let mut row = DeepRow::new();
    row.begin(1, 1).unwrap();
    let s = DeepSample::volume(4.0, 6.0, 0.1, 0.2, 0.3, 0.4);
    row.push_pixel(&[s]).unwrap();

    let raw = row.pixel_samples(0);
    assert_eq!(raw[channel::R], 0.1);
    assert_eq!(raw[channel::G], 0.2);
    assert_eq!(raw[channel::B], 0.3);
    assert_eq!(raw[channel::A], 0.4);
    assert_eq!(raw[channel::Z], 4.0);
    assert_eq!(raw[channel::Z_BACK], 6.0);

    assert_eq!(row.pixel_iter(0).next(), Some(s));
}

#[test]
fn clear_resets_lengths_for_reuse() {
    let mut row = DeepRow::new();
    row.prepare(&[8, 8]).unwrap();
    assert_eq!(row.total_samples(), 16);
    row.clear();
    assert_eq!(row.total_samples(), 0);
    assert_eq!(row.width(), 0);

    row.prepare(&[4, 4]).unwrap();
    assert_eq!(row.total_samples(), 8);
}
