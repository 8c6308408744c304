use super::*;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn two_points_compose_front_to_back() {
    let samples = [
        DeepSample::point(5.0, 0.7, 0.0, 0.0, 0.7),
        DeepSample::point(10.0, 0.0, 0.0, 0.7, 0.7),
    ];
    let [r, g, b, a] = flatten_pixel(&samples);
    assert!(close(r, 0.7));
    assert!(close(g, 0.0));
    assert!(close(b, 0.21));
    assert!(close(a, 0.91));
}

#[test]
fn empty_pixel_flattens_to_transparent() {
    assert_eq!(flatten_pixel(&[]), [0.0; 4]);
}

#[test]
fn opaque_front_sample_hides_everything_behind() {
    let samples = [
        DeepSample::point(1.0, 0.0, 1.0, 0.0, 1.0),
        DeepSample::point(2.0, 9.0, 9.0, 9.0, 1.0),
    ];
    let [r, g, b, a] = flatten_pixel(&samples);
    assert_eq!([r, g, b, a], [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn near_opaque_accumulator_early_exits() {
    let samples = [
        DeepSample::point(1.0, 0.9995, 0.0, 0.0, 0.9995),
        DeepSample::point(2.0, 0.0, 1.0, 0.0, 1.0),
    ];
    let [_, g, _, a] = flatten_pixel(&samples);
    assert_eq!(g, 0.0);
    assert!(a >= 1.0 - 1e-3);
}

#[test]
fn flatten_row_writes_each_pixel() {
    let mut row = DeepRow::new();
    row.begin(2, 2).unwrap();
    row.push_pixel(&[DeepSample::point(1.0, 0.5, 0.0, 0.0, 0.5)])
        .unwrap();
    row.push_pixel(&[DeepSample::point(1.0, 0.0, 0.0, 1.0, 1.0)])
        .unwrap();

    let mut out = vec![0.0f32; 8];
    flatten_row(&row, &mut out);
    assert_eq!(&out[..4], &[0.5, 0.0, 0.0, 0.5]);
    assert_eq!(&out[4..], &[0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn flat_image_rows_are_disjoint() {
    let mut img = FlatImage::new(2, 2).unwrap();
    img.row_mut(1).fill(1.0);
    assert!(img.row(0).iter().all(|&v| v == 0.0));
    assert!(img.row(1).iter().all(|&v| v == 1.0));
    assert_eq!(img.pixel(0, 1), [1.0; 4]);
}
