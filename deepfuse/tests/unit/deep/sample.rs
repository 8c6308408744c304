use super::*;

#[test]
fn point_and_volume_classification() {
    let p = DeepSample::point(5.0, 0.7, 0.0, 0.0, 0.7);
    assert!(!p.is_volume());
    assert_eq!(p.thickness(), 0.0);
    assert_eq!(p.depth_back, p.depth);

    let v = DeepSample::volume(1.0, 4.0, 0.2, 0.2, 0.2, 0.5);
    assert!(v.is_volume());
    assert_eq!(v.thickness(), 3.0);
}

#[test]
fn depth_cmp_breaks_ties_on_depth_back() {
    let a = DeepSample::volume(2.0, 2.0, 0.0, 0.0, 0.0, 0.1);
    let b = DeepSample::volume(2.0, 5.0, 0.0, 0.0, 0.0, 0.1);
    assert_eq!(a.depth_cmp(&b), Ordering::Less);
    assert_eq!(b.depth_cmp(&a), Ordering::Greater);
    assert_eq!(a.depth_cmp(&a), Ordering::Equal);
}

#[test]
fn add_sample_keeps_front_to_back_order() {
    let mut px = DeepPixel::new();
    px.add_sample(DeepSample::point(10.0, 0.0, 0.0, 0.5, 0.5))
        .unwrap();
    px.add_sample(DeepSample::point(2.0, 0.5, 0.0, 0.0, 0.5))
        .unwrap();
    px.add_sample(DeepSample::point(6.0, 0.0, 0.5, 0.0, 0.5))
        .unwrap();

    assert!(px.is_sorted());
    let depths: Vec<f32> = px.samples().iter().map(|s| s.depth).collect();
    assert_eq!(depths, vec![2.0, 6.0, 10.0]);
}

#[test]
fn add_sample_rejects_inverted_interval() {
    let mut px = DeepPixel::new();
    let bad = DeepSample::volume(5.0, 3.0, 0.0, 0.0, 0.0, 0.5);
    assert!(matches!(
        px.add_sample(bad),
        Err(crate::foundation::error::DeepError::InvalidSample(_))
    ));
    assert!(px.is_empty());
}

#[test]
fn add_sample_rejects_nan_depth() {
    let mut px = DeepPixel::new();
    let bad = DeepSample::point(f32::NAN, 0.0, 0.0, 0.0, 0.5);
    assert!(px.add_sample(bad).is_err());
}

#[test]
fn add_sample_clamps_alpha() {
    let mut px = DeepPixel::new();
    px.add_sample(DeepSample::point(1.0, 0.5, 0.5, 0.5, 1.5))
        .unwrap();
    px.add_sample(DeepSample::point(2.0, 0.0, 0.0, 0.0, -0.25))
        .unwrap();
    assert_eq!(px.samples()[0].alpha, 1.0);
    assert_eq!(px.samples()[1].alpha, 0.0);
}

#[test]
fn min_max_depth_cover_volume_extent() {
    let mut px = DeepPixel::new();
    px.add_sample(DeepSample::volume(3.0, 12.0, 0.0, 0.0, 0.0, 0.2))
        .unwrap();
    px.add_sample(DeepSample::point(5.0, 0.0, 0.0, 0.0, 0.2))
        .unwrap();
    assert_eq!(px.min_depth(), Some(3.0));
    assert_eq!(px.max_depth(), Some(12.0));

    let empty = DeepPixel::new();
    assert_eq!(empty.min_depth(), None);
    assert_eq!(empty.max_depth(), None);
}
