use super::*;
use crate::source::DeepSource;

#[test]
fn spec_json_round_trips() {
    let spec = LayerSpec {
        width: 8,
        height: 8,
        channels: None,
        elements: vec![
            Element::GroundPlane {
                depth: 25.0,
                color: [0.0, 1.0, 0.0],
                alpha: 1.0,
            },
            Element::Pixel {
                x: 1,
                y: 2,
                samples: vec![[5.0, 5.0, 0.7, 0.0, 0.0, 0.7]],
            },
        ],
    };

    let json = serde_json::to_string(&spec).unwrap();
    let back: LayerSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back.width, 8);
    assert_eq!(back.elements.len(), 2);
}

#[test]
fn build_paints_elements_in_order() {
    let spec = LayerSpec {
        width: 4,
        height: 4,
        channels: None,
        elements: vec![
            Element::GroundPlane {
                depth: 25.0,
                color: [0.0, 1.0, 0.0],
                alpha: 1.0,
            },
            Element::Pixel {
                x: 0,
                y: 0,
                samples: vec![[5.0, 5.0, 0.7, 0.0, 0.0, 0.7]],
            },
        ],
    };

    let img = spec.build().unwrap();
    assert_eq!(img.pixel(3, 3).sample_count(), 1);
    let corner = img.pixel(0, 0);
    assert_eq!(corner.sample_count(), 2);
    // The explicit sample at z=5 sorts in front of the plane at z=25.
    assert_eq!(corner.samples()[0].depth, 5.0);
    assert!(corner.is_sorted());
}

#[test]
fn pixel_element_outside_image_is_rejected() {
    let spec = LayerSpec {
        width: 2,
        height: 2,
        channels: None,
        elements: vec![Element::Pixel {
            x: 5,
            y: 0,
            samples: vec![],
        }],
    };
    assert!(spec.build().is_err());
}

#[test]
fn open_respects_declared_channels() {
    let dir = std::env::temp_dir().join("deepfuse_layer_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("no_zback.json");
    std::fs::write(
        &path,
        r#"{
            "width": 2,
            "height": 2,
            "channels": ["R", "G", "B", "A", "Z"],
            "elements": [
                { "ground_plane": { "depth": 3.0, "color": [1.0, 1.0, 1.0], "alpha": 1.0 } }
            ]
        }"#,
    )
    .unwrap();

    let src = open(&path).unwrap();
    assert!(src.has_channel("Z"));
    assert!(!src.has_channel("ZBack"));
    assert_eq!(src.dimensions(), (2, 2));
}

#[test]
fn unreadable_path_is_missing_file() {
    let err = LayerSpec::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::DeepError::MissingFile(_)
    ));
}

#[test]
fn garbage_content_is_missing_file() {
    let dir = std::env::temp_dir().join("deepfuse_layer_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("garbage.json");
    std::fs::write(&path, "not a layer at all").unwrap();

    assert!(matches!(
        LayerSpec::from_path(&path),
        Err(crate::foundation::error::DeepError::MissingFile(_))
    ));
}
