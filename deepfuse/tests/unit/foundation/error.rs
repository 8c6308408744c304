use super::*;

#[test]
fn display_carries_kind_prefix() {
    let e = DeepError::invalid_config("merge threshold must be >= 0");
    assert_eq!(
        e.to_string(),
        "invalid config: merge threshold must be >= 0"
    );

    let e = DeepError::dimension_mismatch("layer 1 is 8x8, expected 4x4");
    assert!(e.to_string().starts_with("dimension mismatch:"));
}

#[test]
fn anyhow_errors_pass_through() {
    let inner = anyhow::anyhow!("downstream exploded");
    let e: DeepError = inner.into();
    assert_eq!(e.to_string(), "downstream exploded");
}
