use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PuppetryError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PuppetryError::model("x")
            .to_string()
            .contains("model error:")
    );
    assert!(
        PuppetryError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PuppetryError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: PuppetryError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PuppetryError::Serde(_)));
}
