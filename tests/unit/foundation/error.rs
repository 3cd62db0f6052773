use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WallError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WallError::empty_choice("x")
            .to_string()
            .contains("empty choice:")
    );
    assert!(
        WallError::not_initialized("x")
            .to_string()
            .contains("not initialized:")
    );
    assert!(WallError::worker("x").to_string().contains("worker error:"));
    assert!(
        WallError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(WallError::export("x").to_string().contains("export error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WallError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let err: WallError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, WallError::Serde(_)));
}
