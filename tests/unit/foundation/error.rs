use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HuesError::rhythm("x")
            .to_string()
            .contains("invalid rhythm track:")
    );
    assert!(
        HuesError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(HuesError::asset("x").to_string().contains("asset error:"));
    assert!(HuesError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn duration_unavailable_names_the_media() {
    let err = HuesError::DurationUnavailable("songs/loop_x.mp3".into());
    assert!(err.to_string().contains("songs/loop_x.mp3"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HuesError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
