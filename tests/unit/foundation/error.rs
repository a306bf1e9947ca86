use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LoopError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(LoopError::config("x").to_string().contains("config error:"));
    assert!(
        LoopError::from(GenerationFailure::new("x"))
            .to_string()
            .contains("generation error:")
    );
}

#[test]
fn generation_failure_keeps_reason() {
    let err = GenerationFailure::new("model rejected latent");
    assert_eq!(err.to_string(), "generator failed: model rejected latent");
    let wrapped = LoopError::from(err.clone());
    assert!(matches!(wrapped, LoopError::Generation(ref e) if *e == err));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LoopError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
