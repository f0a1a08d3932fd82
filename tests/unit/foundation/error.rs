use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PipeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PipeError::invalid_descriptor("exposure", "zero priority")
            .to_string()
            .contains("invalid descriptor for operation `exposure`")
    );
    let err = PipeError::MissingEntryPoint {
        op: "exposure".to_string(),
        entry: "process",
    };
    assert!(err.to_string().contains("mandatory entry point `process`"));
}

#[test]
fn version_mismatch_reports_both_versions() {
    let err = PipeError::VersionMismatch {
        op: "demosaic".to_string(),
        unit: 3,
        host: 1,
    };
    let msg = err.to_string();
    assert!(msg.contains('3') && msg.contains('1'));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PipeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
