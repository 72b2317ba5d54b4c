//! Tests for error kinds surfaced through the public API

use eulerdraw::core::DiagramError;
use eulerdraw::{draw, draw_compact};

#[test]
fn test_cannot_draw() {
    let error = DiagramError::cannot_draw("1-piercing no fit");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Cannot draw diagram"));
    assert!(error_msg.contains("1-piercing no fit"));
    assert!(error.is_drawing_failure());
}

#[test]
fn test_invariant_violation_is_not_recoverable() {
    let error = DiagramError::invariant_violation("curve a splits 3 zones");
    assert!(!error.is_drawing_failure());
    assert!(!error.is_input_error());
    assert!(format!("{}", error).contains("Invariant violation"));
}

#[test]
fn test_render_error() {
    let error = DiagramError::render_error("Render failed");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Render error"));
    assert!(error_msg.contains("Render failed"));
}

#[test]
fn test_malformed_json_keeps_its_kind() {
    let err = draw("{ not json", 100.0).unwrap_err();
    let kind = err.downcast_ref::<DiagramError>().unwrap();
    assert!(matches!(kind, DiagramError::Json { .. }));
    assert!(format!("{:#}", err).contains("reading diagram JSON"));
}

#[test]
fn test_compact_syntax_error_has_position() {
    let err = draw_compact("a b\nab;", 100.0).unwrap_err();
    match err.downcast_ref::<DiagramError>() {
        Some(DiagramError::Parse { line, column, .. }) => {
            assert_eq!(*line, 2);
            assert_eq!(*column, 2);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let error: DiagramError = io_err.into();
    assert!(format!("{}", error).contains("IO error"));
}
