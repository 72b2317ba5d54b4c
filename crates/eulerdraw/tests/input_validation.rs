//! Malformed diagrams are rejected before layout starts

use eulerdraw::core::DiagramError;
use eulerdraw::draw;
use eulerdraw::input::{parse_compact, AbstractDiagramSpec, ZoneSpec};

fn validation_message(json: &str) -> String {
    let err = draw(json, 100.0).unwrap_err();
    let kind = err.downcast_ref::<DiagramError>().unwrap();
    assert!(kind.is_input_error(), "unexpected {:?}", kind);
    assert!(!kind.is_drawing_failure());
    kind.to_string()
}

#[test]
fn test_zone_with_undefined_curve() {
    let message = validation_message(
        r#"{"AbstractDiagram": {"Contours": ["a"], "Zones": [{"in": ["a"]}, {"in": ["a", "b"]}]}}"#,
    );
    assert!(message.contains("undefined curve 'b'"));
}

#[test]
fn test_shaded_zone_must_exist() {
    let message = validation_message(
        r#"{"AbstractDiagram": {"Contours": ["a", "b"],
            "Zones": [{"in": ["a"]}, {"in": ["b"]}],
            "ShadedZones": [{"in": ["a", "b"]}]}}"#,
    );
    assert!(message.contains("shaded zone"));
}

#[test]
fn test_spider_habitat_must_exist() {
    let message = validation_message(
        r#"{"AbstractDiagram": {"Contours": ["a"], "Zones": [{"in": ["a"]}],
            "Spiders": [{"name": "s", "habitat": [{"in": ["a"]}, {"in": ["q"]}]}]}}"#,
    );
    assert!(message.contains("spider s"));
}

#[test]
fn test_unsupported_version() {
    let message = validation_message(r#"{"AbstractDiagram": {"Version": 2, "Contours": []}}"#);
    assert!(message.contains("unsupported version"));
}

#[test]
fn test_outside_zone_may_be_listed_explicitly() {
    let spec = AbstractDiagramSpec::from_json(
        r#"{"AbstractDiagram": {"Contours": ["a"], "Zones": [{"in": [""]}, {"in": ["a"]}]}}"#,
    )
    .unwrap();
    assert!(spec.zones[0].is_outside());
    let diagram = draw(&spec.to_json().unwrap(), 100.0).unwrap();
    assert_eq!(diagram.unshaded_zones().len(), 2);
}

#[test]
fn test_compact_and_json_agree() {
    let compact = parse_compact("a b ab, ab").unwrap();
    let json = AbstractDiagramSpec::from_json(
        r#"{"AbstractDiagram": {"Contours": ["a", "b"],
            "Zones": [{"in": ["a"]}, {"in": ["b"]}, {"in": ["a", "b"]}],
            "ShadedZones": [{"in": ["a", "b"]}]}}"#,
    )
    .unwrap();
    assert_eq!(compact, json);
    assert_eq!(compact.shaded_zones, vec![ZoneSpec::new(["a", "b"])]);
}
