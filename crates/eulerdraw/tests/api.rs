//! Integration tests for the public API

use std::collections::BTreeSet;

use eulerdraw::prelude::*;
use eulerdraw::{checksum, draw, draw_compact, render_svg};

const SINGLE: &str = r#"{"AbstractDiagram": {
    "Version": 0,
    "Contours": ["a"],
    "Zones": [{"in": ["a"]}],
    "ShadedZones": [],
    "Spiders": []
}}"#;

const VENN2: &str = r#"{"AbstractDiagram": {
    "Version": 0,
    "Contours": ["a", "b"],
    "Zones": [{"in": ["a"]}, {"in": ["b"]}, {"in": ["a", "b"]}],
    "ShadedZones": [],
    "Spiders": []
}}"#;

fn distance(a: &CircleContour, b: &CircleContour) -> f64 {
    ((a.cx - b.cx).powi(2) + (a.cy - b.cy).powi(2)).sqrt()
}

#[test]
fn test_single_curve_fills_the_box() {
    let diagram = draw(SINGLE, 100.0).unwrap();
    assert_eq!(diagram.circles().len(), 1);
    let circle = &diagram.circles()[0];
    assert_eq!(circle.label_str(), "a");
    assert!((circle.cx - 50.0).abs() < 1e-9);
    assert!((circle.cy - 50.0).abs() < 1e-9);
    assert!((circle.radius - 47.5).abs() < 1e-9);
}

#[test]
fn test_single_curve_checksum_baseline() {
    let value = checksum(SINGLE, 100.0).unwrap();
    assert!((value - 291.52431).abs() < 1e-5, "checksum {}", value);
}

#[test]
fn test_venn2_circles_overlap() {
    let diagram = draw(VENN2, 200.0).unwrap();
    let a = diagram.circle_for_label("a").unwrap();
    let b = diagram.circle_for_label("b").unwrap();

    assert!((a.radius - b.radius).abs() < 1e-9);
    let d = distance(a, b);
    assert!(d > 0.0);
    assert!(d < a.radius + b.radius);
    assert!(d > (a.radius - b.radius).abs());

    let outside = diagram
        .unshaded_zones()
        .iter()
        .find(|z| z.zone().is_outside())
        .map(|z| diagram.zone_shape(z))
        .unwrap();
    for zone in diagram.unshaded_zones().iter().filter(|z| !z.zone().is_outside()) {
        let shape = diagram.zone_shape(zone);
        assert!(!shape.is_empty(), "zone {} is empty", zone.zone());
        assert!(shape.intersect(&outside).size() < 1e-3 * shape.size());
    }
}

#[test]
fn test_venn3_draws_without_extra_zones() {
    let diagram = draw_compact("a b c ab ac bc abc", 300.0).unwrap();
    assert_eq!(diagram.circles().len(), 3);
    assert!(diagram.shaded_zones().is_empty());
    assert_eq!(diagram.unshaded_zones().len(), 8);
}

#[test]
fn test_circles_fit_inside_the_box() {
    for notation in ["a", "a b", "a b ab", "a ab", "a b c ab ac bc abc"] {
        let diagram = draw_compact(notation, 250.0).unwrap();
        for circle in diagram.circles() {
            let bounds = circle.bounds();
            assert!(bounds.min_x >= -1e-9 && bounds.max_x <= 250.0 + 1e-9, "{}", notation);
            assert!(bounds.min_y >= -1e-9 && bounds.max_y <= 250.0 + 1e-9, "{}", notation);
        }
    }
}

#[test]
fn test_nested_curve_sits_inside_container() {
    let diagram = draw_compact("a ab", 200.0).unwrap();
    let a = diagram.circle_for_label("a").unwrap();
    let b = diagram.circle_for_label("b").unwrap();
    assert!(distance(a, b) + b.radius < a.radius);
}

#[test]
fn test_determinism() {
    let first = draw_compact("a b c ab bc, b", 200.0).unwrap();
    let second = draw_compact("a b c ab bc, b", 200.0).unwrap();
    assert_eq!(first.circles().len(), second.circles().len());
    for (x, y) in first.circles().iter().zip(second.circles()) {
        assert_eq!(x.label_str(), y.label_str());
        assert_eq!((x.cx, x.cy, x.radius), (y.cx, y.cy, y.radius));
    }
    assert_eq!(first.checksum(), second.checksum());
}

#[test]
fn test_determinism_with_reset_context() {
    let spec = parse_compact("a b ab").unwrap();
    let creator = DiagramCreator::default();
    let mut ctx = DiagramContext::new();

    let description = spec.to_description(&mut ctx).unwrap();
    let first = creator.create_diagram(&description, &mut ctx, 100.0).unwrap();

    ctx.reset();
    let description = spec.to_description(&mut ctx).unwrap();
    let second = creator.create_diagram(&description, &mut ctx, 100.0).unwrap();

    assert_eq!(first.checksum(), second.checksum());
}

#[test]
fn test_zones_partition_the_box() {
    let diagram = draw(VENN2, 200.0).unwrap();
    let total: f64 = diagram
        .shaded_zones()
        .iter()
        .chain(diagram.unshaded_zones())
        .map(|z| diagram.zone_shape(z).size())
        .sum();
    let expected = 200.0 * 200.0;
    assert!((total - expected).abs() < 1e-3 * expected, "total {}", total);
}

#[test]
fn test_rescale_relationship() {
    let diagram = draw(VENN2, 100.0).unwrap();
    let scaled = diagram.scaled(3.0);
    let k = scaled.geometric_checksum() / diagram.geometric_checksum();
    assert!((k - 3.0).abs() < 1e-9);
    assert_eq!(scaled.structural_checksum(), diagram.structural_checksum());
    assert_eq!(scaled.size(), 300.0);
}

#[test]
fn test_shading_is_reported() {
    let diagram = draw_compact("a b ab, ab", 200.0).unwrap();
    let shaded: Vec<String> = diagram
        .shaded_zones()
        .iter()
        .map(|z| z.zone().label_string())
        .collect();
    assert_eq!(shaded, vec!["ab".to_string()]);
    assert_eq!(diagram.unshaded_zones().len(), 3);
}

#[test]
fn test_render_svg() {
    let svg = render_svg(VENN2, 200.0).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<circle").count(), 2);
}

#[test]
fn test_double_piercing_of_disjoint_circles_fails() {
    let mut dc = DiagramContext::new();
    let a = dc.new_curve("a");
    let b = dc.new_curve("b");
    let c = dc.new_curve("c");
    let outside = dc.zones.outside();
    let za = dc.zones.with_curve(&outside, &a);
    let zb = dc.zones.with_curve(&outside, &b);
    let zab = dc.zones.with_curve(&za, &b);
    let new_zones = [&outside, &za, &zb, &zab]
        .iter()
        .map(|z| dc.zones.with_curve(z, &c))
        .collect();

    let mut ctx = eulerdraw::placement::PlacementContext::new(&LayoutConfig::default());
    ctx.add_circle(CircleContour::new(0.0, 0.0, 50.0, Some(a)));
    ctx.add_circle(CircleContour::new(500.0, 0.0, 50.0, Some(b)));

    let data = eulerdraw::recomposition::RecompData {
        added_curve: c,
        split_zones: vec![outside, za, zb, zab],
        new_zones,
    };
    let guides = eulerdraw::plan::UniformGuideSizes::new(None);
    let err = eulerdraw::placement::place_double_piercing(
        &ctx,
        10.0,
        &guides,
        &ctx.outer_box(),
        &data,
    )
    .unwrap_err();
    assert!(err.is_drawing_failure());
    assert!(err.to_string().contains("non-intersecting circles"));
}

#[test]
fn test_symmetric_piercings_are_placed_as_one_batch() {
    let spec = parse_compact("b c z bz cz").unwrap();
    let mut ctx = DiagramContext::new();
    let description = spec.to_description(&mut ctx).unwrap();
    let creator = DiagramCreator::default();

    let plan = creator.plan(&description, &mut ctx).unwrap();
    let batch = plan
        .build_steps
        .iter()
        .find(|step| step.is_batch())
        .expect("b and c should share a build step");
    assert_eq!(batch.recomp_data.len(), 2);

    ctx.reset();
    let description = spec.to_description(&mut ctx).unwrap();
    let diagram = creator.create_diagram(&description, &mut ctx, 300.0).unwrap();
    let z = diagram.circle_for_label("z").unwrap();
    let b = diagram.circle_for_label("b").unwrap();
    let c = diagram.circle_for_label("c").unwrap();

    assert!((distance(b, z) - distance(c, z)).abs() < 1e-6);
    assert!((b.radius - c.radius).abs() < 1e-9);
    assert!(distance(b, c) > b.radius + c.radius);
    for pierced in [b, c] {
        let d = distance(pierced, z);
        assert!(d < pierced.radius + z.radius && d > (pierced.radius - z.radius).abs());
    }

    assert!(diagram.shaded_zones().is_empty());
    assert_eq!(diagram.unshaded_zones().len(), 6);
    for zone in diagram.unshaded_zones() {
        assert!(!diagram.zone_shape(zone).is_empty(), "zone {} is empty", zone.zone());
    }
}

fn labels_of(zone: &ConcreteZone) -> BTreeSet<String> {
    zone.zone().curves().map(|c| c.label_str().to_string()).collect()
}

#[test]
fn test_drawn_regions_match_the_requested_zones() {
    let size = 300.0;
    for notation in [
        "a b ab",
        "a b c ab ac bc abc",
        "a ab abc",
        "a b ab c",
        "a b c ab bc",
        "b c z bz cz",
    ] {
        let diagram = draw_compact(notation, size).unwrap();
        let drawn: Vec<BTreeSet<String>> = diagram
            .shaded_zones()
            .iter()
            .chain(diagram.unshaded_zones())
            .map(labels_of)
            .collect();

        for zone in diagram.unshaded_zones() {
            assert!(
                !diagram.zone_shape(zone).is_empty(),
                "{}: zone {} is empty",
                notation,
                zone.zone()
            );
        }

        // Every region the circles actually carve out must be a drawn zone
        let circles = diagram.circles();
        let frame = Area::rect(&diagram.bounding_box());
        for mask in 1u32..(1 << circles.len()) {
            let mut region = frame.clone();
            let mut labels = BTreeSet::new();
            for (i, circle) in circles.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    region = region.intersect(&circle.area(64));
                    labels.insert(circle.label_str().to_string());
                } else {
                    region = region.subtract(&circle.area(64));
                }
            }
            if region.size() > 1e-4 * size * size {
                assert!(
                    drawn.contains(&labels),
                    "{}: unrequested region {:?} of area {}",
                    notation,
                    labels,
                    region.size()
                );
            }
        }
    }
}
