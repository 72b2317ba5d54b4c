//! Placement state threaded through every build step

use std::collections::BTreeMap;

use tracing::debug;

use crate::abstraction::{AbstractCurve, Zone};
use crate::core::{DiagramError, DiagramResult, LayoutConfig};
use crate::geometry::{circles_bounds, Area, CircleContour, Rect};

/// Circles placed so far and the curve each one realizes.
#[derive(Debug, Clone)]
pub struct PlacementContext {
    circles: Vec<CircleContour>,
    by_curve: BTreeMap<AbstractCurve, usize>,
    margin: f64,
    segments: usize,
    tolerance: f64,
    empty_box_size: f64,
}

impl PlacementContext {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            circles: Vec::new(),
            by_curve: BTreeMap::new(),
            margin: config.smallest_radius,
            segments: config.circle_segments,
            tolerance: config.containment_tolerance,
            empty_box_size: config.empty_box_size,
        }
    }

    /// True until the first curve has been placed.
    pub fn is_empty(&self) -> bool {
        self.by_curve.is_empty()
    }

    pub fn circles(&self) -> &[CircleContour] {
        &self.circles
    }

    pub fn circles_mut(&mut self) -> &mut [CircleContour] {
        &mut self.circles
    }

    pub fn into_circles(self) -> Vec<CircleContour> {
        self.circles
    }

    /// Accept a circle: give it a colour and record it for its curve.
    pub fn add_circle(&mut self, mut circle: CircleContour) {
        circle.assign_colour();
        debug!(
            curve = %circle.label_str(),
            cx = circle.cx,
            cy = circle.cy,
            radius = circle.radius,
            "Placed circle"
        );
        if let Some(curve) = &circle.curve {
            self.by_curve.insert(curve.clone(), self.circles.len());
        }
        self.circles.push(circle);
    }

    pub fn circle_for(&self, curve: &AbstractCurve) -> Option<&CircleContour> {
        self.by_curve.get(curve).map(|&i| &self.circles[i])
    }

    pub(crate) fn require_circle(&self, curve: &AbstractCurve) -> DiagramResult<&CircleContour> {
        self.circle_for(curve).ok_or_else(|| {
            DiagramError::invariant_violation(format!("curve {} has not been placed", curve))
        })
    }

    /// Bounds of the placed circles.
    pub fn bounds(&self) -> Option<Rect> {
        circles_bounds(&self.circles)
    }

    /// Working box: a square around the placed circles, twice their larger
    /// extent in each direction.
    pub fn outer_box(&self) -> Rect {
        match self.bounds() {
            Some(b) => {
                let half = 2.0 * b.width().max(b.height());
                Rect::square_around(b.center_x(), b.center_y(), half)
            }
            None => Rect::new(0.0, 0.0, self.empty_box_size, self.empty_box_size),
        }
    }

    /// Region of `outer` inside every circle of `zone` and outside all
    /// other placed circles.
    pub fn zone_area(&self, zone: &Zone, outer: &Rect) -> DiagramResult<Area> {
        let mut area = Area::rect(outer);
        let mut including = Vec::with_capacity(zone.len());
        for curve in zone.curves() {
            let index = *self.by_curve.get(curve).ok_or_else(|| {
                DiagramError::invariant_violation(format!(
                    "zone {} uses unplaced curve {}",
                    zone, curve
                ))
            })?;
            including.push(index);
            area = area.intersect(&self.circles[index].area(self.segments));
        }
        for (index, circle) in self.circles.iter().enumerate() {
            if !including.contains(&index) {
                area = area.subtract(&circle.area(self.segments));
            }
        }
        Ok(area)
    }

    /// Union of a cluster of zones, built directly rather than by merging
    /// zone polygons: inside every curve the zones share, outside every
    /// circle none of them uses.
    pub fn cluster_area(&self, zones: &[Zone], outer: &Rect) -> DiagramResult<Area> {
        let first = match zones.first() {
            Some(zone) => zone,
            None => return Ok(Area::empty()),
        };
        for zone in zones {
            if let Some(curve) = zone.curves().find(|c| !self.by_curve.contains_key(*c)) {
                return Err(DiagramError::invariant_violation(format!(
                    "zone {} uses unplaced curve {}",
                    zone, curve
                )));
            }
        }

        let mut area = Area::rect(outer);
        for curve in first.curves().filter(|c| zones.iter().all(|z| z.contains(c))) {
            area = area.intersect(&self.circles[self.by_curve[curve]].area(self.segments));
        }
        for circle in &self.circles {
            let in_cluster = circle
                .curve
                .as_ref()
                .is_some_and(|c| zones.iter().any(|z| z.contains(c)));
            if !in_cluster {
                area = area.subtract(&circle.area(self.segments));
            }
        }
        Ok(area)
    }

    /// Fat containment: `circle` widened by the smallest radius must lie
    /// inside `area`, up to a relative sliver tolerance.
    pub fn circle_in_area(&self, circle: &CircleContour, area: &Area) -> bool {
        self.circle_in_area_with_margin(circle, area, self.margin)
    }

    /// Containment with an explicit widening instead of the smallest radius.
    pub fn circle_in_area_with_margin(
        &self,
        circle: &CircleContour,
        area: &Area,
        margin: f64,
    ) -> bool {
        let fat = circle.fat_area(margin, self.segments);
        let outside = fat.subtract(area).size();
        outside <= self.tolerance * fat.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::DiagramContext;

    #[test]
    fn test_empty_context_uses_working_box() {
        let ctx = PlacementContext::new(&LayoutConfig::default());
        assert!(ctx.is_empty());
        assert_eq!(ctx.outer_box(), Rect::new(0.0, 0.0, 1000.0, 1000.0));
    }

    #[test]
    fn test_outer_box_surrounds_circles() {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let mut ctx = PlacementContext::new(&LayoutConfig::default());
        ctx.add_circle(CircleContour::new(0.0, 0.0, 10.0, Some(a.clone())));
        assert!(!ctx.is_empty());
        assert_eq!(ctx.outer_box(), Rect::square_around(0.0, 0.0, 40.0));
        assert!(ctx.circle_for(&a).unwrap().colour.is_some());
    }

    #[test]
    fn test_zone_areas_and_containment() {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let mut ctx = PlacementContext::new(&LayoutConfig::default());
        ctx.add_circle(CircleContour::new(0.0, 0.0, 100.0, Some(a.clone())));
        let outer = ctx.outer_box();
        let outside = dc.zones.outside();
        let inside = dc.zones.with_curve(&outside, &a);

        let in_a = ctx.zone_area(&inside, &outer).unwrap();
        let out_a = ctx.zone_area(&outside, &outer).unwrap();
        assert!(in_a.contains_point(0.0, 0.0));
        assert!(!out_a.contains_point(0.0, 0.0));

        let small = CircleContour::new(0.0, 0.0, 50.0, None);
        assert!(ctx.circle_in_area(&small, &in_a));
        assert!(!ctx.circle_in_area(&small, &out_a));
        // touching the boundary once fattened
        let snug = CircleContour::new(0.0, 0.0, 95.0, None);
        assert!(!ctx.circle_in_area(&snug, &in_a));
        assert!(ctx.circle_in_area_with_margin(&snug, &in_a, 0.0));
    }

    #[test]
    fn test_cluster_area_spans_both_sides_of_a_boundary() {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let b = dc.new_curve("b");
        let mut ctx = PlacementContext::new(&LayoutConfig::default());
        ctx.add_circle(CircleContour::new(0.0, 0.0, 100.0, Some(a.clone())));
        ctx.add_circle(CircleContour::new(500.0, 0.0, 50.0, Some(b)));
        let outer = ctx.outer_box();
        let outside = dc.zones.outside();
        let inside = dc.zones.with_curve(&outside, &a);

        let cluster = ctx.cluster_area(&[outside, inside], &outer).unwrap();
        assert!(cluster.contains_point(0.0, 0.0));
        assert!(cluster.contains_point(100.0, 0.0));
        assert!(cluster.contains_point(-200.0, 0.0));
        assert!(!cluster.contains_point(500.0, 0.0));
    }

    #[test]
    fn test_unplaced_curve_is_invariant_violation() {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let ctx = PlacementContext::new(&LayoutConfig::default());
        let outside = dc.zones.outside();
        let inside = dc.zones.with_curve(&outside, &a);
        let err = ctx.zone_area(&inside, &ctx.outer_box()).unwrap_err();
        assert!(matches!(err, DiagramError::InvariantViolation { .. }));
    }
}
