//! The finished diagram

use serde::Serialize;

use super::{ConcreteSpider, ConcreteZone};
use crate::geometry::{circles_bounds, Area, CircleContour, Rect};

/// Circles, zones and spiders laid out in the square `[0, size]²`.
#[derive(Debug, Clone)]
pub struct ConcreteDiagram {
    size: f64,
    circles: Vec<CircleContour>,
    shaded_zones: Vec<ConcreteZone>,
    unshaded_zones: Vec<ConcreteZone>,
    spiders: Vec<ConcreteSpider>,
    segments: usize,
}

impl ConcreteDiagram {
    pub fn new(
        size: f64,
        circles: Vec<CircleContour>,
        shaded_zones: Vec<ConcreteZone>,
        unshaded_zones: Vec<ConcreteZone>,
        spiders: Vec<ConcreteSpider>,
        segments: usize,
    ) -> Self {
        Self {
            size,
            circles,
            shaded_zones,
            unshaded_zones,
            spiders,
            segments,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn circles(&self) -> &[CircleContour] {
        &self.circles
    }

    pub fn shaded_zones(&self) -> &[ConcreteZone] {
        &self.shaded_zones
    }

    pub fn unshaded_zones(&self) -> &[ConcreteZone] {
        &self.unshaded_zones
    }

    pub fn spiders(&self) -> &[ConcreteSpider] {
        &self.spiders
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size, self.size)
    }

    /// Region of `zone` within the bounding box.
    pub fn zone_shape(&self, zone: &ConcreteZone) -> Area {
        zone.shape(&self.bounding_box(), self.segments)
    }

    pub fn circle_for_label(&self, label: &str) -> Option<&CircleContour> {
        self.circles.iter().find(|c| c.label_str() == label)
    }

    /// Regression fingerprint: circles first, then shaded zones, each
    /// weighted by a steadily growing scale factor.
    pub fn checksum(&self) -> f64 {
        let (geometric, structural) = self.checksum_parts();
        geometric + structural
    }

    /// Coordinate-dependent part of [`checksum`](Self::checksum); scales
    /// linearly with the diagram.
    pub fn geometric_checksum(&self) -> f64 {
        self.checksum_parts().0
    }

    /// Label and shading part of [`checksum`](Self::checksum).
    pub fn structural_checksum(&self) -> f64 {
        self.checksum_parts().1
    }

    fn checksum_parts(&self) -> (f64, f64) {
        let mut scaling = 2.1;
        let mut geometric = 0.0;
        let mut structural = 0.0;
        for circle in &self.circles {
            let label = circle.curve.as_ref().map_or(0.0, |c| c.checksum());
            geometric +=
                (0.345 * circle.cx + 0.456 * circle.cy + 0.567 * circle.radius) * 1.1 * scaling;
            structural += 0.555 * label * 1.1 * scaling;
            scaling += 0.07;
        }
        for zone in &self.shaded_zones {
            structural += zone.zone().checksum() * scaling;
            scaling += 0.09;
        }
        (geometric, structural)
    }

    /// Copy with every coordinate multiplied by `factor` about the origin.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut scaled = self.clone();
        scaled.size *= factor;
        for circle in &mut scaled.circles {
            circle.transform((0.0, 0.0), factor, (0.0, 0.0));
        }
        for zone in scaled
            .shaded_zones
            .iter_mut()
            .chain(scaled.unshaded_zones.iter_mut())
        {
            zone.scale(factor);
        }
        for spider in &mut scaled.spiders {
            spider.transform((0.0, 0.0), factor, (0.0, 0.0));
        }
        scaled
    }

    pub fn summary(&self) -> DiagramSummary {
        DiagramSummary {
            size: self.size,
            checksum: self.checksum(),
            circles: self
                .circles
                .iter()
                .map(|c| CircleSummary {
                    label: c.label_str().to_string(),
                    cx: c.cx,
                    cy: c.cy,
                    radius: c.radius,
                    colour: c.colour.map(str::to_string),
                })
                .collect(),
            shaded_zones: self
                .shaded_zones
                .iter()
                .map(|z| z.zone().label_string())
                .collect(),
            spiders: self.spiders.clone(),
        }
    }
}

/// Serializable view of a [`ConcreteDiagram`].
#[derive(Debug, Clone, Serialize)]
pub struct DiagramSummary {
    pub size: f64,
    pub checksum: f64,
    pub circles: Vec<CircleSummary>,
    pub shaded_zones: Vec<String>,
    pub spiders: Vec<ConcreteSpider>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleSummary {
    pub label: String,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
}

/// Factor [`fit_to_size`] will scale the circles by.
pub fn fit_scale(circles: &[CircleContour], size: f64, fallback: Rect) -> f64 {
    let bounds = circles_bounds(circles).unwrap_or(fallback);
    scale_for(&bounds, size)
}

fn scale_for(bounds: &Rect, size: f64) -> f64 {
    let extent = bounds.width().max(bounds.height());
    if extent > 0.0 {
        size * 0.95 / extent
    } else {
        1.0
    }
}

/// Centre the circles in `[0, size]²` and scale them so their larger
/// extent is `0.95 · size`. Spider feet move with the circles; `fallback`
/// stands in for the circle bounds when there are none.
pub fn fit_to_size(
    circles: &mut [CircleContour],
    spiders: &mut [ConcreteSpider],
    size: f64,
    fallback: Rect,
) {
    let bounds = circles_bounds(circles.iter()).unwrap_or(fallback);
    let scale = scale_for(&bounds, size);
    let shift = (-bounds.center_x(), -bounds.center_y());
    let offset = (size * 0.5, size * 0.5);
    for circle in circles.iter_mut() {
        circle.transform(shift, scale, offset);
    }
    for spider in spiders.iter_mut() {
        spider.transform(shift, scale, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::DiagramContext;
    use crate::concrete::ConcreteSpiderFoot;

    #[test]
    fn test_fit_to_size() {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let mut circles = vec![CircleContour::new(500.0, 500.0, 118.0, Some(a))];
        let mut spiders = vec![ConcreteSpider::star(
            None,
            vec![ConcreteSpiderFoot::new(500.0, 500.0)],
        )];
        let fallback = Rect::new(0.0, 0.0, 1.0, 1.0);
        let scale = fit_scale(&circles, 100.0, fallback);
        assert!((scale - 95.0 / 236.0).abs() < 1e-12);
        fit_to_size(&mut circles, &mut spiders, 100.0, fallback);
        assert!((circles[0].cx - 50.0).abs() < 1e-9);
        assert!((circles[0].cy - 50.0).abs() < 1e-9);
        assert!((circles[0].radius - 47.5).abs() < 1e-9);
        assert!((spiders[0].feet[0].x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_checksum_of_single_circle() {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let diagram = ConcreteDiagram::new(
            100.0,
            vec![CircleContour::new(50.0, 50.0, 47.5, Some(a))],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            64,
        );
        assert!((diagram.checksum() - 291.52431).abs() < 1e-6);
        let doubled = diagram.scaled(2.0);
        assert!((doubled.geometric_checksum() - 2.0 * diagram.geometric_checksum()).abs() < 1e-9);
        assert_eq!(doubled.structural_checksum(), diagram.structural_checksum());
        assert_eq!(doubled.bounding_box().width(), 200.0);
    }
}
