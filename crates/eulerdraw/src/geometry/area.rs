//! Boolean polygon areas
//!
//! Circles are approximated by regular polygons; every zone shape is a
//! union, intersection or difference of such polygons.

use std::f64::consts::PI;

use geo::{
    Area as _, BooleanOps, BoundingRect, Contains, Coord, LineString, MultiPolygon, Point,
    Polygon,
};

use super::Rect;

/// Areas below this are treated as empty.
const EMPTY_AREA: f64 = 1e-9;

/// A planar region built from polygons.
#[derive(Debug, Clone)]
pub struct Area {
    shape: MultiPolygon<f64>,
}

impl Area {
    pub fn empty() -> Self {
        Self {
            shape: MultiPolygon::new(Vec::new()),
        }
    }

    /// Regular `segments`-gon inscribed in the circle.
    pub fn circle(cx: f64, cy: f64, radius: f64, segments: usize) -> Self {
        if radius <= 0.0 || segments < 3 {
            return Self::empty();
        }
        let step = 2.0 * PI / segments as f64;
        let ring: Vec<Coord<f64>> = (0..segments)
            .map(|k| {
                let angle = step * k as f64;
                Coord {
                    x: cx + radius * angle.cos(),
                    y: cy + radius * angle.sin(),
                }
            })
            .collect();
        Self::from_ring(ring)
    }

    pub fn rect(bounds: &Rect) -> Self {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Self::empty();
        }
        Self::from_ring(vec![
            Coord {
                x: bounds.min_x,
                y: bounds.min_y,
            },
            Coord {
                x: bounds.max_x,
                y: bounds.min_y,
            },
            Coord {
                x: bounds.max_x,
                y: bounds.max_y,
            },
            Coord {
                x: bounds.min_x,
                y: bounds.max_y,
            },
        ])
    }

    fn from_ring(ring: Vec<Coord<f64>>) -> Self {
        // Polygon::new closes the ring
        let polygon = Polygon::new(LineString::from(ring), vec![]);
        Self {
            shape: MultiPolygon::new(vec![polygon]),
        }
    }

    pub fn union(&self, other: &Area) -> Area {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Area {
            shape: self.shape.union(&other.shape),
        }
    }

    pub fn intersect(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return Area::empty();
        }
        Area {
            shape: self.shape.intersection(&other.shape),
        }
    }

    pub fn subtract(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Area {
            shape: self.shape.difference(&other.shape),
        }
    }

    /// Unsigned area of the region.
    pub fn size(&self) -> f64 {
        self.shape.unsigned_area()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.0.is_empty() || self.size() <= EMPTY_AREA
    }

    /// Strict interior test; points on the boundary are outside.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.shape.contains(&Point::new(x, y))
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.shape
            .bounding_rect()
            .map(|r| Rect::from_corners(r.min().x, r.min().y, r.max().x, r.max().y))
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// SVG path data: one `M ... L ... Z` run per ring.
    pub fn to_svg_path(&self) -> String {
        let mut parts = Vec::new();
        for polygon in &self.shape.0 {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                let mut coords = ring.coords();
                if let Some(first) = coords.next() {
                    let mut d = format!("M {} {}", first.x, first.y);
                    for c in coords {
                        d.push_str(&format!(" L {} {}", c.x, c.y));
                    }
                    d.push_str(" Z");
                    parts.push(d);
                }
            }
        }
        parts.join(" ")
    }
}

impl Default for Area {
    fn default() -> Self {
        Self::empty()
    }
}
