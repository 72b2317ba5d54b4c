//! Zone geometry

use crate::abstraction::Zone;
use crate::geometry::{Area, CircleContour, Rect};

/// A zone realized by circles: inside every including circle and outside
/// every excluding one.
#[derive(Debug, Clone)]
pub struct ConcreteZone {
    zone: Zone,
    including: Vec<CircleContour>,
    excluding: Vec<CircleContour>,
}

impl ConcreteZone {
    pub fn new(zone: Zone, including: Vec<CircleContour>, excluding: Vec<CircleContour>) -> Self {
        Self {
            zone,
            including,
            excluding,
        }
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn including(&self) -> &[CircleContour] {
        &self.including
    }

    pub fn excluding(&self) -> &[CircleContour] {
        &self.excluding
    }

    /// The zone's region, clipped to `outer`.
    pub fn shape(&self, outer: &Rect, segments: usize) -> Area {
        let mut area = Area::rect(outer);
        for circle in &self.including {
            area = area.intersect(&circle.area(segments));
        }
        for circle in &self.excluding {
            area = area.subtract(&circle.area(segments));
        }
        area
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        for circle in self.including.iter_mut().chain(self.excluding.iter_mut()) {
            circle.transform((0.0, 0.0), factor, (0.0, 0.0));
        }
    }
}
