//! The declarative abstract diagram

use std::collections::BTreeSet;

use super::{AbstractCurve, AbstractSpider, CurveLabel, Zone};
use crate::core::{DiagramError, DiagramResult};

/// Curves, required zones, shading and spiders of one diagram.
///
/// The plain constructor does not check consistency; use
/// [`AbstractDescription::try_new`] when the input is untrusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractDescription {
    contours: BTreeSet<AbstractCurve>,
    zones: BTreeSet<Zone>,
    shaded_zones: BTreeSet<Zone>,
    spiders: Vec<AbstractSpider>,
}

impl AbstractDescription {
    pub fn new(
        contours: BTreeSet<AbstractCurve>,
        zones: BTreeSet<Zone>,
        shaded_zones: BTreeSet<Zone>,
        spiders: Vec<AbstractSpider>,
    ) -> Self {
        Self {
            contours,
            zones,
            shaded_zones,
            spiders,
        }
    }

    /// A description with only contours and zones.
    pub fn unshaded(contours: BTreeSet<AbstractCurve>, zones: BTreeSet<Zone>) -> Self {
        Self::new(contours, zones, BTreeSet::new(), Vec::new())
    }

    /// Build a description, rejecting inconsistent input.
    pub fn try_new(
        contours: BTreeSet<AbstractCurve>,
        zones: BTreeSet<Zone>,
        shaded_zones: BTreeSet<Zone>,
        spiders: Vec<AbstractSpider>,
    ) -> DiagramResult<Self> {
        let description = Self::new(contours, zones, shaded_zones, spiders);
        description.check()?;
        Ok(description)
    }

    /// Verify every structural invariant of a description.
    pub fn check(&self) -> DiagramResult<()> {
        if !self.zones.iter().any(Zone::is_outside) {
            return Err(DiagramError::validation_error(
                "the outside zone is missing",
            ));
        }
        for zone in &self.zones {
            if let Some(curve) = zone.curves().find(|c| !self.contours.contains(*c)) {
                return Err(DiagramError::validation_error(format!(
                    "zone {} uses curve '{}' which is not a contour",
                    zone, curve
                )));
            }
        }
        if let Some(zone) = self.shaded_zones.iter().find(|z| !self.zones.contains(*z)) {
            return Err(DiagramError::validation_error(format!(
                "shaded zone {} is not a zone of the diagram",
                zone
            )));
        }
        for spider in &self.spiders {
            if spider.foot_count() == 0 {
                return Err(DiagramError::validation_error(format!(
                    "spider {} has an empty habitat",
                    spider.label().unwrap_or("<unnamed>")
                )));
            }
            if let Some(zone) = spider.habitat().find(|z| !self.zones.contains(*z)) {
                return Err(DiagramError::validation_error(format!(
                    "spider {} lives in zone {} which is not a zone of the diagram",
                    spider.label().unwrap_or("<unnamed>"),
                    zone
                )));
            }
        }
        Ok(())
    }

    pub fn contours(&self) -> impl Iterator<Item = &AbstractCurve> {
        self.contours.iter()
    }

    pub fn contour_set(&self) -> &BTreeSet<AbstractCurve> {
        &self.contours
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn zone_set(&self) -> &BTreeSet<Zone> {
        &self.zones
    }

    pub fn shaded_zones(&self) -> impl Iterator<Item = &Zone> {
        self.shaded_zones.iter()
    }

    pub fn spiders(&self) -> &[AbstractSpider] {
        &self.spiders
    }

    pub fn num_contours(&self) -> usize {
        self.contours.len()
    }

    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    pub fn has_zone(&self, zone: &Zone) -> bool {
        self.zones.contains(zone)
    }

    pub fn has_shaded_zone(&self, zone: &Zone) -> bool {
        self.shaded_zones.contains(zone)
    }

    /// Zones lying inside `curve`.
    pub fn zones_inside<'a>(&'a self, curve: &'a AbstractCurve) -> impl Iterator<Item = &'a Zone> {
        self.zones.iter().filter(move |z| z.contains(curve))
    }

    /// First zone (in zone order) with the same labels as `zone`.
    pub fn label_equivalent_zone(&self, zone: &Zone) -> Option<&Zone> {
        self.zones.iter().find(|z| z.is_label_equivalent(zone))
    }

    pub fn includes_label(&self, label: &CurveLabel) -> bool {
        self.contours.iter().any(|c| c.label() == Some(label))
    }

    /// Same labelled contours and label-equivalent zones, ignoring ids.
    pub fn is_structurally_equal(&self, other: &AbstractDescription) -> bool {
        let mut mine: Vec<&str> = self.contours.iter().map(AbstractCurve::label_str).collect();
        let mut theirs: Vec<&str> = other.contours.iter().map(AbstractCurve::label_str).collect();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
            && self.zones.len() == other.zones.len()
            && self
                .zones
                .iter()
                .all(|z| other.label_equivalent_zone(z).is_some())
    }

    /// Order-sensitive weighted sum over contours and the zones inside each.
    pub fn checksum(&self) -> f64 {
        let mut scaling = 2.1;
        let mut result = 0.0;
        for curve in &self.contours {
            result += curve.checksum() * scaling;
            scaling += 0.07;
            scaling += 0.05;
            for zone in self.zones_inside(curve) {
                result += zone.checksum() * scaling;
                scaling += 0.09;
            }
        }
        result
    }

    /// Compact listing of the zones, e.g. `0,a,b,ab`.
    pub fn to_sentence(&self) -> String {
        self.zones
            .iter()
            .map(Zone::label_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
