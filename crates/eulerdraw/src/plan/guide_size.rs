//! Guide-size estimation
//!
//! Scores every zone of the final diagram and derives a suggested radius
//! for each curve from the share of the total score it contains.

use std::collections::BTreeMap;

use crate::abstraction::{AbstractCurve, AbstractDescription, Zone};

/// Scale of the guide radius formula in working units.
pub const GUIDE_SCALE: f64 = 200.0;

/// Lookup tables consumed by the placement engine.
pub trait GuideSizeStrategy {
    /// Suggested radius for `curve`, if it belongs to the scored diagram.
    fn curve_guide_size(&self, curve: &AbstractCurve) -> Option<f64>;

    /// Heuristic weight of `zone`.
    fn zone_score(&self, zone: &Zone) -> Option<f64>;

    /// All scored zones, in zone order.
    fn scored_zones(&self) -> impl Iterator<Item = &Zone>;
}

/// Every zone scores 1.0; a curve's guide radius is
/// `exp(0.75 · ln(contained / total)) · 200`.
#[derive(Debug, Clone, Default)]
pub struct UniformGuideSizes {
    zone_scores: BTreeMap<Zone, f64>,
    contained_scores: BTreeMap<AbstractCurve, f64>,
    guide_sizes: BTreeMap<AbstractCurve, f64>,
}

impl UniformGuideSizes {
    /// Score the final diagram of a recomposition. `None` (an empty
    /// diagram) yields empty tables.
    pub fn new(final_diagram: Option<&AbstractDescription>) -> Self {
        let mut sizes = Self::default();
        let diagram = match final_diagram {
            Some(diagram) if diagram.num_contours() > 0 => diagram,
            _ => return sizes,
        };

        let mut total = 0.0;
        for zone in diagram.zones() {
            let score = Self::score_zone(zone);
            total += score;
            sizes.zone_scores.insert(zone.clone(), score);
        }

        for curve in diagram.contours() {
            let contained: f64 = diagram
                .zones_inside(curve)
                .filter_map(|z| sizes.zone_scores.get(z))
                .sum();
            sizes.contained_scores.insert(curve.clone(), contained);
            let guide = (0.75 * (contained / total).ln()).exp() * GUIDE_SCALE;
            sizes.guide_sizes.insert(curve.clone(), guide);
        }
        sizes
    }

    fn score_zone(_zone: &Zone) -> f64 {
        1.0
    }

    /// Summed score of the zones inside `curve`.
    pub fn contained_score(&self, curve: &AbstractCurve) -> Option<f64> {
        self.contained_scores.get(curve).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.guide_sizes.is_empty()
    }

    pub fn guide_sizes(&self) -> impl Iterator<Item = (&AbstractCurve, f64)> {
        self.guide_sizes.iter().map(|(c, g)| (c, *g))
    }
}

impl GuideSizeStrategy for UniformGuideSizes {
    fn curve_guide_size(&self, curve: &AbstractCurve) -> Option<f64> {
        self.guide_sizes.get(curve).copied()
    }

    fn zone_score(&self, zone: &Zone) -> Option<f64> {
        self.zone_scores.get(zone).copied()
    }

    fn scored_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zone_scores.keys()
    }
}
