//! Decomposition of an abstract diagram into single-curve removals
//!
//! Curves are stripped one at a time, cheapest first, until no contour is
//! left. Each removal is recorded as a [`DecompositionStep`].

use std::collections::BTreeSet;

use tracing::{debug, span, trace, Level};

use crate::abstraction::{AbstractCurve, AbstractDescription, Zone, ZoneRegistry};

/// One curve removal: `to` is `from` without `removed`.
#[derive(Debug, Clone)]
pub struct DecompositionStep {
    pub from: AbstractDescription,
    pub removed: AbstractCurve,
    pub to: AbstractDescription,
}

/// Chooses which curve to remove next.
pub trait DecompositionStrategy: Send + Sync {
    /// `None` only when the diagram has no contours.
    fn curve_to_remove(&self, diagram: &AbstractDescription) -> Option<AbstractCurve>;

    fn name(&self) -> &'static str;
}

/// Prefers piercing curves with the fewest zones inside, then any curve
/// with the fewest zones inside. Ties go to the lowest curve id.
#[derive(Debug, Default, Clone, Copy)]
pub struct PiercingStrategy;

impl PiercingStrategy {
    pub fn new() -> Self {
        Self
    }

    /// True when the zones inside `curve` form a 2ⁿ cluster above one
    /// minimal zone, each with a partner differing only by `curve`.
    pub fn is_piercing_curve(curve: &AbstractCurve, diagram: &AbstractDescription) -> bool {
        let inside: Vec<&Zone> = diagram.zones_inside(curve).collect();
        for zone in &inside {
            let has_partner = diagram
                .zones()
                .any(|other| zone.straddled_curve(other).as_ref() == Some(curve));
            if !has_partner {
                return false;
            }
        }

        let power = match power_of_two(inside.len()) {
            Some(power) => power,
            None => return false,
        };

        // Earliest zone with the fewest curves.
        let smallest = match inside.iter().min_by_key(|z| z.len()) {
            Some(zone) => *zone,
            None => return false,
        };
        if !inside
            .iter()
            .all(|z| smallest.curves().all(|c| z.contains(c)))
        {
            return false;
        }

        let mut added = BTreeSet::new();
        for zone in &inside {
            for c in zone.curves() {
                if !smallest.contains(c) {
                    added.insert(c.clone());
                    if added.len() > power {
                        return false;
                    }
                }
            }
        }
        true
    }
}

fn power_of_two(n: usize) -> Option<usize> {
    if n.is_power_of_two() {
        Some(n.trailing_zeros() as usize)
    } else {
        None
    }
}

// min_by_key keeps the first minimum, i.e. the lowest id.
fn fewest_zones_inside<'a>(
    diagram: &AbstractDescription,
    candidates: impl Iterator<Item = &'a AbstractCurve>,
) -> Option<AbstractCurve> {
    candidates
        .min_by_key(|c| diagram.zones_inside(c).count())
        .cloned()
}

impl DecompositionStrategy for PiercingStrategy {
    fn curve_to_remove(&self, diagram: &AbstractDescription) -> Option<AbstractCurve> {
        let piercing = diagram
            .contours()
            .filter(|c| Self::is_piercing_curve(c, diagram));
        fewest_zones_inside(diagram, piercing)
            .or_else(|| fewest_zones_inside(diagram, diagram.contours()))
    }

    fn name(&self) -> &'static str {
        "piercing"
    }
}

/// Strips curves from a diagram down to the empty diagram.
pub struct Decomposer {
    strategy: Box<dyn DecompositionStrategy>,
}

impl Decomposer {
    pub fn new() -> Self {
        Self::with_strategy(Box::new(PiercingStrategy::new()))
    }

    pub fn with_strategy(strategy: Box<dyn DecompositionStrategy>) -> Self {
        Self { strategy }
    }

    /// Intermediate diagrams carry no shading and no spiders.
    pub fn decompose(
        &self,
        diagram: &AbstractDescription,
        zones: &mut ZoneRegistry,
    ) -> Vec<DecompositionStep> {
        let decompose_span = span!(
            Level::DEBUG,
            "decompose",
            strategy = self.strategy.name(),
            contours = diagram.num_contours()
        );
        let _enter = decompose_span.enter();

        let mut steps = Vec::with_capacity(diagram.num_contours());
        let mut current = diagram.clone();
        while let Some(removed) = self.strategy.curve_to_remove(&current) {
            let to = remove_curve(&current, &removed, zones);
            debug!(
                removed = %removed,
                remaining = to.num_contours(),
                zones = %to.to_sentence(),
                "Removed curve"
            );
            steps.push(DecompositionStep {
                from: current,
                removed,
                to: to.clone(),
            });
            current = to;
        }
        trace!(steps = steps.len(), "Decomposition finished");
        steps
    }
}

impl Default for Decomposer {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_curve(
    diagram: &AbstractDescription,
    curve: &AbstractCurve,
    zones: &mut ZoneRegistry,
) -> AbstractDescription {
    let contours = diagram
        .contours()
        .filter(|c| *c != curve)
        .cloned()
        .collect();
    let remaining = diagram
        .zones()
        .map(|z| zones.without_curve(z, curve))
        .collect();
    AbstractDescription::unshaded(contours, remaining)
}
