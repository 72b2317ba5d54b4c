//! Zones: canonical sets of curves

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{AbstractCurve, CurveLabel};

/// A basic region of the diagram, identified by the curves containing it.
///
/// Zones handed out by one [`ZoneRegistry`] are canonical: structurally
/// equal zones share one allocation. The empty zone is the outside.
#[derive(Clone)]
pub struct Zone(Arc<BTreeSet<AbstractCurve>>);

impl Zone {
    pub fn curves(&self) -> impl Iterator<Item = &AbstractCurve> {
        self.0.iter()
    }

    pub fn curve_set(&self) -> &BTreeSet<AbstractCurve> {
        &self.0
    }

    /// Number of curves containing this zone.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_outside(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, curve: &AbstractCurve) -> bool {
        self.0.contains(curve)
    }

    /// The single curve by which `self` and `other` differ, if exactly one.
    pub fn straddled_curve(&self, other: &Zone) -> Option<AbstractCurve> {
        let mut difference = self.0.symmetric_difference(&other.0);
        match (difference.next(), difference.next()) {
            (Some(curve), None) => Some(curve.clone()),
            _ => None,
        }
    }

    /// Same multiset of labels, regardless of curve identity.
    pub fn is_label_equivalent(&self, other: &Zone) -> bool {
        self.len() == other.len() && self.labels() == other.labels()
    }

    fn labels(&self) -> Vec<Option<&CurveLabel>> {
        let mut labels: Vec<_> = self.0.iter().map(AbstractCurve::label).collect();
        labels.sort();
        labels
    }

    pub fn checksum(&self) -> f64 {
        let mut scaling = 1.07;
        let mut result = 0.0;
        for curve in self.0.iter() {
            result += curve.checksum() * scaling;
            scaling += 0.05;
        }
        result
    }

    /// Labels concatenated in curve order, "0" for the outside zone.
    pub fn label_string(&self) -> String {
        if self.is_outside() {
            return "0".to_string();
        }
        self.0.iter().map(|c| c.label_str().to_string()).collect()
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Zone {}

impl PartialOrd for Zone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Zone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.0.iter().cmp(other.0.iter()))
    }
}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for curve in self.0.iter() {
            curve.hash(state);
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label_string())
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

/// Canonicalizes zones by their curve sets.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: std::collections::BTreeMap<BTreeSet<AbstractCurve>, Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, curves: BTreeSet<AbstractCurve>) -> Zone {
        if let Some(zone) = self.zones.get(&curves) {
            return zone.clone();
        }
        let zone = Zone(Arc::new(curves.clone()));
        self.zones.insert(curves, zone.clone());
        zone
    }

    pub fn outside(&mut self) -> Zone {
        self.intern(BTreeSet::new())
    }

    /// The zone `zone ∪ {curve}`.
    pub fn with_curve(&mut self, zone: &Zone, curve: &AbstractCurve) -> Zone {
        let mut curves = zone.curve_set().clone();
        curves.insert(curve.clone());
        self.intern(curves)
    }

    /// The zone `zone ∖ {curve}`.
    pub fn without_curve(&mut self, zone: &Zone, curve: &AbstractCurve) -> Zone {
        if !zone.contains(curve) {
            return self.intern(zone.curve_set().clone());
        }
        let mut curves = zone.curve_set().clone();
        curves.remove(curve);
        self.intern(curves)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn reset(&mut self) {
        self.zones.clear();
    }
}
