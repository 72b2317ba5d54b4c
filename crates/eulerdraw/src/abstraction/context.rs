//! Per-run registries bundled together

use super::{AbstractCurve, CurveAllocator, LabelRegistry, ZoneRegistry};

/// Owns the label, curve-id and zone registries for diagram creation.
///
/// Registries are append-only during one run; call [`DiagramContext::reset`]
/// between independent runs to get identical ids and layouts. Not meant to
/// be shared between concurrent runs.
#[derive(Debug, Default)]
pub struct DiagramContext {
    pub labels: LabelRegistry,
    pub curves: CurveAllocator,
    pub zones: ZoneRegistry,
}

impl DiagramContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a labelled curve, interning its label.
    pub fn new_curve(&mut self, label: &str) -> AbstractCurve {
        let label = self.labels.intern(label);
        self.curves.curve(Some(label))
    }

    pub fn reset(&mut self) {
        self.labels.reset();
        self.curves.reset();
        self.zones.reset();
    }
}
