//! Abstract curves and their id allocator

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::CurveLabel;

/// One curve instance of an abstract diagram.
///
/// Identity and ordering follow the id; two curves may share a label.
/// Unlabelled curves stand in for spider feet during placement.
#[derive(Clone)]
pub struct AbstractCurve {
    id: u32,
    label: Option<CurveLabel>,
}

impl AbstractCurve {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn label(&self) -> Option<&CurveLabel> {
        self.label.as_ref()
    }

    pub fn label_str(&self) -> &str {
        self.label.as_ref().map(CurveLabel::as_str).unwrap_or("")
    }

    /// Same label, regardless of identity.
    pub fn is_label_equivalent(&self, other: &AbstractCurve) -> bool {
        self.label == other.label
    }

    pub fn checksum(&self) -> f64 {
        self.label.as_ref().map(CurveLabel::checksum).unwrap_or(0.0)
    }
}

impl PartialEq for AbstractCurve {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AbstractCurve {}

impl PartialOrd for AbstractCurve {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AbstractCurve {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for AbstractCurve {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AbstractCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "#{}", self.id),
        }
    }
}

impl fmt::Debug for AbstractCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.label_str(), self.id)
    }
}

/// Issues monotonically increasing curve ids.
#[derive(Debug)]
pub struct CurveAllocator {
    next_id: u32,
}

impl CurveAllocator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn curve(&mut self, label: Option<CurveLabel>) -> AbstractCurve {
        let id = self.next_id;
        self.next_id += 1;
        AbstractCurve { id, label }
    }

    /// Number of ids handed out since the last reset.
    pub fn issued(&self) -> u32 {
        self.next_id - 1
    }

    pub fn reset(&mut self) {
        self.next_id = 1;
    }
}

impl Default for CurveAllocator {
    fn default() -> Self {
        Self::new()
    }
}
