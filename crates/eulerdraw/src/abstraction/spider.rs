//! Abstract spiders

use std::collections::BTreeSet;

use super::Zone;

/// An element living in the union of its habitat zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractSpider {
    label: Option<String>,
    habitat: BTreeSet<Zone>,
}

impl AbstractSpider {
    pub fn new(label: Option<String>, habitat: BTreeSet<Zone>) -> Self {
        Self { label, habitat }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// One foot per habitat zone, in zone order.
    pub fn habitat(&self) -> impl Iterator<Item = &Zone> {
        self.habitat.iter()
    }

    pub fn foot_count(&self) -> usize {
        self.habitat.len()
    }
}
