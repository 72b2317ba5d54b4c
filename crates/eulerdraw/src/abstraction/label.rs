//! Interned curve labels

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An interned curve name.
///
/// Labels obtained from the same [`LabelRegistry`] share storage, so
/// equal labels are also the same allocation.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurveLabel(Arc<str>);

impl CurveLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when both labels share one interned allocation.
    pub fn ptr_eq(&self, other: &CurveLabel) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Order-sensitive fingerprint of the label text.
    pub fn checksum(&self) -> f64 {
        let mut scaling = 1.1;
        let mut result = 0.0;
        for ch in self.0.chars() {
            result += f64::from(u32::from(ch)) * scaling;
            scaling += 0.01;
        }
        result
    }
}

impl fmt::Display for CurveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CurveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

/// Canonicalizes label strings for one diagram-creation run.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    labels: BTreeMap<String, CurveLabel>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared label for `name`, creating it on first use.
    pub fn intern(&mut self, name: &str) -> CurveLabel {
        if let Some(label) = self.labels.get(name) {
            return label.clone();
        }
        let label = CurveLabel(Arc::from(name));
        self.labels.insert(name.to_string(), label.clone());
        label
    }

    pub fn get(&self, name: &str) -> Option<&CurveLabel> {
        self.labels.get(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn reset(&mut self) {
        self.labels.clear();
    }
}
