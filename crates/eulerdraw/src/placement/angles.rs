//! Candidate angles for piercing placement

use std::f64::consts::PI;

/// Sixteenths of a turn in bit-reversed order, so coarse, well-spread
/// directions are probed before finer ones.
const ORDER: [u32; 16] = [0, 8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7, 9, 11, 13, 15];

/// Iterates the 16 probe angles in radians.
#[derive(Debug, Clone, Default)]
pub struct AngleIterator {
    index: usize,
}

impl AngleIterator {
    pub fn new() -> Self {
        Self { index: 0 }
    }
}

impl Iterator for AngleIterator {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let k = *ORDER.get(self.index)?;
        self.index += 1;
        Some(2.0 * PI * f64::from(k) / ORDER.len() as f64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = ORDER.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AngleIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_order() {
        let angles: Vec<f64> = AngleIterator::new().collect();
        assert_eq!(angles.len(), 16);
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - PI).abs() < 1e-12);
        assert!((angles[2] - PI / 2.0).abs() < 1e-12);
        assert!((angles[3] - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_angles_are_distinct() {
        let mut angles: Vec<f64> = AngleIterator::new().collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        angles.dedup();
        assert_eq!(angles.len(), 16);
    }
}
