//! Spider geometry: feet joined by legs

use serde::Serialize;

/// A point marking one zone of a spider's habitat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcreteSpiderFoot {
    pub x: f64,
    pub y: f64,
}

impl ConcreteSpiderFoot {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ConcreteSpiderFoot) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A straight leg between two feet of the same spider, by foot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConcreteSpiderLeg {
    pub from: usize,
    pub to: usize,
}

impl ConcreteSpiderLeg {
    pub fn touches(&self, foot: usize) -> bool {
        self.from == foot || self.to == foot
    }
}

/// Feet of one spider in star topology around the body foot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcreteSpider {
    pub label: Option<String>,
    pub feet: Vec<ConcreteSpiderFoot>,
    pub legs: Vec<ConcreteSpiderLeg>,
    /// Index of the foot every leg starts from.
    pub body: Option<usize>,
}

impl ConcreteSpider {
    /// Join `feet` to the foot with the smallest summed distance to the
    /// others. The earliest foot wins ties.
    pub fn star(label: Option<String>, feet: Vec<ConcreteSpiderFoot>) -> Self {
        let mut body = None;
        let mut best = f64::MAX;
        for (i, candidate) in feet.iter().enumerate() {
            let sum: f64 = feet
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| candidate.distance_to(other))
                .sum();
            if sum < best {
                best = sum;
                body = Some(i);
            }
        }
        let legs = match body {
            Some(b) => (0..feet.len())
                .filter(|&i| i != b)
                .map(|to| ConcreteSpiderLeg { from: b, to })
                .collect(),
            None => Vec::new(),
        };
        Self {
            label,
            feet,
            legs,
            body,
        }
    }

    pub fn leg_ends(&self, leg: &ConcreteSpiderLeg) -> (ConcreteSpiderFoot, ConcreteSpiderFoot) {
        (self.feet[leg.from], self.feet[leg.to])
    }

    pub(crate) fn transform(&mut self, shift: (f64, f64), scale: f64, offset: (f64, f64)) {
        for foot in &mut self.feet {
            foot.x = (foot.x + shift.0) * scale + offset.0;
            foot.y = (foot.y + shift.1) * scale + offset.1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_picks_middle_foot() {
        let feet = vec![
            ConcreteSpiderFoot::new(0.0, 0.0),
            ConcreteSpiderFoot::new(10.0, 0.0),
            ConcreteSpiderFoot::new(25.0, 0.0),
        ];
        let spider = ConcreteSpider::star(None, feet);
        assert_eq!(spider.body, Some(1));
        assert_eq!(spider.legs.len(), 2);
        assert!(spider.legs.iter().all(|l| l.from == 1));
    }

    #[test]
    fn test_single_foot_has_no_legs() {
        let spider = ConcreteSpider::star(Some("s".into()), vec![ConcreteSpiderFoot::new(1.0, 1.0)]);
        assert_eq!(spider.body, Some(0));
        assert!(spider.legs.is_empty());
    }

    #[test]
    fn test_tie_goes_to_first_foot() {
        let feet = vec![
            ConcreteSpiderFoot::new(0.0, 0.0),
            ConcreteSpiderFoot::new(10.0, 0.0),
        ];
        assert_eq!(ConcreteSpider::star(None, feet).body, Some(0));
    }
}
