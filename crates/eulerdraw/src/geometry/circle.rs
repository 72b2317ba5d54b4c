//! Concrete circles

use std::fmt;

use super::{Area, Rect};
use crate::abstraction::AbstractCurve;

/// Stroke colours, indexed from the first character of a label.
pub const PALETTE: [&str; 10] = [
    "#ff0000", "#00a000", "#0000ff", "#ff00ff", "#00c0c0", "#ffa500", "#808000", "#800080",
    "#008080", "#a52a2a",
];

/// Palette entry for a label: `a` maps to the first colour, `b` the second,
/// and so on, wrapping around. Labels without a base-36 first character
/// still get a colour.
pub fn colour_for_label(label: &str) -> Option<&'static str> {
    let first = label.chars().next()?;
    let digit = first.to_digit(36).map(|d| d as i64).unwrap_or(-1);
    let index = (digit - 10).rem_euclid(PALETTE.len() as i64) as usize;
    Some(PALETTE[index])
}

/// A placed (or candidate) circle.
///
/// `curve` is `None` for stand-ins such as spider feet.
#[derive(Clone, PartialEq)]
pub struct CircleContour {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub curve: Option<AbstractCurve>,
    pub colour: Option<&'static str>,
}

impl CircleContour {
    pub fn new(cx: f64, cy: f64, radius: f64, curve: Option<AbstractCurve>) -> Self {
        Self {
            cx,
            cy,
            radius,
            curve,
            colour: None,
        }
    }

    /// Same curve at a different position or size.
    pub fn moved(&self, cx: f64, cy: f64, radius: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            curve: self.curve.clone(),
            colour: self.colour,
        }
    }

    pub fn label_str(&self) -> &str {
        self.curve.as_ref().map(|c| c.label_str()).unwrap_or("")
    }

    pub fn assign_colour(&mut self) {
        self.colour = colour_for_label(self.label_str());
    }

    pub fn area(&self, segments: usize) -> Area {
        Area::circle(self.cx, self.cy, self.radius, segments)
    }

    /// The circle widened by `margin`, used for containment tests.
    pub fn fat_area(&self, margin: f64, segments: usize) -> Area {
        Area::circle(self.cx, self.cy, self.radius + margin, segments)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(
            self.cx - self.radius,
            self.cy - self.radius,
            self.cx + self.radius,
            self.cy + self.radius,
        )
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy < self.radius * self.radius
    }

    /// Apply `p -> (p + shift) * scale + offset` to the centre and scale
    /// the radius.
    pub fn transform(&mut self, shift: (f64, f64), scale: f64, offset: (f64, f64)) {
        self.cx = (self.cx + shift.0) * scale + offset.0;
        self.cy = (self.cy + shift.1) * scale + offset.1;
        self.radius *= scale;
    }

    /// Weighted fingerprint used by the diagram checksum.
    pub fn checksum(&self) -> f64 {
        let label = self.curve.as_ref().map(|c| c.checksum()).unwrap_or(0.0);
        (0.345 * self.cx + 0.456 * self.cy + 0.567 * self.radius + 0.555 * label) * 1.1
    }
}

impl fmt::Debug for CircleContour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circle({:?} @ {:.3},{:.3} r {:.3})",
            self.curve, self.cx, self.cy, self.radius
        )
    }
}

/// Union of the bounding boxes of `circles`, or `None` when there are none.
pub fn circles_bounds<'a>(circles: impl IntoIterator<Item = &'a CircleContour>) -> Option<Rect> {
    circles.into_iter().fold(None, |acc, c| {
        let b = c.bounds();
        Some(match acc {
            None => b,
            Some(r) => Rect::from_corners(
                r.min_x.min(b.min_x),
                r.min_y.min(b.min_y),
                r.max_x.max(b.max_x),
                r.max_y.max(b.max_y),
            ),
        })
    })
}

/// The two crossing points of two circle boundaries, or `None` when the
/// circles are disjoint or one lies strictly inside the other.
pub fn intersect_circles(c1: &CircleContour, c2: &CircleContour) -> Option<[(f64, f64); 2]> {
    let dx = c2.cx - c1.cx;
    let dy = c2.cy - c1.cy;
    let d = (dx * dx + dy * dy).sqrt();
    let (r1, r2) = (c1.radius, c2.radius);
    if d > r1 + r2 || d < (r1 - r2).abs() || d == 0.0 {
        return None;
    }
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let x2 = c1.cx + a * dx / d;
    let y2 = c1.cy + a * dy / d;
    Some([
        (x2 + h * dy / d, y2 - h * dx / d),
        (x2 - h * dy / d, y2 + h * dx / d),
    ])
}
