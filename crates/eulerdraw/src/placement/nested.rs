//! Nesting: placing circles wholly inside one zone
//!
//! Tried in order: first contours in an empty diagram, a row or column
//! outside everything, a circle concentric with (or between) the zone's
//! neighbouring curves, and finally a grid search for the largest square
//! of interior points.

use tracing::{debug, trace};

use super::PlacementContext;
use crate::abstraction::{AbstractCurve, AbstractDescription, Zone};
use crate::core::{DiagramError, DiagramResult};
use crate::geometry::{Area, CircleContour, Rect};

/// What to nest and where.
#[derive(Debug, Clone, Copy)]
pub struct NestTarget<'a> {
    /// Zone of the diagram being built that receives the circles.
    pub zone: &'a Zone,
    /// Final diagram of the recomposition, used to find neighbours.
    pub last_diagram: &'a AbstractDescription,
    /// One entry per circle; `None` for spider feet.
    pub curves: &'a [Option<AbstractCurve>],
    pub guide: f64,
}

/// Choose one circle per entry of `target.curves`, all inside `target.zone`.
pub fn place_contours(
    ctx: &PlacementContext,
    smallest_radius: f64,
    outer: &Rect,
    target: &NestTarget<'_>,
) -> DiagramResult<Vec<CircleContour>> {
    let n = target.curves.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let g = target.guide;

    if ctx.is_empty() {
        let start = outer.center_x() - 0.5 * 3.0 * g * n as f64 + 1.5 * g;
        return Ok(target
            .curves
            .iter()
            .enumerate()
            .map(|(i, curve)| {
                CircleContour::new(start + 3.0 * g * i as f64, outer.center_y(), g, curve.clone())
            })
            .collect());
    }

    if target.zone.is_outside() {
        let bounds = ctx.bounds().unwrap_or(*outer);
        return Ok(outside_layout(&bounds, g, target.curves));
    }

    let area = ctx.zone_area(target.zone, outer)?;
    if area.is_empty() {
        return Err(DiagramError::cannot_draw(
            "cannot put a nested contour into an empty region",
        ));
    }

    if n == 1 {
        if let Some(circle) = fit_between_neighbours(ctx, smallest_radius, &area, target)? {
            return Ok(vec![circle]);
        }
    }

    grid_search(ctx, smallest_radius, &area, target)
}

/// Curves outside everything extend the diagram along its shorter side.
fn outside_layout(bounds: &Rect, g: f64, curves: &[Option<AbstractCurve>]) -> Vec<CircleContour> {
    let mid_x = bounds.center_x();
    let mid_y = bounds.center_y();
    let right = bounds.width() < bounds.height();
    let n = curves.len();
    let circle = |x: f64, y: f64, i: usize| CircleContour::new(x, y, g, curves[i].clone());

    match (n, right) {
        (1, true) => vec![circle(bounds.max_x + 1.5 * g, mid_y, 0)],
        (1, false) => vec![circle(mid_x, bounds.max_y + 1.5 * g, 0)],
        (2, true) => vec![
            circle(bounds.max_x + 1.5 * g, mid_y, 0),
            circle(bounds.min_x - 1.5 * g, mid_y, 1),
        ],
        (2, false) => vec![
            circle(mid_x, bounds.max_y + 1.5 * g, 0),
            circle(mid_x, bounds.min_y - 1.5 * g, 1),
        ],
        (_, true) => {
            let low_y = mid_y - 0.5 * n as f64 * 3.0 * g + 1.5 * g;
            (0..n)
                .map(|i| circle(bounds.max_x + 1.5 * g, low_y + 3.0 * g * i as f64, i))
                .collect()
        }
        (_, false) => {
            let low_x = mid_x - 0.5 * n as f64 * 3.0 * g + 1.5 * g;
            (0..n)
                .map(|i| circle(low_x + 3.0 * g * i as f64, bounds.max_y + 1.5 * g, i))
                .collect()
        }
    }
}

/// Single circle sized from the curves bordering the zone: concentric
/// with one neighbour, or centred between two.
fn fit_between_neighbours(
    ctx: &PlacementContext,
    s: f64,
    area: &Area,
    target: &NestTarget<'_>,
) -> DiagramResult<Option<CircleContour>> {
    let curve = &target.curves[0];
    let zone_in_last = target
        .last_diagram
        .label_equivalent_zone(target.zone)
        .ok_or_else(|| {
            DiagramError::invariant_violation(format!(
                "zone {} has no counterpart in the final diagram",
                target.zone
            ))
        })?;

    let neighbours: Vec<AbstractCurve> = target
        .last_diagram
        .zones()
        .filter_map(|z| zone_in_last.straddled_curve(z))
        .filter(|c| match curve {
            Some(added) => !c.is_label_equivalent(added),
            None => true,
        })
        .collect();

    match neighbours.as_slice() {
        [only] => {
            let container = match ctx.circle_for(only) {
                Some(c) => c,
                None => return Ok(None),
            };
            let rad = target.guide.min(container.radius - s);
            if rad <= 0.99 * s {
                return Ok(None);
            }
            let attempt = CircleContour::new(container.cx, container.cy, rad, curve.clone());
            if !ctx.circle_in_area(&attempt, area) {
                trace!(radius = rad, "Concentric candidate rejected");
                return Ok(None);
            }
            let rad = if rad > 2.0 * s { rad - s } else { rad };
            debug!(neighbour = %only, radius = rad, "Nested concentrically");
            Ok(Some(attempt.moved(container.cx, container.cy, rad)))
        }
        [first, second] => {
            let (c1, c2) = match (ctx.circle_for(first), ctx.circle_for(second)) {
                (Some(c1), Some(c2)) => (c1, c2),
                _ => return Ok(None),
            };
            let in1 = target.zone.contains(first);
            let in2 = target.zone.contains(second);

            let (dx, dy) = (c2.cx - c1.cx, c2.cy - c1.cy);
            let len = (dx * dx + dy * dy).sqrt();
            let (ux, uy) = if len != 0.0 {
                (dx / len, dy / len)
            } else {
                (1.0, 0.0)
            };
            let side1 = if in2 { 1.0 } else { -1.0 };
            let side2 = if in1 { -1.0 } else { 1.0 };
            let (p1x, p1y) = (c1.cx + ux * c1.radius * side1, c1.cy + uy * c1.radius * side1);
            let (p2x, p2y) = (c2.cx + ux * c2.radius * side2, c2.cy + uy * c2.radius * side2);
            let (cx, cy) = ((p1x + p2x) * 0.5, (p1y + p2y) * 0.5);
            let max_rad = ((p2x - p1x).powi(2) + (p2y - p1y).powi(2)).sqrt() * 0.5;

            if max_rad - s <= 0.0 {
                return Ok(None);
            }
            let attempt = CircleContour::new(cx, cy, max_rad - s, curve.clone());
            if !ctx.circle_in_area(&attempt, area) {
                trace!(radius = max_rad - s, "Between-neighbours candidate rejected");
                return Ok(None);
            }
            let rad = if max_rad > 3.0 * s {
                max_rad - 2.0 * s
            } else {
                max_rad - s
            };
            debug!(first = %first, second = %second, radius = rad, "Nested between neighbours");
            Ok(Some(attempt.moved(cx, cy, rad)))
        }
        _ => Ok(None),
    }
}

/// Grid of candidate centres over the zone's bounds, spaced one smallest
/// radius apart.
struct CentreGrid {
    ok: Vec<Vec<bool>>,
    base_x: f64,
    base_y: f64,
    spacing: f64,
}

impl CentreGrid {
    fn new(area: &Area, bounds: &Rect, spacing: f64) -> Self {
        let ni = (bounds.width() / spacing) as usize + 1;
        let nj = (bounds.height() / spacing) as usize + 1;
        let ok = (0..ni)
            .map(|i| {
                (0..nj)
                    .map(|j| {
                        area.contains_point(
                            bounds.min_x + i as f64 * spacing,
                            bounds.min_y + j as f64 * spacing,
                        )
                    })
                    .collect()
            })
            .collect();
        Self {
            ok,
            base_x: bounds.min_x,
            base_y: bounds.min_y,
            spacing,
        }
    }

    fn ni(&self) -> usize {
        self.ok.len()
    }

    fn nj(&self) -> usize {
        self.ok.first().map_or(0, Vec::len)
    }

    /// Every point of the inclusive block is inside the zone.
    fn all_ok_in(&self, low_i: usize, high_i: usize, low_j: usize, high_j: usize) -> bool {
        (low_i..=high_i).all(|i| {
            (low_j..=high_j).all(|j| i < self.ni() && j < self.nj() && self.ok[i][j])
        })
    }

    fn point(&self, i: usize, j: usize) -> (f64, f64) {
        (
            self.base_x + i as f64 * self.spacing,
            self.base_y + j as f64 * self.spacing,
        )
    }
}

/// Largest all-inside square found by the grid scan.
#[derive(Debug, Clone, Copy)]
struct Square {
    i: usize,
    j: usize,
    size: usize,
    tall: bool,
}

fn grid_search(
    ctx: &PlacementContext,
    s: f64,
    area: &Area,
    target: &NestTarget<'_>,
) -> DiagramResult<Vec<CircleContour>> {
    let no_fit = || DiagramError::cannot_draw("cannot fit nested contour into region");
    let raw = area.bounds().ok_or_else(no_fit)?;
    let bounds = Rect::from_corners(
        raw.min_x.floor(),
        raw.min_y.floor(),
        raw.max_x.ceil(),
        raw.max_y.ceil(),
    );
    let grid = CentreGrid::new(area, &bounds, s);
    let n = target.curves.len();

    let mut best: Option<Square> = None;
    for i in 0..grid.ni() {
        for j in 0..grid.nj() {
            let max_sq = (grid.ni() - i).min(grid.nj() - j);
            let first = best.map_or(0, |b| b.size + 1);
            for sq in first..=max_sq {
                if grid.all_ok_in(i, i + sq * n + 1, j, j + sq + 1) {
                    best = Some(Square {
                        i,
                        j,
                        size: sq,
                        tall: false,
                    });
                } else if n > 1 && grid.all_ok_in(i, i + sq + 1, j, j + sq * n + 1) {
                    best = Some(Square {
                        i,
                        j,
                        size: sq,
                        tall: true,
                    });
                } else {
                    break;
                }
            }
        }
    }

    let square = match best {
        Some(square) if square.size > 0 => square,
        _ => return Err(no_fit()),
    };
    trace!(?square, "Grid search result");

    let radius = square.size as f64 * s * 0.5;
    let actual = if radius > 2.0 * s {
        radius - s
    } else if radius > s {
        s
    } else {
        radius
    };
    let offset = |k: usize| {
        let step = 2.0 * radius * k as f64;
        if square.tall {
            (0.0, step)
        } else {
            (step, 0.0)
        }
    };

    // Centred on the zone's bounds first.
    let shift = radius * (n as f64 - 1.0);
    let (bx, by) = if square.tall {
        (bounds.center_x(), bounds.center_y() - shift)
    } else {
        (bounds.center_x() - shift, bounds.center_y())
    };
    let centred: Vec<CircleContour> = target
        .curves
        .iter()
        .enumerate()
        .map(|(k, curve)| {
            let (dx, dy) = offset(k);
            CircleContour::new(bx + dx, by + dy, target.guide.min(actual), curve.clone())
        })
        .collect();
    if centred.iter().all(|c| ctx.circle_in_area(c, area)) {
        return Ok(centred);
    }

    // Then anchored on the square's corner.
    let (px, py) = grid.point(square.i, square.j);
    let mut result = Vec::with_capacity(n);
    for (k, curve) in target.curves.iter().enumerate() {
        let (dx, dy) = offset(k);
        let (x, y) = (px + radius + dx, py + radius + dy);
        let roomy = CircleContour::new(x, y, target.guide.min(actual + s), curve.clone());
        if ctx.circle_in_area(&roomy, area) {
            result.push(roomy);
            continue;
        }
        let snug = CircleContour::new(x, y, actual, curve.clone());
        if !ctx.circle_in_area(&snug, area) {
            return Err(no_fit());
        }
        result.push(snug);
    }
    Ok(result)
}
