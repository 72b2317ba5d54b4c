//! Piercing: circles that cross one or two existing boundaries

use std::f64::consts::PI;

use tracing::{debug, trace};

use super::{AngleIterator, PlacementContext};
use crate::abstraction::AbstractCurve;
use crate::core::{DiagramError, DiagramResult};
use crate::geometry::{intersect_circles, Area, CircleContour, Rect};
use crate::plan::{BuildStep, GuideSizeStrategy};
use crate::recomposition::RecompData;

/// Largest radius that fits around a fixed centre.
///
/// Takes `suggested` if it fits; otherwise starts at `start` and grows by
/// half again while the circle still fits.
pub fn grow_circle(
    ctx: &PlacementContext,
    area: &Area,
    template: &CircleContour,
    suggested: f64,
    start: f64,
) -> Option<CircleContour> {
    let attempt = template.moved(template.cx, template.cy, suggested);
    if ctx.circle_in_area(&attempt, area) {
        return Some(attempt);
    }
    if start <= 0.0 {
        return None;
    }

    let mut good = None;
    let mut rad = start;
    loop {
        let attempt = template.moved(template.cx, template.cy, rad);
        if !ctx.circle_in_area(&attempt, area) {
            break;
        }
        good = Some(rad);
        rad *= 1.5;
    }
    good.map(|r| template.moved(template.cx, template.cy, r))
}

fn guide_for<G: GuideSizeStrategy>(guides: &G, curve: &AbstractCurve) -> DiagramResult<f64> {
    guides.curve_guide_size(curve).ok_or_else(|| {
        DiagramError::invariant_violation(format!("no guide size for curve {}", curve))
    })
}

/// Distance from the pierced centre at which the new centre sits: moved
/// outwards or inwards towards the side holding more of the new curve's
/// zone score.
fn nudged_ring<G: GuideSizeStrategy>(
    guides: &G,
    added: &AbstractCurve,
    pierced: &AbstractCurve,
    pierced_radius: f64,
    guide: f64,
) -> f64 {
    let (mut inside, mut outside) = (0.0, 0.0);
    for zone in guides.scored_zones().filter(|z| z.contains(added)) {
        let score = guides.zone_score(zone).unwrap_or(0.0);
        if zone.contains(pierced) {
            inside += score;
        } else {
            outside += score;
        }
    }
    trace!(%added, inside, outside, "Piercing zone scores");
    if outside > inside {
        pierced_radius + guide * 0.3
    } else if outside < inside {
        pierced_radius - (guide * 0.3).min((pierced_radius * 2.0 - guide) * 0.5)
    } else {
        pierced_radius
    }
}

fn split_area(
    ctx: &PlacementContext,
    data: &RecompData,
    outer: &Rect,
) -> DiagramResult<Area> {
    ctx.cluster_area(&data.split_zones, outer)
}

/// Place a circle crossing exactly the curve straddled by the two split
/// zones, centred on (or near) that curve's circle.
pub fn place_single_piercing<G: GuideSizeStrategy>(
    ctx: &PlacementContext,
    smallest_radius: f64,
    guides: &G,
    outer: &Rect,
    data: &RecompData,
) -> DiagramResult<CircleContour> {
    let pierced = data.pierced_curve().ok_or_else(|| {
        DiagramError::invariant_violation(format!(
            "split zones of {} do not straddle one curve",
            data.added_curve
        ))
    })?;
    let target = ctx.require_circle(&pierced)?.clone();
    let area = split_area(ctx, data, outer)?;
    let guide = guide_for(guides, &data.added_curve)?;
    let ring = nudged_ring(guides, &data.added_curve, &pierced, target.radius, guide);

    let mut solution: Option<CircleContour> = None;
    for angle in AngleIterator::new() {
        let x = target.cx + angle.cos() * ring;
        let y = target.cy + angle.sin() * ring;
        if !area.contains_point(x, y) {
            trace!(angle, "Piercing centre outside split zones");
            continue;
        }
        let start = solution
            .as_ref()
            .map_or(smallest_radius, |c| c.radius + smallest_radius);
        let template = CircleContour::new(x, y, guide, Some(data.added_curve.clone()));
        if let Some(attempt) = grow_circle(ctx, &area, &template, guide, start) {
            let done = attempt.radius == guide;
            solution = Some(attempt);
            if done {
                break;
            }
        }
    }

    let circle = solution.ok_or_else(|| DiagramError::cannot_draw("1-piercing no fit"))?;
    debug!(curve = %data.added_curve, pierced = %pierced, radius = circle.radius, "Single piercing");
    Ok(circle)
}

/// Place a circle centred on a crossing point of the two curves that the
/// four split zones straddle.
pub fn place_double_piercing<G: GuideSizeStrategy>(
    ctx: &PlacementContext,
    smallest_radius: f64,
    guides: &G,
    outer: &Rect,
    data: &RecompData,
) -> DiagramResult<CircleContour> {
    let zones = &data.split_zones;
    if zones.len() != 4 {
        return Err(DiagramError::invariant_violation(format!(
            "double piercing of {} needs 4 split zones, got {}",
            data.added_curve,
            zones.len()
        )));
    }
    let straddled = |other: usize| {
        zones[0].straddled_curve(&zones[other]).ok_or_else(|| {
            DiagramError::invariant_violation(format!(
                "split zones {} and {} do not straddle one curve",
                zones[0], zones[other]
            ))
        })
    };
    let c1 = straddled(1)?;
    let c2 = straddled(2)?;
    let cc1 = ctx.require_circle(&c1)?;
    let cc2 = ctx.require_circle(&c2)?;

    let crossings = intersect_circles(cc1, cc2).ok_or_else(|| {
        DiagramError::cannot_draw("2-piercing on non-intersecting circles")
    })?;
    let guide = guide_for(guides, &data.added_curve)?;
    let area = split_area(ctx, data, outer)?;

    let (cx, cy) = crossings
        .into_iter()
        .find(|&(x, y)| area.contains_point(x, y))
        .ok_or_else(|| DiagramError::cannot_draw("2-piercing + disjoint"))?;

    let template = CircleContour::new(cx, cy, guide, Some(data.added_curve.clone()));
    let circle = grow_circle(ctx, &area, &template, guide, smallest_radius)
        .ok_or_else(|| DiagramError::cannot_draw("2-piercing no fit"))?;
    debug!(curve = %data.added_curve, first = %c1, second = %c2, radius = circle.radius, "Double piercing");
    Ok(circle)
}

/// Spread every single piercing of `step` evenly around the shared
/// pierced circle. `None` means the batch does not fit as a whole and the
/// circles should be placed one at a time.
pub fn place_piercing_batch<G: GuideSizeStrategy>(
    ctx: &PlacementContext,
    smallest_radius: f64,
    guides: &G,
    outer: &Rect,
    step: &BuildStep,
) -> DiagramResult<Option<Vec<CircleContour>>> {
    let first = step.first();
    let pierced = match first.pierced_curve() {
        Some(curve) => curve,
        None => return Ok(None),
    };
    if step
        .recomp_data
        .iter()
        .any(|d| d.pierced_curve().as_ref() != Some(&pierced))
    {
        return Ok(None);
    }

    let target = ctx.require_circle(&pierced)?.clone();
    let guide = guide_for(guides, &first.added_curve)?;
    let n = step.recomp_data.len();
    // NaN (guide wider than the pierced circle) saturates to zero
    let sample_size = (PI / (guide / target.radius).asin()) as usize;
    if sample_size < n {
        trace!(sample_size, n, "Pierced circle too small for batch");
        return Ok(None);
    }

    let area = split_area(ctx, first, outer)?;
    let ring = nudged_ring(guides, &first.added_curve, &pierced, target.radius, guide);
    let mut candidates = Vec::with_capacity(n);
    for (i, data) in step.recomp_data.iter().enumerate() {
        let angle = i as f64 * 2.0 * PI / n as f64;
        let x = target.cx + angle.cos() * ring;
        let y = target.cy + angle.sin() * ring;
        let candidate = CircleContour::new(x, y, guide, Some(data.added_curve.clone()));
        if !area.contains_point(x, y) || !ctx.circle_in_area(&candidate, &area) {
            trace!(curve = %data.added_curve, angle, "Batch candidate rejected");
            return Ok(None);
        }
        candidates.push(candidate);
    }

    let min_gap = 2.0 * guide + smallest_radius;
    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            if ((a.cx - b.cx).powi(2) + (a.cy - b.cy).powi(2)).sqrt() < min_gap {
                trace!("Batch candidates overlap");
                return Ok(None);
            }
        }
    }
    debug!(pierced = %pierced, count = n, "Placed single piercings as a batch");
    Ok(Some(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::{AbstractDescription, DiagramContext, Zone};
    use crate::core::LayoutConfig;
    use crate::plan::UniformGuideSizes;

    struct Venn2 {
        dc: DiagramContext,
        a: AbstractCurve,
        b: AbstractCurve,
        outside: Zone,
        za: Zone,
        zb: Zone,
        zab: Zone,
        guides: UniformGuideSizes,
    }

    fn venn2() -> Venn2 {
        let mut dc = DiagramContext::new();
        let a = dc.new_curve("a");
        let b = dc.new_curve("b");
        let outside = dc.zones.outside();
        let za = dc.zones.with_curve(&outside, &a);
        let zb = dc.zones.with_curve(&outside, &b);
        let zab = dc.zones.with_curve(&za, &b);
        let d = AbstractDescription::unshaded(
            [a.clone(), b.clone()].into_iter().collect(),
            [outside.clone(), za.clone(), zb.clone(), zab.clone()]
                .into_iter()
                .collect(),
        );
        let guides = UniformGuideSizes::new(Some(&d));
        Venn2 {
            dc,
            a,
            b,
            outside,
            za,
            zb,
            zab,
            guides,
        }
    }

    #[test]
    fn test_grow_circle_prefers_suggested() {
        let ctx = PlacementContext::new(&LayoutConfig::default());
        let area = Area::circle(0.0, 0.0, 100.0, 64);
        let template = CircleContour::new(0.0, 0.0, 1.0, None);
        let grown = grow_circle(&ctx, &area, &template, 50.0, 10.0).unwrap();
        assert_eq!(grown.radius, 50.0);
        let grown = grow_circle(&ctx, &area, &template, 500.0, 10.0).unwrap();
        // 10, 15, 22.5, 33.75, 50.625, 75.9375 (fat 85.9) then 113.9 fails
        assert!((grown.radius - 75.9375).abs() < 1e-9);
        assert!(grow_circle(&ctx, &area, &template, 500.0, 200.0).is_none());
    }

    #[test]
    fn test_single_piercing_crosses_pierced_circle() {
        let v = venn2();
        let config = LayoutConfig::default();
        let mut ctx = PlacementContext::new(&config);
        let g = v.guides.curve_guide_size(&v.a).unwrap();
        ctx.add_circle(CircleContour::new(500.0, 500.0, g, Some(v.a.clone())));
        let data = RecompData {
            added_curve: v.b.clone(),
            split_zones: vec![v.outside.clone(), v.za.clone()],
            new_zones: vec![v.zb.clone(), v.zab.clone()],
        };
        let c = place_single_piercing(&ctx, 10.0, &v.guides, &ctx.outer_box(), &data).unwrap();
        assert_eq!(c.radius, v.guides.curve_guide_size(&v.b).unwrap());
        let d = ((c.cx - 500.0).powi(2) + (c.cy - 500.0).powi(2)).sqrt();
        assert!(d < c.radius + g && d > (c.radius - g).abs());
    }

    #[test]
    fn test_double_piercing_on_disjoint_circles_fails() {
        let mut v = venn2();
        let c = v.dc.new_curve("c");
        let config = LayoutConfig::default();
        let mut ctx = PlacementContext::new(&config);
        ctx.add_circle(CircleContour::new(0.0, 0.0, 50.0, Some(v.a.clone())));
        ctx.add_circle(CircleContour::new(400.0, 0.0, 50.0, Some(v.b.clone())));
        let data = RecompData {
            added_curve: c,
            split_zones: vec![v.outside.clone(), v.za.clone(), v.zb.clone(), v.zab.clone()],
            new_zones: Vec::new(),
        };
        let err = place_double_piercing(&ctx, 10.0, &v.guides, &ctx.outer_box(), &data)
            .unwrap_err();
        assert!(err.is_drawing_failure());
        assert!(err.to_string().contains("non-intersecting circles"));
    }
}
