//! Spider placement
//!
//! Feet are seated with the nesting search, grouped per spider into a
//! star around the most central foot, then nudged off any leg they sit on.
//!
//! Placement runs in working units before the final rescale, but the foot
//! radius and the collision band are output units: both are divided by the
//! scale the diagram is about to receive.

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, span, trace, warn, Level};

use super::{place_contours, NestTarget, PlacementContext};
use crate::abstraction::{AbstractDescription, Zone};
use crate::concrete::{ConcreteSpider, ConcreteSpiderFoot};
use crate::core::{DiagramError, DiagramResult, LayoutConfig};
use crate::geometry::{CircleContour, Rect};

/// Seat every spider of `description` in the circles of `ctx`.
///
/// `last_diagram` is the diagram the circles realize; habitat zones are
/// matched against it by label. `scale` is the factor the finished
/// diagram will be scaled by.
pub fn place_spiders(
    ctx: &PlacementContext,
    config: &LayoutConfig,
    description: &AbstractDescription,
    last_diagram: &AbstractDescription,
    scale: f64,
) -> DiagramResult<Vec<ConcreteSpider>> {
    if description.spiders().is_empty() {
        return Ok(Vec::new());
    }
    let spider_span = span!(Level::DEBUG, "place_spiders", spiders = description.spiders().len());
    let _enter = spider_span.enter();

    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let foot_radius = config.spider_foot_radius / scale;
    let tolerance = config.spider_tolerance / scale;

    let mut foot_count: BTreeMap<&Zone, usize> = BTreeMap::new();
    for spider in description.spiders() {
        for zone in spider.habitat() {
            *foot_count.entry(zone).or_insert(0) += 1;
        }
    }

    let outer = ctx.outer_box();
    let mut drawn: BTreeMap<&Zone, VecDeque<ConcreteSpiderFoot>> = BTreeMap::new();
    for (zone, count) in foot_count {
        let zone_in_last = last_diagram
            .label_equivalent_zone(zone)
            .ok_or_else(|| DiagramError::cannot_draw("problem with spider habitat"))?;
        let stand_ins = vec![None; count];
        let target = NestTarget {
            zone: zone_in_last,
            last_diagram,
            curves: &stand_ins,
            guide: foot_radius,
        };
        let feet = place_contours(ctx, config.smallest_radius, &outer, &target)?
            .into_iter()
            .map(|c| ConcreteSpiderFoot::new(c.cx, c.cy))
            .collect();
        trace!(zone = %zone, count, "Seated spider feet");
        drawn.insert(zone, feet);
    }

    let mut spiders = Vec::with_capacity(description.spiders().len());
    let mut foot_zones: Vec<Vec<Zone>> = Vec::with_capacity(description.spiders().len());
    for spider in description.spiders() {
        let mut feet = Vec::with_capacity(spider.foot_count());
        let mut zones = Vec::with_capacity(spider.foot_count());
        for zone in spider.habitat() {
            let foot = drawn
                .get_mut(zone)
                .and_then(VecDeque::pop_front)
                .ok_or_else(|| DiagramError::cannot_draw("spider foot problem"))?;
            feet.push(foot);
            let zone_in_last = last_diagram
                .label_equivalent_zone(zone)
                .ok_or_else(|| DiagramError::cannot_draw("problem with spider habitat"))?;
            zones.push(zone_in_last.clone());
        }
        spiders.push(ConcreteSpider::star(
            spider.label().map(str::to_string),
            feet,
        ));
        foot_zones.push(zones);
    }

    resolve_collisions(ctx, config.max_spider_passes, tolerance, &outer, &mut spiders, &foot_zones)?;
    Ok(spiders)
}

/// True when `foot` lies within `tol` of the segment `start`–`end`,
/// strictly between its ends.
pub fn foot_is_on_leg(
    foot: &ConcreteSpiderFoot,
    start: &ConcreteSpiderFoot,
    end: &ConcreteSpiderFoot,
    tol: f64,
) -> bool {
    let (sf_x, sf_y) = (foot.x - start.x, foot.y - start.y);
    let (se_x, se_y) = (end.x - start.x, end.y - start.y);
    let length = (se_x * se_x + se_y * se_y).sqrt();
    if length == 0.0 {
        return false;
    }
    let (ux, uy) = (se_x / length, se_y / length);
    let along = sf_x * ux + sf_y * uy;
    let (proj_x, proj_y) = (along * ux, along * uy);
    let perpendicular = ((sf_x - proj_x).powi(2) + (sf_y - proj_y).powi(2)).sqrt();

    let proportion = if se_x.abs() < 0.001 && se_y.abs() > 0.001 {
        proj_y / se_y
    } else {
        proj_x / se_x
    };
    perpendicular < tol && proportion > 0.0 && proportion < 1.0
}

/// Offsets tried when moving a foot off a leg, `5 · tol` away first.
///
/// The first offset of each round is straight along +y and the other three
/// are diagonals; this fixed order decides where a foot lands and so feeds
/// into layouts and checksums. Rounds at half and quarter distance follow
/// for zones too small to take the full step.
fn nudges(tol: f64) -> Vec<(f64, f64)> {
    [5.0, 2.5, 1.25]
        .iter()
        .flat_map(|k| {
            let d = k * tol;
            [(0.0, d), (-d, -d), (d, -d), (-d, d)]
        })
        .collect()
}

/// Repeat collision passes until one moves nothing, up to the configured
/// cap. On exhaustion the current layout is kept.
fn resolve_collisions(
    ctx: &PlacementContext,
    max_passes: usize,
    tol: f64,
    outer: &Rect,
    spiders: &mut [ConcreteSpider],
    foot_zones: &[Vec<Zone>],
) -> DiagramResult<()> {
    for pass in 0..max_passes {
        if !nudge_one_foot(ctx, tol, outer, spiders, foot_zones)? {
            debug!(passes = pass, "Spider collision check finished");
            return Ok(());
        }
    }
    warn!(
        passes = max_passes,
        "Spider collision passes exhausted, keeping best-effort layout"
    );
    Ok(())
}

/// Move the first foot found lying on a foreign leg. The moved foot must
/// keep a disc of radius `tol / 2` inside its zone. Returns whether a foot
/// moved.
fn nudge_one_foot(
    ctx: &PlacementContext,
    tol: f64,
    outer: &Rect,
    spiders: &mut [ConcreteSpider],
    foot_zones: &[Vec<Zone>],
) -> DiagramResult<bool> {
    for si in 0..spiders.len() {
        for fi in 0..spiders[si].feet.len() {
            for sj in 0..spiders.len() {
                for li in 0..spiders[sj].legs.len() {
                    let leg = spiders[sj].legs[li];
                    if si == sj && leg.touches(fi) {
                        continue;
                    }
                    let (start, end) = spiders[sj].leg_ends(&leg);
                    let foot = spiders[si].feet[fi];
                    if !foot_is_on_leg(&foot, &start, &end, tol) {
                        continue;
                    }

                    let area = ctx.zone_area(&foot_zones[si][fi], outer)?;
                    for (dx, dy) in nudges(tol) {
                        let moved = ConcreteSpiderFoot::new(foot.x + dx, foot.y + dy);
                        let probe = CircleContour::new(moved.x, moved.y, 0.5 * tol, None);
                        if ctx.circle_in_area_with_margin(&probe, &area, 0.0)
                            && !foot_is_on_leg(&moved, &start, &end, tol)
                        {
                            debug!(
                                spider = si,
                                foot = fi,
                                x = moved.x,
                                y = moved.y,
                                "Nudged spider foot off a leg"
                            );
                            spiders[si].feet[fi] = moved;
                            return Ok(true);
                        }
                    }
                    trace!(spider = si, foot = fi, "No nudge clears the leg");
                }
            }
        }
    }
    Ok(false)
}
