//! Recomposition: replaying a decomposition in reverse
//!
//! Each re-inserted curve is classified by the zones it splits: one zone
//! (nesting), two adjacent zones (single piercing) or a four-zone cluster
//! (double piercing). This stage is pure bookkeeping; nothing is placed.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, span, warn, Level};

use crate::abstraction::{AbstractCurve, AbstractDescription, Zone, ZoneRegistry};
use crate::core::{DiagramError, DiagramResult};
use crate::decomposition::DecompositionStep;

/// How an added curve relates to the zones it splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionKind {
    Nested,
    SinglePiercing,
    DoublePiercing,
}

impl fmt::Display for InsertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertionKind::Nested => write!(f, "nested"),
            InsertionKind::SinglePiercing => write!(f, "1-piercing"),
            InsertionKind::DoublePiercing => write!(f, "2-piercing"),
        }
    }
}

/// One curve insertion: the zones of the previous diagram it divides.
///
/// `split_zones` has length 1, 2 or 4. For 2 the zones differ by the
/// pierced curve; for 4 they are ordered `[m, m+c1, m+c2, m+c1+c2]`.
#[derive(Debug, Clone)]
pub struct RecompData {
    pub added_curve: AbstractCurve,
    pub split_zones: Vec<Zone>,
    /// The zones `split + added_curve` created by the insertion.
    pub new_zones: Vec<Zone>,
}

impl RecompData {
    pub fn kind(&self) -> DiagramResult<InsertionKind> {
        match self.split_zones.len() {
            1 => Ok(InsertionKind::Nested),
            2 => Ok(InsertionKind::SinglePiercing),
            4 => Ok(InsertionKind::DoublePiercing),
            n => Err(DiagramError::invariant_violation(format!(
                "curve {} splits {} zones; expected 1, 2 or 4",
                self.added_curve, n
            ))),
        }
    }

    /// The curve crossed by a single piercing.
    pub fn pierced_curve(&self) -> Option<AbstractCurve> {
        match self.split_zones.as_slice() {
            [z0, z1] => z0.straddled_curve(z1),
            _ => None,
        }
    }
}

/// The reverse of a [`DecompositionStep`].
#[derive(Debug, Clone)]
pub struct RecompositionStep {
    pub from: AbstractDescription,
    pub to: AbstractDescription,
    pub data: RecompData,
}

/// Rebuilds diagrams one curve at a time from a decomposition.
#[derive(Debug, Default, Clone, Copy)]
pub struct Recomposer;

impl Recomposer {
    pub fn new() -> Self {
        Self
    }

    /// Steps come back in reverse decomposition order with
    /// `steps[i].from == steps[i - 1].to`.
    ///
    /// When the zones a curve must split do not form a cluster, the smallest
    /// covering cluster is used instead; the extra zones it creates end up
    /// shaded in the finished diagram. Fails if no such cluster exists.
    pub fn recompose(
        &self,
        decomposition: &[DecompositionStep],
        zones: &mut ZoneRegistry,
    ) -> DiagramResult<Vec<RecompositionStep>> {
        let recompose_span = span!(Level::DEBUG, "recompose", steps = decomposition.len());
        let _enter = recompose_span.enter();

        let mut result: Vec<RecompositionStep> = Vec::with_capacity(decomposition.len());
        for step in decomposition.iter().rev() {
            let from = match result.last() {
                Some(previous) => previous.to.clone(),
                None => step.to.clone(),
            };
            let curve = &step.removed;

            let required: BTreeSet<Zone> = step
                .from
                .zones_inside(curve)
                .map(|z| zones.without_curve(z, curve))
                .collect();
            let split_zones = covering_cluster(&required, &from, zones).ok_or_else(|| {
                DiagramError::cannot_draw(format!(
                    "no zone cluster of the diagram can be split by curve {}",
                    curve
                ))
            })?;
            if split_zones.len() != required.len() {
                warn!(
                    curve = %curve,
                    requested = required.len(),
                    split = split_zones.len(),
                    "Widened split to a cluster; extra zones will be shaded"
                );
            }

            let new_zones: Vec<Zone> = split_zones
                .iter()
                .map(|z| zones.with_curve(z, curve))
                .collect();

            let mut contours = from.contour_set().clone();
            contours.insert(curve.clone());
            let mut all_zones = from.zone_set().clone();
            all_zones.extend(new_zones.iter().cloned());
            let to = AbstractDescription::unshaded(contours, all_zones);

            let data = RecompData {
                added_curve: curve.clone(),
                split_zones,
                new_zones,
            };
            debug!(
                curve = %curve,
                kind = ?data.kind().ok(),
                zones = %to.to_sentence(),
                "Recomposed curve"
            );
            result.push(RecompositionStep { from, to, data });
        }
        Ok(result)
    }
}

/// Smallest cluster of `diagram` zones containing every zone of `required`.
///
/// A cluster is a minimal zone `m` plus every combination of at most two
/// curves `t` outside it, all of which must be zones of `diagram`.
fn covering_cluster(
    required: &BTreeSet<Zone>,
    diagram: &AbstractDescription,
    zones: &mut ZoneRegistry,
) -> Option<Vec<Zone>> {
    let mut iter = required.iter();
    let first = iter.next()?;
    let mut common: BTreeSet<AbstractCurve> = first.curve_set().clone();
    let mut union: BTreeSet<AbstractCurve> = first.curve_set().clone();
    for zone in iter {
        common = common.intersection(zone.curve_set()).cloned().collect();
        union.extend(zone.curves().cloned());
    }
    let extra: Vec<AbstractCurve> = union.difference(&common).cloned().collect();
    let base = zones.intern(common);

    let cluster = match extra.as_slice() {
        [] => vec![base],
        [t] => {
            let with_t = zones.with_curve(&base, t);
            vec![base, with_t]
        }
        [t1, t2] => {
            let with_t1 = zones.with_curve(&base, t1);
            let with_t2 = zones.with_curve(&base, t2);
            let with_both = zones.with_curve(&with_t1, t2);
            vec![base, with_t1, with_t2, with_both]
        }
        _ => return None,
    };
    if cluster.iter().all(|z| diagram.has_zone(z)) {
        Some(cluster)
    } else {
        None
    }
}
