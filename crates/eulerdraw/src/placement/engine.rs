//! Diagram creation: planning, circle placement, spiders and rescale

use std::fmt;

use tracing::{debug, info, span, trace, Level};

use super::{
    place_contours, place_double_piercing, place_piercing_batch, place_single_piercing,
    place_spiders, NestTarget, PlacementContext,
};
use crate::abstraction::{AbstractCurve, AbstractDescription, DiagramContext};
use crate::concrete::{fit_scale, fit_to_size, ConcreteDiagram, ConcreteZone};
use crate::core::{DiagramError, DiagramResult, LayoutConfig};
use crate::decomposition::{DecompositionStep, Decomposer};
use crate::geometry::{CircleContour, Rect};
use crate::plan::{
    BuildStep, BuildStepMaker, GuideSizeStrategy, SymmetricBuildStepMaker, UniformGuideSizes,
};
use crate::recomposition::{InsertionKind, RecompData, Recomposer, RecompositionStep};

/// Everything decided before any circle is placed.
#[derive(Debug, Clone)]
pub struct DiagramPlan {
    pub decomposition: Vec<DecompositionStep>,
    pub recomposition: Vec<RecompositionStep>,
    pub guides: UniformGuideSizes,
    pub build_steps: Vec<BuildStep>,
}

impl DiagramPlan {
    /// Target of the last recomposition step, if any curve exists.
    pub fn final_diagram(&self) -> Option<&AbstractDescription> {
        self.recomposition.last().map(|step| &step.to)
    }
}

impl fmt::Display for DiagramPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "decomposition:")?;
        for step in &self.decomposition {
            writeln!(f, "  remove {} -> {}", step.removed, step.to.to_sentence())?;
        }
        writeln!(f, "recomposition:")?;
        for step in &self.recomposition {
            let kind = step
                .data
                .kind()
                .map(|k| k.to_string())
                .unwrap_or_else(|_| "invalid".to_string());
            let split: Vec<String> = step.data.split_zones.iter().map(|z| z.label_string()).collect();
            writeln!(
                f,
                "  add {} ({}) splitting [{}] -> {}",
                step.data.added_curve,
                kind,
                split.join(" "),
                step.to.to_sentence()
            )?;
        }
        writeln!(f, "guide sizes:")?;
        for (curve, size) in self.guides.guide_sizes() {
            writeln!(f, "  {}: {:.3}", curve, size)?;
        }
        writeln!(f, "build steps:")?;
        for (index, step) in self.build_steps.iter().enumerate() {
            let curves: Vec<String> = step
                .recomp_data
                .iter()
                .map(|d| d.added_curve.to_string())
                .collect();
            write!(f, "  {}: {}", index + 1, curves.join(", "))?;
            if step.is_batch() {
                write!(f, " (batch)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Lays out abstract descriptions as circles.
///
/// # Example
/// ```
/// use eulerdraw::abstraction::{AbstractDescription, DiagramContext};
/// use eulerdraw::core::LayoutConfig;
/// use eulerdraw::placement::DiagramCreator;
///
/// let mut ctx = DiagramContext::new();
/// let a = ctx.new_curve("a");
/// let outside = ctx.zones.outside();
/// let inside = ctx.zones.with_curve(&outside, &a);
/// let description = AbstractDescription::unshaded(
///     [a].into_iter().collect(),
///     [outside, inside].into_iter().collect(),
/// );
///
/// let creator = DiagramCreator::new(LayoutConfig::default());
/// let diagram = creator.create_diagram(&description, &mut ctx, 100.0).unwrap();
/// assert_eq!(diagram.circles().len(), 1);
/// ```
pub struct DiagramCreator {
    config: LayoutConfig,
    decomposer: Decomposer,
}

impl DiagramCreator {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            decomposer: Decomposer::new(),
        }
    }

    pub fn with_decomposer(mut self, decomposer: Decomposer) -> Self {
        self.decomposer = decomposer;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Decompose, recompose, size and group the curves of `description`.
    pub fn plan(
        &self,
        description: &AbstractDescription,
        ctx: &mut DiagramContext,
    ) -> DiagramResult<DiagramPlan> {
        let decomposition = self.decomposer.decompose(description, &mut ctx.zones);
        let recomposition = Recomposer::new().recompose(&decomposition, &mut ctx.zones)?;
        let guides = UniformGuideSizes::new(recomposition.last().map(|step| &step.to));
        let build_steps = SymmetricBuildStepMaker.make(&recomposition, &guides);
        debug!(
            decomposition = decomposition.len(),
            build_steps = build_steps.len(),
            "Planned diagram"
        );
        Ok(DiagramPlan {
            decomposition,
            recomposition,
            guides,
            build_steps,
        })
    }

    /// Lay out `description` in a square of edge `size`.
    ///
    /// Fails with [`DiagramError::CannotDraw`] when some curve or spider
    /// foot has no valid placement.
    pub fn create_diagram(
        &self,
        description: &AbstractDescription,
        ctx: &mut DiagramContext,
        size: f64,
    ) -> DiagramResult<ConcreteDiagram> {
        let create_span = span!(
            Level::INFO,
            "create_diagram",
            contours = description.num_contours(),
            zones = description.num_zones(),
            size
        );
        let _enter = create_span.enter();

        let plan = self.plan(description, ctx)?;
        let last_diagram = plan.final_diagram().unwrap_or(description);

        let mut placement = PlacementContext::new(&self.config);
        let placer = Placer {
            config: &self.config,
            plan: &plan,
            last_diagram,
        };
        placer.place_circles(&mut placement)?;

        let fallback = placement.outer_box();
        let scale = fit_scale(placement.circles(), size, fallback);
        let mut spiders =
            place_spiders(&placement, &self.config, description, last_diagram, scale)?;
        fit_to_size(placement.circles_mut(), &mut spiders, size, fallback);

        let mut shaded = Vec::new();
        let mut unshaded = Vec::new();
        for zone in last_diagram.zones() {
            let mut including = Vec::with_capacity(zone.len());
            for curve in zone.curves() {
                including.push(placement.require_circle(curve)?.clone());
            }
            let excluding: Vec<CircleContour> = placement
                .circles()
                .iter()
                .filter(|c| c.curve.as_ref().map_or(true, |curve| !zone.contains(curve)))
                .cloned()
                .collect();
            let concrete = ConcreteZone::new(zone.clone(), including, excluding);
            match description.label_equivalent_zone(zone) {
                Some(requested) if !description.has_shaded_zone(requested) => {
                    unshaded.push(concrete)
                }
                _ => shaded.push(concrete),
            }
        }

        let diagram = ConcreteDiagram::new(
            size,
            placement.into_circles(),
            shaded,
            unshaded,
            spiders,
            self.config.circle_segments,
        );
        info!(
            circles = diagram.circles().len(),
            shaded = diagram.shaded_zones().len(),
            spiders = diagram.spiders().len(),
            checksum = diagram.checksum(),
            "Diagram created"
        );
        Ok(diagram)
    }
}

impl Default for DiagramCreator {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// Consumes the build steps of one plan.
struct Placer<'a> {
    config: &'a LayoutConfig,
    plan: &'a DiagramPlan,
    last_diagram: &'a AbstractDescription,
}

impl Placer<'_> {
    fn guide(&self, curve: &AbstractCurve) -> DiagramResult<f64> {
        self.plan.guides.curve_guide_size(curve).ok_or_else(|| {
            DiagramError::invariant_violation(format!("no guide size for curve {}", curve))
        })
    }

    fn place_circles(&self, ctx: &mut PlacementContext) -> DiagramResult<()> {
        let s = self.config.smallest_radius;
        let steps = &self.plan.build_steps;
        for (index, step) in steps.iter().enumerate() {
            let step_span = span!(
                Level::DEBUG,
                "build_step",
                index,
                circles = step.recomp_data.len()
            );
            let _enter = step_span.enter();

            let outer = ctx.outer_box();
            if step.is_batch() && self.place_batch(ctx, &outer, step)? {
                continue;
            }

            for data in &step.recomp_data {
                let circle = match data.kind()? {
                    InsertionKind::Nested => {
                        self.place_nested(ctx, &outer, data, &steps[index + 1..])?
                    }
                    InsertionKind::SinglePiercing => {
                        place_single_piercing(ctx, s, &self.plan.guides, &outer, data)?
                    }
                    InsertionKind::DoublePiercing => {
                        place_double_piercing(ctx, s, &self.plan.guides, &outer, data)?
                    }
                };
                ctx.add_circle(circle);
            }
        }
        Ok(())
    }

    /// Place a whole batch at once. Returns `false` when the circles must
    /// be placed one at a time instead.
    fn place_batch(
        &self,
        ctx: &mut PlacementContext,
        outer: &Rect,
        step: &BuildStep,
    ) -> DiagramResult<bool> {
        let s = self.config.smallest_radius;
        let first = step.first();
        let circles = match first.kind()? {
            InsertionKind::Nested => {
                let curves: Vec<Option<AbstractCurve>> = step
                    .recomp_data
                    .iter()
                    .map(|d| Some(d.added_curve.clone()))
                    .collect();
                let target = NestTarget {
                    zone: &first.split_zones[0],
                    last_diagram: self.last_diagram,
                    curves: &curves,
                    guide: self.guide(&first.added_curve)?,
                };
                match place_contours(ctx, s, outer, &target) {
                    Ok(circles) => circles,
                    Err(e) if e.is_drawing_failure() => {
                        debug!(error = %e, "Batched nesting failed, placing curves one at a time");
                        return Ok(false);
                    }
                    Err(e) => return Err(e),
                }
            }
            InsertionKind::SinglePiercing => {
                match place_piercing_batch(ctx, s, &self.plan.guides, outer, step)? {
                    Some(circles) => circles,
                    None => return Ok(false),
                }
            }
            InsertionKind::DoublePiercing => return Ok(false),
        };
        for circle in circles {
            ctx.add_circle(circle);
        }
        Ok(true)
    }

    fn place_nested(
        &self,
        ctx: &PlacementContext,
        outer: &Rect,
        data: &RecompData,
        later: &[BuildStep],
    ) -> DiagramResult<CircleContour> {
        let zone = &data.split_zones[0];
        let curves = [Some(data.added_curve.clone())];
        let target = NestTarget {
            zone,
            last_diagram: self.last_diagram,
            curves: &curves,
            guide: self.guide(&data.added_curve)?,
        };
        let circle = place_contours(ctx, self.config.smallest_radius, outer, &target)?
            .into_iter()
            .next()
            .ok_or_else(|| DiagramError::cannot_draw("cannot place nested contour"))?;

        let will_be_pierced = later
            .iter()
            .any(|step| step.first().pierced_curve().as_ref() == Some(&data.added_curve));
        if zone.is_outside() || !will_be_pierced {
            return Ok(circle);
        }

        // Leave room beside the circle for the coming piercing.
        let area = ctx.zone_area(zone, outer)?;
        let r = circle.radius;
        let shifted = circle.moved(circle.cx - 0.5 * r, circle.cy, r);
        if ctx.circle_in_area(&shifted, &area) {
            return Ok(shifted);
        }
        let shrunk = circle.moved(circle.cx - 0.25 * r, circle.cy, 0.75 * r);
        if ctx.circle_in_area(&shrunk, &area) {
            return Ok(shrunk);
        }
        trace!(curve = %data.added_curve, "No room to nudge before piercing");
        Ok(circle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::Zone;

    fn diagram(ctx: &mut DiagramContext, labels: &[&str], zones: &[&str]) -> AbstractDescription {
        let curves: Vec<AbstractCurve> = labels.iter().map(|l| ctx.new_curve(l)).collect();
        let zone_set = zones
            .iter()
            .map(|word| {
                let set = curves
                    .iter()
                    .filter(|c| word.contains(c.label_str()))
                    .cloned()
                    .collect();
                ctx.zones.intern(set)
            })
            .collect();
        AbstractDescription::unshaded(curves.into_iter().collect(), zone_set)
    }

    fn zone_labels(zones: &[ConcreteZone]) -> Vec<String> {
        zones.iter().map(|z| z.zone().label_string()).collect()
    }

    #[test]
    fn test_single_curve() {
        let mut ctx = DiagramContext::new();
        let d = diagram(&mut ctx, &["a"], &["", "a"]);
        let result = DiagramCreator::default()
            .create_diagram(&d, &mut ctx, 100.0)
            .unwrap();
        assert_eq!(result.circles().len(), 1);
        let c = &result.circles()[0];
        assert!((c.cx - 50.0).abs() < 1e-9);
        assert!((c.radius - 47.5).abs() < 1e-9);
        assert!(result.shaded_zones().is_empty());
        assert_eq!(result.unshaded_zones().len(), 2);
    }

    #[test]
    fn test_venn2_circles_intersect() {
        let mut ctx = DiagramContext::new();
        let d = diagram(&mut ctx, &["a", "b"], &["", "a", "b", "ab"]);
        let result = DiagramCreator::default()
            .create_diagram(&d, &mut ctx, 200.0)
            .unwrap();
        let a = result.circle_for_label("a").unwrap();
        let b = result.circle_for_label("b").unwrap();
        assert!((a.radius - b.radius).abs() < 1e-9);
        let dist = ((a.cx - b.cx).powi(2) + (a.cy - b.cy).powi(2)).sqrt();
        assert!(dist < a.radius + b.radius);
        assert!(dist > 0.0);
        for zone in result.unshaded_zones() {
            assert!(!result.zone_shape(zone).is_empty(), "zone {} is empty", zone.zone());
        }
    }

    #[test]
    fn test_shaded_and_extra_zones() {
        let mut ctx = DiagramContext::new();
        let a = ctx.new_curve("a");
        let outside = ctx.zones.outside();
        let za: Zone = ctx.zones.with_curve(&outside, &a);
        let d = AbstractDescription::new(
            [a].into_iter().collect(),
            [outside, za.clone()].into_iter().collect(),
            [za].into_iter().collect(),
            Vec::new(),
        );
        let result = DiagramCreator::default()
            .create_diagram(&d, &mut ctx, 100.0)
            .unwrap();
        assert_eq!(zone_labels(result.shaded_zones()), vec!["a".to_string()]);
        assert_eq!(zone_labels(result.unshaded_zones()), vec!["0".to_string()]);
    }

    #[test]
    fn test_plan_display() {
        let mut ctx = DiagramContext::new();
        let d = diagram(&mut ctx, &["a", "b"], &["", "a", "b", "ab"]);
        let plan = DiagramCreator::default().plan(&d, &mut ctx).unwrap();
        let text = plan.to_string();
        assert!(text.contains("decomposition:"));
        assert!(text.contains("1-piercing"));
        assert!(text.contains("build steps:"));
        assert_eq!(plan.build_steps.len(), 2);
    }

    #[test]
    fn test_empty_diagram_has_no_circles() {
        let mut ctx = DiagramContext::new();
        let d = diagram(&mut ctx, &[], &[""]);
        let result = DiagramCreator::default()
            .create_diagram(&d, &mut ctx, 100.0)
            .unwrap();
        assert!(result.circles().is_empty());
        assert_eq!(result.unshaded_zones().len(), 1);
    }
}
