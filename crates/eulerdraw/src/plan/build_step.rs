//! Build planning: grouping recomposition steps for symmetric placement

use tracing::{debug, span, Level};

use super::GuideSizeStrategy;
use crate::abstraction::Zone;
use crate::recomposition::{RecompData, RecompositionStep};

/// One unit of construction: circles that are placed together.
#[derive(Debug, Clone)]
pub struct BuildStep {
    pub recomp_data: Vec<RecompData>,
}

impl BuildStep {
    pub fn new(data: RecompData) -> Self {
        Self {
            recomp_data: vec![data],
        }
    }

    pub fn first(&self) -> &RecompData {
        &self.recomp_data[0]
    }

    pub fn is_batch(&self) -> bool {
        self.recomp_data.len() > 1
    }
}

/// Turns recomposition steps into an ordered build chain.
pub trait BuildStepMaker {
    fn make<G: GuideSizeStrategy>(
        &self,
        steps: &[RecompositionStep],
        guides: &G,
    ) -> Vec<BuildStep>;
}

/// One build step per recomposition step.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleBuildStepMaker;

impl BuildStepMaker for SimpleBuildStepMaker {
    fn make<G: GuideSizeStrategy>(
        &self,
        steps: &[RecompositionStep],
        _guides: &G,
    ) -> Vec<BuildStep> {
        steps
            .iter()
            .map(|step| BuildStep::new(step.data.clone()))
            .collect()
    }
}

/// Merges later nestings into label-equivalent zones, and later single
/// piercings of label-equivalent zone pairs, into the earlier step when
/// the added curves have the same guide size.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymmetricBuildStepMaker;

impl SymmetricBuildStepMaker {
    fn same_guide<G: GuideSizeStrategy>(guides: &G, a: &RecompData, b: &RecompData) -> bool {
        match (
            guides.curve_guide_size(&a.added_curve),
            guides.curve_guide_size(&b.added_curve),
        ) {
            (Some(x), Some(y)) => x > 0.0 && (x - y).abs() <= f64::EPSILON * x.max(y),
            _ => false,
        }
    }

    fn matches(head: &RecompData, candidate: &RecompData) -> bool {
        match (head.split_zones.as_slice(), candidate.split_zones.as_slice()) {
            ([z], [w]) => z.is_label_equivalent(w),
            ([z1, z2], [w1, w2]) => pair_equivalent(z1, z2, w1, w2),
            _ => false,
        }
    }
}

fn pair_equivalent(z1: &Zone, z2: &Zone, w1: &Zone, w2: &Zone) -> bool {
    (z1.is_label_equivalent(w1) && z2.is_label_equivalent(w2))
        || (z1.is_label_equivalent(w2) && z2.is_label_equivalent(w1))
}

impl BuildStepMaker for SymmetricBuildStepMaker {
    fn make<G: GuideSizeStrategy>(
        &self,
        steps: &[RecompositionStep],
        guides: &G,
    ) -> Vec<BuildStep> {
        let plan_span = span!(Level::DEBUG, "plan_build_steps", steps = steps.len());
        let _enter = plan_span.enter();

        let mut pending: Vec<BuildStep> = SimpleBuildStepMaker.make(steps, guides);
        let mut result = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let mut head = pending.remove(0);
            let mut index = 0;
            while index < pending.len() {
                let candidate = pending[index].first();
                if head.first().split_zones.len() <= 2
                    && Self::matches(head.first(), candidate)
                    && Self::same_guide(guides, head.first(), candidate)
                {
                    let merged = pending.remove(index);
                    debug!(
                        head = %head.first().added_curve,
                        merged = %merged.first().added_curve,
                        "Merged symmetric build step"
                    );
                    head.recomp_data.extend(merged.recomp_data);
                } else {
                    index += 1;
                }
            }
            result.push(head);
        }
        result
    }
}
