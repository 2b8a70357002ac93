use std::collections::HashMap;

use super::domain::{ChangeKey, RecommendedStep, SimulationChange};

/// What a single change buys on its own, and what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeAssessment {
    pub immediate_yield: usize,
    pub long_term_yield: usize,
    pub effort: u32,
}

impl ChangeAssessment {
    /// Used for changes the caller did not assess: no yield, effort unknown.
    pub const UNASSESSED: Self = Self {
        immediate_yield: 0,
        long_term_yield: 0,
        effort: u32::MAX,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedChange {
    pub change: SimulationChange,
    pub assessment: ChangeAssessment,
}

impl RankedChange {
    pub fn to_step(&self) -> RecommendedStep {
        RecommendedStep {
            action: self.change.action(),
            change: self.change.clone(),
            effort_estimate: self.assessment.effort,
            immediate_yield: self.assessment.immediate_yield,
            long_term_yield: self.assessment.long_term_yield,
        }
    }
}

/// Order changes by immediate yield (descending), then effort (ascending).
///
/// The sort is stable: changes equal on both keys keep their input order.
pub fn rank(
    changes: &[SimulationChange],
    assessments: &HashMap<ChangeKey, ChangeAssessment>,
) -> Vec<RankedChange> {
    let mut ranked: Vec<RankedChange> = changes
        .iter()
        .map(|change| RankedChange {
            change: change.clone(),
            assessment: assessments
                .get(&change.key())
                .copied()
                .unwrap_or(ChangeAssessment::UNASSESSED),
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .assessment
            .immediate_yield
            .cmp(&left.assessment.immediate_yield)
            .then(left.assessment.effort.cmp(&right.assessment.effort))
    });

    ranked
}
