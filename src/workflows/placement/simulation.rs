//! What-if projection of profile changes across an opportunity corpus.
//!
//! All work happens on normalized copies; the caller's records are never touched.

use std::collections::HashMap;

use super::domain::{
    ChangeKey, ChangeSet, MatchScoreImprovement, Opportunity, OpportunityId, Profile,
    SimulationChange, SimulationResult, Skill, SkillLevel, TimelineEntry, ValidationError,
};
use super::eligibility::{eligible_count, is_eligible};
use super::normalizer::{canonical_opportunity, canonical_profile, skill_key};
use super::ranking::{rank, ChangeAssessment, RankedChange};
use super::scoring::score;

pub const DEFAULT_EFFORT_UNIT: &str = "weeks";
const CERTIFICATION_EFFORT: u32 = 3;

/// Which opportunities get before/after match scores in the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceSelection {
    #[default]
    All,
    Companies(Vec<String>),
    Ids(Vec<OpportunityId>),
}

impl ReferenceSelection {
    /// An empty company list falls back to every opportunity.
    pub fn companies<I, S>(companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let companies: Vec<String> = companies
            .into_iter()
            .map(|company| skill_key(company.as_ref()))
            .filter(|company| !company.is_empty())
            .collect();
        if companies.is_empty() {
            Self::All
        } else {
            Self::Companies(companies)
        }
    }

    pub fn includes(&self, opportunity: &Opportunity) -> bool {
        match self {
            ReferenceSelection::All => true,
            ReferenceSelection::Companies(companies) => {
                let company = skill_key(&opportunity.company);
                companies.iter().any(|candidate| skill_key(candidate) == company)
            }
            ReferenceSelection::Ids(ids) => ids.contains(&opportunity.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    pub effort_unit: String,
    pub reference: ReferenceSelection,
    pub effort_overrides: HashMap<ChangeKey, u32>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            effort_unit: DEFAULT_EFFORT_UNIT.to_string(),
            reference: ReferenceSelection::All,
            effort_overrides: HashMap::new(),
        }
    }
}

impl SimulationOptions {
    pub fn with_effort(mut self, change: &SimulationChange, effort: u32) -> Self {
        self.effort_overrides.insert(change.key(), effort);
        self
    }

    pub fn with_reference(mut self, reference: ReferenceSelection) -> Self {
        self.reference = reference;
        self
    }

    fn effort_for(&self, change: &SimulationChange, baseline: &Profile) -> u32 {
        self.effort_overrides
            .get(&change.key())
            .copied()
            .unwrap_or_else(|| default_effort(change, baseline))
    }
}

/// Heuristic effort when the caller states none.
pub fn default_effort(change: &SimulationChange, baseline: &Profile) -> u32 {
    match change {
        SimulationChange::Skill { level, .. } => match level {
            SkillLevel::Beginner => 2,
            SkillLevel::Intermediate => 4,
            SkillLevel::Advanced => 8,
        },
        SimulationChange::Cgpa { target } => {
            let gap = (target - baseline.cgpa).max(0.0);
            // One unit per tenth of a point; rounding first absorbs float noise like 1.2000000000000002.
            let tenths = (gap * 10.0 * 1_000.0).round() / 1_000.0;
            (tenths.ceil() as u32).max(1)
        }
        SimulationChange::Certification { .. } => CERTIFICATION_EFFORT,
    }
}

/// Apply `changes` to a copy of `profile` and project the effect over `corpus`.
///
/// Only active opportunities take part. An empty change list yields zero deltas.
pub fn simulate(
    profile: &Profile,
    changes: &[SimulationChange],
    corpus: &[Opportunity],
    options: &SimulationOptions,
) -> Result<SimulationResult, ValidationError> {
    let change_set = ChangeSet::from_changes(changes.iter().cloned())?;

    let baseline = canonical_profile(profile);
    let corpus: Vec<Opportunity> = corpus
        .iter()
        .filter(|opportunity| opportunity.is_active())
        .map(canonical_opportunity)
        .collect();

    let current_eligible_count = eligible_count(&baseline, &corpus);
    let simulated = apply_changes(&baseline, change_set.iter());
    let new_eligible_count = eligible_count(&simulated, &corpus);

    let match_score_improvements = corpus
        .iter()
        .filter(|opportunity| options.reference.includes(opportunity))
        .filter_map(|opportunity| {
            let before = score(&baseline, opportunity);
            let after = score(&simulated, opportunity);
            (before != after).then(|| MatchScoreImprovement {
                opportunity_label: opportunity.label(),
                before,
                after,
            })
        })
        .collect();

    let assessments: HashMap<ChangeKey, ChangeAssessment> = change_set
        .iter()
        .map(|change| {
            let assessment = assess_change(&baseline, change, &corpus, options);
            (change.key(), assessment)
        })
        .collect();
    let ranked = rank(change_set.as_slice(), &assessments);

    Ok(SimulationResult {
        current_eligible_count,
        new_eligible_count,
        delta_eligible_count: new_eligible_count as i64 - current_eligible_count as i64,
        match_score_improvements,
        recommended_path: ranked.iter().map(RankedChange::to_step).collect(),
        timeline: build_timeline(&ranked, &options.effort_unit),
        recorded_certifications: change_set.certifications(),
    })
}

/// Clone `profile` and apply each change. Certifications have no modeled effect.
pub fn apply_changes<'a, I>(profile: &Profile, changes: I) -> Profile
where
    I: IntoIterator<Item = &'a SimulationChange>,
{
    let mut simulated = profile.clone();

    for change in changes {
        match change {
            SimulationChange::Skill { name, level } => {
                let key = skill_key(name);
                match simulated.skills.iter_mut().find(|skill| skill.key() == key) {
                    Some(existing) => existing.level = existing.level.max(*level),
                    None => simulated.skills.push(Skill::new(name.trim(), *level)),
                }
            }
            SimulationChange::Cgpa { target } => simulated.cgpa = *target,
            SimulationChange::Certification { .. } => {}
        }
    }

    simulated
}

/// Yield of one change applied in isolation against the baseline.
fn assess_change(
    baseline: &Profile,
    change: &SimulationChange,
    corpus: &[Opportunity],
    options: &SimulationOptions,
) -> ChangeAssessment {
    let changed = apply_changes(baseline, std::iter::once(change));
    let mut immediate_yield = 0;
    let mut long_term_yield = 0;

    for opportunity in corpus {
        let eligible_after = is_eligible(&changed, opportunity);
        let newly_eligible = eligible_after && !is_eligible(baseline, opportunity);
        let score_rose = score(&changed, opportunity) > score(baseline, opportunity);

        if newly_eligible || score_rose {
            long_term_yield += 1;
            if eligible_after {
                immediate_yield += 1;
            }
        }
    }

    ChangeAssessment {
        immediate_yield,
        long_term_yield,
        effort: options.effort_for(change, baseline),
    }
}

/// Lay ranked changes end to end, one timeline entry each.
///
/// `unit` is a regular plural such as `weeks` or `days`. Single-unit entries drop the
/// trailing `s`, so `weeks 3-4` is followed by `week 5`.
pub fn build_timeline(ranked: &[RankedChange], unit: &str) -> Vec<TimelineEntry> {
    let single = singular(unit);
    let mut start: u64 = 1;
    ranked
        .iter()
        .map(|entry| {
            let effort = u64::from(entry.assessment.effort);
            let period = if effort <= 1 {
                format!("{single} {start}")
            } else {
                format!("{unit} {start}-{}", start + effort - 1)
            };
            start += effort.max(1);
            TimelineEntry {
                period,
                action: entry.change.action(),
            }
        })
        .collect()
}

fn singular(unit: &str) -> &str {
    match unit.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem,
        _ => unit,
    }
}
