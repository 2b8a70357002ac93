//! Eligibility, skill-match, rejection-pattern and what-if simulation engine.
//!
//! Records enter through [`normalizer`] (or [`import`] for files), and every
//! computation afterwards is a pure function of its arguments. There is no notion
//! of a "current user"; callers pass the profile they care about.

mod config;
pub mod domain;
pub mod eligibility;
pub mod explanation;
pub mod import;
pub mod normalizer;
pub mod patterns;
pub mod ranking;
pub mod scoring;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, DEFAULT_TOP_MISSING_SKILLS};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, ChangeKey, ChangeSet, MatchScoreImprovement,
    Opportunity, OpportunityId, OpportunityStatus, PatternAnalysis, Profile, ProfileId,
    ProfileSnapshot, RecommendedStep, RequiredSkill, SimulationChange, SimulationResult, Skill,
    SkillFrequency, SkillLevel, TimelineEntry, ValidationError,
};
pub use explanation::{ExplanationArtifact, ExplanationRequest};
pub use import::ImportError;
pub use ranking::{ChangeAssessment, RankedChange};
pub use scoring::{GapStatus, SkillGap};
pub use simulation::{ReferenceSelection, SimulationOptions};

use normalizer::{canonical_opportunity, canonical_profile};
use serde::Serialize;
use tracing::debug;

/// Stateless facade applying an [`EngineConfig`] to the individual components.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: EngineConfig,
}

/// Per-opportunity view used by the eligibility listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityEvaluation {
    pub opportunity_id: OpportunityId,
    pub label: String,
    pub status: OpportunityStatus,
    pub eligible: bool,
    pub match_score: u8,
    pub weighted_score: u8,
    pub cgpa_shortfall: Option<f64>,
    pub gaps: Vec<SkillGap>,
}

impl PlacementEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, profile: &Profile, corpus: &[Opportunity]) -> Vec<OpportunityEvaluation> {
        let profile = canonical_profile(profile);
        let evaluations: Vec<OpportunityEvaluation> = corpus
            .iter()
            .map(canonical_opportunity)
            .map(|opportunity| OpportunityEvaluation {
                opportunity_id: opportunity.id.clone(),
                label: opportunity.label(),
                status: opportunity.status,
                eligible: eligibility::is_eligible(&profile, &opportunity),
                match_score: scoring::score(&profile, &opportunity),
                weighted_score: scoring::weighted_score(&profile, &opportunity),
                cgpa_shortfall: eligibility::cgpa_shortfall(profile.cgpa, &opportunity),
                gaps: scoring::skill_gaps(&profile.skills, &opportunity),
            })
            .collect();

        debug!(
            opportunities = evaluations.len(),
            eligible = evaluations.iter().filter(|entry| entry.eligible).count(),
            "evaluated opportunity corpus"
        );
        evaluations
    }

    pub fn analyze_rejections(
        &self,
        profile: &Profile,
        applications: &[Application],
    ) -> PatternAnalysis {
        let analysis = patterns::aggregate(profile, applications);
        debug!(
            applications = applications.len(),
            missing_skills = analysis.common_missing_skills.len(),
            cgpa_issues = analysis.cgpa_issues,
            "aggregated rejection patterns"
        );
        analysis
    }

    /// The head of the missing-skill histogram, sized by configuration.
    pub fn top_missing_skills<'a>(&self, analysis: &'a PatternAnalysis) -> &'a [SkillFrequency] {
        analysis.top_missing_skills(self.config.top_missing_skills)
    }

    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            effort_unit: self.config.effort_unit.clone(),
            reference: ReferenceSelection::companies(&self.config.reference_companies),
            ..SimulationOptions::default()
        }
    }

    pub fn simulate(
        &self,
        profile: &Profile,
        changes: &[SimulationChange],
        corpus: &[Opportunity],
    ) -> Result<SimulationResult, ValidationError> {
        self.simulate_with(profile, changes, corpus, &self.simulation_options())
    }

    pub fn simulate_with(
        &self,
        profile: &Profile,
        changes: &[SimulationChange],
        corpus: &[Opportunity],
        options: &SimulationOptions,
    ) -> Result<SimulationResult, ValidationError> {
        let result = simulation::simulate(profile, changes, corpus, options)?;
        debug!(
            changes = changes.len(),
            corpus = corpus.len(),
            current_eligible = result.current_eligible_count,
            delta_eligible = result.delta_eligible_count,
            "simulated profile changes"
        );
        Ok(result)
    }

    pub fn explanation_request(
        &self,
        profile: &Profile,
        application: &Application,
    ) -> ExplanationRequest {
        ExplanationRequest::for_application(profile, application)
    }
}
