use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::normalizer::skill_key;

/// Identifier wrapper for candidate profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier wrapper for posted opportunities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when records are structurally invalid after normalization.
///
/// Missing or malformed scalars never end up here; they are absorbed by the normalizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown skill level '{value}'")]
    UnknownSkillLevel { value: String },
    #[error("unknown opportunity status '{value}'")]
    UnknownOpportunityStatus { value: String },
    #[error("unknown application status '{value}'")]
    UnknownApplicationStatus { value: String },
    #[error("application '{application_id}' does not reference an opportunity")]
    MissingOpportunity { application_id: String },
    #[error("simulation change '{key}' was supplied more than once")]
    DuplicateChange { key: String },
    #[error("simulation change is missing a name")]
    EmptyChangeName,
    #[error("cgpa target {value} must be a finite number within [0, 10]")]
    InvalidCgpaTarget { value: f64 },
    #[error("application cannot move from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("no explanation was returned for application '{application_id}'")]
    MissingExplanation { application_id: String },
}

/// Self-reported proficiency. Ordered so comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ValidationError::UnknownSkillLevel {
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A skill held by a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            level,
            evidence: Vec::new(),
        }
    }

    /// Case-insensitive comparison key.
    pub fn key(&self) -> String {
        skill_key(&self.name)
    }
}

/// A skill an opportunity asks for. A missing level accepts any proficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredSkill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
}

impl RequiredSkill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
        }
    }

    pub fn at_level(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            level: Some(level),
        }
    }

    pub fn key(&self) -> String {
        skill_key(&self.name)
    }
}

/// Engine-owned candidate profile. Skill names are unique by case-insensitive key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub cgpa: f64,
    pub skills: Vec<Skill>,
}

impl Profile {
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        let key = skill_key(name);
        self.skills.iter().find(|skill| skill.key() == key)
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skill(name).is_some()
    }
}

pub(crate) fn skill_keys(skills: &[Skill]) -> HashSet<String> {
    skills.iter().map(Skill::key).collect()
}

/// Publication state of an opportunity on the job board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Active,
    Closed,
    Draft,
}

impl OpportunityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OpportunityStatus::Active => "active",
            OpportunityStatus::Closed => "closed",
            OpportunityStatus::Draft => "draft",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "draft" => Ok(Self::Draft),
            _ => Err(ValidationError::UnknownOpportunityStatus {
                value: raw.to_string(),
            }),
        }
    }
}

/// Engine-owned job opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub title: String,
    pub company: String,
    pub min_cgpa: Option<f64>,
    pub required_skills: Vec<RequiredSkill>,
    pub status: OpportunityStatus,
}

impl Opportunity {
    pub fn is_active(&self) -> bool {
        self.status == OpportunityStatus::Active
    }

    /// Display label used in simulation reports.
    pub fn label(&self) -> String {
        if self.company.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.company, self.title)
        }
    }
}

/// Review lifecycle of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    InterviewScheduled,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::InterviewScheduled => "INTERVIEW_SCHEDULED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "PENDING" => Ok(Self::Pending),
            "SHORTLISTED" => Ok(Self::Shortlisted),
            "INTERVIEW_SCHEDULED" => Ok(Self::InterviewScheduled),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(ValidationError::UnknownApplicationStatus {
                value: raw.to_string(),
            }),
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected
        )
    }

    /// Position along the forward review pipeline. Rejection sits outside it.
    const fn stage(self) -> Option<u8> {
        match self {
            ApplicationStatus::Pending => Some(0),
            ApplicationStatus::Shortlisted => Some(1),
            ApplicationStatus::InterviewScheduled => Some(2),
            ApplicationStatus::Accepted => Some(3),
            ApplicationStatus::Rejected => None,
        }
    }

    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == ApplicationStatus::Rejected {
            return true;
        }
        match (self.stage(), next.stage()) {
            (Some(current), Some(target)) => target > current,
            _ => false,
        }
    }

    pub fn transition(self, next: ApplicationStatus) -> Result<ApplicationStatus, ValidationError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ValidationError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile values frozen when the application was submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub cgpa: Option<f64>,
    pub skills: Option<Vec<Skill>>,
}

/// A candidate's application to one opportunity, with the opportunity embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub profile_id: ProfileId,
    pub opportunity: Opportunity,
    pub status: ApplicationStatus,
    pub snapshot: Option<ProfileSnapshot>,
    pub submitted_on: Option<NaiveDate>,
}

impl Application {
    /// Record a new submission, capturing the profile as it stands right now.
    pub fn submit(
        id: ApplicationId,
        profile: &Profile,
        opportunity: &Opportunity,
        submitted_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            profile_id: profile.id.clone(),
            opportunity: opportunity.clone(),
            status: ApplicationStatus::Pending,
            snapshot: Some(ProfileSnapshot {
                cgpa: Some(profile.cgpa),
                skills: Some(profile.skills.clone()),
            }),
            submitted_on: Some(submitted_on),
        }
    }

    pub fn update_status(&mut self, next: ApplicationStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition(next)?;
        Ok(())
    }

    pub fn is_rejected(&self) -> bool {
        self.status == ApplicationStatus::Rejected
    }

    pub fn uses_snapshot(&self) -> bool {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.cgpa.is_some() || snapshot.skills.is_some())
            .unwrap_or(false)
    }

    /// CGPA at submission time, or the live value for legacy records.
    pub fn effective_cgpa(&self, live: &Profile) -> f64 {
        self.snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.cgpa)
            .unwrap_or(live.cgpa)
    }

    /// Skills at submission time, or the live skills for legacy records.
    pub fn effective_skills<'a>(&'a self, live: &'a Profile) -> &'a [Skill] {
        self.snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.skills.as_deref())
            .unwrap_or(&live.skills)
    }
}

/// Normalized key identifying a simulation change, e.g. `skill:react` or `cgpa`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChangeKey(pub String);

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hypothetical profile change evaluated by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationChange {
    Skill { name: String, level: SkillLevel },
    Cgpa { target: f64 },
    Certification { name: String },
}

impl SimulationChange {
    pub fn key(&self) -> ChangeKey {
        match self {
            SimulationChange::Skill { name, .. } => ChangeKey(format!("skill:{}", skill_key(name))),
            SimulationChange::Cgpa { .. } => ChangeKey("cgpa".to_string()),
            SimulationChange::Certification { name } => {
                ChangeKey(format!("certification:{}", skill_key(name)))
            }
        }
    }

    /// Imperative description shown in recommendation paths and timelines.
    pub fn action(&self) -> String {
        match self {
            SimulationChange::Skill { name, level } => format!("Learn {name} ({level})"),
            SimulationChange::Cgpa { target } => format!("Raise CGPA to {target:.2}"),
            SimulationChange::Certification { name } => format!("Earn the {name} certification"),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            SimulationChange::Skill { name, .. } | SimulationChange::Certification { name } => {
                if name.trim().is_empty() {
                    return Err(ValidationError::EmptyChangeName);
                }
            }
            SimulationChange::Cgpa { target } => {
                if !target.is_finite() || !(0.0..=10.0).contains(target) {
                    return Err(ValidationError::InvalidCgpaTarget { value: *target });
                }
            }
        }
        Ok(())
    }
}

/// Ordered batch of changes: one CGPA change at most, skills and certifications unique by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: Vec<SimulationChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_changes<I>(changes: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = SimulationChange>,
    {
        let mut set = Self::new();
        for change in changes {
            set.push(change)?;
        }
        Ok(set)
    }

    /// Add a change. A later CGPA change replaces the earlier one in place.
    pub fn push(&mut self, change: SimulationChange) -> Result<(), ValidationError> {
        change.validate()?;
        let key = change.key();

        if let Some(existing) = self.changes.iter().position(|held| held.key() == key) {
            if matches!(change, SimulationChange::Cgpa { .. }) {
                self.changes[existing] = change;
                return Ok(());
            }
            return Err(ValidationError::DuplicateChange { key: key.0 });
        }

        self.changes.push(change);
        Ok(())
    }

    pub fn as_slice(&self) -> &[SimulationChange] {
        &self.changes
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn cgpa_target(&self) -> Option<f64> {
        self.changes.iter().find_map(|change| match change {
            SimulationChange::Cgpa { target } => Some(*target),
            _ => None,
        })
    }

    pub fn certifications(&self) -> Vec<String> {
        self.changes
            .iter()
            .filter_map(|change| match change {
                SimulationChange::Certification { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

/// One bar of the missing-skill histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub frequency: usize,
}

/// Aggregated view over a candidate's rejected applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    pub common_missing_skills: Vec<SkillFrequency>,
    pub cgpa_issues: bool,
    pub improvement_priorities: Vec<String>,
    pub industry_insights: String,
}

impl PatternAnalysis {
    /// Callers conventionally surface only the head of the histogram.
    pub fn top_missing_skills(&self, limit: usize) -> &[SkillFrequency] {
        let end = limit.min(self.common_missing_skills.len());
        &self.common_missing_skills[..end]
    }

    pub fn with_industry_insights(mut self, insights: impl Into<String>) -> Self {
        self.industry_insights = insights.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScoreImprovement {
    pub opportunity_label: String,
    pub before: u8,
    pub after: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedStep {
    pub action: String,
    pub change: SimulationChange,
    pub effort_estimate: u32,
    pub immediate_yield: usize,
    pub long_term_yield: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub period: String,
    pub action: String,
}

/// Before/after projection of a batch of hypothetical changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub current_eligible_count: usize,
    pub new_eligible_count: usize,
    pub delta_eligible_count: i64,
    pub match_score_improvements: Vec<MatchScoreImprovement>,
    pub recommended_path: Vec<RecommendedStep>,
    pub timeline: Vec<TimelineEntry>,
    pub recorded_certifications: Vec<String>,
}
