//! Boundary adapter turning loosely-shaped store records into engine records.
//!
//! Store exports mix camelCase and snake_case spellings, carry CGPA as numbers or
//! strings, and occasionally contain skill entries without a name. All of that is
//! resolved here so the rest of the engine only sees [`Profile`], [`Opportunity`]
//! and [`Application`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Opportunity, OpportunityId,
    OpportunityStatus, Profile, ProfileId, ProfileSnapshot, RequiredSkill, Skill, SkillLevel,
    ValidationError,
};

const MAX_CGPA: f64 = 10.0;
const DEFAULT_PROFILE_LEVEL: SkillLevel = SkillLevel::Intermediate;

/// Profile record as stored by the portal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    #[serde(default, alias = "_id", alias = "uid")]
    pub id: Option<Value>,
    #[serde(default, alias = "fullName", alias = "full_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub cgpa: Option<Value>,
    #[serde(default)]
    pub skills: Option<Vec<RawSkill>>,
}

/// Skill entries appear either as bare names or as objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSkill {
    Name(String),
    Entry(RawSkillEntry),
    Other(Value),
}

/// Object-shaped skill entry. Fields stay untyped so one bad field never hides the skill.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkillEntry {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub level: Option<Value>,
    #[serde(default)]
    pub evidence: Option<Value>,
}

/// Opportunity record as stored by the job board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOpportunity {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    #[serde(default, alias = "role")]
    pub title: Option<String>,
    #[serde(default, alias = "companyName", alias = "company_name")]
    pub company: Option<String>,
    #[serde(default, rename = "minCgpa")]
    pub min_cgpa: Option<Value>,
    #[serde(default, rename = "min_cgpa")]
    pub min_cgpa_legacy: Option<Value>,
    #[serde(default, rename = "requiredSkills")]
    pub required_skills: Option<Vec<RawSkill>>,
    #[serde(default, rename = "required_skills")]
    pub required_skills_legacy: Option<Vec<RawSkill>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Application record with its opportunity embedded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawApplication {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    #[serde(default, alias = "profileId", alias = "studentId", alias = "student_id")]
    pub profile_id: Option<Value>,
    #[serde(default, alias = "job")]
    pub opportunity: Option<RawOpportunity>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "snapshotCgpa")]
    pub snapshot_cgpa: Option<Value>,
    #[serde(default, rename = "snapshot_cgpa")]
    pub snapshot_cgpa_legacy: Option<Value>,
    #[serde(default, rename = "snapshotSkills")]
    pub snapshot_skills: Option<Vec<RawSkill>>,
    #[serde(default, rename = "snapshot_skills")]
    pub snapshot_skills_legacy: Option<Vec<RawSkill>>,
    #[serde(default, alias = "submittedOn", alias = "appliedAt", alias = "applied_at")]
    pub submitted_on: Option<String>,
}

/// Strip invisible characters and collapse whitespace, keeping the original casing.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive comparison key for skill and certification names.
pub fn skill_key(value: &str) -> String {
    normalize_name(value).to_lowercase()
}

pub fn normalize_profile(raw: &RawProfile) -> Result<Profile, ValidationError> {
    let skills = match &raw.skills {
        Some(entries) => normalize_skills(entries)?,
        None => Vec::new(),
    };

    Ok(Profile {
        id: ProfileId(id_string(raw.id.as_ref())),
        name: raw.name.as_deref().map(normalize_name).unwrap_or_default(),
        cgpa: coerce_cgpa(raw.cgpa.as_ref()),
        skills,
    })
}

pub fn normalize_opportunity(raw: &RawOpportunity) -> Result<Opportunity, ValidationError> {
    let min_cgpa = raw
        .min_cgpa
        .as_ref()
        .and_then(coerce_min_cgpa)
        .or_else(|| raw.min_cgpa_legacy.as_ref().and_then(coerce_min_cgpa));

    let mut required_skills = Vec::new();
    for entries in [&raw.required_skills, &raw.required_skills_legacy]
        .into_iter()
        .flatten()
    {
        merge_required_skills(&mut required_skills, entries)?;
    }

    let status = match raw.status.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => OpportunityStatus::parse(value)?,
        _ => OpportunityStatus::Active,
    };

    Ok(Opportunity {
        id: OpportunityId(id_string(raw.id.as_ref())),
        title: raw.title.as_deref().map(normalize_name).unwrap_or_default(),
        company: raw.company.as_deref().map(normalize_name).unwrap_or_default(),
        min_cgpa,
        required_skills,
        status,
    })
}

pub fn normalize_application(raw: &RawApplication) -> Result<Application, ValidationError> {
    let id = ApplicationId(id_string(raw.id.as_ref()));
    let opportunity = match &raw.opportunity {
        Some(opportunity) => normalize_opportunity(opportunity)?,
        None => {
            return Err(ValidationError::MissingOpportunity {
                application_id: id.0,
            })
        }
    };

    let status = match raw.status.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => ApplicationStatus::parse(value)?,
        _ => ApplicationStatus::Pending,
    };

    let snapshot_cgpa = raw
        .snapshot_cgpa
        .as_ref()
        .or(raw.snapshot_cgpa_legacy.as_ref())
        .map(|value| coerce_cgpa(Some(value)));
    let snapshot_skills = match raw
        .snapshot_skills
        .as_ref()
        .or(raw.snapshot_skills_legacy.as_ref())
    {
        Some(entries) => Some(normalize_skills(entries)?),
        None => None,
    };
    let snapshot = if snapshot_cgpa.is_some() || snapshot_skills.is_some() {
        Some(ProfileSnapshot {
            cgpa: snapshot_cgpa,
            skills: snapshot_skills,
        })
    } else {
        None
    };

    Ok(Application {
        id,
        profile_id: ProfileId(id_string(raw.profile_id.as_ref())),
        opportunity,
        status,
        snapshot,
        submitted_on: raw.submitted_on.as_deref().and_then(parse_submitted_on),
    })
}

/// Re-apply the normalization invariants to an already-typed profile.
///
/// Idempotent. Every engine entry point runs its inputs through the `canonical_*`
/// functions so callers may hand in hand-built records.
pub fn canonical_profile(profile: &Profile) -> Profile {
    Profile {
        id: profile.id.clone(),
        name: normalize_name(&profile.name),
        cgpa: clamp_cgpa(profile.cgpa),
        skills: canonical_skills(&profile.skills),
    }
}

/// Canonicalizes the embedded opportunity and the submission snapshot.
pub fn canonical_application(application: &Application) -> Application {
    Application {
        opportunity: canonical_opportunity(&application.opportunity),
        snapshot: application
            .snapshot
            .as_ref()
            .map(|snapshot| ProfileSnapshot {
                cgpa: snapshot.cgpa.map(clamp_cgpa),
                skills: snapshot.skills.as_deref().map(canonical_skills),
            }),
        ..application.clone()
    }
}

fn canonical_skills(held: &[Skill]) -> Vec<Skill> {
    let mut skills: Vec<Skill> = Vec::with_capacity(held.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for skill in held {
        let name = normalize_name(&skill.name);
        if name.is_empty() {
            continue;
        }
        let normalized = Skill {
            name,
            level: skill.level,
            evidence: skill.evidence.clone(),
        };
        upsert_skill(&mut skills, &mut positions, normalized);
    }

    skills
}

pub fn canonical_opportunity(opportunity: &Opportunity) -> Opportunity {
    let mut required_skills: Vec<RequiredSkill> = Vec::new();
    for requirement in &opportunity.required_skills {
        let name = normalize_name(&requirement.name);
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if required_skills.iter().all(|held| held.key() != key) {
            required_skills.push(RequiredSkill {
                name,
                level: requirement.level,
            });
        }
    }

    Opportunity {
        id: opportunity.id.clone(),
        title: normalize_name(&opportunity.title),
        company: normalize_name(&opportunity.company),
        min_cgpa: opportunity
            .min_cgpa
            .map(|min| if min.is_finite() { clamp_cgpa(min) } else { 0.0 }),
        required_skills,
        status: opportunity.status,
    }
}

fn normalize_skills(entries: &[RawSkill]) -> Result<Vec<Skill>, ValidationError> {
    let mut skills: Vec<Skill> = Vec::with_capacity(entries.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some((name, level, evidence)) = skill_parts(entry) else {
            continue;
        };
        let level = match level {
            Some(raw) => coerce_level(raw)?.unwrap_or(DEFAULT_PROFILE_LEVEL),
            None => DEFAULT_PROFILE_LEVEL,
        };
        let skill = Skill {
            name,
            level,
            evidence,
        };
        upsert_skill(&mut skills, &mut positions, skill);
    }

    Ok(skills)
}

/// Duplicates keep the slot of the first occurrence but take the last value.
fn upsert_skill(skills: &mut Vec<Skill>, positions: &mut HashMap<String, usize>, skill: Skill) {
    let key = skill.key();
    match positions.get(&key) {
        Some(&index) => skills[index] = skill,
        None => {
            positions.insert(key, skills.len());
            skills.push(skill);
        }
    }
}

/// Earlier entries win, so camelCase lists merged first take precedence.
fn merge_required_skills(
    required: &mut Vec<RequiredSkill>,
    entries: &[RawSkill],
) -> Result<(), ValidationError> {
    for entry in entries {
        let Some((name, level, _)) = skill_parts(entry) else {
            continue;
        };
        let level = match level {
            Some(raw) => coerce_level(raw)?,
            None => None,
        };
        let key = name.to_lowercase();
        if required.iter().any(|held| held.key() == key) {
            continue;
        }
        required.push(RequiredSkill { name, level });
    }
    Ok(())
}

fn skill_parts(entry: &RawSkill) -> Option<(String, Option<&Value>, Vec<String>)> {
    let (name, level, evidence) = match entry {
        RawSkill::Name(name) => (name.as_str(), None, Vec::new()),
        RawSkill::Entry(entry) => (
            entry.name.as_ref().and_then(Value::as_str)?,
            entry.level.as_ref(),
            evidence_tags(entry.evidence.as_ref()),
        ),
        RawSkill::Other(_) => return None,
    };

    let name = normalize_name(name);
    if name.is_empty() {
        return None;
    }
    Some((name, level, evidence))
}

/// Level labels parse by name; numeric levels use the 1-3 rank scale.
/// Null or blank means no level was given.
fn coerce_level(value: &Value) -> Result<Option<SkillLevel>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => SkillLevel::parse(raw).map(Some),
        Value::Number(number) => match number.as_u64() {
            Some(1) => Ok(Some(SkillLevel::Beginner)),
            Some(2) => Ok(Some(SkillLevel::Intermediate)),
            Some(3) => Ok(Some(SkillLevel::Advanced)),
            _ => Err(ValidationError::UnknownSkillLevel {
                value: number.to_string(),
            }),
        },
        other => Err(ValidationError::UnknownSkillLevel {
            value: other.to_string(),
        }),
    }
}

/// Keeps string tags only; a lone string counts as a single tag.
fn evidence_tags(value: Option<&Value>) -> Vec<String> {
    let tags: Vec<&str> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(tag)) => vec![tag.as_str()],
        _ => Vec::new(),
    };
    tags.into_iter()
        .map(normalize_name)
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn id_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(id)) => id.trim().to_string(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

/// Non-numeric or missing CGPA becomes `0`; anything else is clamped into `[0, 10]`.
pub(crate) fn coerce_cgpa(value: Option<&Value>) -> f64 {
    clamp_cgpa(value.and_then(coerce_number).unwrap_or(0.0))
}

/// Null or blank means the opportunity has no CGPA gate.
fn coerce_min_cgpa(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::String(raw) if raw.trim().is_empty() => None,
        other => Some(coerce_cgpa(Some(other))),
    }
}

fn clamp_cgpa(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_CGPA)
    } else {
        0.0
    }
}

fn parse_submitted_on(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
