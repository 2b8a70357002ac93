use std::collections::HashMap;

use serde::Serialize;

use super::domain::{skill_keys, Opportunity, Profile, RequiredSkill, Skill, SkillLevel};

const FULL_MATCH: u8 = 100;

/// Percentage of required skills present in the profile, matched by name only.
pub fn score(profile: &Profile, opportunity: &Opportunity) -> u8 {
    score_skills(&profile.skills, opportunity)
}

/// Same as [`score`] but over an arbitrary skill list, e.g. an application snapshot.
pub fn score_skills(skills: &[Skill], opportunity: &Opportunity) -> u8 {
    if opportunity.required_skills.is_empty() {
        return FULL_MATCH;
    }

    let held = skill_keys(skills);
    let matched = opportunity
        .required_skills
        .iter()
        .filter(|required| held.contains(&required.key()))
        .count();

    percentage(matched as f64, opportunity.required_skills.len())
}

/// Level-aware score: a requirement held below its level earns partial credit.
pub fn weighted_score(profile: &Profile, opportunity: &Opportunity) -> u8 {
    if opportunity.required_skills.is_empty() {
        return FULL_MATCH;
    }

    let levels = levels_by_key(&profile.skills);
    let credit: f64 = opportunity
        .required_skills
        .iter()
        .map(|required| match (levels.get(&required.key()), required.level) {
            (None, _) => 0.0,
            (Some(_), None) => 1.0,
            (Some(have), Some(need)) => {
                (f64::from(have.rank()) / f64::from(need.rank())).min(1.0)
            }
        })
        .sum();

    percentage(credit, opportunity.required_skills.len())
}

/// Where a single requirement stands against a skill list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum GapStatus {
    Met,
    BelowLevel { have: SkillLevel, need: SkillLevel },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub required_level: Option<SkillLevel>,
    #[serde(flatten)]
    pub status: GapStatus,
}

pub fn skill_gaps(skills: &[Skill], opportunity: &Opportunity) -> Vec<SkillGap> {
    let levels = levels_by_key(skills);
    opportunity
        .required_skills
        .iter()
        .map(|required| {
            let status = match (levels.get(&required.key()), required.level) {
                (None, _) => GapStatus::Missing,
                (Some(&have), Some(need)) if have < need => GapStatus::BelowLevel { have, need },
                (Some(_), _) => GapStatus::Met,
            };
            SkillGap {
                skill: required.name.clone(),
                required_level: required.level,
                status,
            }
        })
        .collect()
}

/// Requirements whose name is absent from `skills`, in opportunity order.
pub fn missing_skills<'a>(skills: &[Skill], opportunity: &'a Opportunity) -> Vec<&'a RequiredSkill> {
    let held = skill_keys(skills);
    opportunity
        .required_skills
        .iter()
        .filter(|required| !held.contains(&required.key()))
        .collect()
}

fn levels_by_key(skills: &[Skill]) -> HashMap<String, SkillLevel> {
    skills.iter().map(|skill| (skill.key(), skill.level)).collect()
}

fn percentage(numerator: f64, denominator: usize) -> u8 {
    if denominator == 0 {
        return FULL_MATCH;
    }
    let ratio = (numerator / denominator as f64).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u8
}
