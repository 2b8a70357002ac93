use chrono::NaiveDate;

use crate::workflows::placement::domain::{
    Application, ApplicationId, ApplicationStatus, Opportunity, OpportunityId, OpportunityStatus,
    Profile, ProfileId, ProfileSnapshot, RequiredSkill, Skill, SkillLevel,
};

pub(super) fn profile(cgpa: f64, skills: &[(&str, SkillLevel)]) -> Profile {
    Profile {
        id: ProfileId("student-42".to_string()),
        name: "Asha Rao".to_string(),
        cgpa,
        skills: skills
            .iter()
            .map(|(name, level)| Skill::new(*name, *level))
            .collect(),
    }
}

pub(super) fn opportunity(id: &str, min_cgpa: Option<f64>, skills: &[&str]) -> Opportunity {
    Opportunity {
        id: OpportunityId(id.to_string()),
        title: format!("Role {id}"),
        company: "Acme".to_string(),
        min_cgpa,
        required_skills: skills.iter().map(|name| RequiredSkill::new(*name)).collect(),
        status: OpportunityStatus::Active,
    }
}

pub(super) fn opportunity_at(company: &str, id: &str, skills: &[&str]) -> Opportunity {
    Opportunity {
        company: company.to_string(),
        ..opportunity(id, None, skills)
    }
}

pub(super) fn rejected(id: &str, opportunity: Opportunity) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        profile_id: ProfileId("student-42".to_string()),
        opportunity,
        status: ApplicationStatus::Rejected,
        snapshot: None,
        submitted_on: NaiveDate::from_ymd_opt(2025, 1, 15),
    }
}

pub(super) fn rejected_with_snapshot(
    id: &str,
    opportunity: Opportunity,
    cgpa: f64,
    skills: &[&str],
) -> Application {
    Application {
        snapshot: Some(ProfileSnapshot {
            cgpa: Some(cgpa),
            skills: Some(
                skills
                    .iter()
                    .map(|name| Skill::new(*name, SkillLevel::Intermediate))
                    .collect(),
            ),
        }),
        ..rejected(id, opportunity)
    }
}
