//! Payload assembly for the external rejection-explanation service.
//!
//! The engine builds the request and checks that a response came back; the
//! narrative itself is opaque.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{Application, ApplicationId, Profile, ValidationError};
use super::normalizer::{canonical_application, canonical_profile};

/// Request body expected by the explanation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub student_name: String,
    pub student_skills: Vec<String>,
    pub student_cgpa: f64,
    pub job_role: String,
    pub job_company: String,
    pub job_required_skills: Vec<String>,
    pub job_min_cgpa: Option<f64>,
    pub is_snapshot: bool,
}

impl ExplanationRequest {
    /// Uses the submission snapshot when the application carries one.
    pub fn for_application(profile: &Profile, application: &Application) -> Self {
        let profile = &canonical_profile(profile);
        let application = &canonical_application(application);
        let opportunity = &application.opportunity;
        Self {
            student_name: profile.name.clone(),
            student_skills: application
                .effective_skills(profile)
                .iter()
                .map(|skill| skill.name.clone())
                .collect(),
            student_cgpa: application.effective_cgpa(profile),
            job_role: opportunity.title.clone(),
            job_company: opportunity.company.clone(),
            job_required_skills: opportunity
                .required_skills
                .iter()
                .map(|skill| skill.name.clone())
                .collect(),
            job_min_cgpa: opportunity.min_cgpa,
            is_snapshot: application.uses_snapshot(),
        }
    }
}

/// Narrative returned by the service, kept as an opaque display artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationArtifact {
    pub application_id: ApplicationId,
    pub body: Value,
}

impl ExplanationArtifact {
    pub fn accept(
        application_id: &ApplicationId,
        response: Option<Value>,
    ) -> Result<Self, ValidationError> {
        match response {
            Some(body) if !body.is_null() => Ok(Self {
                application_id: application_id.clone(),
                body,
            }),
            _ => Err(ValidationError::MissingExplanation {
                application_id: application_id.0.clone(),
            }),
        }
    }

    /// Top-level field lookup for display, e.g. `coreMismatch` or `actionPlan`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}
