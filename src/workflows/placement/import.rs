//! Loading store exports (JSON records, job-board CSV) into engine records.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::domain::{Application, Opportunity, Profile, ValidationError};
use super::normalizer::{
    normalize_application, normalize_opportunity, normalize_profile, RawApplication,
    RawOpportunity, RawProfile, RawSkill, RawSkillEntry,
};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Validation(ValidationError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read placement export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid opportunity CSV data: {}", err),
            ImportError::Json(err) => write!(f, "invalid placement JSON data: {}", err),
            ImportError::Validation(err) => {
                write!(f, "placement export failed validation: {}", err)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
            ImportError::Validation(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ValidationError> for ImportError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

pub fn profile_from_reader<R: Read>(reader: R) -> Result<Profile, ImportError> {
    let raw: RawProfile = serde_json::from_reader(reader)?;
    Ok(normalize_profile(&raw)?)
}

pub fn opportunities_from_json<R: Read>(reader: R) -> Result<Vec<Opportunity>, ImportError> {
    let raw: Vec<RawOpportunity> = serde_json::from_reader(reader)?;
    raw.iter()
        .map(|opportunity| normalize_opportunity(opportunity).map_err(ImportError::from))
        .collect()
}

pub fn applications_from_reader<R: Read>(reader: R) -> Result<Vec<Application>, ImportError> {
    let raw: Vec<RawApplication> = serde_json::from_reader(reader)?;
    raw.iter()
        .map(|application| normalize_application(application).map_err(ImportError::from))
        .collect()
}

/// Parse a job-board CSV export with columns
/// `id,company,title,min_cgpa,required_skills,status`.
///
/// `required_skills` is `;`-separated; each entry may carry a `:Level` suffix.
pub fn parse_opportunities_csv<R: Read>(reader: R) -> Result<Vec<Opportunity>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut opportunities = Vec::new();

    for record in csv_reader.deserialize::<OpportunityRow>() {
        let row = record?;
        opportunities.push(normalize_opportunity(&row.into_raw())?);
    }

    Ok(opportunities)
}

pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile, ImportError> {
    let file = File::open(path)?;
    profile_from_reader(BufReader::new(file))
}

pub fn load_applications<P: AsRef<Path>>(path: P) -> Result<Vec<Application>, ImportError> {
    let file = File::open(path)?;
    applications_from_reader(BufReader::new(file))
}

/// Loads a corpus from `.csv` or JSON, chosen by file extension.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Opportunity>, ImportError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let reader = BufReader::new(File::open(path)?);
    if is_csv {
        parse_opportunities_csv(reader)
    } else {
        opportunities_from_json(reader)
    }
}

#[derive(Debug, Deserialize)]
struct OpportunityRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    min_cgpa: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    required_skills: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl OpportunityRow {
    fn into_raw(self) -> RawOpportunity {
        let required_skills = self.required_skills.as_deref().map(|skills| {
            skills
                .split(';')
                .filter(|entry| !entry.trim().is_empty())
                .map(parse_skill_cell)
                .collect()
        });

        RawOpportunity {
            id: Some(Value::String(self.id)),
            title: self.title,
            company: self.company,
            min_cgpa: self.min_cgpa.map(Value::String),
            required_skills,
            status: self.status,
            ..RawOpportunity::default()
        }
    }
}

fn parse_skill_cell(entry: &str) -> RawSkill {
    match entry.rsplit_once(':') {
        Some((name, level)) => RawSkill::Entry(RawSkillEntry {
            name: Some(Value::String(name.trim().to_string())),
            level: Some(Value::String(level.trim().to_string())),
            evidence: None,
        }),
        None => RawSkill::Name(entry.trim().to_string()),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::placement::domain::{OpportunityStatus, SkillLevel};
    use std::io::Cursor;

    #[test]
    fn csv_rows_become_normalized_opportunities() {
        let csv = "id,company,title,min_cgpa,required_skills,status\n\
job-1,Acme,Backend Intern,7.5,Rust:Advanced; SQL ;,active\n\
job-2,Globex,Analyst,,Excel,closed\n";

        let opportunities =
            parse_opportunities_csv(Cursor::new(csv)).expect("csv parses");

        assert_eq!(opportunities.len(), 2);
        let backend = &opportunities[0];
        assert_eq!(backend.label(), "Acme - Backend Intern");
        assert_eq!(backend.min_cgpa, Some(7.5));
        assert_eq!(backend.required_skills.len(), 2);
        assert_eq!(backend.required_skills[0].level, Some(SkillLevel::Advanced));
        assert_eq!(backend.required_skills[1].name, "SQL");
        assert_eq!(backend.required_skills[1].level, None);

        let analyst = &opportunities[1];
        assert_eq!(analyst.min_cgpa, None);
        assert_eq!(analyst.status, OpportunityStatus::Closed);
    }

    #[test]
    fn csv_with_unknown_level_is_rejected() {
        let csv = "id,company,title,min_cgpa,required_skills,status\n\
job-1,Acme,Backend Intern,7.5,Rust:Wizard,active\n";

        let error = parse_opportunities_csv(Cursor::new(csv)).expect_err("level rejected");
        match error {
            ImportError::Validation(ValidationError::UnknownSkillLevel { value }) => {
                assert_eq!(value, "Wizard");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn load_corpus_propagates_io_errors() {
        let error = load_corpus("./does-not-exist.json").expect_err("expected io error");
        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
