use std::collections::HashMap;

use super::domain::{Application, PatternAnalysis, Profile, SkillFrequency};
use super::normalizer::{canonical_application, canonical_profile, skill_key};
use super::scoring::missing_skills;

pub const NOTHING_TO_ANALYZE: &str =
    "No rejected applications yet, so there is nothing to analyze. Keep applying!";

/// Reduce rejected applications into a missing-skill histogram and CGPA signal.
///
/// Each rejection is judged against the profile snapshot captured at submission;
/// legacy applications without one fall back to the live profile.
pub fn aggregate(profile: &Profile, applications: &[Application]) -> PatternAnalysis {
    let profile = &canonical_profile(profile);
    let rejected: Vec<Application> = applications
        .iter()
        .filter(|application| application.is_rejected())
        .map(canonical_application)
        .collect();

    if rejected.is_empty() {
        return PatternAnalysis {
            common_missing_skills: Vec::new(),
            cgpa_issues: false,
            improvement_priorities: vec![NOTHING_TO_ANALYZE.to_string()],
            industry_insights: String::new(),
        };
    }

    let mut histogram = SkillHistogram::default();
    let mut gated = 0usize;
    let mut below_floor = 0usize;

    for application in &rejected {
        let skills = application.effective_skills(profile);
        for required in missing_skills(skills, &application.opportunity) {
            histogram.record(&required.name);
        }

        if let Some(min_cgpa) = application.opportunity.min_cgpa {
            gated += 1;
            if application.effective_cgpa(profile) < min_cgpa {
                below_floor += 1;
            }
        }
    }

    let common_missing_skills = histogram.ranked();
    let improvement_priorities = common_missing_skills.iter().map(priority_action).collect();

    PatternAnalysis {
        common_missing_skills,
        cgpa_issues: gated > 0 && below_floor * 2 > gated,
        improvement_priorities,
        industry_insights: String::new(),
    }
}

fn priority_action(entry: &SkillFrequency) -> String {
    let plural = if entry.frequency == 1 { "" } else { "s" };
    format!(
        "Learn {} (missing in {} rejected application{plural})",
        entry.skill, entry.frequency
    )
}

/// Frequency counter that remembers first-seen order for tie-breaks.
#[derive(Debug, Default)]
struct SkillHistogram {
    entries: Vec<SkillFrequency>,
    positions: HashMap<String, usize>,
}

impl SkillHistogram {
    fn record(&mut self, name: &str) {
        let key = skill_key(name);
        match self.positions.get(&key) {
            Some(&index) => self.entries[index].frequency += 1,
            None => {
                self.positions.insert(key, self.entries.len());
                self.entries.push(SkillFrequency {
                    skill: name.to_string(),
                    frequency: 1,
                });
            }
        }
    }

    /// Descending by frequency; `sort_by` is stable so ties keep first-seen order.
    fn ranked(mut self) -> Vec<SkillFrequency> {
        self.entries
            .sort_by(|left, right| right.frequency.cmp(&left.frequency));
        self.entries
    }
}
