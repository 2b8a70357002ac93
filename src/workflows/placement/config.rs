use serde::{Deserialize, Serialize};

use super::simulation::DEFAULT_EFFORT_UNIT;

pub const DEFAULT_TOP_MISSING_SKILLS: usize = 5;

/// Tunables for the placement engine; passed explicitly, never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub effort_unit: String,
    pub top_missing_skills: usize,
    pub reference_companies: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            effort_unit: DEFAULT_EFFORT_UNIT.to_string(),
            top_missing_skills: DEFAULT_TOP_MISSING_SKILLS,
            reference_companies: Vec::new(),
        }
    }
}
