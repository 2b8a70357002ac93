use std::env;
use std::fmt;

use crate::workflows::placement::{EngineConfig, DEFAULT_TOP_MISSING_SKILLS};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = EngineConfig::default();
        let effort_unit = env::var("APP_EFFORT_UNIT")
            .ok()
            .map(|unit| unit.trim().to_string())
            .filter(|unit| !unit.is_empty())
            .unwrap_or(defaults.effort_unit);

        let top_missing_skills = match env::var("APP_TOP_MISSING_SKILLS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidTopMissingSkills { value: raw })?,
            Err(_) => DEFAULT_TOP_MISSING_SKILLS,
        };

        let reference_companies = env::var("APP_REFERENCE_COMPANIES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|company| !company.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment,
            engine: EngineConfig {
                effort_unit,
                top_missing_skills,
                reference_companies,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTopMissingSkills { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTopMissingSkills { value } => write!(
                f,
                "APP_TOP_MISSING_SKILLS must be a non-negative integer, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
