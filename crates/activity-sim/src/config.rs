//! Configuration types for the activity simulation.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::{date, format_description};
use time::{Date, Duration};

use crate::generators::user::START_OFFSET_DAYS;
use crate::profiles::PersonaKind;

/// Global simulation start used when nothing else is configured.
pub const DEFAULT_START_DATE: Date = date!(2025 - 01 - 01);

/// Environment variables recognized by [`SimulationConfig::with_env_overrides`].
pub mod env_keys {
    pub const USERS: &str = "SIM_USERS";
    pub const DAYS: &str = "SIM_DAYS";
    pub const SEED: &str = "SIM_SEED";
    pub const START_DATE: &str = "SIM_START_DATE";
    pub const PERSONAS: &str = "SIM_PERSONAS";
    pub const OUTPUT: &str = "SIM_OUTPUT";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("User count must be positive")]
    NoUsers,

    #[error("Simulation length must be at least one day")]
    NoDays,

    #[error("Persona pool is empty")]
    NoPersonas,

    #[error("Simulation window starting {0} runs past the supported date range")]
    DateOutOfRange(Date),

    #[error("Invalid {what} distribution for {persona}: {source}")]
    InvalidDistribution {
        persona: PersonaKind,
        what: &'static str,
        #[source]
        source: rand_distr::NormalError,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for a simulation run.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of synthetic users.
    pub user_count: usize,

    /// Global simulation start. Each user starts up to 29 days later.
    pub start_date: Date,

    /// Number of simulated days per user.
    pub simulation_days: u32,

    /// Seed for the random stream. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Personas users are drawn from (uniformly).
    pub personas: Vec<PersonaKind>,

    /// Where the CSV output is written.
    pub output_path: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            user_count: 250,
            start_date: DEFAULT_START_DATE,
            simulation_days: 120, // ~16 weeks
            seed: None,
            personas: PersonaKind::ALL.to_vec(),
            output_path: PathBuf::from("synthetic_runna_data.csv"),
        }
    }
}

impl SimulationConfig {
    /// Loads a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks the configuration before any randomness is consumed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_count == 0 {
            return Err(ConfigError::NoUsers);
        }
        if self.simulation_days == 0 {
            return Err(ConfigError::NoDays);
        }
        if self.personas.is_empty() {
            return Err(ConfigError::NoPersonas);
        }

        // Latest possible activity date must be representable.
        let span = Duration::days(START_OFFSET_DAYS + i64::from(self.simulation_days));
        if self.start_date.checked_add(span).is_none() {
            return Err(ConfigError::DateOutOfRange(self.start_date));
        }

        Ok(())
    }

    /// Applies overrides from environment-style key/value lookups.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`; tests pass a map.
    /// Keys are listed in [`env_keys`].
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(env_keys::USERS) {
            self.user_count = parse_value(env_keys::USERS, &value)?;
        }
        if let Some(value) = lookup(env_keys::DAYS) {
            self.simulation_days = parse_value(env_keys::DAYS, &value)?;
        }
        if let Some(value) = lookup(env_keys::SEED) {
            self.seed = Some(parse_value(env_keys::SEED, &value)?);
        }
        if let Some(value) = lookup(env_keys::START_DATE) {
            self.start_date = parse_date(env_keys::START_DATE, &value)?;
        }
        if let Some(value) = lookup(env_keys::PERSONAS) {
            self.personas = parse_personas(&value)?;
        }
        if let Some(value) = lookup(env_keys::OUTPUT) {
            self.output_path = PathBuf::from(value);
        }

        Ok(self)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_date(key: &'static str, value: &str) -> Result<Date, ConfigError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }
    })
}

/// Parses a comma separated list of persona display names.
fn parse_personas(value: &str) -> Result<Vec<PersonaKind>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.user_count, 250);
        assert_eq!(config.simulation_days, 120);
        assert_eq!(config.start_date, date!(2025 - 01 - 01));
        assert_eq!(config.personas.len(), 5);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_runs() {
        let config = SimulationConfig {
            user_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoUsers)));

        let config = SimulationConfig {
            simulation_days: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoDays)));

        let config = SimulationConfig {
            personas: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoPersonas)));
    }

    #[test]
    fn test_validate_rejects_unrepresentable_window() {
        let config = SimulationConfig {
            start_date: Date::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DateOutOfRange(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = SimulationConfig::default()
            .with_env_overrides(lookup_from(&[
                ("SIM_USERS", "12"),
                ("SIM_DAYS", " 30 "),
                ("SIM_SEED", "99"),
                ("SIM_START_DATE", "2024-03-04"),
                ("SIM_PERSONAS", "Boom-and-Bust, Lapsed Newcomer"),
                ("SIM_OUTPUT", "out.csv"),
            ]))
            .unwrap();

        assert_eq!(config.user_count, 12);
        assert_eq!(config.simulation_days, 30);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.start_date, date!(2024 - 03 - 04));
        assert_eq!(
            config.personas,
            vec![PersonaKind::BoomAndBust, PersonaKind::LapsedNewcomer]
        );
        assert_eq!(config.output_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_env_overrides_reject_garbage() {
        let err = SimulationConfig::default()
            .with_env_overrides(lookup_from(&[("SIM_USERS", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "SIM_USERS",
                ..
            }
        ));

        let err = SimulationConfig::default()
            .with_env_overrides(lookup_from(&[("SIM_START_DATE", "01/02/2025")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = SimulationConfig::default()
            .with_env_overrides(lookup_from(&[("SIM_PERSONAS", "Couch Potato")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPersona(name) if name == "Couch Potato"));
    }

    #[test]
    fn test_json_partial_config() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"user_count": 10, "start_date": "2025-02-01", "seed": 7}"#)
                .unwrap();

        assert_eq!(config.user_count, 10);
        assert_eq!(config.start_date, date!(2025 - 02 - 01));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.simulation_days, 120);
        assert_eq!(config.personas.len(), 5);
    }

    #[test]
    fn test_json_persona_names() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"personas": ["Event-Driven Racer"]}"#).unwrap();
        assert_eq!(config.personas, vec![PersonaKind::EventDrivenRacer]);
    }
}
