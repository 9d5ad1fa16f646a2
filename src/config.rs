use crate::advice::TagVocabulary;
use chrono::NaiveDate;
use std::{env, path::PathBuf};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOCATION: &str = "London Brixton";
pub const DEFAULT_CAPACITY: u32 = 150;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub vocabulary: TagVocabulary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub seed_path: Option<PathBuf>,
    pub location: String,
    pub target_date: NaiveDate,
    pub capacity: u32,
    pub advice: AdviceSettings,
}

pub fn default_target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 14).unwrap_or(NaiveDate::MIN)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let capacity = parse_or(get("PLANNER_CAPACITY"), "PLANNER_CAPACITY", DEFAULT_CAPACITY)?;
        if capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "PLANNER_CAPACITY",
                value: "0".to_string(),
            });
        }
        let target_date = parse_or(get("PLANNER_TARGET_DATE"), "PLANNER_TARGET_DATE", default_target_date())?;

        let vocabulary = match get("ADVICE_TAGS") {
            Some(value) => TagVocabulary::from_name(&value).ok_or(ConfigError::Invalid {
                name: "ADVICE_TAGS",
                value,
            })?,
            None => TagVocabulary::default(),
        };

        // Anything this short is a placeholder rather than a real key.
        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .filter(|key| key.len() >= 5);

        Ok(Self {
            port,
            seed_path: get("APP_SEED_PATH").map(PathBuf::from),
            location: get("PLANNER_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            target_date,
            capacity,
            advice: AdviceSettings {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                vocabulary,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.location, DEFAULT_LOCATION);
        assert_eq!(config.target_date.to_string(), "2025-02-14");
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.seed_path, None);
        assert_eq!(config.advice.api_key, None);
        assert_eq!(config.advice.vocabulary, TagVocabulary::Tactical);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("PLANNER_LOCATION", "Leeds"),
            ("PLANNER_TARGET_DATE", "2025-03-07"),
            ("ADVICE_TAGS", "classic"),
            ("API_KEY", "abcdef123"),
            ("APP_SEED_PATH", "data/seed.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.location, "Leeds");
        assert_eq!(config.target_date.to_string(), "2025-03-07");
        assert_eq!(config.advice.vocabulary, TagVocabulary::Classic);
        assert_eq!(config.advice.api_key.as_deref(), Some("abcdef123"));
        assert_eq!(config.seed_path, Some(PathBuf::from("data/seed.json")));
    }

    #[test]
    fn short_keys_are_ignored() {
        let config = config_from(&[("GEMINI_API_KEY", "abc")]).unwrap();
        assert_eq!(config.advice.api_key, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            config_from(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".into()
            }
        );
        assert!(config_from(&[("PLANNER_TARGET_DATE", "14/02/2025")]).is_err());
        assert!(config_from(&[("PLANNER_CAPACITY", "0")]).is_err());
        assert!(config_from(&[("ADVICE_TAGS", "fancy")]).is_err());
    }
}
