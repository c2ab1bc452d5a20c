//! Runtime settings read from the environment.
//!
//! A `.env` file is honored when present. Every variable is optional except
//! `DATABASE_URL`, which only the store-backed commands ask for.

use std::collections::HashMap;

use thiserror::Error;

use crate::assessment::AssessmentWeights;
use crate::evaluation::EngineOptions;
use crate::kano::CoefficientScheme;
use crate::sus::PercentileModel;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS: &str = "EVAL_DB_MAX_CONNECTIONS";
pub const COEFFICIENT_SCHEME: &str = "EVAL_COEFFICIENT_SCHEME";
pub const PERCENTILE_MODEL: &str = "EVAL_PERCENTILE_MODEL";
pub const SUS_WEIGHT: &str = "EVAL_SUS_WEIGHT";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub engine: EngineOptions,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let max_connections = match get(MAX_CONNECTIONS) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: MAX_CONNECTIONS,
                        message: format!("expected a positive integer, got '{raw}'"),
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let coefficients = match get(COEFFICIENT_SCHEME) {
            Some(raw) => raw
                .parse::<CoefficientScheme>()
                .map_err(|err| invalid(COEFFICIENT_SCHEME, err))?,
            None => CoefficientScheme::default(),
        };

        let percentile = match get(PERCENTILE_MODEL) {
            Some(raw) => raw
                .parse::<PercentileModel>()
                .map_err(|err| invalid(PERCENTILE_MODEL, err))?,
            None => PercentileModel::default(),
        };

        let weights = match get(SUS_WEIGHT) {
            Some(raw) => {
                let sus = raw.parse::<f64>().map_err(|err| invalid(SUS_WEIGHT, err))?;
                AssessmentWeights::from_sus_weight(sus).map_err(|err| invalid(SUS_WEIGHT, err))?
            }
            None => AssessmentWeights::default(),
        };

        Ok(Self {
            database_url: get(DATABASE_URL).map(str::to_string),
            max_connections,
            engine: EngineOptions {
                coefficients,
                percentile,
                weights,
            },
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing(DATABASE_URL))
    }
}

fn invalid(key: &'static str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_vars(HashMap::new()).unwrap();
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.engine, EngineOptions::default());
        assert_eq!(
            settings.require_database_url(),
            Err(ConfigError::Missing(DATABASE_URL))
        );
    }

    #[test]
    fn reads_every_variable() {
        let settings = Settings::from_vars(vars(&[
            (DATABASE_URL, "postgres://localhost/usability"),
            (MAX_CONNECTIONS, "12"),
            (COEFFICIENT_SCHEME, "answer-weighted"),
            (PERCENTILE_MODEL, "Normative"),
            (SUS_WEIGHT, "0.7"),
        ]))
        .unwrap();

        assert_eq!(
            settings.require_database_url().unwrap(),
            "postgres://localhost/usability"
        );
        assert_eq!(settings.max_connections, 12);
        assert_eq!(
            settings.engine.coefficients,
            CoefficientScheme::AnswerWeighted
        );
        assert_eq!(settings.engine.percentile, PercentileModel::Normative);
        assert!((settings.engine.weights.sus - 0.7).abs() < 1e-9);
        assert!((settings.engine.weights.kano - 0.3).abs() < 1e-9);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings =
            Settings::from_vars(vars(&[(DATABASE_URL, "  "), (PERCENTILE_MODEL, "")])).unwrap();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.engine.percentile, PercentileModel::Normal);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            (MAX_CONNECTIONS, "0"),
            (MAX_CONNECTIONS, "many"),
            (COEFFICIENT_SCHEME, "fuzzy"),
            (PERCENTILE_MODEL, "uniform"),
            (SUS_WEIGHT, "1.5"),
            (SUS_WEIGHT, "half"),
        ] {
            let err = Settings::from_vars(vars(&[(key, value)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: k, .. } if k == key),
                "{key}={value} gave {err:?}"
            );
        }
    }
}
