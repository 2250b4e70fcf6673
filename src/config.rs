use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::quiz::controller::WelcomePolicy;

const DEFAULT_DB_PATH: &str = "db.sqlite";
const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not valid unicode")]
    NotUnicode { name: &'static str },

    #[error("invalid QUIZ_WELCOME_POLICY: {0}")]
    InvalidWelcomePolicy(String),
}

/// Runtime settings read from the environment (and `.env`, if present).
///
/// The bot token itself is picked up by `Bot::from_env` from `TELOXIDE_TOKEN`.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub questions_path: PathBuf,
    pub welcome_policy: WelcomePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, env::VarError>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &'static str| match lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
        };

        let db_path = var("QUIZ_DB_PATH")?.unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let questions_path = var("QUIZ_QUESTIONS_PATH")?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_PATH));
        let welcome_policy = match var("QUIZ_WELCOME_POLICY")? {
            Some(value) => value.parse::<WelcomePolicy>().map_err(ConfigError::InvalidWelcomePolicy)?,
            None => WelcomePolicy::default(),
        };

        Ok(Self {
            db_path,
            questions_path,
            welcome_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned().ok_or(env::VarError::NotPresent))
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, "db.sqlite");
        assert_eq!(config.questions_path, PathBuf::from("questions.json"));
        assert_eq!(config.welcome_policy, WelcomePolicy::Legacy);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("QUIZ_DB_PATH", "/tmp/quiz.sqlite"),
            ("QUIZ_QUESTIONS_PATH", "/etc/quiz/questions.json"),
            ("QUIZ_WELCOME_POLICY", "strict"),
        ])
        .unwrap();

        assert_eq!(config.db_path, "/tmp/quiz.sqlite");
        assert_eq!(config.questions_path, PathBuf::from("/etc/quiz/questions.json"));
        assert_eq!(config.welcome_policy, WelcomePolicy::Strict);
    }

    #[test]
    fn rejects_unknown_welcome_policy() {
        let result = config_from(&[("QUIZ_WELCOME_POLICY", "always")]);
        assert!(matches!(result, Err(ConfigError::InvalidWelcomePolicy(_))));
    }
}
