//! Layered configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `<config dir>/dailyquiz/config.toml`
//! 3. An explicit TOML file (`--config`)
//! 4. `DAILYQUIZ_*` environment variables, `__` separating sections
//!    (`DAILYQUIZ_SESSION__TIME_LIMIT_SECS=120`)
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{QuestionRequest, DEFAULT_ENDPOINT};
use crate::models::Difficulty;
use crate::quiz::{SessionSettings, DEFAULT_REVEAL_DELAY, DEFAULT_TIME_LIMIT_SECS};

const APP_DIR: &str = "dailyquiz";
const ENV_PREFIX: &str = "DAILYQUIZ_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub questions: QuestionsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuestionsConfig {
    pub amount: usize,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub endpoint: String,
    /// Offline question file; replaces the HTTP source when set.
    pub file: Option<PathBuf>,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            amount: 5,
            category: Some(27),
            difficulty: Some(Difficulty::Easy),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    pub time_limit_secs: u32,
    pub reveal_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub path: Option<PathBuf>,
}

impl QuizConfig {
    /// Load from all sources, with an optional explicit config file.
    ///
    /// Not validated here; callers apply their own overrides first and then
    /// call [`validate`](Self::validate).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(explicit).extract()?)
    }

    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                figment = figment.merge(Toml::file(global));
            }
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.amount == 0 {
            return Err(ConfigError::Invalid("questions.amount must be at least 1".into()));
        }
        if self.session.time_limit_secs == 0 {
            return Err(ConfigError::Invalid(
                "session.time_limit_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn question_request(&self) -> QuestionRequest {
        QuestionRequest {
            amount: self.questions.amount,
            category: self.questions.category,
            difficulty: self.questions.difficulty,
        }
    }

    /// Session settings for an attempt titled `title`.
    pub fn session_settings(&self, title: impl Into<String>) -> SessionSettings {
        SessionSettings {
            time_limit_secs: self.session.time_limit_secs,
            reveal_delay: Duration::from_millis(self.session.reveal_delay_ms),
            title: title.into(),
        }
    }

    /// Configured history file, or the default one in the data directory.
    pub fn history_path(&self) -> PathBuf {
        self.history
            .path
            .clone()
            .unwrap_or_else(|| data_dir().join("history.json"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }
}

/// Directory for history and logs.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
