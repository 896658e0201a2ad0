use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub gate: GateConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub gemini_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Fixed pause after a rate-limit error before the chain advances
    pub rate_limit_pause_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_limit: usize,
    /// Optional path to a movie snapshot; the compiled-in seed is used
    /// when unset
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub min_results: usize,
    pub year_gap: u16,
    pub recent_floor: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub max_results: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                model: "gpt-4o-mini".to_string(),
                gemini_model: "gemini-pro".to_string(),
                max_tokens: 1000,
                temperature: 0.7,
                timeout_secs: 30,
                rate_limit_pause_ms: 2000,
            },
            search: SearchConfig {
                default_limit: 5,
                snapshot_path: None,
            },
            gate: GateConfig {
                min_results: 3,
                year_gap: 4,
                recent_floor: 2020,
            },
            web: WebConfig {
                max_results: 5,
                timeout_secs: 15,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Load settings: built-in defaults, then `config/{CONFIG_ENV}.toml`
    /// if present, then `APP__`-prefixed environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let defaults = Config::try_from(&Settings::default())?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn openai_api_key() -> Option<String> {
        non_empty_env("OPENAI_API_KEY")
    }

    pub fn openai_backup_api_key() -> Option<String> {
        non_empty_env("OPENAI_API_KEY_BACKUP")
    }

    pub fn google_api_key() -> Option<String> {
        non_empty_env("GOOGLE_API_KEY")
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
