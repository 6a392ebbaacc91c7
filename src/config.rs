use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{AutoTranslateError, Result};

fn default_api_key_env() -> String {
    "DEEPL_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_queue_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locales: LocaleConfig,
    pub translator: TranslatorConfig,
    pub queue: QueueConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Every locale records are translated into
    pub supported: Vec<String>,
    /// Source locale assumed for records that do not declare one
    pub default_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// DeepL base URL; derived from the key type when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API key stored in the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is absent
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// HTTP timeout for a single translation request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue translations on a background worker instead of running them inline
    pub enabled: bool,
    /// Maximum number of pending jobs
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory of the dedicated translation log
    pub dir: String,
    /// File name prefix of the daily-rotated log
    pub file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locales: LocaleConfig {
                supported: vec!["en".to_string(), "fr".to_string(), "de".to_string()],
                default_source: "en".to_string(),
            },
            translator: TranslatorConfig {
                endpoint: None,
                api_key: None,
                api_key_env: default_api_key_env(),
                timeout_secs: default_timeout_secs(),
            },
            queue: QueueConfig {
                enabled: true,
                capacity: default_queue_capacity(),
            },
            logging: LoggingConfig {
                dir: ".auto-translate/log".to_string(),
                file: "translation-service.log".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AutoTranslateError::Configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AutoTranslateError::Configuration(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AutoTranslateError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AutoTranslateError::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.locales.supported.iter().all(|l| l.trim().is_empty()) {
            return Err(AutoTranslateError::Configuration(
                "At least one supported locale is required".to_string(),
            ));
        }
        if self.locales.default_source.trim().is_empty() {
            return Err(AutoTranslateError::Configuration(
                "Default source locale must not be empty".to_string(),
            ));
        }
        if self.queue.enabled && self.queue.capacity == 0 {
            return Err(AutoTranslateError::Configuration(
                "Queue capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
