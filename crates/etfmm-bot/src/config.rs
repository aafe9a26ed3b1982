//! Application configuration.

use std::path::Path;

use etfmm_mm::QuoterConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Top-level configuration, read from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds between periodic session summaries.
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,

    /// Buffered events between the reader task and the engine.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    #[serde(default)]
    pub quoter: QuoterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stats_interval_secs: default_stats_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
            quoter: QuoterConfig::default(),
        }
    }
}

fn default_stats_interval_secs() -> u64 {
    60
}
fn default_event_channel_capacity() -> usize {
    1024
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.stats_interval_secs == 0 {
            return Err(AppError::Config(
                "stats_interval_secs must be positive".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(AppError::Config(
                "event_channel_capacity must be positive".to_string(),
            ));
        }
        self.quoter.validate()?;
        Ok(())
    }
}
