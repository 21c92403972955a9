use crate::error::ConfigError;
use crate::logging::LogCategory;
use serde::Deserialize;
use std::fs;

/// Behavioural switches for a `Flow`, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid options document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    pub logging: LoggingOptions,
    /// System-navigation requests (back, dismiss) always wait for `activate_completion_closure`.
    pub delay_system_navigation: bool,
    /// A failed path step drops the rest of the queue. When false the step is skipped.
    pub abort_path_on_failure: bool,
    /// Requests arriving while a path is in flight are queued behind it.
    pub serialize_requests_during_path: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            logging: LoggingOptions::default(),
            delay_system_navigation: true,
            abort_path_on_failure: true,
            serialize_requests_during_path: true,
        }
    }
}

impl FlowOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    pub enabled: bool,
    pub categories: Vec<LogCategory>,
    /// Attached to every log line so several flows can share one subscriber.
    pub label: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            categories: LogCategory::ALL.to_vec(),
            label: "navflow".to_string(),
        }
    }
}
