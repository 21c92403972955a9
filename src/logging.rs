//! Injectable logging port.
//!
//! Every `Flow` and `Destination` receives a `NavigationLogger` at construction
//! instead of reaching for a process-wide logger. The logger filters by
//! category and forwards to `tracing`, so whichever subscriber the host installs
//! (or none, in tests) decides where the output goes.

use crate::config::LoggingOptions;
use crate::error::NavigationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The area of the engine a log line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Flow,
    Destination,
    Group,
    Interactor,
    Path,
}

impl LogCategory {
    pub const ALL: [LogCategory; 5] = [
        LogCategory::Flow,
        LogCategory::Destination,
        LogCategory::Group,
        LogCategory::Interactor,
        LogCategory::Path,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Flow => "flow",
            LogCategory::Destination => "destination",
            LogCategory::Group => "group",
            LogCategory::Interactor => "interactor",
            LogCategory::Path => "path",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cheap, cloneable handle that forwards categorized messages to `tracing`.
#[derive(Debug, Clone)]
pub struct NavigationLogger {
    enabled: bool,
    categories: u8,
    label: Arc<str>,
}

impl NavigationLogger {
    /// A logger with every category enabled.
    pub fn new(label: &str) -> Self {
        Self {
            enabled: true,
            categories: LogCategory::ALL.iter().fold(0, |bits, c| bits | c.bit()),
            label: Arc::from(label),
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            categories: 0,
            label: Arc::from("navflow"),
        }
    }

    pub fn from_options(options: &LoggingOptions) -> Self {
        Self {
            enabled: options.enabled,
            categories: options.categories.iter().fold(0, |bits, c| bits | c.bit()),
            label: Arc::from(options.label.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self, category: LogCategory) -> bool {
        self.enabled && self.categories & category.bit() != 0
    }

    pub fn debug(&self, category: LogCategory, message: impl fmt::Display) {
        if self.is_enabled(category) {
            tracing::debug!(
                target: "navflow",
                flow = %self.label,
                category = category.as_str(),
                "{}",
                message
            );
        }
    }

    pub fn trace(&self, category: LogCategory, message: impl fmt::Display) {
        if self.is_enabled(category) {
            tracing::trace!(
                target: "navflow",
                flow = %self.label,
                category = category.as_str(),
                "{}",
                message
            );
        }
    }

    /// Logs a recoverable error along with what was being attempted.
    pub fn error(&self, category: LogCategory, context: impl fmt::Display, error: &NavigationError) {
        if self.is_enabled(category) {
            tracing::warn!(
                target: "navflow",
                flow = %self.label,
                category = category.as_str(),
                error = %error,
                "{} failed: {}",
                context,
                error
            );
        }
    }
}

impl Default for NavigationLogger {
    fn default() -> Self {
        Self::new("navflow")
    }
}
