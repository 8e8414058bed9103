// src/utils/progress.rs

use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::time::Duration;

/// Configuration for the search spinner
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show a spinner at all
    pub enabled: bool,
    /// Spinner tick interval in milliseconds
    pub refresh_rate_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_rate_ms: 100,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enabled: lookup("PROGRESS_ENABLED")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.enabled),
            refresh_rate_ms: lookup("PROGRESS_REFRESH_RATE_MS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.refresh_rate_ms),
        }
    }

    /// Steady-ticking spinner on stderr if progress is enabled, None otherwise
    pub fn create_spinner(&self, message: impl Into<String>) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(self.refresh_rate_ms));
        Some(spinner)
    }
}
