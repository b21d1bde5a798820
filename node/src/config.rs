//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use sentinel_types::params::{
    DANGER_RADIUS_METERS, DEFAULT_CONFIRMATION_THRESHOLD, DEFAULT_LOW_CONFIDENCE_ACCURACY_M,
    DEFAULT_MAX_VOTES_PER_VOTER,
};
use sentinel_types::{ProximityParams, VerificationParams};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a Sentinel alert service.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Radius of each incident's danger zone in meters.
    #[serde(default = "default_danger_radius_m")]
    pub danger_radius_m: f64,

    /// Confirmations needed (with more confirmations than disputes) for CONFIRMED.
    #[serde(default = "default_confirmation_threshold")]
    pub confirmation_threshold: u32,

    /// Votes one identity may cast on one report, confirm and dispute combined.
    #[serde(default = "default_max_votes_per_voter")]
    pub max_votes_per_voter: u32,

    /// Position accuracy (meters) above which a fix is flagged low-confidence.
    #[serde(default = "default_low_confidence_accuracy_m")]
    pub low_confidence_accuracy_m: f64,

    /// Queued position updates per tracking session before senders wait.
    #[serde(default = "default_session_channel_capacity")]
    pub session_channel_capacity: usize,

    /// Buffered events per subscriber before slow subscribers lag.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect Prometheus metrics output.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_danger_radius_m() -> f64 {
    DANGER_RADIUS_METERS
}

fn default_confirmation_threshold() -> u32 {
    DEFAULT_CONFIRMATION_THRESHOLD
}

fn default_max_votes_per_voter() -> u32 {
    DEFAULT_MAX_VOTES_PER_VOTER
}

fn default_low_confidence_accuracy_m() -> f64 {
    DEFAULT_LOW_CONFIDENCE_ACCURACY_M
}

fn default_session_channel_capacity() -> usize {
    64
}

fn default_event_channel_capacity() -> usize {
    256
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if !(self.danger_radius_m.is_finite() && self.danger_radius_m > 0.0) {
            return Err(NodeError::Config(format!(
                "danger_radius_m must be a positive number, got {}",
                self.danger_radius_m
            )));
        }
        if self.confirmation_threshold == 0 {
            return Err(NodeError::Config(
                "confirmation_threshold must be at least 1".into(),
            ));
        }
        if self.max_votes_per_voter == 0 {
            return Err(NodeError::Config(
                "max_votes_per_voter must be at least 1".into(),
            ));
        }
        if self.low_confidence_accuracy_m.is_nan() || self.low_confidence_accuracy_m < 0.0 {
            return Err(NodeError::Config(
                "low_confidence_accuracy_m must not be negative".into(),
            ));
        }
        if self.session_channel_capacity == 0 || self.event_channel_capacity == 0 {
            return Err(NodeError::Config("channel capacities must be non-zero".into()));
        }
        Ok(())
    }

    pub fn verification_params(&self) -> VerificationParams {
        VerificationParams {
            max_votes_per_voter: self.max_votes_per_voter,
            confirmation_threshold: self.confirmation_threshold,
        }
    }

    pub fn proximity_params(&self) -> ProximityParams {
        ProximityParams {
            danger_radius_m: self.danger_radius_m,
            low_confidence_accuracy_m: self.low_confidence_accuracy_m,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            danger_radius_m: default_danger_radius_m(),
            confirmation_threshold: default_confirmation_threshold(),
            max_votes_per_voter: default_max_votes_per_voter(),
            low_confidence_accuracy_m: default_low_confidence_accuracy_m(),
            session_channel_capacity: default_session_channel_capacity(),
            event_channel_capacity: default_event_channel_capacity(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}
