//! Tunable engine parameters.
//!
//! Defaults match the community rules: two votes per voter per report, two
//! confirmations to reach CONFIRMED, and a 500 m danger radius.

use serde::{Deserialize, Serialize};

/// Default cap on votes one identity may cast on one report.
pub const DEFAULT_MAX_VOTES_PER_VOTER: u32 = 2;

/// Default number of confirmations required for PENDING → CONFIRMED.
pub const DEFAULT_CONFIRMATION_THRESHOLD: u32 = 2;

/// Radius of the danger zone around each located incident.
pub const DANGER_RADIUS_METERS: f64 = 500.0;

/// Reported accuracy (meters) above which a fix is flagged low-confidence.
pub const DEFAULT_LOW_CONFIDENCE_ACCURACY_M: f64 = 100.0;

/// Parameters governing the vote ledger and verification levels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationParams {
    /// Combined confirm + dispute votes one voter may hold on one report.
    pub max_votes_per_voter: u32,
    /// Minimum confirmations (and strictly more than disputes) to reach CONFIRMED.
    pub confirmation_threshold: u32,
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            max_votes_per_voter: DEFAULT_MAX_VOTES_PER_VOTER,
            confirmation_threshold: DEFAULT_CONFIRMATION_THRESHOLD,
        }
    }
}

/// Parameters governing danger-zone evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProximityParams {
    /// Distance below which an observer is inside an incident's zone.
    pub danger_radius_m: f64,
    /// Accuracy above which a position fix is flagged low-confidence.
    pub low_confidence_accuracy_m: f64,
}

impl Default for ProximityParams {
    fn default() -> Self {
        Self {
            danger_radius_m: DANGER_RADIUS_METERS,
            low_confidence_accuracy_m: DEFAULT_LOW_CONFIDENCE_ACCURACY_M,
        }
    }
}
