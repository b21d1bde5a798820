//! Incident reports as seen by the verification engine.

use sentinel_types::{Coordinate, IdentityId, ReportId, Severity, SeverityTier, Timestamp};
use serde::{Deserialize, Serialize};

use crate::level::VerificationLevel;
use crate::vote::VoteTallies;

/// A user-submitted incident report.
///
/// `tallies`, `trust_score` and `level` are derived by the engine and only
/// change through vote casting or administrator verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: ReportId,
    pub reporter_id: IdentityId,
    pub title: String,
    pub description: String,
    /// Unlocated reports never take part in proximity monitoring.
    pub location: Option<Coordinate>,
    pub severity: Severity,
    pub tallies: VoteTallies,
    pub trust_score: u8,
    pub level: VerificationLevel,
    /// Administrator who verified the report, if any.
    pub verified_by: Option<IdentityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IncidentReport {
    pub fn severity_tier(&self) -> SeverityTier {
        self.severity.tier()
    }

    pub fn confirmation_count(&self) -> u32 {
        self.tallies.confirmations
    }

    pub fn dispute_count(&self) -> u32 {
        self.tallies.disputes
    }

    pub fn is_administrator_verified(&self) -> bool {
        self.verified_by.is_some()
    }

    /// Text shown when this report raises an alert: the title, else the
    /// description, else the id.
    pub fn headline(&self) -> &str {
        if !self.title.trim().is_empty() {
            &self.title
        } else if !self.description.trim().is_empty() {
            &self.description
        } else {
            self.id.as_str()
        }
    }
}

/// Inbound report creation event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    pub id: ReportId,
    pub reporter_id: IdentityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Coordinate>,
    /// Raw severity; validated against `0..=100` on submission.
    pub severity: u8,
}

/// Inbound report edit. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinate>,
    /// Drop the stored location. Ignored when `location` is set.
    #[serde(default)]
    pub clear_location: bool,
    #[serde(default)]
    pub severity: Option<u8>,
}
