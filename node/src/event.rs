//! Events published by the alert service for subscribers.

use sentinel_proximity::ZoneAlert;
use sentinel_types::{ReportId, SessionId};
use sentinel_verification::IncidentReport;
use serde::{Deserialize, Serialize};

/// Service-level events fanned out over a broadcast channel.
///
/// Subscribers that fall behind by more than the configured channel capacity
/// miss the oldest events and receive a lag notice instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    /// A report was submitted, edited, voted on, or verified.
    ReportUpdated { report: IncidentReport },
    /// An observer session entered an incident's danger zone.
    ZoneEntered { session: SessionId, alert: ZoneAlert },
    /// An observer session left a danger zone, or the incident went away.
    ZoneCleared {
        session: SessionId,
        report_id: ReportId,
    },
}

impl AlertEvent {
    /// The report this event concerns.
    pub fn report_id(&self) -> &ReportId {
        match self {
            Self::ReportUpdated { report } => &report.id,
            Self::ZoneEntered { alert, .. } => &alert.report_id,
            Self::ZoneCleared { report_id, .. } => report_id,
        }
    }
}
