//! Zone events produced by a position update.

use sentinel_types::{ReportId, SeverityTier};
use serde::{Deserialize, Serialize};

/// Raised once when the observer enters an incident's danger zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneAlert {
    pub report_id: ReportId,
    /// Human-readable alert text.
    pub message: String,
    pub distance_m: f64,
    pub tier: SeverityTier,
}

/// Everything one position update changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub entered: Vec<ZoneAlert>,
    pub cleared: Vec<ReportId>,
    /// The fix's accuracy was missing or coarse; surface a warning in the UI.
    pub low_confidence: bool,
}

impl ZoneUpdate {
    /// Whether any zone was entered or cleared.
    pub fn has_events(&self) -> bool {
        !self.entered.is_empty() || !self.cleared.is_empty()
    }
}
