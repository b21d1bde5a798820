//! The monitor's read-only view of an active incident.

use sentinel_types::{Coordinate, ReportId, SeverityTier};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: ReportId,
    /// Unlocated incidents are skipped.
    pub location: Option<Coordinate>,
    /// Headline used in the alert message.
    pub title: String,
    pub tier: SeverityTier,
}

impl Incident {
    pub fn new(
        id: ReportId,
        location: Option<Coordinate>,
        title: impl Into<String>,
        tier: SeverityTier,
    ) -> Self {
        Self {
            id,
            location,
            title: title.into(),
            tier,
        }
    }
}
