//! Position fixes delivered by the device-location collaborator.

use sentinel_types::{Coordinate, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters, if the device reported one.
    #[serde(default)]
    pub accuracy_m: Option<f64>,
    pub timestamp: Timestamp,
}

impl PositionUpdate {
    pub fn new(coordinate: Coordinate, accuracy_m: Option<f64>, timestamp: Timestamp) -> Self {
        Self {
            coordinate,
            accuracy_m,
            timestamp,
        }
    }

    /// Whether the fix is too vague to trust without a UI warning.
    ///
    /// Missing, non-finite, negative, or coarser-than-threshold accuracy all
    /// count as low confidence. This never affects zone evaluation.
    pub fn is_low_confidence(&self, threshold_m: f64) -> bool {
        match self.accuracy_m {
            Some(a) => !a.is_finite() || a < 0.0 || a > threshold_m,
            None => true,
        }
    }
}
