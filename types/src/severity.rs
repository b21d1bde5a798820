//! Report severity and its display tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Upper bound (exclusive) of the low tier.
pub const LOW_TIER_CEILING: u8 = 34;
/// Upper bound (exclusive) of the medium tier.
pub const MEDIUM_TIER_CEILING: u8 = 67;

/// Ordinal severity in `0..=100`, set by the reporter at creation or edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, TypesError> {
        if value > Self::MAX {
            return Err(TypesError::SeverityOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn tier(&self) -> SeverityTier {
        SeverityTier::from_severity(self.0)
    }
}

impl TryFrom<u8> for Severity {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> Self {
        s.0
    }
}

/// Coarse severity bucket used to color incidents on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub fn from_severity(value: u8) -> Self {
        if value < LOW_TIER_CEILING {
            Self::Low
        } else if value < MEDIUM_TIER_CEILING {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Marker color for the map layer.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#f5c542",
            Self::Medium => "#f28c28",
            Self::High => "#d7263d",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(SeverityTier::from_severity(0), SeverityTier::Low);
        assert_eq!(SeverityTier::from_severity(33), SeverityTier::Low);
        assert_eq!(SeverityTier::from_severity(34), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_severity(66), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_severity(67), SeverityTier::High);
        assert_eq!(SeverityTier::from_severity(100), SeverityTier::High);
    }

    #[test]
    fn severity_rejects_above_hundred() {
        assert!(Severity::new(100).is_ok());
        assert_eq!(Severity::new(101), Err(TypesError::SeverityOutOfRange(101)));
    }

    #[test]
    fn severity_eighty_is_high() {
        assert_eq!(Severity::new(80).unwrap().tier(), SeverityTier::High);
    }

    #[test]
    fn deserialize_validates_range() {
        assert!(serde_json::from_str::<Severity>("42").is_ok());
        assert!(serde_json::from_str::<Severity>("150").is_err());
    }

    #[test]
    fn every_tier_has_a_color() {
        for tier in [SeverityTier::Low, SeverityTier::Medium, SeverityTier::High] {
            assert!(tier.color().starts_with('#'));
        }
    }
}
