//! Verification levels and their display badges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete summary of a report's trust state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationLevel {
    /// No votes yet.
    Unverified,
    /// Has votes, but not enough consensus.
    Pending,
    /// Community consensus reached.
    Confirmed,
    /// Verified by an administrator. Terminal.
    Verified,
}

/// Label and color shown next to a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
}

impl VerificationLevel {
    pub const ALL: [Self; 4] = [
        Self::Unverified,
        Self::Pending,
        Self::Confirmed,
        Self::Verified,
    ];

    pub fn badge(&self) -> Badge {
        match self {
            Self::Unverified => Badge {
                label: "Unverified",
                color: "#9e9e9e",
            },
            Self::Pending => Badge {
                label: "Pending review",
                color: "#f0ad4e",
            },
            Self::Confirmed => Badge {
                label: "Community confirmed",
                color: "#2e86de",
            },
            Self::Verified => Badge {
                label: "Verified",
                color: "#27ae60",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "UNVERIFIED",
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Verified => "VERIFIED",
        }
    }
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
