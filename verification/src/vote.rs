//! Vote kinds, recorded votes, and per-report tallies.

use sentinel_types::{IdentityId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A voter's opinion on a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteKind {
    /// The voter vouches that the incident happened as reported.
    Confirm,
    /// The voter contests the report.
    Dispute,
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirm => f.write_str("CONFIRM"),
            Self::Dispute => f.write_str("DISPUTE"),
        }
    }
}

/// A single recorded vote, kept in arrival order by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: IdentityId,
    pub kind: VoteKind,
    pub cast_at: Timestamp,
}

/// Confirmation and dispute counts for one report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTallies {
    pub confirmations: u32,
    pub disputes: u32,
}

impl VoteTallies {
    pub fn new(confirmations: u32, disputes: u32) -> Self {
        Self {
            confirmations,
            disputes,
        }
    }

    pub fn total(&self) -> u32 {
        self.confirmations + self.disputes
    }

    pub fn has_votes(&self) -> bool {
        self.total() > 0
    }

    pub(crate) fn record(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Confirm => self.confirmations += 1,
            VoteKind::Dispute => self.disputes += 1,
        }
    }
}

impl fmt::Display for VoteTallies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.confirmations, self.disputes)
    }
}
