//! Results returned to callers of the verification engine.

use sentinel_types::ReportId;
use serde::{Deserialize, Serialize};

use crate::level::VerificationLevel;
use crate::state_machine::LevelChange;
use crate::vote::{VoteKind, VoteTallies};

/// A successfully recorded vote and the report state it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub report_id: ReportId,
    pub kind: VoteKind,
    pub tallies: VoteTallies,
    pub trust_score: u8,
    pub level: VerificationLevel,
    pub level_change: Option<LevelChange>,
}

/// Result of an administrator level request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOutcome {
    pub report_id: ReportId,
    pub trust_score: u8,
    pub level: VerificationLevel,
    /// `false` when the report was already verified.
    pub changed: bool,
}

/// Score and level recomputed from the ledger alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub trust_score: u8,
    pub level: VerificationLevel,
}
