use sentinel_types::{IdentityId, ReportId};
use thiserror::Error;

use crate::level::VerificationLevel;
use crate::vote::VoteKind;

/// Every way a verification request can be rejected.
///
/// All variants are permanent, input-driven rejections; the engine performs no
/// I/O and has nothing transient to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("identity {voter} reported {report} and cannot vote on it")]
    OwnerCannotVote { report: ReportId, voter: IdentityId },

    #[error("identity {voter} has used all {limit} votes on report {report}")]
    VoteLimitReached {
        report: ReportId,
        voter: IdentityId,
        limit: u32,
    },

    #[error("identity {voter} has already cast a {kind} vote on report {report}")]
    DuplicateVote {
        report: ReportId,
        voter: IdentityId,
        kind: VoteKind,
    },

    #[error("transition {from} -> {to} is not permitted")]
    InvalidTransition {
        from: VerificationLevel,
        to: VerificationLevel,
    },

    #[error("report {0} not found")]
    ReportNotFound(ReportId),

    #[error("report {0} already exists")]
    ReportExists(ReportId),

    #[error("severity {0} is out of range (0..=100)")]
    InvalidSeverity(u8),
}

/// How a caller should treat a rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A user-facing denial (voting on one's own report).
    Denied,
    /// Nothing more to do; the caller already exhausted their allowance.
    Informational,
    /// The request was already applied; repeating it has no effect.
    Idempotent,
    /// The request itself is malformed or not permitted.
    Invalid,
}

impl VerificationError {
    pub fn rejection(&self) -> Rejection {
        match self {
            Self::OwnerCannotVote { .. } => Rejection::Denied,
            Self::VoteLimitReached { .. } => Rejection::Informational,
            Self::DuplicateVote { .. } => Rejection::Idempotent,
            Self::InvalidTransition { .. }
            | Self::ReportNotFound(_)
            | Self::ReportExists(_)
            | Self::InvalidSeverity(_) => Rejection::Invalid,
        }
    }

    /// Always `false`: no rejection here is cured by retrying.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Short machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OwnerCannotVote { .. } => "OWNER_CANNOT_VOTE",
            Self::VoteLimitReached { .. } => "VOTE_LIMIT_REACHED",
            Self::DuplicateVote { .. } => "DUPLICATE_VOTE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReportNotFound(_) => "REPORT_NOT_FOUND",
            Self::ReportExists(_) => "REPORT_EXISTS",
            Self::InvalidSeverity(_) => "INVALID_SEVERITY",
        }
    }
}
