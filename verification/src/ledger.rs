//! Vote ledger — the authoritative record of who voted on one report and how.

use sentinel_types::{IdentityId, ReportId, Timestamp, VerificationParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::VerificationError;
use crate::vote::{Vote, VoteKind, VoteTallies};

/// The confirm and dispute slots one voter holds on one report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct VoterSlots {
    confirmed: bool,
    disputed: bool,
}

impl VoterSlots {
    fn count(&self) -> u32 {
        u32::from(self.confirmed) + u32::from(self.disputed)
    }

    fn holds(&self, kind: VoteKind) -> bool {
        match kind {
            VoteKind::Confirm => self.confirmed,
            VoteKind::Dispute => self.disputed,
        }
    }

    fn fill(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Confirm => self.confirmed = true,
            VoteKind::Dispute => self.disputed = true,
        }
    }
}

/// Snapshot of one voter's standing on one report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    pub has_confirmed: bool,
    pub has_disputed: bool,
    pub vote_count: u32,
    pub can_vote: bool,
    pub is_owner: bool,
}

/// Votes cast on a single report.
///
/// The ledger does not lock; the engine serializes access per report so that
/// the existence check and the write happen under one guard.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    slots: HashMap<IdentityId, VoterSlots>,
    votes: Vec<Vote>,
    tallies: VoteTallies,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote, enforcing (in order) owner exclusion, the per-voter cap,
    /// and one vote per kind.
    pub fn cast(
        &mut self,
        report: &ReportId,
        reporter: &IdentityId,
        voter: &IdentityId,
        kind: VoteKind,
        now: Timestamp,
        params: &VerificationParams,
    ) -> Result<VoteTallies, VerificationError> {
        self.check(report, reporter, voter, kind, params)?;
        Ok(self.record(voter, kind, now))
    }

    /// Run the admission checks without writing anything.
    pub fn check(
        &self,
        report: &ReportId,
        reporter: &IdentityId,
        voter: &IdentityId,
        kind: VoteKind,
        params: &VerificationParams,
    ) -> Result<(), VerificationError> {
        if voter == reporter {
            return Err(VerificationError::OwnerCannotVote {
                report: report.clone(),
                voter: voter.clone(),
            });
        }

        let slots = self.slots.get(voter).copied().unwrap_or_default();
        if slots.count() >= params.max_votes_per_voter {
            return Err(VerificationError::VoteLimitReached {
                report: report.clone(),
                voter: voter.clone(),
                limit: params.max_votes_per_voter,
            });
        }
        if slots.holds(kind) {
            return Err(VerificationError::DuplicateVote {
                report: report.clone(),
                voter: voter.clone(),
                kind,
            });
        }
        Ok(())
    }

    /// Write a vote that has already passed [`VoteLedger::check`].
    pub(crate) fn record(&mut self, voter: &IdentityId, kind: VoteKind, now: Timestamp) -> VoteTallies {
        self.slots.entry(voter.clone()).or_default().fill(kind);
        self.votes.push(Vote {
            voter: voter.clone(),
            kind,
            cast_at: now,
        });
        self.tallies.record(kind);
        self.tallies
    }

    pub fn status(
        &self,
        reporter: &IdentityId,
        voter: &IdentityId,
        params: &VerificationParams,
    ) -> VoteStatus {
        let slots = self.slots.get(voter).copied().unwrap_or_default();
        let is_owner = voter == reporter;
        let vote_count = slots.count();
        VoteStatus {
            has_confirmed: slots.confirmed,
            has_disputed: slots.disputed,
            vote_count,
            can_vote: !is_owner && vote_count < params.max_votes_per_voter,
            is_owner,
        }
    }

    pub fn tallies(&self) -> VoteTallies {
        self.tallies
    }

    /// All recorded votes in arrival order.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }
}
