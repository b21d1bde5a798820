//! Verification state machine.
//!
//! ```text
//! UNVERIFIED --first vote--> PENDING --consensus--> CONFIRMED
//!      \__________________________\____________________\__admin__> VERIFIED
//! ```
//!
//! Votes only ever move a report forward. Disputes lower the trust score but
//! never pull a level back, and nothing leaves VERIFIED.

use sentinel_types::VerificationParams;
use serde::{Deserialize, Serialize};

use crate::error::VerificationError;
use crate::level::VerificationLevel;
use crate::vote::VoteTallies;

/// What drove a level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionCause {
    Vote,
    Administrator,
}

/// A level change applied to a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub from: VerificationLevel,
    pub to: VerificationLevel,
    pub cause: TransitionCause,
}

#[derive(Clone, Debug)]
pub struct VerificationStateMachine {
    confirmation_threshold: u32,
}

impl VerificationStateMachine {
    pub fn new(params: &VerificationParams) -> Self {
        Self {
            confirmation_threshold: params.confirmation_threshold,
        }
    }

    pub fn confirmation_threshold(&self) -> u32 {
        self.confirmation_threshold
    }

    /// Whether the tallies represent community consensus.
    pub fn has_consensus(&self, tallies: VoteTallies) -> bool {
        tallies.confirmations > tallies.disputes
            && tallies.confirmations >= self.confirmation_threshold
    }

    /// Check a single edge against the transition table.
    pub fn check(
        &self,
        from: VerificationLevel,
        to: VerificationLevel,
        cause: TransitionCause,
    ) -> Result<(), VerificationError> {
        use VerificationLevel::*;
        let legal = match cause {
            TransitionCause::Vote => matches!((from, to), (Unverified, Pending) | (Pending, Confirmed)),
            TransitionCause::Administrator => to == Verified && from != Verified,
        };
        if legal {
            Ok(())
        } else {
            Err(VerificationError::InvalidTransition { from, to })
        }
    }

    /// Advance `current` as far as the tallies allow, one legal edge at a time.
    ///
    /// Returns `None` when the level does not move.
    pub fn apply_votes(
        &self,
        current: VerificationLevel,
        tallies: VoteTallies,
    ) -> Result<Option<LevelChange>, VerificationError> {
        let mut level = current;
        loop {
            let next = match level {
                VerificationLevel::Unverified if tallies.has_votes() => VerificationLevel::Pending,
                VerificationLevel::Pending if self.has_consensus(tallies) => {
                    VerificationLevel::Confirmed
                }
                _ => break,
            };
            self.check(level, next, TransitionCause::Vote)?;
            level = next;
        }
        Ok((level != current).then_some(LevelChange {
            from: current,
            to: level,
            cause: TransitionCause::Vote,
        }))
    }

    /// Apply an administrator's request to move a report to `target`.
    ///
    /// Only VERIFIED may be requested. Re-verifying a VERIFIED report is a
    /// no-op and returns `None`.
    pub fn apply_administrator(
        &self,
        current: VerificationLevel,
        target: VerificationLevel,
    ) -> Result<Option<LevelChange>, VerificationError> {
        if current == VerificationLevel::Verified && target == VerificationLevel::Verified {
            return Ok(None);
        }
        self.check(current, target, TransitionCause::Administrator)?;
        Ok(Some(LevelChange {
            from: current,
            to: target,
            cause: TransitionCause::Administrator,
        }))
    }
}

impl Default for VerificationStateMachine {
    fn default() -> Self {
        Self::new(&VerificationParams::default())
    }
}
