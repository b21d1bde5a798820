//! Community verification of incident reports.
//!
//! Three pieces, combined by [`VerificationEngine`] into one atomic step per vote:
//! 1. **Vote ledger**: who voted on which report and how. One confirm slot and
//!    one dispute slot per voter, never on one's own report.
//! 2. **Trust scorer**: share of confirmations as a `0..=100` score, pinned at
//!    100 once an administrator verifies.
//! 3. **State machine**: UNVERIFIED → PENDING → CONFIRMED driven by votes,
//!    and VERIFIED reachable only by administrators. Levels never regress.

pub mod engine;
pub mod error;
pub mod ledger;
pub mod level;
pub mod outcome;
pub mod report;
pub mod scorer;
pub mod state_machine;
pub mod vote;

pub use engine::VerificationEngine;
pub use error::{Rejection, VerificationError};
pub use ledger::{VoteLedger, VoteStatus};
pub use level::{Badge, VerificationLevel};
pub use outcome::{AdminOutcome, Derivation, VoteOutcome};
pub use report::{IncidentReport, NewReport, ReportUpdate};
pub use scorer::{TrustScorer, MAX_TRUST_SCORE};
pub use state_machine::{LevelChange, TransitionCause, VerificationStateMachine};
pub use vote::{Vote, VoteKind, VoteTallies};
