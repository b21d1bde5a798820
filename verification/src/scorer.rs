//! Trust scoring — a pure function from tallies and override to `0..=100`.

use crate::vote::VoteTallies;

/// Highest possible trust score; also the score of an administrator-verified report.
pub const MAX_TRUST_SCORE: u8 = 100;

/// Derives a report's trust score.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrustScorer;

impl TrustScorer {
    /// Share of confirmations among all votes, as a rounded percentage.
    ///
    /// A report with no votes scores 0. An administrator override pins the
    /// score at [`MAX_TRUST_SCORE`] whatever the tallies say.
    pub fn score(&self, tallies: VoteTallies, administrator_verified: bool) -> u8 {
        if administrator_verified {
            return MAX_TRUST_SCORE;
        }
        let total = u64::from(tallies.total());
        if total == 0 {
            return 0;
        }
        let confirmations = u64::from(tallies.confirmations);
        // round(100 * c / total), halves rounded up
        let score = (200 * confirmations + total) / (2 * total);
        score.min(u64::from(MAX_TRUST_SCORE)) as u8
    }
}
