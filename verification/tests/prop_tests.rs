use proptest::prelude::*;

use sentinel_types::{IdentityId, ReportId, Timestamp};
use sentinel_verification::{
    NewReport, TrustScorer, VerificationEngine, VerificationError, VerificationLevel, VoteKind,
    VoteTallies,
};

fn engine_with_report() -> VerificationEngine {
    let engine = VerificationEngine::default();
    engine
        .submit_report(
            NewReport {
                id: ReportId::new("R"),
                reporter_id: IdentityId::new("owner"),
                title: "Incident".into(),
                description: String::new(),
                location: None,
                severity: 50,
            },
            Timestamp::new(0),
        )
        .unwrap();
    engine
}

fn kind() -> impl Strategy<Value = VoteKind> {
    prop_oneof![Just(VoteKind::Confirm), Just(VoteKind::Dispute)]
}

fn level_rank(level: VerificationLevel) -> u8 {
    match level {
        VerificationLevel::Unverified => 0,
        VerificationLevel::Pending => 1,
        VerificationLevel::Confirmed => 2,
        VerificationLevel::Verified => 3,
    }
}

proptest! {
    /// The score is a pure function of its inputs and always within 0..=100.
    #[test]
    fn score_is_deterministic_and_bounded(c in 0u32..10_000, d in 0u32..10_000, verified in any::<bool>()) {
        let tallies = VoteTallies::new(c, d);
        let first = TrustScorer.score(tallies, verified);
        prop_assert_eq!(first, TrustScorer.score(tallies, verified));
        prop_assert!(first <= 100);
        if verified {
            prop_assert_eq!(first, 100);
        }
    }

    /// However often one voter tries, they end up with at most one vote of each kind.
    #[test]
    fn one_voter_holds_at_most_one_vote_per_kind(kinds in prop::collection::vec(kind(), 1..20)) {
        let engine = engine_with_report();
        let report = ReportId::new("R");
        let voter = IdentityId::new("voter");
        let mut successes = 0;
        for k in kinds {
            if engine.cast_vote(&report, &voter, k, Timestamp::new(1)).is_ok() {
                successes += 1;
            }
        }
        prop_assert!(successes <= 2);
        let status = engine.vote_status(&report, &voter).unwrap();
        prop_assert_eq!(status.vote_count, successes);
        let tallies = engine.report(&report).unwrap().tallies;
        prop_assert!(tallies.confirmations <= 1 && tallies.disputes <= 1);
    }

    /// The reporter is always turned away.
    #[test]
    fn owner_is_always_rejected(
        history in prop::collection::vec((0u8..6, kind()), 0..20),
        owner_kind in kind(),
    ) {
        let engine = engine_with_report();
        let report = ReportId::new("R");
        for (voter, k) in history {
            let _ = engine.cast_vote(&report, &IdentityId::new(format!("v{voter}")), k, Timestamp::new(1));
        }
        let result = engine.cast_vote(&report, &IdentityId::new("owner"), owner_kind, Timestamp::new(2));
        let is_owner_rejection = matches!(result, Err(VerificationError::OwnerCannotVote { .. }));
        prop_assert!(is_owner_rejection);
    }

    /// Levels only move forward as votes arrive, and stored state always
    /// matches a replay of the ledger.
    #[test]
    fn level_never_regresses(votes in prop::collection::vec((0u8..12, kind()), 0..40)) {
        let engine = engine_with_report();
        let report = ReportId::new("R");
        let mut rank = 0;
        for (voter, k) in votes {
            let _ = engine.cast_vote(&report, &IdentityId::new(format!("v{voter}")), k, Timestamp::new(1));
            let current = engine.report(&report).unwrap();
            let next = level_rank(current.level);
            prop_assert!(next >= rank);
            rank = next;

            let derived = engine.rederive(&report).unwrap();
            prop_assert_eq!(derived.level, current.level);
            prop_assert_eq!(derived.trust_score, current.trust_score);
        }
    }

    /// Once verified by an administrator, no vote sequence moves score or level.
    #[test]
    fn administrator_override_dominates(votes in prop::collection::vec((0u8..12, kind()), 0..30)) {
        let engine = engine_with_report();
        let report = ReportId::new("R");
        engine
            .verify_by_administrator(&report, &IdentityId::new("admin"), Timestamp::new(1))
            .unwrap();
        for (voter, k) in votes {
            let _ = engine.cast_vote(&report, &IdentityId::new(format!("v{voter}")), k, Timestamp::new(2));
        }
        let current = engine.report(&report).unwrap();
        prop_assert_eq!(current.trust_score, 100);
        prop_assert_eq!(current.level, VerificationLevel::Verified);
    }
}
