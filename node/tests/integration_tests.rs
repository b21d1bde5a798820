//! Integration tests exercising the full alert pipeline:
//! report submission → votes → level and score → write-through storage,
//! and position updates → tracking session → zone events → alert cue.
//!
//! These wire the service together with nullable collaborators so the whole
//! flow runs deterministically in-process.

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use sentinel_node::{AlertEvent, AlertService, NodeConfig, NodeError};
use sentinel_nullables::{NullClock, RecordingCue};
use sentinel_proximity::PositionUpdate;
use sentinel_store::{MemoryReportStore, ReportStore, StoreError};
use sentinel_types::{Coordinate, IdentityId, ReportId, SessionId, SeverityTier, Timestamp};
use sentinel_verification::{
    IncidentReport, NewReport, ReportUpdate, VerificationError, VerificationLevel, VoteKind,
    VoteTallies,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const FAR: Coordinate = Coordinate::new(10.010, 106.010);
const NEAR: Coordinate = Coordinate::new(10.0005, 106.0005);

struct Harness {
    service: AlertService,
    store: Arc<MemoryReportStore>,
    clock: Arc<NullClock>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryReportStore::new());
    let clock = Arc::new(NullClock::new(1_000));
    let service = AlertService::new(
        NodeConfig::default(),
        Arc::clone(&store) as Arc<dyn ReportStore>,
        Arc::clone(&clock) as Arc<dyn sentinel_types::Clock>,
    )
    .expect("service");
    Harness {
        service,
        store,
        clock,
    }
}

fn id(s: &str) -> IdentityId {
    IdentityId::new(s)
}

fn report_r() -> NewReport {
    NewReport {
        id: ReportId::new("R"),
        reporter_id: id("A"),
        title: "Armed robbery".into(),
        description: "Two people on a motorbike".into(),
        location: Some(Coordinate::new(10.000, 106.000)),
        severity: 80,
    }
}

fn fix(coordinate: Coordinate, t: u64) -> PositionUpdate {
    PositionUpdate::new(coordinate, Some(8.0), Timestamp::new(t))
}

// ---------------------------------------------------------------------------
// Verification flow
// ---------------------------------------------------------------------------

#[test]
fn two_confirmations_reach_confirmed() {
    let h = harness();
    let r = ReportId::new("R");
    let report = h.service.submit_report(report_r()).unwrap();
    assert_eq!(report.severity_tier(), SeverityTier::High);
    assert_eq!(report.level, VerificationLevel::Unverified);
    assert_eq!(report.trust_score, 0);

    let first = h.service.cast_vote(&r, &id("B"), VoteKind::Confirm).unwrap();
    assert_eq!(first.tallies, VoteTallies::new(1, 0));
    assert_eq!(first.trust_score, 100);
    assert_eq!(first.level, VerificationLevel::Pending);

    let second = h.service.cast_vote(&r, &id("C"), VoteKind::Confirm).unwrap();
    assert_eq!(second.tallies, VoteTallies::new(2, 0));
    assert_eq!(second.trust_score, 100);
    assert_eq!(second.level, VerificationLevel::Confirmed);

    let stored = h.store.get_report(&r).unwrap();
    assert_eq!(stored.level, VerificationLevel::Confirmed);
    assert_eq!(stored.tallies, VoteTallies::new(2, 0));
    assert!(h.service.audit(&r).unwrap());
}

#[test]
fn duplicate_then_limit_rejections() {
    let h = harness();
    let r = ReportId::new("R");
    h.service.submit_report(report_r()).unwrap();

    h.service.cast_vote(&r, &id("B"), VoteKind::Confirm).unwrap();

    let err = h
        .service
        .cast_vote(&r, &id("B"), VoteKind::Confirm)
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(VerificationError::DuplicateVote { .. })
    ));

    let disputed = h.service.cast_vote(&r, &id("B"), VoteKind::Dispute).unwrap();
    assert_eq!(disputed.tallies, VoteTallies::new(1, 1));
    assert_eq!(disputed.trust_score, 50);

    let err = h
        .service
        .cast_vote(&r, &id("B"), VoteKind::Confirm)
        .unwrap_err();
    assert_eq!(err.as_rejection().map(|e| e.code()), Some("VOTE_LIMIT_REACHED"));

    let status = h.service.vote_status(&r, &id("B")).unwrap();
    assert_eq!(status.vote_count, 2);
    assert!(!status.can_vote);

    assert_eq!(h.service.metrics().votes_accepted.get(), 2);
    assert_eq!(h.service.metrics().votes_rejected.get(), 2);
}

#[test]
fn owner_cannot_vote_and_nothing_changes() {
    let h = harness();
    let r = ReportId::new("R");
    h.service.submit_report(report_r()).unwrap();

    let err = h
        .service
        .cast_vote(&r, &id("A"), VoteKind::Confirm)
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(VerificationError::OwnerCannotVote { .. })
    ));
    let report = h.service.report(&r).unwrap();
    assert_eq!(report.tallies, VoteTallies::default());
    assert_eq!(report.level, VerificationLevel::Unverified);
}

#[test]
fn administrator_verification_pins_score() {
    let h = harness();
    let r = ReportId::new("R");
    h.service.submit_report(report_r()).unwrap();
    h.service.cast_vote(&r, &id("B"), VoteKind::Dispute).unwrap();
    assert_eq!(h.service.report(&r).unwrap().trust_score, 0);

    h.clock.advance(60);
    let outcome = h.service.verify_report(&r, &id("admin")).unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.level, VerificationLevel::Verified);
    assert_eq!(outcome.trust_score, 100);

    // Later disputes are recorded but do not move a verified report.
    let after = h.service.cast_vote(&r, &id("C"), VoteKind::Dispute).unwrap();
    assert_eq!(after.tallies, VoteTallies::new(0, 2));
    assert_eq!(after.trust_score, 100);
    assert_eq!(after.level, VerificationLevel::Verified);

    let again = h.service.verify_report(&r, &id("other-admin")).unwrap();
    assert!(!again.changed);
    let stored = h.store.get_report(&r).unwrap();
    assert_eq!(stored.verified_by, Some(id("admin")));
    assert_eq!(stored.updated_at, Timestamp::new(1_060));
    assert_eq!(h.service.metrics().admin_verifications.get(), 1);
}

#[test]
fn admin_cannot_request_lower_levels() {
    let h = harness();
    let r = ReportId::new("R");
    h.service.submit_report(report_r()).unwrap();
    let err = h
        .service
        .request_admin_level(&r, &id("admin"), VerificationLevel::Confirmed)
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(VerificationError::InvalidTransition { .. })
    ));
}

#[test]
fn unknown_report_and_duplicate_submission() {
    let h = harness();
    let err = h
        .service
        .cast_vote(&ReportId::new("missing"), &id("B"), VoteKind::Confirm)
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(VerificationError::ReportNotFound(_))
    ));

    h.service.submit_report(report_r()).unwrap();
    let err = h.service.submit_report(report_r()).unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(VerificationError::ReportExists(_))
    ));
    assert_eq!(h.store.report_count().unwrap(), 1);
}

#[test]
fn report_edit_is_written_through() {
    let h = harness();
    let r = ReportId::new("R");
    h.service.submit_report(report_r()).unwrap();
    h.service
        .update_report(
            &r,
            ReportUpdate {
                severity: Some(10),
                ..ReportUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(
        h.store.get_report(&r).unwrap().severity_tier(),
        SeverityTier::Low
    );
}

#[tokio::test]
async fn report_changes_are_published() {
    let h = harness();
    let mut events = h.service.subscribe();
    h.service.submit_report(report_r()).unwrap();
    h.service
        .cast_vote(&ReportId::new("R"), &id("B"), VoteKind::Confirm)
        .unwrap();

    let mut levels = Vec::new();
    for _ in 0..2 {
        match events.recv().await.unwrap() {
            AlertEvent::ReportUpdated { report } => levels.push(report.level),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        levels,
        vec![VerificationLevel::Unverified, VerificationLevel::Pending]
    );
}

// ---------------------------------------------------------------------------
// Concurrent votes
// ---------------------------------------------------------------------------

/// Store that holds the first write of a single-vote snapshot until released.
struct GatedStore {
    inner: MemoryReportStore,
    parked: Mutex<Option<mpsc::Sender<()>>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl ReportStore for GatedStore {
    fn put_report(&self, report: &IncidentReport) -> Result<(), StoreError> {
        if report.tallies.total() == 1 {
            if let Some(parked) = self.parked.lock().unwrap().take() {
                parked.send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
        }
        self.inner.put_report(report)
    }

    fn get_report(&self, id: &ReportId) -> Result<IncidentReport, StoreError> {
        self.inner.get_report(id)
    }

    fn exists(&self, id: &ReportId) -> Result<bool, StoreError> {
        self.inner.exists(id)
    }

    fn report_count(&self) -> Result<u64, StoreError> {
        self.inner.report_count()
    }
}

#[test]
fn stalled_write_does_not_leave_store_behind_engine() {
    let (parked_tx, parked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let store = Arc::new(GatedStore {
        inner: MemoryReportStore::new(),
        parked: Mutex::new(Some(parked_tx)),
        release: Mutex::new(release_rx),
    });
    let service = AlertService::new(
        NodeConfig::default(),
        Arc::clone(&store) as Arc<dyn ReportStore>,
        Arc::new(NullClock::new(1_000)),
    )
    .unwrap();
    let mut events = service.subscribe();
    let r = ReportId::new("R");
    service.submit_report(report_r()).unwrap();

    std::thread::scope(|s| {
        let first = s.spawn(|| service.cast_vote(&r, &id("B"), VoteKind::Confirm));
        parked_rx.recv().unwrap();
        let second = s.spawn(|| service.cast_vote(&r, &id("C"), VoteKind::Confirm));
        std::thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();
        first.join().unwrap().unwrap();
        second.join().unwrap().unwrap();
    });

    let engine = service.report(&r).unwrap();
    let stored = store.get_report(&r).unwrap();
    assert_eq!(engine.tallies, VoteTallies::new(2, 0));
    assert_eq!(engine.level, VerificationLevel::Confirmed);
    assert_eq!(stored, engine);

    let mut levels = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let AlertEvent::ReportUpdated { report } = event {
            levels.push(report.level);
        }
    }
    assert_eq!(
        levels,
        vec![
            VerificationLevel::Unverified,
            VerificationLevel::Pending,
            VerificationLevel::Confirmed,
        ]
    );
}

// ---------------------------------------------------------------------------
// Proximity flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enter_once_stay_then_clear() {
    let h = harness();
    h.service.submit_report(report_r()).unwrap();
    let cue = RecordingCue::new();
    let session = SessionId::new("observer-1");
    h.service
        .start_tracking(session.clone(), Box::new(cue.clone()))
        .await
        .unwrap();
    let mut events = h.service.subscribe();

    let start = h.service.push_position(&session, fix(FAR, 0)).await.unwrap();
    assert!(!start.has_events());

    let entered = h.service.push_position(&session, fix(NEAR, 1)).await.unwrap();
    assert_eq!(entered.entered.len(), 1);
    assert_eq!(entered.entered[0].report_id, ReportId::new("R"));
    assert_eq!(entered.entered[0].tier, SeverityTier::High);

    for t in 2..7 {
        let update = h.service.push_position(&session, fix(NEAR, t)).await.unwrap();
        assert!(!update.has_events(), "repeat fix at t={t} produced events");
    }
    assert_eq!(
        h.service.zone_membership(&session).await.unwrap(),
        vec![ReportId::new("R")]
    );

    let cleared = h.service.push_position(&session, fix(FAR, 7)).await.unwrap();
    assert_eq!(cleared.cleared, vec![ReportId::new("R")]);

    assert_eq!(cue.fired_ids(), vec![ReportId::new("R")]);

    match events.recv().await.unwrap() {
        AlertEvent::ZoneEntered { session: s, alert } => {
            assert_eq!(s, session);
            assert!(alert.message.contains("Armed robbery"));
        }
        other => panic!("unexpected event {other:?}"),
    }
    match events.recv().await.unwrap() {
        AlertEvent::ZoneCleared { report_id, .. } => assert_eq!(report_id, ReportId::new("R")),
        other => panic!("unexpected event {other:?}"),
    }

    h.service.stop_tracking(&session).await.unwrap();
    assert_eq!(h.service.session_count().await, 0);
    assert_eq!(h.service.metrics().zone_entries.get(), 1);
    assert_eq!(h.service.metrics().zone_clears.get(), 1);
}

#[tokio::test]
async fn sessions_are_independent() {
    let h = harness();
    h.service.submit_report(report_r()).unwrap();
    let near = SessionId::new("near");
    let far = SessionId::new("far");
    let near_cue = RecordingCue::new();
    let far_cue = RecordingCue::new();
    h.service
        .start_tracking(near.clone(), Box::new(near_cue.clone()))
        .await
        .unwrap();
    h.service
        .start_tracking(far.clone(), Box::new(far_cue.clone()))
        .await
        .unwrap();
    assert_eq!(h.service.metrics().active_sessions.get(), 2);

    h.service.push_position(&near, fix(NEAR, 0)).await.unwrap();
    h.service.push_position(&far, fix(FAR, 0)).await.unwrap();

    assert_eq!(near_cue.count(), 1);
    assert_eq!(far_cue.count(), 0);
    assert!(h.service.zone_membership(&far).await.unwrap().is_empty());

    h.service.shutdown().await;
    assert_eq!(h.service.session_count().await, 0);
}

#[tokio::test]
async fn incident_submitted_mid_session_is_picked_up() {
    let h = harness();
    let session = SessionId::new("s");
    h.service
        .start_tracking(session.clone(), Box::new(RecordingCue::new()))
        .await
        .unwrap();

    let before = h.service.push_position(&session, fix(NEAR, 0)).await.unwrap();
    assert!(!before.has_events());

    h.service.submit_report(report_r()).unwrap();
    let after = h.service.push_position(&session, fix(NEAR, 1)).await.unwrap();
    assert_eq!(after.entered.len(), 1);
}

#[tokio::test]
async fn clearing_location_keeps_membership() {
    let h = harness();
    let r = ReportId::new("R");
    h.service.submit_report(report_r()).unwrap();
    let session = SessionId::new("s");
    h.service
        .start_tracking(session.clone(), Box::new(RecordingCue::new()))
        .await
        .unwrap();
    h.service.push_position(&session, fix(NEAR, 0)).await.unwrap();

    h.service
        .update_report(
            &r,
            ReportUpdate {
                clear_location: true,
                ..ReportUpdate::default()
            },
        )
        .unwrap();
    let update = h.service.push_position(&session, fix(FAR, 1)).await.unwrap();
    assert!(!update.has_events());
    assert_eq!(h.service.zone_membership(&session).await.unwrap(), vec![r]);
}

#[tokio::test]
async fn low_confidence_fix_still_alerts() {
    let h = harness();
    h.service.submit_report(report_r()).unwrap();
    let session = SessionId::new("s");
    h.service
        .start_tracking(session.clone(), Box::new(RecordingCue::new()))
        .await
        .unwrap();
    let update = h
        .service
        .push_position(&session, PositionUpdate::new(NEAR, Some(350.0), Timestamp::new(0)))
        .await
        .unwrap();
    assert!(update.low_confidence);
    assert_eq!(update.entered.len(), 1);
    assert_eq!(h.service.metrics().low_confidence_fixes.get(), 1);
}

#[tokio::test]
async fn session_lifecycle_errors() {
    let h = harness();
    let session = SessionId::new("s");
    let missing = h
        .service
        .push_position(&session, fix(FAR, 0))
        .await
        .unwrap_err();
    assert!(matches!(missing, NodeError::SessionNotFound(_)));

    h.service
        .start_tracking(session.clone(), Box::new(RecordingCue::new()))
        .await
        .unwrap();
    let dup = h
        .service
        .start_tracking(session.clone(), Box::new(RecordingCue::new()))
        .await
        .unwrap_err();
    assert!(matches!(dup, NodeError::SessionExists(_)));

    h.service.stop_tracking(&session).await.unwrap();
    let stopped = h.service.stop_tracking(&session).await.unwrap_err();
    assert!(matches!(stopped, NodeError::SessionNotFound(_)));
}
