//! The alert service: one verification engine shared by many tracking sessions.
//!
//! Report mutations run synchronously against the engine and are written
//! through to the [`ReportStore`] while the engine still holds the report's
//! lock. Position tracking runs in per-session tokio
//! tasks (see [`crate::session`]). Every change is published on a broadcast
//! channel obtained from [`AlertService::subscribe`].

use std::collections::HashMap;
use std::sync::Arc;

use sentinel_proximity::{AlertCue, PositionUpdate, ProximityMonitor, ZoneUpdate};
use sentinel_store::ReportStore;
use sentinel_types::{Clock, IdentityId, ReportId, SessionId};
use sentinel_verification::{
    AdminOutcome, IncidentReport, NewReport, ReportUpdate, VerificationEngine, VerificationLevel,
    VoteKind, VoteOutcome, VoteStatus,
};
use tokio::sync::{broadcast, oneshot, Mutex};
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::event::AlertEvent;
use crate::metrics::NodeMetrics;
use crate::session::{self, SessionCommand, SessionContext, SessionHandle};
use crate::NodeError;

pub struct AlertService {
    config: NodeConfig,
    engine: Arc<VerificationEngine>,
    store: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
    metrics: Arc<NodeMetrics>,
    events: broadcast::Sender<AlertEvent>,
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl AlertService {
    pub fn new(
        config: NodeConfig,
        store: Arc<dyn ReportStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let engine = Arc::new(VerificationEngine::new(config.verification_params()));
        let metrics = Arc::new(NodeMetrics::new()?);
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        info!(
            danger_radius_m = config.danger_radius_m,
            confirmation_threshold = config.confirmation_threshold,
            "alert service initialised"
        );
        Ok(Self {
            config,
            engine,
            store,
            clock,
            metrics,
            events,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn engine(&self) -> &VerificationEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    /// Subscribe to report and zone events from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.events.subscribe()
    }

    // ── Reports ───────────────────────────────────────────────────────

    pub fn submit_report(&self, new: NewReport) -> Result<IncidentReport, NodeError> {
        let mut persisted = Ok(());
        let report = self
            .engine
            .submit_report_with(new, self.clock.now(), |r| persisted = self.persist(r))?;
        self.metrics.reports_submitted.inc();
        self.metrics.tracked_reports.set(self.engine.len() as i64);
        persisted?;
        Ok(report)
    }

    pub fn update_report(
        &self,
        report_id: &ReportId,
        update: ReportUpdate,
    ) -> Result<IncidentReport, NodeError> {
        let mut persisted = Ok(());
        let report = self
            .engine
            .update_report_with(report_id, update, self.clock.now(), |r| {
                persisted = self.persist(r)
            })?;
        persisted?;
        Ok(report)
    }

    pub fn report(&self, report_id: &ReportId) -> Result<IncidentReport, NodeError> {
        Ok(self.engine.report(report_id)?)
    }

    /// Every report the engine knows, ordered by id.
    pub fn active_incidents(&self) -> Vec<IncidentReport> {
        self.engine.reports()
    }

    // ── Votes ─────────────────────────────────────────────────────────

    pub fn cast_vote(
        &self,
        report_id: &ReportId,
        voter: &IdentityId,
        kind: VoteKind,
    ) -> Result<VoteOutcome, NodeError> {
        let mut persisted = Ok(());
        let result = self
            .engine
            .cast_vote_with(report_id, voter, kind, self.clock.now(), |r| {
                persisted = self.persist(r)
            });
        match result {
            Ok(outcome) => {
                self.metrics.votes_accepted.inc();
                persisted?;
                Ok(outcome)
            }
            Err(e) => {
                self.metrics.votes_rejected.inc();
                Err(e.into())
            }
        }
    }

    pub fn vote_status(
        &self,
        report_id: &ReportId,
        voter: &IdentityId,
    ) -> Result<VoteStatus, NodeError> {
        Ok(self.engine.vote_status(report_id, voter)?)
    }

    // ── Administrator ─────────────────────────────────────────────────

    pub fn verify_report(
        &self,
        report_id: &ReportId,
        administrator: &IdentityId,
    ) -> Result<AdminOutcome, NodeError> {
        self.request_admin_level(report_id, administrator, VerificationLevel::Verified)
    }

    pub fn request_admin_level(
        &self,
        report_id: &ReportId,
        administrator: &IdentityId,
        target: VerificationLevel,
    ) -> Result<AdminOutcome, NodeError> {
        let mut persisted = Ok(());
        let outcome = self.engine.request_admin_level_with(
            report_id,
            administrator,
            target,
            self.clock.now(),
            |r| persisted = self.persist(r),
        )?;
        if outcome.changed {
            self.metrics.admin_verifications.inc();
        }
        persisted?;
        Ok(outcome)
    }

    /// Check the stored score and level against a replay of the vote ledger.
    pub fn audit(&self, report_id: &ReportId) -> Result<bool, NodeError> {
        let report = self.engine.report(report_id)?;
        let derived = self.engine.rederive(report_id)?;
        let consistent = derived.trust_score == report.trust_score && derived.level == report.level;
        if !consistent {
            warn!(
                report = %report_id,
                stored_score = report.trust_score,
                derived_score = derived.trust_score,
                "report state disagrees with its vote ledger"
            );
        }
        Ok(consistent)
    }

    // ── Tracking sessions ─────────────────────────────────────────────

    /// Start a tracking session with its own proximity monitor.
    pub async fn start_tracking(
        &self,
        session: SessionId,
        cue: Box<dyn AlertCue>,
    ) -> Result<(), NodeError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session) {
            return Err(NodeError::SessionExists(session));
        }
        let monitor = ProximityMonitor::with_cue(self.config.proximity_params(), cue);
        let ctx = SessionContext {
            engine: Arc::clone(&self.engine),
            metrics: Arc::clone(&self.metrics),
            events: self.events.clone(),
        };
        let handle = session::spawn_session(
            session.clone(),
            monitor,
            ctx,
            self.config.session_channel_capacity,
        );
        sessions.insert(session, handle);
        self.metrics.active_sessions.set(sessions.len() as i64);
        Ok(())
    }

    /// Deliver a position fix to a session and wait for its evaluation.
    pub async fn push_position(
        &self,
        session: &SessionId,
        update: PositionUpdate,
    ) -> Result<ZoneUpdate, NodeError> {
        let (reply, answer) = oneshot::channel();
        self.send(session, SessionCommand::Position { update, reply })
            .await?;
        answer
            .await
            .map_err(|_| NodeError::SessionClosed(session.clone()))
    }

    /// Reports whose danger zone the session is currently inside, ordered by id.
    pub async fn zone_membership(&self, session: &SessionId) -> Result<Vec<ReportId>, NodeError> {
        let (reply, answer) = oneshot::channel();
        self.send(session, SessionCommand::Membership { reply })
            .await?;
        answer
            .await
            .map_err(|_| NodeError::SessionClosed(session.clone()))
    }

    /// Stop a session, letting it finish any queued updates first.
    pub async fn stop_tracking(&self, session: &SessionId) -> Result<(), NodeError> {
        let handle = {
            let mut sessions = self.sessions.lock().await;
            let handle = sessions
                .remove(session)
                .ok_or_else(|| NodeError::SessionNotFound(session.clone()))?;
            self.metrics.active_sessions.set(sessions.len() as i64);
            handle
        };
        let SessionHandle { tx, task } = handle;
        drop(tx);
        task.await
            .map_err(|e| NodeError::Other(format!("session {session} task failed: {e}")))
    }

    /// Stop every session.
    pub async fn shutdown(&self) {
        let handles: Vec<_> = self.sessions.lock().await.drain().collect();
        self.metrics.active_sessions.set(0);
        for (id, SessionHandle { tx, task }) in handles {
            drop(tx);
            if let Err(e) = task.await {
                warn!(session = %id, error = %e, "session task failed during shutdown");
            }
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn send(&self, session: &SessionId, command: SessionCommand) -> Result<(), NodeError> {
        let tx = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(session)
                .map(|h| h.tx.clone())
                .ok_or_else(|| NodeError::SessionNotFound(session.clone()))?
        };
        tx.send(command)
            .await
            .map_err(|_| NodeError::SessionClosed(session.clone()))
    }

    /// Write through and publish. Runs under the engine's report lock, so
    /// snapshots of one report reach the store and subscribers in apply order.
    fn persist(&self, report: &IncidentReport) -> Result<(), NodeError> {
        self.store.put_report(report)?;
        let _ = self.events.send(AlertEvent::ReportUpdated {
            report: report.clone(),
        });
        Ok(())
    }
}

