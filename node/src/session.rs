//! Per-observer tracking sessions.
//!
//! Each session owns one [`ProximityMonitor`] inside a tokio task. Position
//! updates arrive over an mpsc channel and are evaluated strictly in the
//! order they were sent; the resulting [`ZoneUpdate`] goes back to the caller
//! over a oneshot and every zone change is also published as an
//! [`AlertEvent`].

use std::sync::Arc;
use std::time::Instant;

use sentinel_proximity::{Incident, PositionUpdate, ProximityMonitor, ZoneUpdate};
use sentinel_types::{ReportId, SessionId};
use sentinel_verification::{IncidentReport, VerificationEngine};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::event::AlertEvent;
use crate::metrics::NodeMetrics;

pub(crate) enum SessionCommand {
    Position {
        update: PositionUpdate,
        reply: oneshot::Sender<ZoneUpdate>,
    },
    Membership {
        reply: oneshot::Sender<Vec<ReportId>>,
    },
}

/// Sending half of a running session plus its task.
pub(crate) struct SessionHandle {
    pub(crate) tx: mpsc::Sender<SessionCommand>,
    pub(crate) task: JoinHandle<()>,
}

/// Shared collaborators a session task reads from and reports to.
pub(crate) struct SessionContext {
    pub(crate) engine: Arc<VerificationEngine>,
    pub(crate) metrics: Arc<NodeMetrics>,
    pub(crate) events: broadcast::Sender<AlertEvent>,
}

/// Project the engine's reports into the monitor's incident view.
///
/// Unlocated reports stay in the list so the monitor keeps their existing
/// membership rather than treating them as withdrawn.
pub(crate) fn active_incidents(engine: &VerificationEngine) -> Vec<Incident> {
    engine.reports().iter().map(to_incident).collect()
}

fn to_incident(report: &IncidentReport) -> Incident {
    Incident::new(
        report.id.clone(),
        report.location,
        report.headline(),
        report.severity_tier(),
    )
}

pub(crate) fn spawn_session(
    id: SessionId,
    monitor: ProximityMonitor,
    ctx: SessionContext,
    capacity: usize,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(capacity);
    let task = tokio::spawn(run_session(id, monitor, ctx, rx));
    SessionHandle { tx, task }
}

async fn run_session(
    id: SessionId,
    mut monitor: ProximityMonitor,
    ctx: SessionContext,
    mut rx: mpsc::Receiver<SessionCommand>,
) {
    info!(session = %id, "tracking session started");

    while let Some(command) = rx.recv().await {
        match command {
            SessionCommand::Position { update, reply } => {
                let incidents = active_incidents(&ctx.engine);
                let started = Instant::now();
                let zone_update = monitor.on_position_update(update, &incidents);
                ctx.metrics
                    .position_eval_time_ms
                    .observe(started.elapsed().as_secs_f64() * 1000.0);

                publish(&id, &zone_update, &ctx);

                if reply.send(zone_update).is_err() {
                    debug!(session = %id, "position caller went away before the reply");
                }
            }
            SessionCommand::Membership { reply } => {
                let mut members: Vec<ReportId> =
                    monitor.current_zone_membership().iter().cloned().collect();
                members.sort();
                let _ = reply.send(members);
            }
        }
    }

    info!(session = %id, "tracking session stopped");
}

fn publish(session: &SessionId, update: &ZoneUpdate, ctx: &SessionContext) {
    if update.low_confidence {
        ctx.metrics.low_confidence_fixes.inc();
    }
    for alert in &update.entered {
        ctx.metrics.zone_entries.inc();
        // No subscribers is not an error.
        let _ = ctx.events.send(AlertEvent::ZoneEntered {
            session: session.clone(),
            alert: alert.clone(),
        });
    }
    for report_id in &update.cleared {
        ctx.metrics.zone_clears.inc();
        let _ = ctx.events.send(AlertEvent::ZoneCleared {
            session: session.clone(),
            report_id: report_id.clone(),
        });
    }
}
