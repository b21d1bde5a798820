//! JSON scenario replay.
//!
//! A scenario is a JSON array of steps, each tagged by `op`:
//!
//! ```json
//! [
//!   {"op": "submit", "report": {"id": "R", "reporter_id": "A", "severity": 80,
//!                               "location": {"latitude": 10.0, "longitude": 106.0}}},
//!   {"op": "vote", "report_id": "R", "voter": "B", "kind": "CONFIRM"},
//!   {"op": "start_tracking", "session": "s1"},
//!   {"op": "position", "session": "s1",
//!    "position": {"coordinate": {"latitude": 10.0005, "longitude": 106.0005},
//!                 "accuracy_m": 8.0, "timestamp": 1}}
//! ]
//! ```
//!
//! Each step yields one [`StepRecord`]; rejections are recorded, not fatal.

use sentinel_node::{AlertService, NodeError};
use sentinel_proximity::{FnCue, PositionUpdate, ZoneAlert};
use sentinel_types::{Coordinate, IdentityId, ReportId, SessionId};
use sentinel_verification::{NewReport, ReportUpdate, VerificationLevel, VoteKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Submit {
        report: NewReport,
    },
    Update {
        report_id: ReportId,
        update: ReportUpdate,
    },
    Vote {
        report_id: ReportId,
        voter: IdentityId,
        kind: VoteKind,
    },
    VoteStatus {
        report_id: ReportId,
        voter: IdentityId,
    },
    Verify {
        report_id: ReportId,
        administrator: IdentityId,
    },
    AdminLevel {
        report_id: ReportId,
        administrator: IdentityId,
        target: VerificationLevel,
    },
    Audit {
        report_id: ReportId,
    },
    StartTracking {
        session: SessionId,
    },
    Position {
        session: SessionId,
        position: PositionUpdate,
    },
    Membership {
        session: SessionId,
    },
    StopTracking {
        session: SessionId,
    },
}

/// Outcome of one replayed step, printed as a JSON line.
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<Rejected>,
}

#[derive(Debug, Serialize)]
pub struct Rejected {
    pub code: &'static str,
    pub message: String,
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Update { .. } => "update",
            Self::Vote { .. } => "vote",
            Self::VoteStatus { .. } => "vote_status",
            Self::Verify { .. } => "verify",
            Self::AdminLevel { .. } => "admin_level",
            Self::Audit { .. } => "audit",
            Self::StartTracking { .. } => "start_tracking",
            Self::Position { .. } => "position",
            Self::Membership { .. } => "membership",
            Self::StopTracking { .. } => "stop_tracking",
        }
    }

    /// The coordinate this step carries in from outside, if any.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Submit { report } => report.location,
            Self::Update { update, .. } => update.location,
            Self::Position { position, .. } => Some(position.coordinate),
            _ => None,
        }
    }
}

pub fn parse(json: &str) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Run one step against the service.
///
/// Coordinates outside the WGS-84 ranges are rejected before they reach the
/// service. Only failures that are not ordinary rejections (metrics,
/// serialization, a crashed session task) propagate as errors.
pub async fn run_step(
    service: &AlertService,
    index: usize,
    step: Step,
) -> anyhow::Result<StepRecord> {
    let op = step.op();
    if let Some(coordinate) = step.coordinate().filter(|c| !c.is_in_range()) {
        return Ok(StepRecord {
            step: index,
            op,
            result: None,
            rejected: Some(Rejected {
                code: "INVALID_COORDINATE",
                message: format!("coordinate {coordinate} is out of range"),
            }),
        });
    }
    let outcome = execute(service, step).await;
    let record = match outcome {
        Ok(value) => StepRecord {
            step: index,
            op,
            result: Some(value),
            rejected: None,
        },
        Err(e) => match rejection_code(&e) {
            Some(code) => StepRecord {
                step: index,
                op,
                result: None,
                rejected: Some(Rejected {
                    code,
                    message: e.to_string(),
                }),
            },
            None => return Err(e.into()),
        },
    };
    Ok(record)
}

fn rejection_code(e: &NodeError) -> Option<&'static str> {
    match e {
        NodeError::Verification(v) => Some(v.code()),
        NodeError::SessionNotFound(_) => Some("SESSION_NOT_FOUND"),
        NodeError::SessionExists(_) => Some("SESSION_EXISTS"),
        _ => None,
    }
}

async fn execute(service: &AlertService, step: Step) -> Result<Value, NodeError> {
    let value = match step {
        Step::Submit { report } => to_value(service.submit_report(report)?)?,
        Step::Update { report_id, update } => {
            to_value(service.update_report(&report_id, update)?)?
        }
        Step::Vote {
            report_id,
            voter,
            kind,
        } => to_value(service.cast_vote(&report_id, &voter, kind)?)?,
        Step::VoteStatus { report_id, voter } => {
            to_value(service.vote_status(&report_id, &voter)?)?
        }
        Step::Verify {
            report_id,
            administrator,
        } => to_value(service.verify_report(&report_id, &administrator)?)?,
        Step::AdminLevel {
            report_id,
            administrator,
            target,
        } => to_value(service.request_admin_level(&report_id, &administrator, target)?)?,
        Step::Audit { report_id } => Value::Bool(service.audit(&report_id)?),
        Step::StartTracking { session } => {
            let id = session.clone();
            let cue = FnCue(move |alert: &ZoneAlert| {
                tracing::info!(session = %id, report = %alert.report_id, "alert cue fired");
            });
            service.start_tracking(session, Box::new(cue)).await?;
            Value::Null
        }
        Step::Position { session, position } => {
            to_value(service.push_position(&session, position).await?)?
        }
        Step::Membership { session } => to_value(service.zone_membership(&session).await?)?,
        Step::StopTracking { session } => {
            service.stop_tracking(&session).await?;
            Value::Null
        }
    };
    Ok(value)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, NodeError> {
    serde_json::to_value(value).map_err(|e| NodeError::Other(format!("serialize: {e}")))
}
