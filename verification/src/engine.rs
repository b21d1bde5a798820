//! Verification engine — connects the vote ledger, trust scorer, and state
//! machine into one unit of work per report.
//!
//! Each report lives behind its own mutex. A vote takes the map read lock only
//! long enough to find the report, then holds the report lock while it checks
//! the ledger, records the vote, and recomputes tallies, score, and level.
//! Votes on different reports never contend on the same report lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use sentinel_types::{IdentityId, ReportId, Severity, Timestamp, VerificationParams};
use tracing::{debug, info, warn};

use crate::error::{Rejection, VerificationError};
use crate::ledger::{VoteLedger, VoteStatus};
use crate::level::VerificationLevel;
use crate::outcome::{AdminOutcome, Derivation, VoteOutcome};
use crate::report::{IncidentReport, NewReport, ReportUpdate};
use crate::scorer::TrustScorer;
use crate::state_machine::VerificationStateMachine;
use crate::vote::{VoteKind, VoteTallies};

struct ReportEntry {
    report: IncidentReport,
    ledger: VoteLedger,
}

pub struct VerificationEngine {
    params: VerificationParams,
    scorer: TrustScorer,
    machine: VerificationStateMachine,
    reports: RwLock<HashMap<ReportId, Arc<Mutex<ReportEntry>>>>,
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new(VerificationParams::default())
    }
}

impl VerificationEngine {
    pub fn new(params: VerificationParams) -> Self {
        let machine = VerificationStateMachine::new(&params);
        Self {
            params,
            scorer: TrustScorer,
            machine,
            reports: RwLock::new(HashMap::new()),
        }
    }

    pub fn params(&self) -> &VerificationParams {
        &self.params
    }

    // ── Report management ─────────────────────────────────────────────

    /// Register a newly submitted report at UNVERIFIED with score 0.
    pub fn submit_report(
        &self,
        new: NewReport,
        now: Timestamp,
    ) -> Result<IncidentReport, VerificationError> {
        self.submit_report_with(new, now, |_| {})
    }

    /// [`submit_report`](Self::submit_report), running `on_commit` on the new
    /// report before any other request can touch it.
    pub fn submit_report_with<F>(
        &self,
        new: NewReport,
        now: Timestamp,
        on_commit: F,
    ) -> Result<IncidentReport, VerificationError>
    where
        F: FnOnce(&IncidentReport),
    {
        let severity = parse_severity(new.severity)?;
        let report = IncidentReport {
            id: new.id,
            reporter_id: new.reporter_id,
            title: new.title,
            description: new.description,
            location: new.location,
            severity,
            tallies: VoteTallies::default(),
            trust_score: self.scorer.score(VoteTallies::default(), false),
            level: VerificationLevel::Unverified,
            verified_by: None,
            created_at: now,
            updated_at: now,
        };

        let mut reports = self.reports.write().unwrap_or_else(PoisonError::into_inner);
        if reports.contains_key(&report.id) {
            return Err(VerificationError::ReportExists(report.id));
        }
        let entry = Arc::new(Mutex::new(ReportEntry {
            report: report.clone(),
            ledger: VoteLedger::new(),
        }));
        reports.insert(report.id.clone(), Arc::clone(&entry));
        // Take the report lock before releasing the map so the commit hook
        // runs ahead of any vote on the new report.
        let _guard = lock(&entry);
        drop(reports);
        on_commit(&report);
        info!(
            report = %report.id,
            reporter = %report.reporter_id,
            tier = %report.severity_tier(),
            located = report.location.is_some(),
            "report submitted"
        );
        Ok(report)
    }

    /// Apply a descriptive edit. Votes, score, and level are untouched.
    pub fn update_report(
        &self,
        report_id: &ReportId,
        update: ReportUpdate,
        now: Timestamp,
    ) -> Result<IncidentReport, VerificationError> {
        self.update_report_with(report_id, update, now, |_| {})
    }

    /// [`update_report`](Self::update_report), running `on_commit` under the
    /// report lock.
    pub fn update_report_with<F>(
        &self,
        report_id: &ReportId,
        update: ReportUpdate,
        now: Timestamp,
        on_commit: F,
    ) -> Result<IncidentReport, VerificationError>
    where
        F: FnOnce(&IncidentReport),
    {
        let severity = update.severity.map(parse_severity).transpose()?;
        let entry = self.entry(report_id)?;
        let mut entry = lock(&entry);
        let report = &mut entry.report;

        if let Some(title) = update.title {
            report.title = title;
        }
        if let Some(description) = update.description {
            report.description = description;
        }
        if let Some(location) = update.location {
            report.location = Some(location);
        } else if update.clear_location {
            report.location = None;
        }
        if let Some(severity) = severity {
            report.severity = severity;
        }
        report.updated_at = now;
        debug!(report = %report_id, "report updated");
        on_commit(&*report);
        Ok(report.clone())
    }

    // ── Voting ────────────────────────────────────────────────────────

    /// Cast a confirm or dispute vote.
    ///
    /// Checks run in order (owner, vote cap, duplicate kind); the first
    /// failure is returned and nothing is written. On success the tallies,
    /// trust score and level are updated under the same report lock.
    pub fn cast_vote(
        &self,
        report_id: &ReportId,
        voter: &IdentityId,
        kind: VoteKind,
        now: Timestamp,
    ) -> Result<VoteOutcome, VerificationError> {
        self.cast_vote_with(report_id, voter, kind, now, |_| {})
    }

    /// [`cast_vote`](Self::cast_vote), running `on_commit` on the updated
    /// report while its lock is still held.
    ///
    /// Hooks for one report therefore observe its states in the order the
    /// engine applied them.
    pub fn cast_vote_with<F>(
        &self,
        report_id: &ReportId,
        voter: &IdentityId,
        kind: VoteKind,
        now: Timestamp,
        on_commit: F,
    ) -> Result<VoteOutcome, VerificationError>
    where
        F: FnOnce(&IncidentReport),
    {
        let entry = self.entry(report_id)?;
        let mut guard = lock(&entry);
        let ReportEntry { report, ledger } = &mut *guard;

        if let Err(e) = ledger.check(report_id, &report.reporter_id, voter, kind, &self.params) {
            log_rejection(&e);
            return Err(e);
        }

        let mut tallies = ledger.tallies();
        tallies.record(kind);
        let level_change = self.machine.apply_votes(report.level, tallies)?;

        let tallies = ledger.record(voter, kind, now);
        report.tallies = tallies;
        report.trust_score = self.scorer.score(tallies, report.is_administrator_verified());
        if let Some(change) = level_change {
            report.level = change.to;
            info!(
                report = %report_id,
                from = %change.from,
                to = %change.to,
                "verification level advanced by votes"
            );
        }
        report.updated_at = now;

        debug!(
            report = %report_id,
            voter = %voter,
            %kind,
            %tallies,
            score = report.trust_score,
            "vote recorded"
        );
        on_commit(&*report);

        Ok(VoteOutcome {
            report_id: report_id.clone(),
            kind,
            tallies,
            trust_score: report.trust_score,
            level: report.level,
            level_change,
        })
    }

    pub fn vote_status(
        &self,
        report_id: &ReportId,
        voter: &IdentityId,
    ) -> Result<VoteStatus, VerificationError> {
        let entry = self.entry(report_id)?;
        let entry = lock(&entry);
        Ok(entry.ledger.status(&entry.report.reporter_id, voter, &self.params))
    }

    // ── Administrator actions ─────────────────────────────────────────

    /// Mark a report VERIFIED and pin its score at 100.
    pub fn verify_by_administrator(
        &self,
        report_id: &ReportId,
        administrator: &IdentityId,
        now: Timestamp,
    ) -> Result<AdminOutcome, VerificationError> {
        self.request_admin_level(report_id, administrator, VerificationLevel::Verified, now)
    }

    /// Ask for a report to be moved to `target` by administrative action.
    ///
    /// Only VERIFIED is reachable this way; anything else is rejected with
    /// [`VerificationError::InvalidTransition`].
    pub fn request_admin_level(
        &self,
        report_id: &ReportId,
        administrator: &IdentityId,
        target: VerificationLevel,
        now: Timestamp,
    ) -> Result<AdminOutcome, VerificationError> {
        self.request_admin_level_with(report_id, administrator, target, now, |_| {})
    }

    /// [`request_admin_level`](Self::request_admin_level), running
    /// `on_commit` under the report lock when the level actually changed.
    pub fn request_admin_level_with<F>(
        &self,
        report_id: &ReportId,
        administrator: &IdentityId,
        target: VerificationLevel,
        now: Timestamp,
        on_commit: F,
    ) -> Result<AdminOutcome, VerificationError>
    where
        F: FnOnce(&IncidentReport),
    {
        let entry = self.entry(report_id)?;
        let mut entry = lock(&entry);
        let report = &mut entry.report;

        let change = match self.machine.apply_administrator(report.level, target) {
            Ok(change) => change,
            Err(e) => {
                warn!(
                    report = %report_id,
                    administrator = %administrator,
                    from = %report.level,
                    to = %target,
                    "administrator transition rejected"
                );
                return Err(e);
            }
        };

        if let Some(change) = change {
            report.level = change.to;
            report.verified_by = Some(administrator.clone());
            report.trust_score = self.scorer.score(report.tallies, true);
            report.updated_at = now;
            info!(
                report = %report_id,
                administrator = %administrator,
                from = %change.from,
                "report verified by administrator"
            );
            on_commit(&*report);
        }

        Ok(AdminOutcome {
            report_id: report_id.clone(),
            trust_score: report.trust_score,
            level: report.level,
            changed: change.is_some(),
        })
    }

    // ── Reads ─────────────────────────────────────────────────────────

    pub fn report(&self, report_id: &ReportId) -> Result<IncidentReport, VerificationError> {
        let entry = self.entry(report_id)?;
        let entry = lock(&entry);
        Ok(entry.report.clone())
    }

    /// Snapshot of every report, ordered by id.
    pub fn reports(&self) -> Vec<IncidentReport> {
        let entries: Vec<_> = self
            .reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let mut reports: Vec<_> = entries.iter().map(|e| lock(e).report.clone()).collect();
        reports.sort_by(|a, b| a.id.cmp(&b.id));
        reports
    }

    /// Recompute score and level by replaying the ledger in arrival order.
    ///
    /// Always agrees with the stored report; useful for audits after restore.
    pub fn rederive(&self, report_id: &ReportId) -> Result<Derivation, VerificationError> {
        let entry = self.entry(report_id)?;
        let entry = lock(&entry);
        let verified = entry.report.is_administrator_verified();

        let mut level = VerificationLevel::Unverified;
        let mut tallies = VoteTallies::default();
        for vote in entry.ledger.votes() {
            tallies.record(vote.kind);
            if let Some(change) = self.machine.apply_votes(level, tallies)? {
                level = change.to;
            }
        }
        if verified {
            if let Some(change) = self.machine.apply_administrator(level, VerificationLevel::Verified)? {
                level = change.to;
            }
        }

        Ok(Derivation {
            trust_score: self.scorer.score(tallies, verified),
            level,
        })
    }

    pub fn len(&self) -> usize {
        self.reports.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, report_id: &ReportId) -> Result<Arc<Mutex<ReportEntry>>, VerificationError> {
        self.reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(report_id)
            .cloned()
            .ok_or_else(|| VerificationError::ReportNotFound(report_id.clone()))
    }
}

// Report state is only written after every check has passed, so a poisoned
// lock still guards a consistent entry.
fn lock(entry: &Mutex<ReportEntry>) -> MutexGuard<'_, ReportEntry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_severity(raw: u8) -> Result<Severity, VerificationError> {
    Severity::new(raw).map_err(|_| VerificationError::InvalidSeverity(raw))
}

fn log_rejection(e: &VerificationError) {
    match e.rejection() {
        Rejection::Denied | Rejection::Invalid => warn!(code = e.code(), "vote rejected: {e}"),
        Rejection::Informational => info!(code = e.code(), "vote rejected: {e}"),
        Rejection::Idempotent => debug!(code = e.code(), "vote rejected: {e}"),
    }
}
