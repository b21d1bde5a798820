//! Prometheus metrics for the Sentinel alert service.
//!
//! Covers report intake, voting, administrator verification, and danger-zone
//! activity. [`NodeMetrics`] owns a dedicated [`Registry`] that can be
//! encoded into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::NodeError;

/// Central collection of all service-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Reports accepted from the report-management collaborator.
    pub reports_submitted: IntCounter,
    /// Votes recorded.
    pub votes_accepted: IntCounter,
    /// Votes rejected (owner, limit, duplicate, or unknown report).
    pub votes_rejected: IntCounter,
    /// Reports moved to VERIFIED by an administrator.
    pub admin_verifications: IntCounter,
    /// Danger-zone entries across all sessions.
    pub zone_entries: IntCounter,
    /// Danger-zone clears across all sessions.
    pub zone_clears: IntCounter,
    /// Position fixes flagged low-confidence.
    pub low_confidence_fixes: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Reports currently held by the verification engine.
    pub tracked_reports: IntGauge,
    /// Observer sessions currently tracking position.
    pub active_sessions: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time to evaluate one position update against the active incidents, in milliseconds.
    pub position_eval_time_ms: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        let reports_submitted = register_int_counter_with_registry!(
            Opts::new("sentinel_reports_submitted_total", "Reports submitted"),
            registry
        )?;
        let votes_accepted = register_int_counter_with_registry!(
            Opts::new("sentinel_votes_accepted_total", "Votes recorded"),
            registry
        )?;
        let votes_rejected = register_int_counter_with_registry!(
            Opts::new("sentinel_votes_rejected_total", "Votes rejected"),
            registry
        )?;
        let admin_verifications = register_int_counter_with_registry!(
            Opts::new(
                "sentinel_admin_verifications_total",
                "Reports verified by an administrator"
            ),
            registry
        )?;
        let zone_entries = register_int_counter_with_registry!(
            Opts::new("sentinel_zone_entries_total", "Danger-zone entries"),
            registry
        )?;
        let zone_clears = register_int_counter_with_registry!(
            Opts::new("sentinel_zone_clears_total", "Danger-zone clears"),
            registry
        )?;
        let low_confidence_fixes = register_int_counter_with_registry!(
            Opts::new(
                "sentinel_low_confidence_fixes_total",
                "Position fixes with missing or coarse accuracy"
            ),
            registry
        )?;

        let tracked_reports = register_int_gauge_with_registry!(
            Opts::new("sentinel_tracked_reports", "Reports held by the engine"),
            registry
        )?;
        let active_sessions = register_int_gauge_with_registry!(
            Opts::new("sentinel_active_sessions", "Observer sessions tracking position"),
            registry
        )?;

        let position_eval_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "sentinel_position_eval_time_ms",
                "Time to evaluate one position update in milliseconds"
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 50.0]),
            registry
        )?;

        Ok(Self {
            registry,
            reports_submitted,
            votes_accepted,
            votes_rejected,
            admin_verifications,
            zone_entries,
            zone_clears,
            low_confidence_fixes,
            tracked_reports,
            active_sessions,
            position_eval_time_ms,
        })
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| NodeError::Other(e.to_string()))
    }
}
