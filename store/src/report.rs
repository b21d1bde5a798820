//! Report snapshot storage trait.

use crate::StoreError;
use sentinel_types::ReportId;
use sentinel_verification::IncidentReport;

/// Persistence seam for report snapshots (tallies, score, level included).
pub trait ReportStore: Send + Sync {
    /// Insert or replace a report snapshot.
    fn put_report(&self, report: &IncidentReport) -> Result<(), StoreError>;

    /// Fetch a stored snapshot.
    fn get_report(&self, id: &ReportId) -> Result<IncidentReport, StoreError>;

    /// Whether a snapshot exists for `id`.
    fn exists(&self, id: &ReportId) -> Result<bool, StoreError>;

    /// Number of stored reports.
    fn report_count(&self) -> Result<u64, StoreError>;
}
