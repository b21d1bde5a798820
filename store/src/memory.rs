//! In-process report store backed by a hash map.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use sentinel_types::ReportId;
use sentinel_verification::IncidentReport;

use crate::{ReportStore, StoreError};

/// Keeps the latest snapshot of every report in memory.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<ReportId, IncidentReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored snapshots, ordered by id.
    pub fn snapshot(&self) -> Vec<IncidentReport> {
        let mut reports: Vec<_> = self
            .reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        reports.sort_by(|a, b| a.id.cmp(&b.id));
        reports
    }
}

impl ReportStore for MemoryReportStore {
    fn put_report(&self, report: &IncidentReport) -> Result<(), StoreError> {
        self.reports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(report.id.clone(), report.clone());
        Ok(())
    }

    fn get_report(&self, id: &ReportId) -> Result<IncidentReport, StoreError> {
        self.reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn exists(&self, id: &ReportId) -> Result<bool, StoreError> {
        Ok(self
            .reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id))
    }

    fn report_count(&self) -> Result<u64, StoreError> {
        Ok(self.reports.read().unwrap_or_else(PoisonError::into_inner).len() as u64)
    }
}
