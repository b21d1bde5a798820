//! Recording alert cue — captures every zone entry instead of buzzing a device.

use sentinel_proximity::{AlertCue, ZoneAlert};
use sentinel_types::ReportId;
use std::sync::{Arc, Mutex};

/// An [`AlertCue`] that records the alerts it was fired for.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to a monitor.
#[derive(Clone, Debug, Default)]
pub struct RecordingCue {
    fired: Arc<Mutex<Vec<ZoneAlert>>>,
}

impl RecordingCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fired_ids(&self) -> Vec<ReportId> {
        self.fired
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.report_id.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.fired.lock().unwrap().len()
    }
}

impl AlertCue for RecordingCue {
    fn on_zone_entered(&mut self, alert: &ZoneAlert) {
        self.fired.lock().unwrap().push(alert.clone());
    }
}
