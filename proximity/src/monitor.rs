//! Danger-zone monitor for a single observer session.
//!
//! Zone membership is the only memory the monitor keeps. A position update
//! compares each located incident's distance against the radius:
//!
//! | distance      | already inside | effect            |
//! |---------------|----------------|-------------------|
//! | `< radius`    | no             | enter, cue fires  |
//! | `< radius`    | yes            | none              |
//! | `>= radius`   | yes            | clear             |
//! | `>= radius`   | no             | none              |
//!
//! Incidents that vanish from the active set are cleared. Incidents that are
//! present but unlocated are skipped and keep whatever membership they had.
//! When the set lists an id more than once, only its first entry counts.

use std::collections::HashSet;

use sentinel_geo::distance_meters;
use sentinel_types::{ProximityParams, ReportId};
use sentinel_utils::format_distance;
use tracing::{debug, info};

use crate::cue::{AlertCue, NoCue};
use crate::event::{ZoneAlert, ZoneUpdate};
use crate::incident::Incident;
use crate::position::PositionUpdate;

pub struct ProximityMonitor {
    params: ProximityParams,
    last_known_position: Option<PositionUpdate>,
    active_zone_membership: HashSet<ReportId>,
    cue: Box<dyn AlertCue>,
}

impl ProximityMonitor {
    pub fn new(params: ProximityParams) -> Self {
        Self::with_cue(params, Box::new(NoCue))
    }

    pub fn with_cue(params: ProximityParams, cue: Box<dyn AlertCue>) -> Self {
        Self {
            params,
            last_known_position: None,
            active_zone_membership: HashSet::new(),
            cue,
        }
    }

    pub fn params(&self) -> &ProximityParams {
        &self.params
    }

    /// Evaluate a new position against the active incident set.
    ///
    /// Updates are applied in the order the caller delivers them; a fix with
    /// an older timestamp than the last one is still evaluated.
    pub fn on_position_update(
        &mut self,
        position: PositionUpdate,
        incidents: &[Incident],
    ) -> ZoneUpdate {
        if let Some(last) = &self.last_known_position {
            if position.timestamp < last.timestamp {
                debug!(
                    previous = %last.timestamp,
                    current = %position.timestamp,
                    "position update older than the last fix"
                );
            }
        }

        let radius = self.params.danger_radius_m;
        let mut update = ZoneUpdate {
            low_confidence: position.is_low_confidence(self.params.low_confidence_accuracy_m),
            ..ZoneUpdate::default()
        };

        let mut seen: HashSet<&ReportId> = HashSet::with_capacity(incidents.len());

        for incident in incidents {
            if !seen.insert(&incident.id) {
                debug!(report = %incident.id, "duplicate incident entry ignored");
                continue;
            }
            let Some(location) = incident.location else {
                continue;
            };
            let distance = distance_meters(position.coordinate, location);
            let inside = self.active_zone_membership.contains(&incident.id);

            if distance < radius && !inside {
                self.active_zone_membership.insert(incident.id.clone());
                let alert = ZoneAlert {
                    report_id: incident.id.clone(),
                    message: alert_message(incident, distance),
                    distance_m: distance,
                    tier: incident.tier,
                };
                info!(
                    report = %incident.id,
                    distance_m = distance,
                    tier = %incident.tier,
                    "entered danger zone"
                );
                self.cue.on_zone_entered(&alert);
                update.entered.push(alert);
            } else if distance >= radius && inside {
                self.active_zone_membership.remove(&incident.id);
                info!(report = %incident.id, distance_m = distance, "left danger zone");
                update.cleared.push(incident.id.clone());
            }
        }

        let mut vanished: Vec<ReportId> = self
            .active_zone_membership
            .iter()
            .filter(|id| !seen.contains(id))
            .cloned()
            .collect();
        vanished.sort();
        for id in vanished {
            self.active_zone_membership.remove(&id);
            info!(report = %id, "danger zone withdrawn");
            update.cleared.push(id);
        }

        self.last_known_position = Some(position);
        update
    }

    pub fn current_zone_membership(&self) -> &HashSet<ReportId> {
        &self.active_zone_membership
    }

    pub fn last_known_position(&self) -> Option<&PositionUpdate> {
        self.last_known_position.as_ref()
    }

    pub fn is_inside(&self, report_id: &ReportId) -> bool {
        self.active_zone_membership.contains(report_id)
    }
}

fn alert_message(incident: &Incident, distance: f64) -> String {
    let headline = if incident.title.trim().is_empty() {
        incident.id.as_str()
    } else {
        incident.title.as_str()
    };
    format!(
        "Danger zone: {headline} ({} away, {} severity)",
        format_distance(distance),
        incident.tier
    )
}
