//! Proximity monitoring for one observer session.
//!
//! The monitor remembers which danger zones the observer is inside, so each
//! physical crossing raises exactly one enter or clear event no matter how
//! many position fixes arrive while standing still.

pub mod cue;
pub mod event;
pub mod incident;
pub mod monitor;
pub mod position;

pub use cue::{AlertCue, FnCue, NoCue};
pub use event::{ZoneAlert, ZoneUpdate};
pub use incident::Incident;
pub use monitor::ProximityMonitor;
pub use position::PositionUpdate;
