//! Fundamental types for the Sentinel engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identifiers, coordinates, severity, timestamps, and the tunable engine parameters.

pub mod coordinate;
pub mod error;
pub mod id;
pub mod params;
pub mod severity;
pub mod time;

pub use coordinate::Coordinate;
pub use error::TypesError;
pub use id::{IdentityId, ReportId, SessionId};
pub use params::{ProximityParams, VerificationParams};
pub use severity::{Severity, SeverityTier};
pub use time::{Clock, SystemClock, Timestamp};
