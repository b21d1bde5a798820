//! Geodesy for the proximity monitor.
//!
//! Only one question is ever asked of this crate: how far apart are two
//! points on the Earth's surface, in meters.

pub mod distance;

pub use distance::{distance_meters, EARTH_RADIUS_METERS};
