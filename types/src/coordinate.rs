//! Geographic coordinates in WGS84 degrees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
///
/// Ranges are not enforced here; callers sanitize device and report input
/// before it reaches distance evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, nominally `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, nominally `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their nominal ranges.
    pub fn is_in_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check() {
        assert!(Coordinate::new(10.0, 106.0).is_in_range());
        assert!(Coordinate::new(-90.0, 180.0).is_in_range());
        assert!(!Coordinate::new(90.5, 0.0).is_in_range());
        assert!(!Coordinate::new(0.0, -180.1).is_in_range());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_in_range());
    }
}
