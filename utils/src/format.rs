//! Human-readable formatting helpers for alert text.

/// Format a distance in meters to a short human-readable string.
///
/// Sub-kilometer distances are rounded to the nearest meter; longer ones
/// are shown in kilometers with one decimal.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters < 0.0 {
        return "unknown distance".to_string();
    }
    if meters < 1000.0 {
        format!("{} m", meters.round() as u64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meters_and_kilometers() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(78.4), "78 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(1549.0), "1.5 km");
    }

    #[test]
    fn invalid_distances() {
        assert_eq!(format_distance(f64::NAN), "unknown distance");
        assert_eq!(format_distance(-3.0), "unknown distance");
    }
}
