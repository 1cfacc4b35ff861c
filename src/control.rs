//! Watering decision logic and status reporting.
//!
//! Pure functions only, no hardware access. The main loop and the HTTP
//! handler both route through here so the two agree on what "watering"
//! means for any given reading.

use serde::Serialize;

/// Whether the soil is dry enough to warrant running the pump.
///
/// Raw counts rise as the soil dries out, so a reading strictly above the
/// threshold means "dry". A reading exactly at the threshold is wet enough.
pub fn should_water(reading: i32, threshold: i32) -> bool {
    reading > threshold
}

/// Snapshot served by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub soil_humidity: i32,
    pub watering: bool,
}

impl StatusReport {
    /// Build a report from a fresh averaged reading.
    pub fn from_reading(reading: i32, threshold: i32) -> Self {
        Self {
            soil_humidity: reading,
            watering: should_water(reading, threshold),
        }
    }

    /// Serialize to the JSON body the endpoint returns.
    pub fn to_json(&self) -> String {
        // Serialization of two primitive fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_soil_triggers_watering() {
        assert!(should_water(2001, 2000));
        assert!(should_water(4095, 2000));
    }

    #[test]
    fn wet_soil_does_not_trigger() {
        assert!(!should_water(0, 2000));
        assert!(!should_water(1999, 2000));
    }

    #[test]
    fn threshold_reading_is_not_watering() {
        // Boundary is exclusive: exactly-at-threshold means wet enough.
        assert!(!should_water(2000, 2000));
    }

    #[test]
    fn report_mirrors_decision() {
        let dry = StatusReport::from_reading(3000, 2000);
        assert_eq!(dry.soil_humidity, 3000);
        assert!(dry.watering);

        let wet = StatusReport::from_reading(1200, 2000);
        assert_eq!(wet.soil_humidity, 1200);
        assert!(!wet.watering);
    }

    #[test]
    fn json_body_shape() {
        let r = StatusReport {
            soil_humidity: 1850,
            watering: false,
        };
        assert_eq!(r.to_json(), r#"{"soil_humidity":1850,"watering":false}"#);

        let r = StatusReport {
            soil_humidity: 2100,
            watering: true,
        };
        assert_eq!(r.to_json(), r#"{"soil_humidity":2100,"watering":true}"#);
    }
}
