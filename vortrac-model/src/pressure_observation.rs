//! Surface pressure observations used to anchor the deficit profile.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single timestamped surface pressure report from a station, buoy, or
/// similar in-situ source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PressureObservation {
    pub station_id: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub pressure_hpa: f32,
    /// Seconds since epoch.
    pub timestamp: i64,
}

impl PressureObservation {
    pub fn new(station_id: impl Into<String>, lat_deg: f64, lon_deg: f64, pressure_hpa: f32, timestamp: i64) -> Self {
        Self {
            station_id: station_id.into(),
            lat_deg,
            lon_deg,
            pressure_hpa,
            timestamp,
        }
    }

    /// This observation's timestamp as a UTC date-time.
    #[cfg(feature = "chrono")]
    pub fn timestamp_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
    }

    /// This observation's pressure as a type-safe `uom` quantity.
    #[cfg(feature = "uom")]
    pub fn pressure(&self) -> uom::si::f32::Pressure {
        uom::si::f32::Pressure::new::<uom::si::pressure::hectopascal>(self.pressure_hpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_compares_all_fields() {
        let a = PressureObservation::new("KMIA", 25.7, -80.3, 1010.0, 1_700_000_000);
        let b = PressureObservation::new("KMIA", 25.7, -80.3, 1011.5, 1_700_000_000);
        assert_ne!(a, b);
    }
}
