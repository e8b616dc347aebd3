//! Flat-earth projection between geographic and local Cartesian coordinates.
//!
//! The analysis core operates in a right-handed local Cartesian frame with
//! its origin at the radar: x increases east, y increases north, z increases
//! up, all in kilometers. This module provides the bijective mapping between
//! that frame and (latitude, longitude, height) used at the volume's
//! boundary, valid for the ranges (≤ 300 km) this crate operates over.

/// Mean earth radius used for the flat-earth approximation, in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Projects geographic coordinates to and from a local Cartesian frame
/// centered on a fixed radar location.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoProjection {
    radar_lat_deg: f64,
    radar_lon_deg: f64,
    radar_alt_km: f64,
}

impl GeoProjection {
    /// Creates a projection centered on the given radar location.
    pub fn new(radar_lat_deg: f64, radar_lon_deg: f64, radar_alt_km: f64) -> Self {
        Self {
            radar_lat_deg,
            radar_lon_deg,
            radar_alt_km,
        }
    }

    /// The radar's latitude in degrees.
    pub fn radar_lat_deg(&self) -> f64 {
        self.radar_lat_deg
    }

    /// The radar's longitude in degrees.
    pub fn radar_lon_deg(&self) -> f64 {
        self.radar_lon_deg
    }

    /// The radar's altitude in kilometers above mean sea level.
    pub fn radar_alt_km(&self) -> f64 {
        self.radar_alt_km
    }

    /// Projects a (lat, lon, height above sea level) point to local Cartesian
    /// (x east, y north, z up) kilometers relative to the radar.
    pub fn to_cartesian(&self, lat_deg: f64, lon_deg: f64, height_km: f64) -> (f32, f32, f32) {
        let lat0_rad = self.radar_lat_deg.to_radians();
        let dlon_rad = (lon_deg - self.radar_lon_deg).to_radians();
        let dlat_rad = (lat_deg - self.radar_lat_deg).to_radians();

        let x_km = EARTH_RADIUS_KM * dlon_rad * lat0_rad.cos();
        let y_km = EARTH_RADIUS_KM * dlat_rad;
        let z_km = height_km - self.radar_alt_km;

        (x_km as f32, y_km as f32, z_km as f32)
    }

    /// Inverse of [`to_cartesian`](Self::to_cartesian): recovers (lat, lon,
    /// height above sea level) from a local Cartesian offset in kilometers.
    pub fn to_geographic(&self, x_km: f32, y_km: f32, z_km: f32) -> (f64, f64, f64) {
        let lat0_rad = self.radar_lat_deg.to_radians();

        let lat_deg = self.radar_lat_deg + (y_km as f64 / EARTH_RADIUS_KM).to_degrees();
        let lon_deg = self.radar_lon_deg
            + (x_km as f64 / (EARTH_RADIUS_KM * lat0_rad.cos())).to_degrees();
        let height_km = z_km as f64 + self.radar_alt_km;

        (lat_deg, lon_deg, height_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_near_radar() {
        let proj = GeoProjection::new(25.0, -80.0, 0.01);
        let (x, y, z) = proj.to_cartesian(25.2, -79.7, 3.0);
        let (lat, lon, height) = proj.to_geographic(x, y, z);
        assert!((lat - 25.2).abs() < 1e-3);
        assert!((lon - (-79.7)).abs() < 1e-3);
        assert!((height - 3.0).abs() < 1e-3);
    }

    #[test]
    fn radar_itself_is_origin() {
        let proj = GeoProjection::new(25.0, -80.0, 0.0);
        let (x, y, z) = proj.to_cartesian(25.0, -80.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!(z.abs() < 1e-6);
    }

    #[test]
    fn eastward_offset_increases_x() {
        let proj = GeoProjection::new(25.0, -80.0, 0.0);
        let (x, _y, _z) = proj.to_cartesian(25.0, -79.9, 0.0);
        assert!(x > 0.0);
    }

    #[test]
    fn northward_offset_increases_y() {
        let proj = GeoProjection::new(25.0, -80.0, 0.0);
        let (_x, y, _z) = proj.to_cartesian(25.1, -80.0, 0.0);
        assert!(y > 0.0);
    }
}
