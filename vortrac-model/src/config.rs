//! Analysis configuration: geometry, closure, ring layout, and pressure
//! anchor selection.
//!
//! Use the builder methods to configure an analysis run, then call
//! [`Config::validate`] once against the volume it will run over before
//! handing it to the coordinator.
//!
//! # Example
//!
//! ```
//! use vortrac_model::config::Config;
//!
//! let config = Config::new("DBZ", "VEL")
//!     .with_radii(3, 50)
//!     .with_max_wavenumber(2);
//! ```

use crate::result::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The ring-fitting geometry. `GBVTD` is the only variant today; the enum
/// exists so a future geometry (e.g. GVTD) can be added without breaking
/// the configuration shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Geometry {
    Gbvtd,
}

/// The wind-coefficient closure applied when translating Fourier
/// coefficients into VTC0/VRC0/VMC0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Closure {
    Original,
    OriginalHvvp,
}

/// How the maximum anchor-acceptance radius is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MaxObsMethod {
    /// A fixed radius from the storm center.
    Center,
    /// `last_ring + max_obs_dist_km`.
    Ring,
}

/// A snapshot of analysis configuration, read once at volume start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub geometry: Geometry,
    pub closure: Closure,
    pub reflectivity_field: String,
    pub velocity_field: String,
    pub bottom_level_km: f32,
    pub top_level_km: f32,
    pub inner_radius_km: u32,
    pub outer_radius_km: u32,
    pub ring_width_km: f32,
    pub max_wavenumber: u8,
    /// Maximum angular data gap in degrees allowed for wavenumber `w`,
    /// indexed `0..=4`.
    pub max_data_gap_deg: [f32; 5],
    pub pressure_max_obs_time_s: f32,
    pub pressure_max_obs_method: MaxObsMethod,
    /// Only meaningful when `pressure_max_obs_method` is `Ring`.
    pub pressure_max_obs_dist_km: Option<f32>,
}

impl Config {
    /// Creates a configuration with documented defaults: GBVTD geometry,
    /// the "original" closure, rings 3..50 km wide by 1 km, wavenumber up
    /// to 2 with gap thresholds {30, 40, 50, 60, 70} degrees, and a 20
    /// minute anchor acceptance window.
    pub fn new(reflectivity_field: impl Into<String>, velocity_field: impl Into<String>) -> Self {
        Self {
            geometry: Geometry::Gbvtd,
            closure: Closure::Original,
            reflectivity_field: reflectivity_field.into(),
            velocity_field: velocity_field.into(),
            bottom_level_km: 1.0,
            top_level_km: 8.0,
            inner_radius_km: 3,
            outer_radius_km: 50,
            ring_width_km: 1.0,
            max_wavenumber: 2,
            max_data_gap_deg: [30.0, 40.0, 50.0, 60.0, 70.0],
            pressure_max_obs_time_s: 1200.0,
            pressure_max_obs_method: MaxObsMethod::Ring,
            pressure_max_obs_dist_km: None,
        }
    }

    pub fn with_closure(mut self, closure: Closure) -> Self {
        self.closure = closure;
        self
    }

    pub fn with_levels(mut self, bottom_km: f32, top_km: f32) -> Self {
        self.bottom_level_km = bottom_km;
        self.top_level_km = top_km;
        self
    }

    pub fn with_radii(mut self, inner_km: u32, outer_km: u32) -> Self {
        self.inner_radius_km = inner_km;
        self.outer_radius_km = outer_km;
        self
    }

    pub fn with_ring_width(mut self, width_km: f32) -> Self {
        self.ring_width_km = width_km;
        self
    }

    pub fn with_max_wavenumber(mut self, max_wavenumber: u8) -> Self {
        self.max_wavenumber = max_wavenumber;
        self
    }

    pub fn with_max_data_gap_deg(mut self, gaps: [f32; 5]) -> Self {
        self.max_data_gap_deg = gaps;
        self
    }

    pub fn with_pressure_max_obs_time_s(mut self, seconds: f32) -> Self {
        self.pressure_max_obs_time_s = seconds;
        self
    }

    pub fn with_pressure_max_obs_method(mut self, method: MaxObsMethod, dist_km: Option<f32>) -> Self {
        self.pressure_max_obs_method = method;
        self.pressure_max_obs_dist_km = dist_km;
        self
    }

    /// The maximum radius (km) at which a pressure observation is eligible
    /// as an anchor.
    ///
    /// Center-mode uses the configured distance directly; ring-mode adds it
    /// to the outer ring; an absent distance falls back to
    /// `outer_radius_km + 50.0`, matching the documented legacy fallback
    /// (the legacy `maxObRadius = -999` assignment bug is not reproduced —
    /// see `DESIGN.md`).
    pub fn max_ob_radius_km(&self) -> f32 {
        match (self.pressure_max_obs_method, self.pressure_max_obs_dist_km) {
            (MaxObsMethod::Center, Some(dist)) => dist,
            (MaxObsMethod::Ring, Some(dist)) => self.outer_radius_km as f32 + dist,
            (_, None) => self.outer_radius_km as f32 + 50.0,
        }
    }

    /// Validates this configuration against the footprint of the volume it
    /// will run over. Rejects out-of-range values before the analysis task
    /// starts, per the `ConfigInvalid` error policy.
    pub fn validate(&self, volume_footprint_km: (f32, f32)) -> Result<()> {
        if self.inner_radius_km < 1 {
            return Err(Error::ConfigInvalid(format!(
                "inner_radius_km must be >= 1, got {}",
                self.inner_radius_km
            )));
        }

        let max_outer = (volume_footprint_km.0.min(volume_footprint_km.1) / 2.0 - 1.0).floor();
        if max_outer < 0.0 || self.outer_radius_km as f32 > max_outer {
            return Err(Error::ConfigInvalid(format!(
                "outer_radius_km {} exceeds the volume's footprint limit of {}",
                self.outer_radius_km, max_outer
            )));
        }

        if self.outer_radius_km < self.inner_radius_km {
            return Err(Error::ConfigInvalid(format!(
                "outer_radius_km {} must be >= inner_radius_km {}",
                self.outer_radius_km, self.inner_radius_km
            )));
        }

        if self.max_wavenumber > 4 {
            return Err(Error::ConfigInvalid(format!(
                "max_wavenumber must be in [0, 4], got {}",
                self.max_wavenumber
            )));
        }

        if self.bottom_level_km > self.top_level_km {
            return Err(Error::ConfigInvalid(format!(
                "bottom_level_km {} must be <= top_level_km {}",
                self.bottom_level_km, self.top_level_km
            )));
        }

        if let Some(dist) = self.pressure_max_obs_dist_km {
            if dist < 0.0 {
                return Err(Error::ConfigInvalid(format!(
                    "pressure_max_obs_dist_km must be >= 0, got {dist}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_against_a_200km_footprint() {
        let config = Config::new("DBZ", "VEL");
        assert!(config.validate((200.0, 200.0)).is_ok());
    }

    #[test]
    fn outer_radius_beyond_footprint_is_rejected() {
        let config = Config::new("DBZ", "VEL").with_radii(3, 500);
        assert!(config.validate((200.0, 200.0)).is_err());
    }

    #[test]
    fn inner_radius_zero_is_rejected() {
        let config = Config::new("DBZ", "VEL").with_radii(0, 50);
        assert!(config.validate((200.0, 200.0)).is_err());
    }

    #[test]
    fn max_ob_radius_falls_back_to_outer_plus_fifty() {
        let config = Config::new("DBZ", "VEL").with_radii(3, 50);
        assert_eq!(config.max_ob_radius_km(), 100.0);
    }

    #[test]
    fn max_ob_radius_ring_mode_adds_distance() {
        let config = Config::new("DBZ", "VEL")
            .with_radii(3, 50)
            .with_pressure_max_obs_method(MaxObsMethod::Ring, Some(30.0));
        assert_eq!(config.max_ob_radius_km(), 80.0);
    }
}
