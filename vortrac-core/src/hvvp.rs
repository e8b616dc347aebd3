//! Hurricane Volume Velocity Processing: estimates the environmental
//! (storm-relative background) wind from a sector of radial velocity swept
//! around the radar at low elevation, independent of the vortex circulation.
//!
//! The legacy `HVVP/Hvvp.h`/`.cpp` implementation referenced from
//! `original_source/tags/1.0-alpha/Threads/VortexThread.cpp`'s `calcHVVP`
//! isn't present in the retrieval pack, so the fit below follows spec
//! §4.5's prose directly: a radial-velocity vs. azimuth regression at fixed
//! range from the radar, decomposed into a wind vector and then rotated
//! into components along and across the radar-to-storm beam. The call
//! shape (`rt`, `cca`, `rmw` in, across-beam mean/std-error out) matches
//! `calcHVVP`'s use of `Hvvp::setRadarData`/`getAvAcrossBeamWinds*`.

use vortrac_model::{to_meteorological_deg, Field, GriddedVolume, RingPoint};

use crate::lls;
use crate::result::{Error, Result};

/// Minimum number of valid sector samples required before a fit is
/// attempted. Below this the estimator fails per spec §4.5 and the
/// coordinator falls back to `Closure::Original`.
pub const MIN_SECTOR_SAMPLES: usize = 25;

/// Half-width of the azimuthal sector swept around the radar-to-storm
/// bearing, in degrees, that HVVP samples for its environmental-wind fit.
pub const SECTOR_HALF_WIDTH_DEG: f32 = 90.0;

/// The across-beam environmental wind HVVP contributes to the
/// `original+hvvp` closure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvvpResult {
    pub across_beam_mean_ms: f32,
    pub across_beam_std_err_ms: f32,
}

/// Fits the environmental wind from a low-elevation sector of `volume`'s
/// velocity field, at fixed range `range_to_center_km` (`r_t`) from the
/// radar, centered on bearing `bearing_deg_cw_from_north` (`cca`) with a
/// half-width of [`SECTOR_HALF_WIDTH_DEG`].
///
/// `height_km` selects the low-elevation level to sample (the coordinator
/// passes the lowest valid analysis level). `rmw_km` is accepted per the
/// component's documented inputs but only used to reject a sector radius
/// that would fall inside the circulation's radius of maximum wind, where
/// the tangential vortex signal would contaminate the environmental fit.
///
/// Returns `Err(Error::HvvpUnavailable)` if fewer than [`MIN_SECTOR_SAMPLES`]
/// valid samples fall in the sector, or if the regression is singular.
pub fn estimate(
    volume: &GriddedVolume,
    range_to_center_km: f32,
    bearing_deg_cw_from_north: f32,
    rmw_km: f32,
    height_km: f32,
) -> Result<HvvpResult> {
    if range_to_center_km <= rmw_km {
        return Err(Error::HvvpUnavailable {
            reason: format!(
                "range to center {range_to_center_km:.1} km is inside the radius of maximum wind {rmw_km:.1} km"
            ),
        });
    }

    let ring = volume.sample_ring_from_radar(Field::Velocity, range_to_center_km, height_km);
    let bearing_math_deg = to_meteorological_deg(bearing_deg_cw_from_north);

    let sector: Vec<&RingPoint> = ring
        .iter()
        .filter(|p| p.value.is_some() && angular_distance_deg(p.azimuth_deg, bearing_math_deg) <= SECTOR_HALF_WIDTH_DEG)
        .collect();

    if sector.len() < MIN_SECTOR_SAMPLES {
        return Err(Error::HvvpUnavailable {
            reason: format!(
                "only {} of {} required sector samples were valid",
                sector.len(),
                MIN_SECTOR_SAMPLES
            ),
        });
    }

    // Fit V_r(az) = c0 + u*cos(az) + v*sin(az): a uniform horizontal wind
    // (u, v) plus a residual bias, projected onto each sample's radial
    // direction. (u, v) is the environmental wind in the local east/north
    // frame, independent of the circulation itself.
    let mut x = Vec::with_capacity(sector.len());
    let mut y = Vec::with_capacity(sector.len());
    for p in &sector {
        let az = (p.azimuth_deg as f64).to_radians();
        x.push(vec![1.0, az.cos(), az.sin()]);
        y.push(p.value.expect("filtered to Some above") as f64);
    }
    let w = vec![1.0; sector.len()];

    let fit = lls::solve(&x, &w, &y).map_err(|_| Error::HvvpUnavailable {
        reason: "sector wind regression was singular".to_string(),
    })?;

    let u = fit.coefficients[1] as f64;
    let v = fit.coefficients[2] as f64;
    let se_u = fit.standard_errors[1] as f64;
    let se_v = fit.standard_errors[2] as f64;

    // Rotate (u, v) into components along and across the radar-to-storm
    // beam. The beam's along-track unit vector, in math convention, points
    // from the radar toward the storm at `bearing_math_deg`.
    let beam = bearing_math_deg.to_radians() as f64;
    let across = -u * beam.sin() + v * beam.cos();

    // Error propagation assuming u and v are independent; the fit's
    // off-diagonal covariance isn't tracked by `lls::solve`, so this is an
    // upper-bound approximation rather than an exact propagated variance.
    let se_across = ((beam.sin() * se_u).powi(2) + (beam.cos() * se_v).powi(2)).sqrt();

    Ok(HvvpResult {
        across_beam_mean_ms: across as f32,
        across_beam_std_err_ms: se_across as f32,
    })
}

/// Smallest absolute angular separation between two compass bearings, in
/// `[0, 180]` degrees.
fn angular_distance_deg(a_deg: f32, b_deg: f32) -> f32 {
    let diff = (a_deg - b_deg).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vortrac_model::GeoProjection;

    fn volume() -> GriddedVolume {
        let projection = GeoProjection::new(25.0, -80.0, 0.0);
        GriddedVolume::new(400, 400, 2, (1.0, 1.0, 1.0), (-200.0, -200.0, 0.0), projection)
    }

    #[test]
    fn recovers_known_environmental_wind() {
        // A uniform wind of (u, v) = (10, 0) m/s (due east) projects onto
        // the radial direction as V_r(az) = u*cos(az).
        let mut vol = volume();
        for i in 0..vol.dims().0 {
            for j in 0..vol.dims().1 {
                let (x, y, _z) = vol.point_from_index(i, j, 0);
                let dist = (x * x + y * y).sqrt();
                if (dist - 60.0).abs() < 0.5 {
                    let az = y.atan2(x);
                    vol.set_velocity(i, j, 0, Some(10.0 * az.cos())).unwrap();
                }
            }
        }

        // Storm due north of the radar at 60 km; bearing 0 deg CW from north.
        let result = estimate(&vol, 60.0, 0.0, 5.0, 0.0).unwrap();
        // Across-beam axis for a due-north bearing is due east/west, so the
        // across-beam component recovers the full east-west wind speed.
        assert!((result.across_beam_mean_ms.abs() - 10.0).abs() < 0.5);
    }

    #[test]
    fn too_few_sector_samples_is_unavailable() {
        let vol = volume();
        // No velocity set anywhere: every ring cell stays at sentinel.
        let err = estimate(&vol, 60.0, 0.0, 5.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::HvvpUnavailable { .. }));
    }

    #[test]
    fn range_inside_rmw_is_rejected() {
        let vol = volume();
        let err = estimate(&vol, 4.0, 0.0, 5.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::HvvpUnavailable { .. }));
    }

    #[test]
    fn angular_distance_wraps_correctly() {
        assert!((angular_distance_deg(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((angular_distance_deg(10.0, 350.0) - 20.0).abs() < 1e-4);
        assert!((angular_distance_deg(0.0, 180.0) - 180.0).abs() < 1e-4);
    }
}
