//! The gridded velocity/reflectivity volume the analysis core samples.

use super::sentinel::{from_sample, to_sample};
use crate::geo::GeoProjection;
use crate::result::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two scalar fields a `GriddedVolume` carries per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    /// Radar reflectivity (dBZ).
    Reflectivity,
    /// Radial velocity (m/s).
    Velocity,
}

/// A single ring-sample point: the math-convention azimuth (degrees,
/// counterclockwise from east) and the field value at that cell, or `None`
/// if the cell is missing (propagated sentinel, never a synthesized zero).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RingPoint {
    pub azimuth_deg: f32,
    pub value: Option<f32>,
}

/// A rectangular 3-D gridded field of radar-derived data on axis-aligned
/// spacing, with an exclusively-borrowed lifetime bounded to one volume's
/// worth of analysis (the coordinator owns the `GriddedVolume`; GBVTD, HVVP,
/// and the center finder only ever see `&GriddedVolume`).
///
/// Storage is row-major with `i` (east-west) varying fastest, then `j`
/// (north-south), then `k` (vertical level): `idx(i, j, k) = (k * j_dim + j)
/// * i_dim + i`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GriddedVolume {
    i_dim: usize,
    j_dim: usize,
    k_dim: usize,
    dx_km: f32,
    dy_km: f32,
    dz_km: f32,
    /// Local Cartesian (x, y, z) km, relative to the radar, of cell (0, 0, 0)'s center.
    origin_km: (f32, f32, f32),
    projection: GeoProjection,
    reflectivity: Vec<f32>,
    velocity: Vec<f32>,
    reference: Option<ReferencePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct ReferencePoint {
    lat_deg: f64,
    lon_deg: f64,
    height_km: f64,
    x_km: f32,
    y_km: f32,
    z_km: f32,
}

impl GriddedVolume {
    /// Creates a new volume of the given dimensions, all cells initialized
    /// to the missing sentinel.
    ///
    /// `origin_km` is the (x, y, z) offset from the radar to the center of
    /// cell (0, 0, 0).
    pub fn new(
        i_dim: usize,
        j_dim: usize,
        k_dim: usize,
        spacing_km: (f32, f32, f32),
        origin_km: (f32, f32, f32),
        projection: GeoProjection,
    ) -> Self {
        let len = i_dim * j_dim * k_dim;
        Self {
            i_dim,
            j_dim,
            k_dim,
            dx_km: spacing_km.0,
            dy_km: spacing_km.1,
            dz_km: spacing_km.2,
            origin_km,
            projection,
            reflectivity: vec![super::sentinel::SENTINEL; len],
            velocity: vec![super::sentinel::SENTINEL; len],
            reference: None,
        }
    }

    /// Grid dimensions (I, J, K).
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.i_dim, self.j_dim, self.k_dim)
    }

    /// Grid spacing (Δx, Δy, Δz) in kilometers.
    pub fn spacing_km(&self) -> (f32, f32, f32) {
        (self.dx_km, self.dy_km, self.dz_km)
    }

    /// The horizontal footprint of the grid in kilometers (I·Δx, J·Δy).
    pub fn footprint_km(&self) -> (f32, f32) {
        (self.i_dim as f32 * self.dx_km, self.j_dim as f32 * self.dy_km)
    }

    #[inline]
    fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.j_dim + j) * self.i_dim + i
    }

    fn check_bounds(&self, i: isize, j: isize, k: isize) -> Result<(usize, usize, usize)> {
        if i < 0
            || j < 0
            || k < 0
            || i as usize >= self.i_dim
            || j as usize >= self.j_dim
            || k as usize >= self.k_dim
        {
            return Err(Error::IndexOutOfBounds {
                i,
                j,
                k,
                i_dim: self.i_dim,
                j_dim: self.j_dim,
                k_dim: self.k_dim,
            });
        }
        Ok((i as usize, j as usize, k as usize))
    }

    /// Sets the reflectivity sample at (i, j, k).
    pub fn set_reflectivity(&mut self, i: usize, j: usize, k: usize, value: Option<f32>) -> Result<()> {
        let (i, j, k) = self.check_bounds(i as isize, j as isize, k as isize)?;
        let idx = self.idx(i, j, k);
        self.reflectivity[idx] = from_sample(value);
        Ok(())
    }

    /// Sets the velocity sample at (i, j, k).
    pub fn set_velocity(&mut self, i: usize, j: usize, k: usize, value: Option<f32>) -> Result<()> {
        let (i, j, k) = self.check_bounds(i as isize, j as isize, k as isize)?;
        let idx = self.idx(i, j, k);
        self.velocity[idx] = from_sample(value);
        Ok(())
    }

    /// Gets a field sample at (i, j, k), or `Err(IndexOutOfBounds)` if it falls
    /// outside the grid.
    pub fn get(&self, field: Field, i: usize, j: usize, k: usize) -> Result<Option<f32>> {
        let (i, j, k) = self.check_bounds(i as isize, j as isize, k as isize)?;
        let idx = self.idx(i, j, k);
        let raw = match field {
            Field::Reflectivity => self.reflectivity[idx],
            Field::Velocity => self.velocity[idx],
        };
        Ok(to_sample(raw))
    }

    /// The local Cartesian (x, y, z) km of a cell's center, relative to the radar.
    pub fn point_from_index(&self, i: usize, j: usize, k: usize) -> (f32, f32, f32) {
        (
            self.origin_km.0 + i as f32 * self.dx_km,
            self.origin_km.1 + j as f32 * self.dy_km,
            self.origin_km.2 + k as f32 * self.dz_km,
        )
    }

    /// The nearest grid index to a local Cartesian point, or
    /// `Err(IndexOutOfBounds)` if the nearest index falls outside the grid.
    pub fn index_from_point(&self, x_km: f32, y_km: f32, z_km: f32) -> Result<(usize, usize, usize)> {
        let i = ((x_km - self.origin_km.0) / self.dx_km).round() as isize;
        let j = ((y_km - self.origin_km.1) / self.dy_km).round() as isize;
        let k = ((z_km - self.origin_km.2) / self.dz_km).round() as isize;
        self.check_bounds(i, j, k)
    }

    /// Sets the absolute (lat, lon, height-above-sea-level) reference point
    /// used for ring sampling, and returns its nearest grid index.
    ///
    /// Returns `Err(ReferencePointOutOfBounds)` if the projected point falls
    /// outside the grid.
    pub fn set_absolute_reference_point(
        &mut self,
        lat_deg: f64,
        lon_deg: f64,
        height_km: f64,
    ) -> Result<(usize, usize, usize)> {
        let (x_km, y_km, z_km) = self.projection.to_cartesian(lat_deg, lon_deg, height_km);
        let indices = self.index_from_point(x_km, y_km, z_km).map_err(|_| {
            Error::ReferencePointOutOfBounds { x_km, y_km }
        })?;

        self.reference = Some(ReferencePoint {
            lat_deg,
            lon_deg,
            height_km,
            x_km,
            y_km,
            z_km,
        });

        Ok(indices)
    }

    /// This volume's geographic projection, for callers (the center finder,
    /// the pressure estimator) that need to convert between the local
    /// Cartesian frame and geographic coordinates themselves.
    pub fn projection(&self) -> &GeoProjection {
        &self.projection
    }

    /// Sets the reference point directly from a local Cartesian (x, y, z) km
    /// offset from the radar, and returns its nearest grid index.
    ///
    /// Equivalent to projecting `(x_km, y_km, z_km)` to geographic
    /// coordinates and calling [`set_absolute_reference_point`]
    /// (Self::set_absolute_reference_point), for callers (the center finder)
    /// that already work in the local frame and would otherwise round-trip
    /// through geographic coordinates for no reason.
    pub fn set_reference_point_km(&mut self, x_km: f32, y_km: f32, z_km: f32) -> Result<(usize, usize, usize)> {
        let indices = self
            .index_from_point(x_km, y_km, z_km)
            .map_err(|_| Error::ReferencePointOutOfBounds { x_km, y_km })?;

        let (lat_deg, lon_deg, height_km) = self.projection.to_geographic(x_km, y_km, z_km);
        self.reference = Some(ReferencePoint {
            lat_deg,
            lon_deg,
            height_km,
            x_km,
            y_km,
            z_km,
        });

        Ok(indices)
    }

    /// The geographic (lat, lon) of the current reference point, if one has been set.
    pub fn reference_lat_lon_deg(&self) -> Option<(f64, f64)> {
        self.reference.map(|r| (r.lat_deg, r.lon_deg))
    }

    /// The grid index nearest the current reference point, if one has been set.
    pub fn reference_indices(&self) -> Option<(usize, usize, usize)> {
        let r = self.reference.as_ref()?;
        self.index_from_point(r.x_km, r.y_km, r.z_km).ok()
    }

    /// The local Cartesian (x, y, z) km offset from the radar to the
    /// reference point, if one has been set.
    pub fn reference_offset_km(&self) -> Option<(f32, f32, f32)> {
        self.reference.map(|r| (r.x_km, r.y_km, r.z_km))
    }

    /// The vertical level index nearest the given height in kilometers,
    /// clamped to the grid's valid range.
    pub fn level_for_height(&self, height_km: f32) -> usize {
        let k = ((height_km - self.origin_km.2) / self.dz_km).round();
        k.clamp(0.0, (self.k_dim - 1) as f32) as usize
    }

    /// The height in kilometers of the given level index.
    pub fn height_for_level(&self, level: usize) -> f32 {
        self.origin_km.2 + level as f32 * self.dz_km
    }

    /// The number of grid points that would be returned by
    /// [`sample_ring`](Self::sample_ring) for the given radius and height,
    /// without allocating the sample vector.
    pub fn ring_count(&self, radius_km: f32, height_km: f32) -> Result<usize> {
        Ok(self.sample_ring(Field::Velocity, radius_km, height_km)?.len())
    }

    /// Returns the ordered sequence of (azimuth, value) samples for all grid
    /// cells whose horizontal distance from the reference point falls in
    /// `[radius_km - 0.5, radius_km + 0.5)` and whose level is nearest
    /// `height_km`.
    ///
    /// Azimuths are the raw math convention (degrees counterclockwise from
    /// east) that the ring solver's `atan2`-based angle algebra consumes
    /// directly. Callers that need a compass bearing (clockwise from north)
    /// should convert with [`to_meteorological_deg`].
    ///
    /// Requires a reference point to have been set via
    /// [`set_absolute_reference_point`](Self::set_absolute_reference_point).
    pub fn sample_ring(&self, field: Field, radius_km: f32, height_km: f32) -> Result<Vec<RingPoint>> {
        let reference = self.reference.ok_or(Error::NoReferencePoint)?;

        let k = self.level_for_height(height_km);
        let lo = radius_km - 0.5;
        let hi = radius_km + 0.5;

        let mut points = Vec::new();
        for j in 0..self.j_dim {
            for i in 0..self.i_dim {
                let (x, y, _z) = self.point_from_index(i, j, k);
                let dx = x - reference.x_km;
                let dy = y - reference.y_km;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= lo && dist < hi {
                    let idx = self.idx(i, j, k);
                    let raw = match field {
                        Field::Reflectivity => self.reflectivity[idx],
                        Field::Velocity => self.velocity[idx],
                    };
                    points.push(RingPoint {
                        azimuth_deg: math_azimuth_deg(dx, dy),
                        value: to_sample(raw),
                    });
                }
            }
        }

        Ok(points)
    }

    /// Returns the ordered sequence of (azimuth, value) samples for all grid
    /// cells whose horizontal distance **from the radar** (the frame's
    /// origin, not a reference point) falls in `[radius_km - 0.5, radius_km
    /// + 0.5)` and whose level is nearest `height_km`.
    ///
    /// Unlike [`sample_ring`](Self::sample_ring), this needs no reference
    /// point: HVVP's sector sweep is a fixed range from the radar itself,
    /// not from the storm center. Azimuths are math convention, as in
    /// `sample_ring`.
    pub fn sample_ring_from_radar(&self, field: Field, radius_km: f32, height_km: f32) -> Vec<RingPoint> {
        let k = self.level_for_height(height_km);
        let lo = radius_km - 0.5;
        let hi = radius_km + 0.5;

        let mut points = Vec::new();
        for j in 0..self.j_dim {
            for i in 0..self.i_dim {
                let (x, y, _z) = self.point_from_index(i, j, k);
                let dist = (x * x + y * y).sqrt();
                if dist >= lo && dist < hi {
                    let idx = self.idx(i, j, k);
                    let raw = match field {
                        Field::Reflectivity => self.reflectivity[idx],
                        Field::Velocity => self.velocity[idx],
                    };
                    points.push(RingPoint {
                        azimuth_deg: math_azimuth_deg(x, y),
                        value: to_sample(raw),
                    });
                }
            }
        }

        points
    }
}

/// Converts a (dx, dy) offset to a math-convention azimuth in degrees
/// (counterclockwise from east) via `atan2`, normalized to `[0, 360)`.
fn math_azimuth_deg(dx: f32, dy: f32) -> f32 {
    dy.atan2(dx).to_degrees().rem_euclid(360.0)
}

/// Converts a math-convention azimuth (degrees counterclockwise from east,
/// as returned by [`GriddedVolume::sample_ring`]) to a meteorological
/// bearing (degrees clockwise from north), for consumers that report or
/// compare against compass directions (e.g. HVVP's storm bearing).
///
/// The transform is its own inverse (`90 - (90 - x) = x`), so this same
/// function also converts a meteorological bearing back to math convention.
pub fn to_meteorological_deg(math_deg: f32) -> f32 {
    (90.0 - math_deg).rem_euclid(360.0)
}
