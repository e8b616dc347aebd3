//! Integrates the gradient-wind pressure deficit inward from the outermost
//! analyzed ring at one base level, using the ring solver's VTC0 mean
//! tangential wind.
//!
//! Grounded on `VortexThread.cpp::getPressureDeficit`: the `dp/dr` formula,
//! the 16-entry `rhoBar` density table, and the trapezoidal-with-rectangular-
//! fallback inward integration are all taken directly from its loop shape.

/// Earth's rotation rate, rad/s.
const OMEGA_RAD_S: f64 = 7.29e-5;

/// Radial integration step, meters (legacy `deltar`; radii are spaced 1 km
/// apart but the formula works in SI units).
const DELTA_R_M: f64 = 1000.0;

/// Pre-tabulated mean density profile, Pa/m, indexed by integer height in
/// km (index 0 = 1 km, per the legacy `rhoBar[(int)height - 1]` lookup).
const RHO_BAR_PA_PER_M: [f32; 16] = [
    10.672, 9.703, 8.792, 7.955, 7.183, 6.467, 5.817, 5.227, 4.689, 4.207, 3.8, 3.3, 2.9, 2.6, 2.2, 1.8,
];

/// Looks up the density profile at `height_km`, clamping the index into the
/// table's `0..=15` domain (open question: the table has no entry at
/// height = 0; the lowest tabulated density is used instead of failing).
pub fn rho_bar(height_km: f32) -> f32 {
    let idx = (height_km.round() as i32 - 1).clamp(0, 15) as usize;
    RHO_BAR_PA_PER_M[idx]
}

/// The Coriolis parameter `f = 2Ω sin(latitude)`.
pub fn coriolis_parameter(latitude_deg: f32) -> f64 {
    2.0 * OMEGA_RAD_S * (latitude_deg as f64).to_radians().sin()
}

/// Integrates the radial pressure-deficit profile `p'(R)` inward from
/// `last_ring_km` to 0, at base level `base_height_km`.
///
/// `vtc0_by_radius_km[r]` is the ring solver's mean tangential wind (VTC0,
/// m/s) at integer radius `r` km, or `None` where that ring has no fit.
/// Must be indexed `0..=last_ring_km`.
///
/// Radii below `first_ring_km` have no `dp/dr` of their own (the innermost
/// analyzed ring is `first_ring_km`); the profile there is constant-
/// extrapolated from `p'(first_ring_km)`.
///
/// Returns the profile in hPa, one entry per integer radius `0..=last_ring_km`.
///
/// `first_ring_km <= last_ring_km` is a caller invariant enforced upstream
/// by `Config::validate`; violating it panics rather than returning an
/// analysis-time error.
pub fn deficit_profile(
    vtc0_by_radius_km: &[Option<f32>],
    first_ring_km: u32,
    last_ring_km: u32,
    latitude_deg: f32,
    base_height_km: f32,
) -> Vec<f32> {
    assert!(last_ring_km >= first_ring_km, "last_ring_km must be >= first_ring_km");
    let last = last_ring_km as usize;
    let first = first_ring_km as usize;
    assert_eq!(
        vtc0_by_radius_km.len(),
        last + 1,
        "vtc0_by_radius_km must span 0..=last_ring_km"
    );

    let f = coriolis_parameter(latitude_deg);
    let rho = rho_bar(base_height_km) as f64;

    // dp/dr(R) for R in first..=last; None where VTC0 is missing or zero.
    let mut dpdr: Vec<Option<f64>> = vec![None; last + 1];
    for radius in first..=last {
        if let Some(mean_vt) = vtc0_by_radius_km[radius] {
            if mean_vt != 0.0 {
                let mean_vt = mean_vt as f64;
                let r_m = radius as f64 * DELTA_R_M;
                dpdr[radius] = Some((f * mean_vt + mean_vt * mean_vt / r_m) * rho);
            }
        }
    }

    let mut deficit = vec![0.0f64; last + 1];
    if let Some(d_last) = dpdr[last] {
        deficit[last] = -d_last * DELTA_R_M * 0.001;
    }

    for radius in (0..last).rev() {
        if radius >= first {
            deficit[radius] = match (dpdr[radius], dpdr[radius + 1]) {
                (Some(a), Some(b)) => deficit[radius + 1] - (a + b) * DELTA_R_M * 0.001 / 2.0,
                (Some(a), None) => deficit[radius + 1] - a * DELTA_R_M * 0.001,
                (None, Some(b)) => deficit[radius + 1] - b * DELTA_R_M * 0.001,
                (None, None) => 0.0,
            };
        } else {
            deficit[radius] = deficit[first];
        }
    }

    deficit.into_iter().map(|v| v as f32).collect()
}
