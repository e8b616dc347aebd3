//! Ground-Based Velocity Track Display: fits a truncated Fourier series to
//! one radius-height ring of radial velocity and translates it into
//! axisymmetric and low-wavenumber wind coefficients.
//!
//! Grounded directly on `original_source/src/VTD/GBVTD.cpp`'s
//! `analyzeRing`/`setWindCoefficients` for the coefficient algebra (A/B
//! array indexing, the `original`/`original+hvvp` closures, and the
//! `sinAlphamax < 0.8` gating on VTS1/VTC1).

use std::f64::consts::{PI, TAU};

use vortrac_model::{Closure, Parameter, RingPoint};

use crate::lls;
use crate::result::Error;

/// Wraps an angle in radians into `(-π, π]`.
pub fn wrap(angle_rad: f64) -> f64 {
    let mut a = angle_rad.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Why a ring produced no Fourier fit. All variants are recovered locally
/// by the coordinator (sentinel coefficients, ring skipped); none halt the
/// volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingFailure {
    /// The center lies inside the ring radius; the closure's geometry is undefined.
    CenterInsideRing,
    /// No wavenumber's angular data gaps were small enough to attempt a fit.
    NoWavenumberFit,
    /// The chosen wavenumber's normal equations were singular.
    Singular,
}

/// The outcome of fitting one ring: either a set of (parameter, value)
/// wind coefficients plus the fit's residual standard deviation, or a
/// recorded failure reason (the ring's coefficients then stay at the
/// tensor's sentinel default).
#[derive(Debug, Clone, PartialEq)]
pub enum RingOutcome {
    Solved {
        coefficients: Vec<(Parameter, f32)>,
        std_dev: f32,
    },
    Missing(RingFailure),
}

/// Fits one ring of `(azimuth, velocity)` samples and translates the result
/// into wind coefficients.
///
/// `ring` samples carry math-convention azimuths (degrees CCW from east),
/// as returned by [`vortrac_model::GriddedVolume::sample_ring`]. `x_center_km`/
/// `y_center_km` are the circulation center's offset from the radar, in the
/// same frame. `hvvp_mean` is the cross-beam environmental wind from HVVP,
/// used only under the `OriginalHvvp` closure.
pub fn analyze_ring(
    radius_km: u32,
    x_center_km: f32,
    y_center_km: f32,
    ring: &[RingPoint],
    closure: Closure,
    hvvp_mean: Option<f32>,
    max_wavenumber: u8,
    max_data_gap_deg: &[f32; 5],
) -> RingOutcome {
    let x_center = x_center_km as f64;
    let y_center = y_center_km as f64;
    let radius = radius_km as f64;

    let theta_t = wrap(y_center.atan2(x_center));
    let center_distance = (x_center * x_center + y_center * y_center).sqrt();

    if center_distance < radius {
        return RingOutcome::Missing(RingFailure::CenterInsideRing);
    }

    let mut psi = Vec::with_capacity(ring.len());
    let mut vel = Vec::with_capacity(ring.len());
    for point in ring {
        let value = match point.value {
            Some(v) => v,
            None => continue,
        };
        let angle = wrap((point.azimuth_deg as f64).to_radians() - theta_t);
        let xx = x_center + radius * (angle + theta_t).cos();
        let yy = y_center + radius * (angle + theta_t).sin();
        let psi_correction = yy.atan2(xx) - theta_t;
        psi.push(wrap(angle - psi_correction));
        vel.push(value as f64);
    }

    let wavenumber = match choose_wavenumber(&psi, max_wavenumber, max_data_gap_deg) {
        Some(w) => w,
        None => return RingOutcome::Missing(RingFailure::NoWavenumberFit),
    };

    let num_coeffs = 2 * wavenumber as usize + 1;
    let design: Vec<Vec<f64>> = psi
        .iter()
        .map(|&p| {
            let mut row = vec![0.0; num_coeffs];
            row[0] = 1.0;
            for j in 1..=wavenumber as usize {
                row[2 * j - 1] = (j as f64 * p).sin();
                row[2 * j] = (j as f64 * p).cos();
            }
            row
        })
        .collect();
    let weights = vec![1.0; psi.len()];

    let fit = match lls::solve(&design, &weights, &vel) {
        Ok(fit) => fit,
        Err(Error::Singular) => return RingOutcome::Missing(RingFailure::Singular),
        Err(other) => {
            log::warn!("unexpected LLS error fitting ring at radius {radius_km} km: {other}");
            return RingOutcome::Missing(RingFailure::Singular);
        }
    };

    let fourier = &fit.coefficients;
    let mut a = [0.0f32; 5];
    let mut b = [0.0f32; 5];
    a[0] = fourier[0];
    for j in 1..=wavenumber as usize {
        a[j.min(4)] = fourier[2 * j];
        b[j.min(4)] = fourier[2 * j - 1];
    }

    let sin_alpha_max = (radius_km as f32) / (center_distance as f32);
    let cos_alpha_max = ((center_distance * center_distance - radius * radius).sqrt() / center_distance) as f32;

    let mut coefficients = Vec::new();

    let vtc0 = if matches!(closure, Closure::OriginalHvvp) && b[1] != 0.0 {
        -b[1] - b[3] - hvvp_mean.unwrap_or(0.0) * sin_alpha_max
    } else {
        -b[1] - b[3]
    };
    coefficients.push((Parameter::Vtc0, vtc0));

    let vrc0 = a[1] + a[3];
    coefficients.push((Parameter::Vrc0, vrc0));

    let vmc0 = a[0] + a[2] + a[4];
    coefficients.push((Parameter::Vmc0, vmc0));

    let gated = sin_alpha_max < 0.8 && num_coeffs >= 5;

    let vts1 = if gated {
        let value = a[2] - a[0] + a[4] + vmc0 * cos_alpha_max;
        if value < vtc0 {
            value
        } else {
            0.0
        }
    } else {
        0.0
    };
    coefficients.push((Parameter::Vts(1), vts1));

    let vtc1 = if gated {
        let value = -2.0 * (b[2] + b[4]);
        if value < vtc0 {
            value
        } else {
            0.0
        }
    } else {
        0.0
    };
    coefficients.push((Parameter::Vtc(1), vtc1));

    // Higher wavenumbers: legacy only ever sets VTC_k/VTS_k for k in
    // 2..=(wavenumber-1), since it reads Fourier coefficients a_{k+1}/b_{k+1}
    // which only exist up to the chosen wavenumber.
    if wavenumber >= 3 {
        for k in 2..wavenumber as usize {
            let vtc_k = -2.0 * b_at(fourier, k + 1);
            let vts_k = 2.0 * a_at(fourier, k + 1);
            if k as u8 <= max_wavenumber {
                coefficients.push((Parameter::Vtc(k as u8), vtc_k));
                coefficients.push((Parameter::Vts(k as u8), vts_k));
            }
        }
    }

    RingOutcome::Solved {
        coefficients,
        std_dev: fit.residual_std_dev,
    }
}

fn a_at(fourier: &[f32], j: usize) -> f32 {
    fourier.get(2 * j).copied().unwrap_or(0.0)
}

fn b_at(fourier: &[f32], j: usize) -> f32 {
    fourier.get(2 * j - 1).copied().unwrap_or(0.0)
}

/// Chooses the largest wavenumber `W` in `0..=max_wavenumber` whose maximum
/// angular gap among `psi` (sorted, wrap-around included) is at most
/// `max_data_gap_deg[W]`, and for which enough samples exist to fit
/// `2W + 1` coefficients. Returns `None` if no wavenumber qualifies.
fn choose_wavenumber(psi: &[f64], max_wavenumber: u8, max_data_gap_deg: &[f32; 5]) -> Option<u8> {
    if psi.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = psi.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut max_gap_deg = 0.0f64;
    for i in 0..sorted.len() {
        let next = sorted[(i + 1) % sorted.len()];
        let mut gap = next - sorted[i];
        if gap < 0.0 {
            gap += TAU;
        }
        max_gap_deg = max_gap_deg.max(gap.to_degrees());
    }

    for w in (0..=max_wavenumber.min(4)).rev() {
        let num_coeffs = 2 * w as usize + 1;
        if sorted.len() < num_coeffs {
            continue;
        }
        if max_gap_deg <= max_data_gap_deg[w as usize] as f64 {
            return Some(w);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use vortrac_model::RingPoint;

    #[test]
    fn wrap_stays_in_half_open_interval() {
        for i in -20..20 {
            let x = i as f64 * 0.7;
            let w = wrap(x);
            assert!(w > -PI && w <= PI, "wrap({x}) = {w}");
        }
    }

    #[test]
    fn wrap_is_periodic() {
        for i in -10..10 {
            let x = i as f64 * 1.3;
            assert!((wrap(x + TAU) - wrap(x)).abs() < 1e-9);
        }
    }

    fn axisymmetric_ring(v_t: f32, theta_t_deg: f32, n: usize) -> Vec<RingPoint> {
        (0..n)
            .map(|i| {
                let az = 360.0 * i as f32 / n as f32;
                let phi = az.to_radians();
                let value = v_t * (phi - theta_t_deg.to_radians()).sin();
                RingPoint { azimuth_deg: az, value: Some(value) }
            })
            .collect()
    }

    #[test]
    fn pure_tangential_flow_recovers_vtc0_magnitude() {
        // Center far from the ring so sinAlphaMax stays small and the
        // psi-correction is negligible: psi ~= azimuth - theta_T.
        //
        // VTC0 = -(b1 + b3) (legacy `setWindCoefficients`), so a synthetic
        // field V = v_t*sin(azimuth - theta_T) fits b1 = v_t and recovers
        // VTC0 = -v_t: the sign of VTC0 is opposite the sine coefficient by
        // this closure's convention, not a defect. See `DESIGN.md`.
        let x_center = 80.0;
        let y_center = 0.0;
        let ring = axisymmetric_ring(40.0, 0.0, 36);

        let outcome = analyze_ring(
            20,
            x_center,
            y_center,
            &ring,
            Closure::Original,
            None,
            2,
            &[30.0, 40.0, 50.0, 60.0, 70.0],
        );

        match outcome {
            RingOutcome::Solved { coefficients, .. } => {
                let vtc0 = coefficients
                    .iter()
                    .find(|(p, _)| *p == Parameter::Vtc0)
                    .map(|(_, v)| *v)
                    .unwrap();
                assert!((vtc0.abs() - 40.0).abs() < 0.5, "VTC0 = {vtc0}");
            }
            other => panic!("expected a solved ring, got {other:?}"),
        }
    }

    #[test]
    fn center_inside_ring_is_rejected() {
        let ring = axisymmetric_ring(40.0, 0.0, 36);
        let outcome = analyze_ring(
            20,
            1.0,
            1.0,
            &ring,
            Closure::Original,
            None,
            2,
            &[30.0, 40.0, 50.0, 60.0, 70.0],
        );
        assert_eq!(outcome, RingOutcome::Missing(RingFailure::CenterInsideRing));
    }

    #[test]
    fn sparse_ring_with_wide_gaps_is_missing() {
        // Only two points, 180 degrees apart, with no wavenumber whose
        // gap threshold of even the loosest config accepts a 180-degree gap.
        let ring = vec![
            RingPoint { azimuth_deg: 0.0, value: Some(10.0) },
            RingPoint { azimuth_deg: 180.0, value: Some(-10.0) },
        ];
        let outcome = analyze_ring(
            20,
            -100.0,
            -100.0,
            &ring,
            Closure::Original,
            None,
            2,
            &[5.0, 5.0, 5.0, 5.0, 5.0],
        );
        assert_eq!(outcome, RingOutcome::Missing(RingFailure::NoWavenumberFit));
    }

    #[test]
    fn missing_samples_are_dropped_before_fitting() {
        // 36 samples at 10 degree spacing; dropping 3 contiguous samples
        // leaves a 40 degree gap, comfortably under the wavenumber-2
        // threshold (50 degrees) in the config used below.
        let mut ring = axisymmetric_ring(40.0, 0.0, 36);
        for point in ring.iter_mut().take(3) {
            point.value = None;
        }
        let outcome = analyze_ring(
            20,
            80.0,
            0.0,
            &ring,
            Closure::Original,
            None,
            2,
            &[30.0, 40.0, 50.0, 60.0, 70.0],
        );
        assert!(matches!(outcome, RingOutcome::Solved { .. }));
    }
}
