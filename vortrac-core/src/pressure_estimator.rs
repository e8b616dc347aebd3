//! Combines nearby surface pressure observations with the gradient-wind
//! deficit profile into a central-pressure estimate and its uncertainty.
//!
//! Grounded on `VortexThread.cpp::calcCentralPressure` for anchor
//! acceptance, per-anchor `cp_i`/weight, and the 0/1/≥2-anchor combination
//! branches, and on its uncertainty-by-perturbation pass further down the
//! same file.

use vortrac_model::PressureObservation;

/// Accepting more than this many anchors per volume logs a warning and
/// truncates, per the legacy `numEstimates > 100` cutoff.
pub const MAX_ANCHORS: usize = 100;

/// A pressure observation paired with its pre-resolved distance from the
/// vortex center and age relative to the analysis time — both computed by
/// the caller (which has the geographic projection and analysis timestamp
/// the estimator itself doesn't need to know about).
#[derive(Debug, Clone, Copy)]
pub struct AnchorCandidate<'a> {
    pub observation: &'a PressureObservation,
    pub radius_km: f32,
    pub age_s: f32,
}

/// One accepted anchor's contribution to the combined estimate.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub station_id: String,
    pub cp_estimate_hpa: f32,
    pub weight: f32,
}

/// A central-pressure estimate and its uncertainty, plus the anchors that
/// went into it (empty if none were available).
#[derive(Debug, Clone)]
pub struct PressureEstimate {
    pub central_pressure_hpa: f32,
    /// Named for parity with the legacy field it's grounded on
    /// (`centralPressureStdDev`), but for the ≥2-anchor branch this is the
    /// weighted variance of the per-anchor estimates, not its square root —
    /// the legacy code never takes that square root either.
    pub uncertainty_hpa: f32,
    pub deficit_hpa: f32,
    pub anchors: Vec<Anchor>,
}

/// Selects anchors from `candidates` and combines them with `deficit_profile`
/// (indexed `0..=last_ring_km`, hPa, as produced by
/// [`crate::pressure_integrator::deficit_profile`]) into a central-pressure
/// estimate.
///
/// An anchor is accepted if `0 < age_s <= max_ob_time_s` and
/// `rmw_km <= radius_km <= max_ob_radius_km`. At most [`MAX_ANCHORS`] are
/// kept; acceptance stops and a warning is logged if more qualify.
pub fn estimate(
    candidates: &[AnchorCandidate<'_>],
    rmw_km: f32,
    max_ob_time_s: f32,
    max_ob_radius_km: f32,
    deficit_profile: &[f32],
    first_ring_km: u32,
    last_ring_km: u32,
) -> PressureEstimate {
    let last = last_ring_km as usize;
    let p_prime_first = deficit_profile[0];
    let p_prime_last = deficit_profile[last];

    let mut anchors = Vec::new();
    for candidate in candidates {
        if candidate.observation.pressure_hpa <= 0.0 {
            continue;
        }
        if !(candidate.age_s > 0.0 && candidate.age_s <= max_ob_time_s) {
            continue;
        }
        if !(candidate.radius_km >= rmw_km && candidate.radius_km <= max_ob_radius_km) {
            continue;
        }

        if anchors.len() >= MAX_ANCHORS {
            log::warn!("pressure estimate limit ({MAX_ANCHORS}) reached; remaining observations ignored");
            break;
        }

        let clamped_radius = candidate.radius_km.min(last_ring_km as f32);
        let idx = (clamped_radius as usize).min(last);
        let p_prime_outer = deficit_profile[idx];

        let cp_estimate_hpa = candidate.observation.pressure_hpa - (p_prime_outer - p_prime_first);
        let weight = 0.5
            * ((max_ob_time_s - candidate.age_s) / max_ob_time_s
                + (max_ob_radius_km - candidate.radius_km) / max_ob_radius_km);

        anchors.push(Anchor {
            station_id: candidate.observation.station_id.clone(),
            cp_estimate_hpa,
            weight,
        });
    }

    let deficit_hpa = p_prime_last - p_prime_first;

    let (central_pressure_hpa, uncertainty_hpa) = match anchors.len() {
        0 => (1013.0 - deficit_hpa, 5.0),
        1 => (anchors[0].cp_estimate_hpa, 5.0),
        n => {
            let weight_sum: f32 = anchors.iter().map(|a| a.weight).sum();
            let cp = anchors.iter().map(|a| a.weight * a.cp_estimate_hpa).sum::<f32>() / weight_sum;
            let mean_weight = weight_sum / n as f32;
            let sum_squares: f32 = anchors
                .iter()
                .map(|a| a.weight * (a.cp_estimate_hpa - cp).powi(2))
                .sum();
            let variance = sum_squares / (mean_weight * (n as f32 - 1.0));
            (cp, variance)
        }
    };

    PressureEstimate {
        central_pressure_hpa,
        uncertainty_hpa,
        deficit_hpa,
        anchors,
    }
}

/// Refines a nominal central-pressure estimate's uncertainty by re-running
/// the wind + deficit + anchor pipeline at four centers offset by
/// `(±sigma_c, 0)` and `(0, ±sigma_c)`, where `sigma_c = max(center_std_km,
/// floor_km)`. `pipeline(dx_km, dy_km)` is expected to close over the
/// volume, config, and anchor candidates to rebuild a full
/// [`PressureEstimate`] at the offset center and return its
/// `central_pressure_hpa` — that rebuild needs GBVTD and the pressure
/// integrator, which this module doesn't otherwise depend on, so the
/// re-run is left to the caller (the coordinator).
///
/// The coordinator calls this twice per volume: once with `floor_km = 1.5`
/// (the published uncertainty, matching the legacy minimum center-finding
/// spread) and once with `floor_km = 0.0` (an unfloored diagnostic variant
/// recorded alongside it, per spec).
///
/// Returns `|mean(perturbed cp) - nominal_cp_hpa|`.
pub fn refine_uncertainty_by_perturbation(
    nominal_cp_hpa: f32,
    center_std_km: f32,
    floor_km: f32,
    mut pipeline: impl FnMut(f32, f32) -> f32,
) -> f32 {
    let sigma_c = center_std_km.max(floor_km);
    let offsets = [(sigma_c, 0.0), (-sigma_c, 0.0), (0.0, sigma_c), (0.0, -sigma_c)];
    let perturbed: Vec<f32> = offsets.iter().map(|&(dx, dy)| pipeline(dx, dy)).collect();
    let mean = perturbed.iter().sum::<f32>() / perturbed.len() as f32;
    (mean - nominal_cp_hpa).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(station: &str, pressure_hpa: f32) -> PressureObservation {
        PressureObservation::new(station.to_string(), 0.0, 0.0, pressure_hpa, 0)
    }

    #[test]
    fn zero_anchors_falls_back_to_standard_environment() {
        let deficit = vec![0.0, -1.0, -2.0, -3.0, -4.0, -5.0];
        let est = estimate(&[], 5.0, 3600.0, 55.0, &deficit, 1, 5);
        assert_eq!(est.anchors.len(), 0);
        assert!((est.central_pressure_hpa - (1013.0 - (-5.0))).abs() < 1e-4);
        assert_eq!(est.uncertainty_hpa, 5.0);
    }

    #[test]
    fn single_anchor_uses_fixed_uncertainty() {
        let ob = observation("KXYZ", 990.0);
        let deficit = vec![0.0, -1.0, -2.0, -3.0, -4.0, -5.0];
        let candidates = [AnchorCandidate { observation: &ob, radius_km: 3.0, age_s: 120.0 }];
        let est = estimate(&candidates, 1.0, 3600.0, 55.0, &deficit, 1, 5);
        assert_eq!(est.anchors.len(), 1);
        assert_eq!(est.uncertainty_hpa, 5.0);
        // cp = ob - (p'(3) - p'(0)) = 990 - (-3 - 0) = 993
        assert!((est.central_pressure_hpa - 993.0).abs() < 1e-4);
    }

    #[test]
    fn anchors_outside_radius_or_time_window_are_rejected() {
        let far = observation("FAR", 990.0);
        let stale = observation("STALE", 985.0);
        let deficit = vec![0.0, -1.0, -2.0, -3.0, -4.0, -5.0];
        let candidates = [
            AnchorCandidate { observation: &far, radius_km: 999.0, age_s: 120.0 },
            AnchorCandidate { observation: &stale, radius_km: 3.0, age_s: 99999.0 },
        ];
        let est = estimate(&candidates, 1.0, 3600.0, 55.0, &deficit, 1, 5);
        assert_eq!(est.anchors.len(), 0);
    }

    #[test]
    fn two_anchors_combine_by_weighted_mean_and_variance() {
        let a = observation("A", 990.0);
        let b = observation("B", 1000.0);
        let deficit = vec![0.0; 6];
        let candidates = [
            AnchorCandidate { observation: &a, radius_km: 3.0, age_s: 60.0 },
            AnchorCandidate { observation: &b, radius_km: 3.0, age_s: 60.0 },
        ];
        let est = estimate(&candidates, 1.0, 3600.0, 55.0, &deficit, 1, 5);
        assert_eq!(est.anchors.len(), 2);
        // Equal weights and radii: cp is the plain mean.
        assert!((est.central_pressure_hpa - 995.0).abs() < 1e-3);
        assert!(est.uncertainty_hpa > 0.0);
    }

    #[test]
    fn anchor_cap_truncates_and_keeps_first_hundred() {
        let obs: Vec<PressureObservation> = (0..150).map(|i| observation(&format!("S{i}"), 1000.0)).collect();
        let candidates: Vec<AnchorCandidate> = obs
            .iter()
            .map(|o| AnchorCandidate { observation: o, radius_km: 3.0, age_s: 60.0 })
            .collect();
        let deficit = vec![0.0; 6];
        let est = estimate(&candidates, 1.0, 3600.0, 55.0, &deficit, 1, 5);
        assert_eq!(est.anchors.len(), MAX_ANCHORS);
    }

    #[test]
    fn perturbation_refinement_matches_mean_offset() {
        // pipeline returns nominal +/- a fixed bias depending on offset sign,
        // so the mean across all four offsets should equal the nominal.
        let uncertainty = refine_uncertainty_by_perturbation(1000.0, 2.0, 1.5, |dx, dy| 1000.0 + dx + dy);
        assert!(uncertainty < 1e-4);
    }

    #[test]
    fn perturbation_sigma_floor_is_applied() {
        let mut seen = Vec::new();
        refine_uncertainty_by_perturbation(1000.0, 0.1, 1.5, |dx, dy| {
            seen.push((dx, dy));
            1000.0
        });
        // center_std_km (0.1) is below the 1.5 km floor.
        assert!(seen.iter().all(|&(dx, dy)| dx.abs() == 1.5 || dy.abs() == 1.5));
    }

    #[test]
    fn perturbation_unfloored_uses_raw_center_std() {
        let mut seen = Vec::new();
        refine_uncertainty_by_perturbation(1000.0, 0.1, 0.0, |dx, dy| {
            seen.push((dx, dy));
            1000.0
        });
        assert!(seen.iter().all(|&(dx, dy)| dx.abs() == 0.1 || dy.abs() == 0.1));
    }
}
