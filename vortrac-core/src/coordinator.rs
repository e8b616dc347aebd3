//! Sequences center-finding, wind-structure, and pressure analysis over one
//! volume: `IDLE → LOADED → CENTER_FOUND → WINDS_FOUND → PRESSURE_FOUND →
//! PUBLISHED → IDLE`.
//!
//! Grounded on the legacy `Threads/VortexThread.cpp`'s `run()` loop shape
//! (forever-loop, mutex-guarded shared state, a polled `bool abort` field)
//! and `Threads/PollThread.h`'s wait/notify around a work queue — translated
//! into a single synchronous call per volume rather than a `QThread` with
//! Qt signals/slots, since GUI/driver machinery is out of this crate's scope.
//! The coordinator owns the volume exclusively for the call's lifetime;
//! `GBVTD`, `HVVP`, and `SimplexCenterFinder` only ever see it through
//! short-lived borrows taken and released within one level or ring.

use std::sync::atomic::{AtomicBool, Ordering};

use vortrac_model::{
    to_meteorological_deg, Closure, CoefficientTensor, Config, Field, GriddedVolume, LevelCenter,
    Parameter, PressureObservation, VortexRecord, VortexSeries,
};

use crate::center_finder::SimplexCenterFinder;
use crate::gbvtd::{self, RingOutcome};
use crate::hvvp::{self, HvvpResult};
use crate::log_message::{LogMessage, StopLightColor, StormSignalStatus};
use crate::pressure_estimator::{self, AnchorCandidate};
use crate::pressure_integrator;
use crate::result::{Error, Result};

/// Half-width, in kilometers, of the radius band searched around a level's
/// prior (or seeded) RMW when locating the circulation center and when
/// re-deriving that level's RMW at the found center.
///
/// Not part of the enumerated configuration in `vortrac-model::config`: the
/// spec describes the search band only as "the prior RMW plus or minus a
/// search radius" without naming a default, so this is fixed here rather
/// than added to `Config`.
pub const CENTER_SEARCH_RADIUS_KM: f32 = 15.0;

/// The coordinator's state machine position. Progress percentages (emitted
/// via [`LogMessage`]) don't map one-to-one onto these variants: `70%` is
/// emitted mid-`WindsFound`, once the pressure-deficit profile has been
/// integrated but before anchors are combined, without a dedicated state of
/// its own. See `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    #[default]
    Idle,
    Loaded,
    CenterFound,
    WindsFound,
    PressureFound,
    Published,
}

/// An initial guess used in place of a prior record's per-level center, for
/// the first volume analyzed for a storm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedVortex {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub rmw_km: f32,
}

/// One diagnostic central-pressure estimate from the uncertainty-by-
/// perturbation pass. This crate does not persist these; they are returned
/// for a collaborator to store alongside the published record.
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationRecord {
    /// `"limited"` (1.5 km-floored, the variant the published uncertainty
    /// is derived from) or `"unfloored"`.
    pub label: &'static str,
    pub timestamp: i64,
    pub offset_x_km: f32,
    pub offset_y_km: f32,
    pub central_pressure_hpa: f32,
}

/// The outcome of one `analyze_volume` call: the state the coordinator
/// ended in (`Published` on success, `Idle` if cancelled) and any
/// perturbation records produced along the way.
#[derive(Debug, Clone, Default)]
pub struct VolumeAnalysis {
    pub state: CoordinatorState,
    pub perturbations: Vec<PerturbationRecord>,
}

impl VolumeAnalysis {
    fn cancelled() -> Self {
        Self {
            state: CoordinatorState::Idle,
            perturbations: Vec::new(),
        }
    }
}

/// A per-level center, found or skipped, threaded through the pipeline
/// after `SimplexCenterFinder` runs.
#[derive(Debug, Clone, Copy)]
struct LevelResult {
    height_km: f32,
    valid: bool,
    x_km: f32,
    y_km: f32,
    rmw_km: f32,
    center_std_km: f32,
}

/// Sequences `SimplexCenterFinder -> GBVTD -> PressureIntegrator -> HVVP ->
/// GBVTD (closure-corrected) -> PressureEstimator` for one volume.
pub struct AnalysisCoordinator {
    config: Config,
    center_finder: SimplexCenterFinder,
    state: CoordinatorState,
}

impl AnalysisCoordinator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            center_finder: SimplexCenterFinder::new(),
            state: CoordinatorState::Idle,
        }
    }

    pub fn with_center_finder(mut self, center_finder: SimplexCenterFinder) -> Self {
        self.center_finder = center_finder;
        self
    }

    /// The coordinator's current state. Only meaningful between calls to
    /// [`analyze_volume`](Self::analyze_volume): it always ends a call at
    /// either `Published` or `Idle`.
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Analyzes one volume sequentially, appending a [`VortexRecord`] to
    /// `series` on success.
    ///
    /// `seed` is used for any level with no matching entry in `prior`'s
    /// levels (in particular, on the first volume for a storm, when `prior`
    /// is `None`). `timestamp` is this volume's time, seconds since epoch,
    /// used both as the published record's identity and to age
    /// `observations`. `abort` is polled at every level and every ring;
    /// `on_message` receives a [`LogMessage`] at each progress milestone
    /// (0/10/40/70/90/100%).
    #[allow(clippy::too_many_arguments)]
    pub fn analyze_volume(
        &mut self,
        volume: &mut GriddedVolume,
        prior: Option<&VortexRecord>,
        seed: SeedVortex,
        observations: &[PressureObservation],
        timestamp: i64,
        abort: &AtomicBool,
        series: &mut VortexSeries,
        mut on_message: impl FnMut(LogMessage),
    ) -> Result<VolumeAnalysis> {
        self.run(volume, prior, seed, observations, timestamp, abort, series, false, &mut on_message)
    }

    /// As [`analyze_volume`](Self::analyze_volume), but when the configured
    /// closure is `OriginalHvvp`, runs HVVP's sector fit on a scoped thread
    /// concurrent with the deficit-source ring solve at the base level. With
    /// `Closure::Original` there is nothing to parallelize and this behaves
    /// exactly like `analyze_volume`.
    ///
    /// HVVP only reads the volume, but it runs alongside code that needs
    /// `&mut GriddedVolume` for the deficit-source solve, so the HVVP thread
    /// operates on a cloned snapshot rather than racing the main thread for
    /// the same borrow. No result depends on which instance is used.
    #[allow(clippy::too_many_arguments)]
    pub fn analyze_volume_with_parallel_hvvp(
        &mut self,
        volume: &mut GriddedVolume,
        prior: Option<&VortexRecord>,
        seed: SeedVortex,
        observations: &[PressureObservation],
        timestamp: i64,
        abort: &AtomicBool,
        series: &mut VortexSeries,
        mut on_message: impl FnMut(LogMessage),
    ) -> Result<VolumeAnalysis> {
        self.run(volume, prior, seed, observations, timestamp, abort, series, true, &mut on_message)
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &mut self,
        volume: &mut GriddedVolume,
        prior: Option<&VortexRecord>,
        seed: SeedVortex,
        observations: &[PressureObservation],
        timestamp: i64,
        abort: &AtomicBool,
        series: &mut VortexSeries,
        parallel_hvvp: bool,
        on_message: &mut dyn FnMut(LogMessage),
    ) -> Result<VolumeAnalysis> {
        match self.run_inner(volume, prior, seed, observations, timestamp, abort, series, parallel_hvvp, on_message) {
            Ok(outcome) => Ok(outcome),
            Err(Error::Cancelled) => {
                self.state = CoordinatorState::Idle;
                on_message(LogMessage::new("analysis cancelled", 0, "coordinator"));
                Ok(VolumeAnalysis::cancelled())
            }
            Err(other) => {
                self.state = CoordinatorState::Idle;
                Err(other)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_inner(
        &mut self,
        volume: &mut GriddedVolume,
        prior: Option<&VortexRecord>,
        seed: SeedVortex,
        observations: &[PressureObservation],
        timestamp: i64,
        abort: &AtomicBool,
        series: &mut VortexSeries,
        parallel_hvvp: bool,
        on_message: &mut dyn FnMut(LogMessage),
    ) -> Result<VolumeAnalysis> {
        self.state = CoordinatorState::Loaded;
        self.config.validate(volume.footprint_km())?;
        on_message(LogMessage::new("volume loaded", 0, "coordinator"));

        let grid_levels = level_range(volume, &self.config);

        check_abort(abort)?;
        let levels = self.find_centers(volume, prior, seed, &grid_levels, abort)?;
        self.state = CoordinatorState::CenterFound;
        let found = levels.iter().filter(|l| l.valid).count();
        on_message(LogMessage::new(format!("center found at {found}/{} levels", levels.len()), 10, "center_finder"));

        let base = levels.iter().find(|l| l.valid).copied().ok_or(Error::AllLevelsFailed)?;

        let (hvvp_outcome, vtc0_by_radius) = self.resolve_hvvp_and_deficit_source(volume, base, parallel_hvvp, &levels, abort)?;

        let (closure, hvvp_mean) = match (self.config.closure, &hvvp_outcome) {
            (Closure::OriginalHvvp, Some(Ok(result))) => (Closure::OriginalHvvp, Some(result.across_beam_mean_ms)),
            (Closure::OriginalHvvp, Some(Err(reason))) => {
                on_message(
                    LogMessage::new(format!("HVVP unavailable: {reason}; closure downgraded to original"), 40, "hvvp")
                        .with_stoplight(StopLightColor::Yellow, "hvvp downgrade"),
                );
                (Closure::Original, None)
            }
            _ => (Closure::Original, None),
        };

        check_abort(abort)?;
        let mut tensor = CoefficientTensor::new(
            levels.len(),
            self.config.inner_radius_km,
            (self.config.outer_radius_km - self.config.inner_radius_km + 1) as usize,
            Parameter::slots_for_wavenumber(self.config.max_wavenumber),
        );
        for (level_idx, level) in levels.iter().enumerate() {
            if !level.valid {
                continue;
            }
            check_abort(abort)?;
            let outcomes = solve_radii(volume, &self.config, level.x_km, level.y_km, level.height_km, closure, hvvp_mean, abort)?;
            for (radius_km, outcome) in outcomes {
                if let RingOutcome::Solved { coefficients, .. } = outcome {
                    for (parameter, value) in coefficients {
                        tensor.set(level_idx, radius_km, parameter, value);
                    }
                }
            }
        }
        self.state = CoordinatorState::WindsFound;
        on_message(LogMessage::new("wind coefficients solved", 40, "gbvtd"));

        let base_lat_deg = volume.reference_lat_lon_deg().map(|(lat, _lon)| lat as f32).unwrap_or(0.0);
        let deficit_profile = pressure_integrator::deficit_profile(
            &vtc0_by_radius,
            self.config.inner_radius_km,
            self.config.outer_radius_km,
            base_lat_deg,
            base.height_km,
        );
        on_message(LogMessage::new("pressure deficit profile integrated", 70, "pressure_integrator"));

        check_abort(abort)?;
        let (obs_cartesian, max_ob_time_s, max_ob_radius_km) = self.prepare_anchors(volume, observations, timestamp);
        let candidates = anchor_candidates(&obs_cartesian, base.x_km, base.y_km);
        let estimate = pressure_estimator::estimate(
            &candidates,
            base.rmw_km,
            max_ob_time_s,
            max_ob_radius_km,
            &deficit_profile,
            self.config.inner_radius_km,
            self.config.outer_radius_km,
        );

        let mut perturbations = Vec::new();
        let uncertainty_hpa = self.refine_uncertainty(
            volume,
            &obs_cartesian,
            base,
            estimate.central_pressure_hpa,
            max_ob_time_s,
            max_ob_radius_km,
            timestamp,
            &mut perturbations,
        );
        // Spec invariant: uncertainty derived from center perturbation (i.e.
        // whenever >= 2 anchors let the >=2-anchor branch's own variance
        // stand instead of the fixed 5.0 hPa single/zero-anchor fallback)
        // never reports below 1.5 hPa.
        let published_uncertainty_hpa = if estimate.anchors.len() >= 2 {
            estimate.uncertainty_hpa.max(uncertainty_hpa).max(1.5)
        } else {
            estimate.uncertainty_hpa.max(uncertainty_hpa)
        };

        self.state = CoordinatorState::PressureFound;
        on_message(LogMessage::new(
            format!("central pressure {:.1} hPa (+/- {:.1})", estimate.central_pressure_hpa, published_uncertainty_hpa),
            90,
            "pressure_estimator",
        ));

        let level_centers: Vec<LevelCenter> = levels.iter().map(|l| to_level_center(volume, l)).collect();
        let record = VortexRecord::new(
            timestamp,
            level_centers,
            tensor,
            estimate.central_pressure_hpa,
            published_uncertainty_hpa,
            estimate.deficit_hpa,
        );
        series.append(record)?;

        self.state = CoordinatorState::Published;
        on_message(
            LogMessage::new("volume published", 100, "coordinator")
                .with_storm_signal(StormSignalStatus::Ok, "analysis complete"),
        );

        Ok(VolumeAnalysis { state: self.state, perturbations })
    }

    fn find_centers(
        &self,
        volume: &mut GriddedVolume,
        prior: Option<&VortexRecord>,
        seed: SeedVortex,
        grid_levels: &[usize],
        abort: &AtomicBool,
    ) -> Result<Vec<LevelResult>> {
        let mut results = Vec::with_capacity(grid_levels.len());

        for (level_idx, &grid_level) in grid_levels.iter().enumerate() {
            check_abort(abort)?;
            let height_km = volume.height_for_level(grid_level);

            let (seed_lat, seed_lon, seed_rmw) = prior
                .and_then(|p| p.levels().get(level_idx))
                .map(|l| (l.lat_deg, l.lon_deg, l.rmw_km))
                .unwrap_or((seed.lat_deg, seed.lon_deg, seed.rmw_km));

            let (seed_x, seed_y, _seed_z) = volume.projection().to_cartesian(seed_lat, seed_lon, height_km as f64);
            let (r_lo, r_hi) = search_band(seed_rmw, self.config.inner_radius_km, self.config.outer_radius_km);

            let found = {
                let config = &self.config;
                self.center_finder.find_center((seed_x, seed_y), |x, y| {
                    if abort.load(Ordering::Relaxed) {
                        return None;
                    }
                    mean_vtc0(volume, config, x, y, height_km, r_lo, r_hi)
                })
            };

            match found.and_then(|c| volume.set_reference_point_km(c.x_km, c.y_km, height_km).ok().map(|_| c)) {
                Some(center) => {
                    let rmw_km = argmax_vtc0_radius(volume, &self.config, center.x_km, center.y_km, height_km, r_lo, r_hi)
                        .map(|r| r as f32)
                        .unwrap_or(seed_rmw);
                    results.push(LevelResult {
                        height_km,
                        valid: true,
                        x_km: center.x_km,
                        y_km: center.y_km,
                        rmw_km,
                        center_std_km: center.center_std_km,
                    });
                }
                None => {
                    results.push(LevelResult {
                        height_km,
                        valid: false,
                        x_km: 0.0,
                        y_km: 0.0,
                        rmw_km: 0.0,
                        center_std_km: 0.0,
                    });
                }
            }
        }

        Ok(results)
    }

    /// Produces the HVVP outcome (if the configured closure wants one) and
    /// the always-`Original`-closure base-level VTC0 profile the deficit
    /// integrator consumes, running the two concurrently on a scoped thread
    /// when `parallel` is set and HVVP is actually needed.
    fn resolve_hvvp_and_deficit_source(
        &self,
        volume: &mut GriddedVolume,
        base: LevelResult,
        parallel: bool,
        levels: &[LevelResult],
        abort: &AtomicBool,
    ) -> Result<(Option<std::result::Result<HvvpResult, Error>>, Vec<Option<f32>>)> {
        if self.config.closure != Closure::OriginalHvvp {
            let vtc0 = solve_base_vtc0(volume, &self.config, base, abort)?;
            return Ok((None, vtc0));
        }

        if parallel {
            let clone = volume.clone();
            let mut vtc0_result: Option<Result<Vec<Option<f32>>>> = None;
            let hvvp_result = std::thread::scope(|scope| {
                let handle = scope.spawn(|| run_hvvp(&clone, levels, base));
                vtc0_result = Some(solve_base_vtc0(volume, &self.config, base, abort));
                handle.join().unwrap_or(Err(Error::Singular))
            });
            Ok((Some(hvvp_result), vtc0_result.expect("set on the main thread above")?))
        } else {
            let hvvp_result = run_hvvp(volume, levels, base);
            let vtc0 = solve_base_vtc0(volume, &self.config, base, abort)?;
            Ok((Some(hvvp_result), vtc0))
        }
    }

    fn prepare_anchors(
        &self,
        volume: &GriddedVolume,
        observations: &[PressureObservation],
        timestamp: i64,
    ) -> (Vec<ObsCartesian>, f32, f32) {
        let max_ob_time_s = self.config.pressure_max_obs_time_s;
        let max_ob_radius_km = self.config.max_ob_radius_km();

        let cartesian = observations
            .iter()
            .map(|obs| {
                let (x_km, y_km, _z_km) = volume.projection().to_cartesian(obs.lat_deg, obs.lon_deg, 0.0);
                ObsCartesian {
                    observation: obs.clone(),
                    x_km,
                    y_km,
                    age_s: (timestamp - obs.timestamp) as f32,
                }
            })
            .collect();

        (cartesian, max_ob_time_s, max_ob_radius_km)
    }

    #[allow(clippy::too_many_arguments)]
    fn refine_uncertainty(
        &self,
        volume: &mut GriddedVolume,
        obs_cartesian: &[ObsCartesian],
        base: LevelResult,
        nominal_cp_hpa: f32,
        max_ob_time_s: f32,
        max_ob_radius_km: f32,
        timestamp: i64,
        perturbations: &mut Vec<PerturbationRecord>,
    ) -> f32 {
        let limited = self.run_perturbation_pass(volume, obs_cartesian, base, nominal_cp_hpa, max_ob_time_s, max_ob_radius_km, timestamp, 1.5, "limited");
        let unfloored = self.run_perturbation_pass(volume, obs_cartesian, base, nominal_cp_hpa, max_ob_time_s, max_ob_radius_km, timestamp, 0.0, "unfloored");

        perturbations.extend(limited.1);
        perturbations.extend(unfloored.1);
        limited.0
    }

    #[allow(clippy::too_many_arguments)]
    fn run_perturbation_pass(
        &self,
        volume: &mut GriddedVolume,
        obs_cartesian: &[ObsCartesian],
        base: LevelResult,
        nominal_cp_hpa: f32,
        max_ob_time_s: f32,
        max_ob_radius_km: f32,
        timestamp: i64,
        floor_km: f32,
        label: &'static str,
    ) -> (f32, Vec<PerturbationRecord>) {
        let mut records = Vec::new();
        let uncertainty_hpa = pressure_estimator::refine_uncertainty_by_perturbation(nominal_cp_hpa, base.center_std_km, floor_km, |dx, dy| {
            let cp = self
                .rerun_central_pressure(volume, obs_cartesian, base.x_km + dx, base.y_km + dy, base.height_km, base.rmw_km, max_ob_time_s, max_ob_radius_km)
                .unwrap_or(nominal_cp_hpa);
            records.push(PerturbationRecord {
                label,
                timestamp,
                offset_x_km: dx,
                offset_y_km: dy,
                central_pressure_hpa: cp,
            });
            cp
        });
        (uncertainty_hpa, records)
    }

    #[allow(clippy::too_many_arguments)]
    fn rerun_central_pressure(
        &self,
        volume: &mut GriddedVolume,
        obs_cartesian: &[ObsCartesian],
        x_km: f32,
        y_km: f32,
        height_km: f32,
        rmw_km: f32,
        max_ob_time_s: f32,
        max_ob_radius_km: f32,
    ) -> Option<f32> {
        let never_abort = AtomicBool::new(false);
        let level = LevelResult { height_km, valid: true, x_km, y_km, rmw_km, center_std_km: 0.0 };
        let vtc0_by_radius = solve_base_vtc0(volume, &self.config, level, &never_abort).ok()?;
        let lat_deg = volume.reference_lat_lon_deg().map(|(lat, _lon)| lat as f32).unwrap_or(0.0);
        let profile = pressure_integrator::deficit_profile(&vtc0_by_radius, self.config.inner_radius_km, self.config.outer_radius_km, lat_deg, height_km);
        let candidates = anchor_candidates(obs_cartesian, x_km, y_km);
        let estimate = pressure_estimator::estimate(&candidates, rmw_km, max_ob_time_s, max_ob_radius_km, &profile, self.config.inner_radius_km, self.config.outer_radius_km);
        Some(estimate.central_pressure_hpa)
    }
}

/// One pressure observation with its (lat/lon-projected) Cartesian offset
/// from the radar and its age relative to the analysis timestamp, both
/// independent of which center the anchor is ultimately scored against.
struct ObsCartesian {
    observation: PressureObservation,
    x_km: f32,
    y_km: f32,
    age_s: f32,
}

fn anchor_candidates(obs: &[ObsCartesian], center_x_km: f32, center_y_km: f32) -> Vec<AnchorCandidate<'_>> {
    obs.iter()
        .map(|o| {
            let dx = o.x_km - center_x_km;
            let dy = o.y_km - center_y_km;
            AnchorCandidate {
                observation: &o.observation,
                radius_km: (dx * dx + dy * dy).sqrt(),
                age_s: o.age_s,
            }
        })
        .collect()
}

fn to_level_center(volume: &GriddedVolume, level: &LevelResult) -> LevelCenter {
    if !level.valid {
        return LevelCenter {
            lat_deg: vortrac_model::grid::SENTINEL as f64,
            lon_deg: vortrac_model::grid::SENTINEL as f64,
            height_km: level.height_km,
            rmw_km: vortrac_model::grid::SENTINEL,
            center_std_km: vortrac_model::grid::SENTINEL,
        };
    }
    let (lat_deg, lon_deg, _height_km) = volume.projection().to_geographic(level.x_km, level.y_km, level.height_km);
    LevelCenter {
        lat_deg,
        lon_deg,
        height_km: level.height_km,
        rmw_km: level.rmw_km,
        center_std_km: level.center_std_km,
    }
}

/// Grid level indices covered by `config.bottom_level_km..=config.top_level_km`.
fn level_range(volume: &GriddedVolume, config: &Config) -> Vec<usize> {
    let bottom = volume.level_for_height(config.bottom_level_km);
    let top = volume.level_for_height(config.top_level_km);
    (bottom..=top).collect()
}

/// The integer radius band `[r_lo, r_hi]`, clamped into `[inner, outer]`,
/// searched around a level's seeded RMW.
fn search_band(seed_rmw_km: f32, inner_radius_km: u32, outer_radius_km: u32) -> (u32, u32) {
    let lo = (seed_rmw_km - CENTER_SEARCH_RADIUS_KM).max(inner_radius_km as f32);
    let hi = (seed_rmw_km + CENTER_SEARCH_RADIUS_KM).min(outer_radius_km as f32);
    let lo = lo.round().max(inner_radius_km as f32) as u32;
    let hi = hi.round().min(outer_radius_km as f32) as u32;
    if lo > hi {
        (inner_radius_km, outer_radius_km)
    } else {
        (lo, hi)
    }
}

/// Mean VTC0 (original closure, no HVVP correction) over `r_lo..=r_hi` at
/// candidate center `(x, y)`, or `None` if the candidate falls outside the
/// volume or no ring in the band produced a fit. This is the center
/// finder's objective.
fn mean_vtc0(volume: &mut GriddedVolume, config: &Config, x: f32, y: f32, height_km: f32, r_lo: u32, r_hi: u32) -> Option<f32> {
    volume.set_reference_point_km(x, y, height_km).ok()?;
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for r in r_lo..=r_hi {
        let ring = volume.sample_ring(Field::Velocity, r as f32, height_km).ok()?;
        if ring.is_empty() {
            continue;
        }
        if let RingOutcome::Solved { coefficients, .. } =
            gbvtd::analyze_ring(r, x, y, &ring, Closure::Original, None, config.max_wavenumber, &config.max_data_gap_deg)
        {
            if let Some((_, v)) = coefficients.iter().find(|(p, _)| *p == Parameter::Vtc0) {
                sum += v;
                count += 1;
            }
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

/// The radius within `r_lo..=r_hi` whose VTC0 magnitude is largest at the
/// found center — the level's radius of maximum wind.
fn argmax_vtc0_radius(volume: &mut GriddedVolume, config: &Config, x: f32, y: f32, height_km: f32, r_lo: u32, r_hi: u32) -> Option<u32> {
    volume.set_reference_point_km(x, y, height_km).ok()?;
    let mut best: Option<(u32, f32)> = None;
    for r in r_lo..=r_hi {
        let ring = match volume.sample_ring(Field::Velocity, r as f32, height_km) {
            Ok(ring) if !ring.is_empty() => ring,
            _ => continue,
        };
        if let RingOutcome::Solved { coefficients, .. } =
            gbvtd::analyze_ring(r, x, y, &ring, Closure::Original, None, config.max_wavenumber, &config.max_data_gap_deg)
        {
            if let Some((_, v)) = coefficients.iter().find(|(p, _)| *p == Parameter::Vtc0) {
                let better = best.map(|(_, best_v)| v.abs() > best_v.abs()).unwrap_or(true);
                if better {
                    best = Some((r, *v));
                }
            }
        }
    }
    best.map(|(r, _)| r)
}

/// Solves every configured ring (`inner_radius_km..=outer_radius_km`) at
/// one `(level, center)`, checking `abort` before each ring.
fn solve_radii(
    volume: &mut GriddedVolume,
    config: &Config,
    x_km: f32,
    y_km: f32,
    height_km: f32,
    closure: Closure,
    hvvp_mean: Option<f32>,
    abort: &AtomicBool,
) -> Result<Vec<(u32, RingOutcome)>> {
    volume.set_reference_point_km(x_km, y_km, height_km)?;

    let mut outcomes = Vec::with_capacity((config.outer_radius_km - config.inner_radius_km + 1) as usize);
    for r in config.inner_radius_km..=config.outer_radius_km {
        check_abort(abort)?;
        let ring = volume.sample_ring(Field::Velocity, r as f32, height_km)?;
        let outcome = gbvtd::analyze_ring(r, x_km, y_km, &ring, closure, hvvp_mean, config.max_wavenumber, &config.max_data_gap_deg);
        outcomes.push((r, outcome));
    }
    Ok(outcomes)
}

/// Solves the base level's rings under `Closure::Original` and extracts
/// VTC0, indexed `0..=outer_radius_km` (`None` below `inner_radius_km` or
/// wherever a ring had no fit) — the profile the pressure integrator needs.
fn solve_base_vtc0(volume: &mut GriddedVolume, config: &Config, base: LevelResult, abort: &AtomicBool) -> Result<Vec<Option<f32>>> {
    let outcomes = solve_radii(volume, config, base.x_km, base.y_km, base.height_km, Closure::Original, None, abort)?;
    let mut vtc0_by_radius: Vec<Option<f32>> = vec![None; config.outer_radius_km as usize + 1];
    for (radius_km, outcome) in outcomes {
        if let RingOutcome::Solved { coefficients, .. } = outcome {
            if let Some((_, v)) = coefficients.iter().find(|(p, _)| *p == Parameter::Vtc0) {
                vtc0_by_radius[radius_km as usize] = Some(*v);
            }
        }
    }
    Ok(vtc0_by_radius)
}

/// Fits HVVP's environmental wind using the base level's found center as
/// the range/bearing to the storm.
fn run_hvvp(volume: &GriddedVolume, levels: &[LevelResult], base: LevelResult) -> std::result::Result<HvvpResult, Error> {
    let range_to_center_km = (base.x_km * base.x_km + base.y_km * base.y_km).sqrt();
    let math_bearing_deg = base.y_km.atan2(base.x_km).to_degrees().rem_euclid(360.0);
    let bearing_deg = to_meteorological_deg(math_bearing_deg);
    let valid: Vec<&LevelResult> = levels.iter().filter(|l| l.valid).collect();
    let mean_rmw_km = valid.iter().map(|l| l.rmw_km).sum::<f32>() / valid.len().max(1) as f32;

    hvvp::estimate(volume, range_to_center_km, bearing_deg, mean_rmw_km, base.height_km)
}

fn check_abort(abort: &AtomicBool) -> Result<()> {
    if abort.load(Ordering::Relaxed) {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}
