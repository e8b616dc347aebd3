//!
//! # vortrac-core
//! Tropical-cyclone center-finding, wind-structure, and pressure analysis
//! algorithms for VORTRAC: GBVTD ring fitting, HVVP environmental wind
//! estimation, Nelder-Mead circulation-center search, cyclostrophic
//! pressure-deficit integration, and the coordinator that sequences them
//! over a volume.
//!
//! This crate depends only on `vortrac-model` for its data types; it has no
//! knowledge of how a volume was decoded or where it came from.
//!

#![forbid(unsafe_code)]
#![warn(clippy::correctness)]
#![allow(clippy::too_many_arguments)]

pub mod center_finder;
pub mod coordinator;
pub mod gbvtd;
pub mod hvvp;
pub mod lls;
pub mod log_message;
pub mod pressure_estimator;
pub mod pressure_integrator;
pub mod result;

pub use center_finder::{CenterResult, SimplexCenterFinder};
pub use coordinator::{AnalysisCoordinator, CoordinatorState, PerturbationRecord, SeedVortex, VolumeAnalysis};
pub use gbvtd::{RingFailure, RingOutcome};
pub use hvvp::HvvpResult;
pub use log_message::{LogMessage, StopLightColor, StormSignalStatus};
pub use pressure_estimator::{Anchor, AnchorCandidate, PressureEstimate};
pub use result::{Error, Result};
