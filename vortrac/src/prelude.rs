//! Convenient re-exports with unified terminology.
//!
//! This module provides ergonomic imports for common usage patterns, including
//! type aliases that align with standard vortex-analysis terminology.
//!
//! # Example
//!
//! ```ignore
//! use vortrac::prelude::*;
//! use std::sync::atomic::AtomicBool;
//!
//! let mut coordinator = Coordinator::new(Config::new("REF", "VEL"));
//! let mut series = VortexSeries::new();
//! let abort = AtomicBool::new(false);
//!
//! let outcome = coordinator.analyze_volume(
//!     &mut volume,
//!     None,
//!     seed,
//!     &observations,
//!     timestamp,
//!     &abort,
//!     &mut series,
//!     |message| println!("{message:?}"),
//! )?;
//! ```
//!
//! # Terminology
//!
//! | Term | Underlying Type | Description |
//! |------|-----------------|-------------|
//! | `Volume` | `GriddedVolume` | Cartesian-gridded radial-velocity volume for one analysis pass |
//! | `Coordinator` | `AnalysisCoordinator` | Sequences center-finding, wind, and pressure analysis over a volume |
//! | `Record` | `VortexRecord` | One volume's published center, wind coefficients, and pressure estimate |
//! | `Series` | `VortexSeries` | Ordered history of `Record`s for one storm |
//! | `Tensor` | `CoefficientTensor` | Fitted wind coefficients by level and radius |
//! | `Observation` | `PressureObservation` | A single surface or flight-level pressure anchor |

pub use crate::{Error, Result};

// Type aliases for unified terminology
#[cfg(feature = "model")]
pub use vortrac_model::GriddedVolume as Volume;

#[cfg(feature = "model")]
pub use vortrac_model::CoefficientTensor as Tensor;

#[cfg(feature = "model")]
pub use vortrac_model::VortexRecord as Record;

#[cfg(feature = "model")]
pub use vortrac_model::VortexSeries as Series;

#[cfg(feature = "model")]
pub use vortrac_model::PressureObservation as Observation;

// Re-export types that don't need aliases
#[cfg(feature = "model")]
pub use vortrac_model::{Closure, Config, Field, Geometry, LevelCenter, MaxObsMethod, Parameter};

#[cfg(feature = "core")]
pub use vortrac_core::AnalysisCoordinator as Coordinator;

#[cfg(feature = "core")]
pub use vortrac_core::{CoordinatorState, PerturbationRecord, SeedVortex, VolumeAnalysis};

#[cfg(feature = "core")]
pub use vortrac_core::{LogMessage, StopLightColor, StormSignalStatus};
