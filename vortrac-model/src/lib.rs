//!
//! # vortrac-model
//! The data model shared by VORTRAC's tropical-cyclone analysis core: the
//! gridded radar volume the algorithms sample, the wind coefficients and
//! vortex records they produce, and the configuration that governs a run.
//! Provides an ergonomic API documented for an audience who is not
//! necessarily familiar with the GBVTD/HVVP literature.
//!
//! A number of optional features are available:
//! - `uom`: Use the `uom` crate for type-safe units of measure.
//! - `serde`: Implement `serde::Serialize` and `serde::Deserialize` for all models.
//! - `chrono`: Use the `chrono` crate for date and time types.
//!

#![forbid(unsafe_code)]
#![warn(clippy::correctness)]
#![allow(clippy::too_many_arguments)]

pub mod coefficient;
pub mod config;
pub mod geo;
pub mod grid;
pub mod pressure_observation;
pub mod result;
pub mod vortex_record;

pub use coefficient::{Coefficient, CoefficientTensor, Parameter};
pub use config::{Closure, Config, Geometry, MaxObsMethod};
pub use geo::GeoProjection;
pub use grid::{to_meteorological_deg, Field, GriddedVolume, RingPoint};
pub use pressure_observation::PressureObservation;
pub use result::{Error, Result};
pub use vortex_record::{LevelCenter, VortexRecord, VortexSeries};
