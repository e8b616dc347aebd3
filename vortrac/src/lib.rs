#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::correctness)]

//! # VORTRAC
//!
//! Tropical-cyclone center-finding, wind-structure, and pressure analysis
//! for ground-based Doppler radar: GBVTD ring fitting, HVVP environmental
//! wind estimation, and gradient-wind central-pressure estimation, wired
//! together by a synchronous per-volume coordinator.
//!
//! This facade re-exports `vortrac-model` (the data model: gridded
//! volumes, configuration, wind coefficients, vortex records) and
//! `vortrac-core` (the analysis algorithms) behind a unified error type,
//! the way the workspace's sub-crates are meant to be consumed together.
//! Either can also be used standalone.

pub mod prelude;
pub mod result;

pub use result::{Error, Result};
