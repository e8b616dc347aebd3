//! The gridded volume the analysis core samples rings from.

mod sentinel;
mod volume;

pub use sentinel::{from_sample, to_sample, SENTINEL};
pub use volume::{to_meteorological_deg, Field, GriddedVolume, RingPoint};
