//!
//! Contains the Result and Error types for VORTRAC model operations.
//!

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    /// A grid index fell outside the volume's dimensions.
    #[error("grid index ({i}, {j}, {k}) is out of bounds for a {i_dim}x{j_dim}x{k_dim} volume")]
    IndexOutOfBounds {
        i: isize,
        j: isize,
        k: isize,
        i_dim: usize,
        j_dim: usize,
        k_dim: usize,
    },

    /// A reference point's projected coordinates fell outside the volume.
    #[error("reference point at ({x_km}, {y_km}) km is outside the volume's footprint")]
    ReferencePointOutOfBounds { x_km: f32, y_km: f32 },

    /// A `VortexRecord` was appended to a `VortexSeries` out of timestamp order.
    #[error("cannot append record at timestamp {new} before last published timestamp {last}")]
    NonMonotonicTimestamp { new: i64, last: i64 },

    /// A configuration value was outside its documented valid range.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A ring was sampled before a reference point was set on the volume.
    #[error("no reference point has been set on this volume")]
    NoReferencePoint,
}
