//!
//! Contains the Result and Error types for VORTRAC's analysis algorithms.
//!

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors the analysis core can produce. Per the coordinator's recovery
/// policy, `DataMissing`, `Singular`, and `HvvpUnavailable` are recovered
/// locally (the ring or level emits sentinel coefficients, or the closure
/// downgrades); only `OutOfBounds` can force a level to be skipped and only
/// `Model(ConfigInvalid)` surfaces to the caller before a run starts.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    /// A ring had too few valid samples, or no wavenumber's angular gaps
    /// were small enough, for any Fourier fit to be attempted.
    #[error("ring at level {level}, radius {radius_km} km has no valid wavenumber fit")]
    DataMissing { level: usize, radius_km: u32 },

    /// A found or perturbed center fell outside the volume.
    #[error("center at level {level} fell outside the volume")]
    OutOfBounds { level: usize },

    /// The least-squares normal-equation matrix is singular (a zero pivot,
    /// or non-positive diagonal, was encountered during factorization).
    #[error("least-squares normal equations are singular")]
    Singular,

    /// HVVP's sector fit did not have enough valid samples to produce an
    /// environmental wind estimate.
    #[error("HVVP estimate unavailable: {reason}")]
    HvvpUnavailable { reason: String },

    /// A data-model invariant was violated (propagated from `vortrac-model`).
    #[error(transparent)]
    Model(#[from] vortrac_model::Error),

    /// The caller's abort flag was observed set partway through a volume.
    /// Never returned to `analyze_volume`'s caller: the coordinator catches
    /// this internally and reports a clean `Idle` outcome instead.
    #[error("analysis was cancelled")]
    Cancelled,

    /// Every analysis level failed to find a center, leaving nothing to
    /// publish for this volume.
    #[error("every analysis level failed to find a center")]
    AllLevelsFailed,
}
