//!
//! Unified error types for the VORTRAC facade crate.
//!
//! This module provides a unified error type [`Error`] that consolidates errors from all
//! sub-crates (vortrac-model, vortrac-core) into a single error surface for users of the
//! facade crate.
//!
//! ## Error Hierarchy
//!
//! The [`Error`] enum has variants corresponding to each enabled sub-crate feature.
//! See the [`Error`] type documentation for details on specific variants.
//!
//! ## Automatic Conversion
//!
//! All sub-crate error types automatically convert to the unified [`Error`] type via
//! [`From`] trait implementations, enabling seamless error propagation with the `?` operator:
//!
//! ```no_run
//! # use vortrac::Result;
//! # use vortrac::prelude::*;
//! fn example(config: Config) -> Result<()> {
//!     // vortrac_model::Error automatically converts to vortrac::Error
//!     config.validate((200.0, 200.0))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature-Gated Variants
//!
//! Error variants are conditionally compiled based on the enabled features:
//!
//! - `model` feature enables the Model variant
//! - `core` feature enables the Core variant
//!
//! Both features are enabled by default.
//!
//! ## Error Source Chain
//!
//! The unified error type preserves the complete error source chain. You can inspect
//! the underlying error using the [`std::error::Error::source`] method:
//!
//! ```no_run
//! # use std::error::Error as StdError;
//! # use vortrac::Result;
//! # use vortrac::prelude::*;
//! # fn example(config: Config) -> Result<()> {
//! #     config.validate((200.0, 200.0))?;
//! #     Ok(())
//! # }
//! match example(Config::new("REF", "VEL")) {
//!     Err(err) => {
//!         eprintln!("Error: {}", err);
//!         if let Some(source) = err.source() {
//!             eprintln!("Caused by: {}", source);
//!         }
//!     }
//!     Ok(_) => {}
//! }
//! ```

use thiserror::Error as ThisError;

/// A unified result type using the facade-level [`Error`].
///
/// This is a convenience type alias that uses the unified error type for all operations
/// exposed through the vortrac facade crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the VORTRAC facade crate.
///
/// This error type consolidates errors from all sub-crates into a single error surface,
/// making it easier to handle errors when using multiple sub-crates together.
///
/// Each variant wraps the error type from the corresponding sub-crate, preserving the
/// full error information and source chain.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Error from the data model layer (vortrac-model).
    ///
    /// This variant is available when the `model` feature is enabled (default).
    ///
    /// Model errors typically indicate an invalid configuration, such as a requested
    /// analysis radius exceeding the volume's footprint.
    #[cfg(feature = "model")]
    #[error("model error: {0}")]
    Model(#[from] vortrac_model::result::Error),

    /// Error from the analysis algorithms (vortrac-core).
    ///
    /// This variant is available when the `core` feature is enabled (default).
    ///
    /// Core errors indicate a failure within center-finding, wind-structure, or
    /// pressure estimation, such as every level's circulation center search failing
    /// or a singular least-squares system.
    #[cfg(feature = "core")]
    #[error("core error: {0}")]
    Core(#[from] vortrac_core::result::Error),
}
