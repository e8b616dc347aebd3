//! Integration tests for unified error type conversions.
//!
//! These tests verify that errors from all sub-crates properly convert to the
//! unified `vortrac::Error` type through the `From` trait implementations.

#[cfg(feature = "model")]
use std::error::Error as StdError;

#[cfg(feature = "model")]
#[test]
fn test_model_error_conversion() {
    let model_err = vortrac_model::result::Error::NoReferencePoint;

    let unified_err: vortrac::Error = model_err.into();

    match unified_err {
        vortrac::Error::Model(_) => {}
        #[allow(unreachable_patterns)]
        _ => panic!("Expected Error::Model variant"),
    }

    let err_string = unified_err.to_string();
    assert!(
        err_string.contains("model error"),
        "Expected 'model error' in message, got: {}",
        err_string
    );
    assert!(
        err_string.contains("reference point"),
        "Expected 'reference point' in message, got: {}",
        err_string
    );
}

#[cfg(feature = "core")]
#[test]
fn test_core_error_conversion() {
    let core_err = vortrac_core::result::Error::Singular;

    let unified_err: vortrac::Error = core_err.into();

    match unified_err {
        vortrac::Error::Core(_) => {}
        #[allow(unreachable_patterns)]
        _ => panic!("Expected Error::Core variant"),
    }

    let err_string = unified_err.to_string();
    assert!(
        err_string.contains("core error"),
        "Expected 'core error' in message, got: {}",
        err_string
    );
}

#[cfg(feature = "core")]
#[test]
fn test_core_error_with_detail_conversion() {
    let core_err = vortrac_core::result::Error::HvvpUnavailable {
        reason: "fewer than 12 valid sector samples".to_string(),
    };

    let unified_err: vortrac::Error = core_err.into();

    let err_string = unified_err.to_string();
    assert!(
        err_string.contains("core error"),
        "Expected 'core error' in message, got: {}",
        err_string
    );
    assert!(
        err_string.contains("fewer than 12 valid sector samples"),
        "Expected detail in message, got: {}",
        err_string
    );
}

#[cfg(feature = "core")]
#[test]
fn test_nested_model_error_through_core() {
    // vortrac-core's Error::Model wraps a vortrac-model error transparently.
    let model_err = vortrac_model::result::Error::ConfigInvalid("bad radius".to_string());
    let core_err: vortrac_core::result::Error = model_err.into();

    let unified_err: vortrac::Error = core_err.into();

    match unified_err {
        vortrac::Error::Core(_) => {}
        #[allow(unreachable_patterns)]
        _ => panic!("Expected Error::Core variant"),
    }

    // vortrac-core's Model variant is #[error(transparent)], so the message
    // passes through unchanged rather than being prefixed with "core error".
    let err_string = unified_err.to_string();
    assert!(
        err_string.contains("bad radius"),
        "Expected 'bad radius' in message, got: {}",
        err_string
    );
}

#[cfg(feature = "model")]
#[test]
fn test_error_source_chain() {
    let model_err = vortrac_model::result::Error::IndexOutOfBounds {
        i: -1,
        j: 0,
        k: 0,
        i_dim: 40,
        j_dim: 40,
        k_dim: 12,
    };

    let unified_err: vortrac::Error = model_err.into();

    let source = unified_err.source();
    assert!(source.is_some(), "Expected error source to be available");

    let source_string = source.unwrap().to_string();
    assert!(
        source_string.contains("out of bounds"),
        "Expected 'out of bounds' in source, got: {}",
        source_string
    );
}

#[cfg(feature = "model")]
#[test]
fn test_error_debug_format() {
    let model_err = vortrac_model::result::Error::NoReferencePoint;
    let unified_err: vortrac::Error = model_err.into();

    let debug_string = format!("{:?}", unified_err);
    assert!(!debug_string.is_empty(), "Debug format should not be empty");
    assert!(
        debug_string.contains("Model"),
        "Debug format should indicate Model variant"
    );
}

#[cfg(all(feature = "model", feature = "core"))]
#[test]
fn test_all_features_enabled() {
    // This test only compiles when both sub-crate features are enabled.
    // It verifies that all error variants are available.

    let model_err = vortrac_model::result::Error::NoReferencePoint;
    let _: vortrac::Error = model_err.into();

    let core_err = vortrac_core::result::Error::Singular;
    let _: vortrac::Error = core_err.into();
}

#[test]
fn test_result_type_alias() {
    fn returns_result() -> vortrac::Result<()> {
        Ok(())
    }

    assert!(returns_result().is_ok());
}

#[cfg(feature = "core")]
#[test]
fn test_question_mark_operator() {
    fn inner() -> vortrac_core::result::Result<()> {
        Err(vortrac_core::result::Error::AllLevelsFailed)
    }

    fn outer() -> vortrac::Result<()> {
        inner()?;
        Ok(())
    }

    let result = outer();
    assert!(result.is_err());

    let err = result.unwrap_err();
    match err {
        vortrac::Error::Core(_) => {}
        #[allow(unreachable_patterns)]
        _ => panic!("Expected Error::Core variant"),
    }
}
