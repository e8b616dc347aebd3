//! Snapshot test for a curated wind-coefficient fixture.
//!
//! This captures the stable, serialized shape of a small [`CoefficientTensor`]
//! flattened to its named form, the way the teacher pins decoded message
//! shapes with `insta`. There's no captured radar volume in this workspace
//! to drive the fixture, so the tensor below is built by hand from a small,
//! representative set of (level, radius, parameter) samples instead.

#![cfg(feature = "serde")]

use insta::assert_yaml_snapshot;
use vortrac_model::{CoefficientTensor, Parameter};

fn curated_tensor() -> CoefficientTensor {
    let slots = Parameter::slots_for_wavenumber(1);
    let mut tensor = CoefficientTensor::new(2, 10, 3, slots);

    tensor.set(0, 10, Parameter::Vtc0, 28.4).unwrap();
    tensor.set(0, 20, Parameter::Vtc0, 31.1).unwrap();
    tensor.set(0, 10, Parameter::Vrc0, 4.2).unwrap();
    tensor.set(0, 10, Parameter::Vts(1), 1.9).unwrap();
    tensor.set(0, 10, Parameter::Vtc(1), -0.6).unwrap();
    tensor.set(1, 10, Parameter::Vtc0, 22.0).unwrap();
    // Radius 30 at level 1 is intentionally left at the sentinel to exercise
    // `to_coefficients`'s missing-data filtering.

    tensor
}

#[test]
fn curated_tensor_flattens_to_a_stable_shape() {
    let tensor = curated_tensor();
    assert_yaml_snapshot!(tensor.to_coefficients());
}
