//! Wind coefficients produced by the GBVTD ring solver.

use crate::grid::SENTINEL;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named wind coefficient slot.
///
/// `Vtc0`/`Vrc0`/`Vmc0` are the axisymmetric tangential, radial, and
/// mean-storm-motion components. `Vts`/`Vtc` generalize the legacy
/// `VTS1`/`VTC1`/`VTC2`/... series to arbitrary wavenumber `k ≥ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parameter {
    Vtc0,
    Vrc0,
    Vmc0,
    Vts(u8),
    Vtc(u8),
}

impl Parameter {
    /// All parameter slots used by a solve up to and including wavenumber `max_wavenumber`.
    pub fn slots_for_wavenumber(max_wavenumber: u8) -> Vec<Parameter> {
        let mut slots = vec![Parameter::Vtc0, Parameter::Vrc0, Parameter::Vmc0];
        for k in 1..=max_wavenumber {
            slots.push(Parameter::Vts(k));
            slots.push(Parameter::Vtc(k));
        }
        slots
    }
}

/// A single (level, radius, parameter) → value sample.
///
/// The default value is the missing-data sentinel, matching
/// [`GriddedVolume`](crate::grid::GriddedVolume)'s convention. Equality
/// compares all fields, including the value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coefficient {
    pub level: usize,
    pub radius_km: u32,
    pub parameter: Parameter,
    pub value: f32,
}

impl Coefficient {
    /// Builds a coefficient with the missing-data sentinel as its value.
    pub fn sentinel(level: usize, radius_km: u32, parameter: Parameter) -> Self {
        Self {
            level,
            radius_km,
            parameter,
            value: SENTINEL,
        }
    }

    /// Whether this coefficient holds the missing-data sentinel.
    pub fn is_missing(&self) -> bool {
        self.value == SENTINEL
    }

    /// This coefficient's radius as a type-safe `uom` quantity.
    #[cfg(feature = "uom")]
    pub fn radius(&self) -> uom::si::f32::Length {
        uom::si::f32::Length::new::<uom::si::length::kilometer>(self.radius_km as f32)
    }
}

/// A dense (level, radius, slot) tensor of wind coefficients for one
/// [`VortexRecord`](crate::vortex_record::VortexRecord), alongside named
/// lookup by [`Parameter`] for persistence and UI consumers.
///
/// Storage is a single contiguous buffer indexed by
/// `(level * n_radii + (radius - first_ring_km)) * n_slots + slot_index`,
/// matching the dense-layer convention the fit algorithms use elsewhere in
/// this crate; named lookup walks `slots` to find the matching index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoefficientTensor {
    n_levels: usize,
    first_ring_km: u32,
    n_radii: usize,
    slots: Vec<Parameter>,
    values: Vec<f32>,
}

impl CoefficientTensor {
    /// Creates a tensor of all-sentinel coefficients for the given shape.
    pub fn new(n_levels: usize, first_ring_km: u32, n_radii: usize, slots: Vec<Parameter>) -> Self {
        let len = n_levels * n_radii * slots.len();
        Self {
            n_levels,
            first_ring_km,
            n_radii,
            slots,
            values: vec![SENTINEL; len],
        }
    }

    fn slot_index(&self, parameter: Parameter) -> Option<usize> {
        self.slots.iter().position(|p| *p == parameter)
    }

    fn flat_index(&self, level: usize, radius_km: u32, slot_index: usize) -> Option<usize> {
        if level >= self.n_levels || radius_km < self.first_ring_km {
            return None;
        }
        let radius_idx = (radius_km - self.first_ring_km) as usize;
        if radius_idx >= self.n_radii {
            return None;
        }
        Some((level * self.n_radii + radius_idx) * self.slots.len() + slot_index)
    }

    /// Sets the value for `(level, radius_km, parameter)`. Returns `None` if
    /// the coordinates fall outside the tensor's shape or the parameter is
    /// not one of its slots.
    pub fn set(&mut self, level: usize, radius_km: u32, parameter: Parameter, value: f32) -> Option<()> {
        let slot = self.slot_index(parameter)?;
        let idx = self.flat_index(level, radius_km, slot)?;
        self.values[idx] = value;
        Some(())
    }

    /// Gets the coefficient at `(level, radius_km, parameter)`, or `None` if
    /// the coordinates fall outside the tensor's shape or the parameter is
    /// not one of its slots.
    pub fn get(&self, level: usize, radius_km: u32, parameter: Parameter) -> Option<Coefficient> {
        let slot = self.slot_index(parameter)?;
        let idx = self.flat_index(level, radius_km, slot)?;
        Some(Coefficient {
            level,
            radius_km,
            parameter,
            value: self.values[idx],
        })
    }

    /// The parameter slots this tensor carries.
    pub fn slots(&self) -> &[Parameter] {
        &self.slots
    }

    /// Flattens the tensor to its named-lookup form, one [`Coefficient`] per
    /// (level, radius, slot) triple, skipping sentinel entries.
    pub fn to_coefficients(&self) -> Vec<Coefficient> {
        let mut out = Vec::new();
        for level in 0..self.n_levels {
            for radius_idx in 0..self.n_radii {
                let radius_km = self.first_ring_km + radius_idx as u32;
                for (slot_idx, parameter) in self.slots.iter().enumerate() {
                    let idx = (level * self.n_radii + radius_idx) * self.slots.len() + slot_idx;
                    let value = self.values[idx];
                    if value != SENTINEL {
                        out.push(Coefficient {
                            level,
                            radius_km,
                            parameter: *parameter,
                            value,
                        });
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_coefficient_is_missing() {
        let c = Coefficient::sentinel(0, 20, Parameter::Vtc0);
        assert!(c.is_missing());
    }

    #[test]
    fn equality_compares_all_fields() {
        let a = Coefficient { level: 0, radius_km: 20, parameter: Parameter::Vtc0, value: 40.0 };
        let b = Coefficient { level: 0, radius_km: 20, parameter: Parameter::Vtc0, value: 40.1 };
        assert_ne!(a, b);
    }

    #[test]
    fn tensor_round_trips_a_value() {
        let slots = Parameter::slots_for_wavenumber(2);
        let mut tensor = CoefficientTensor::new(4, 3, 48, slots);
        tensor.set(1, 20, Parameter::Vtc0, 40.0).unwrap();
        let c = tensor.get(1, 20, Parameter::Vtc0).unwrap();
        assert_eq!(c.value, 40.0);
    }

    #[test]
    fn tensor_rejects_out_of_shape_radius() {
        let slots = Parameter::slots_for_wavenumber(2);
        let mut tensor = CoefficientTensor::new(4, 3, 48, slots);
        assert!(tensor.set(0, 1, Parameter::Vtc0, 1.0).is_none());
    }

    #[test]
    fn to_coefficients_skips_sentinels() {
        let slots = Parameter::slots_for_wavenumber(0);
        let mut tensor = CoefficientTensor::new(1, 3, 2, slots);
        tensor.set(0, 3, Parameter::Vtc0, 40.0).unwrap();
        let coeffs = tensor.to_coefficients();
        assert_eq!(coeffs.len(), 1);
        assert_eq!(coeffs[0].value, 40.0);
    }
}
