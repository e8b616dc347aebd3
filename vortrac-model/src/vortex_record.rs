//! The per-volume analysis result and its append-only history.

use crate::coefficient::CoefficientTensor;
use crate::result::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fitted circulation center and wind-structure extent at one analysis
/// level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelCenter {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub height_km: f32,
    /// Radius of maximum wind, in kilometers.
    pub rmw_km: f32,
    /// Spread of the center-finding simplex's vertices at convergence, in kilometers.
    pub center_std_km: f32,
}

/// The complete analysis result for one volume: per-level centers, the
/// dense wind-coefficient tensor, and the central pressure estimate.
///
/// Two records are compared, and hashed into a [`VortexSeries`], by
/// `timestamp` alone — per the data model, a `VortexRecord`'s identity is
/// its timestamp, not its content.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VortexRecord {
    timestamp: i64,
    levels: Vec<LevelCenter>,
    coefficients: CoefficientTensor,
    pressure_hpa: f32,
    pressure_uncertainty_hpa: f32,
    pressure_deficit_hpa: f32,
}

impl VortexRecord {
    pub fn new(
        timestamp: i64,
        levels: Vec<LevelCenter>,
        coefficients: CoefficientTensor,
        pressure_hpa: f32,
        pressure_uncertainty_hpa: f32,
        pressure_deficit_hpa: f32,
    ) -> Self {
        Self {
            timestamp,
            levels,
            coefficients,
            pressure_hpa,
            pressure_uncertainty_hpa,
            pressure_deficit_hpa,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn levels(&self) -> &[LevelCenter] {
        &self.levels
    }

    pub fn coefficients(&self) -> &CoefficientTensor {
        &self.coefficients
    }

    pub fn pressure_hpa(&self) -> f32 {
        self.pressure_hpa
    }

    pub fn pressure_uncertainty_hpa(&self) -> f32 {
        self.pressure_uncertainty_hpa
    }

    pub fn pressure_deficit_hpa(&self) -> f32 {
        self.pressure_deficit_hpa
    }

    /// This record's timestamp as a UTC date-time.
    #[cfg(feature = "chrono")]
    pub fn timestamp_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl PartialEq for VortexRecord {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for VortexRecord {}

/// An append-only, timestamp-ordered sequence of [`VortexRecord`]s.
///
/// Records are immutable once appended; [`append`](Self::append) rejects a
/// record whose timestamp precedes the series' last published timestamp,
/// preserving the non-decreasing ordering guarantee the coordinator relies
/// on.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VortexSeries {
    records: Vec<VortexRecord>,
}

impl VortexSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, rejecting it if its timestamp precedes the series'
    /// last published timestamp.
    pub fn append(&mut self, record: VortexRecord) -> Result<()> {
        if let Some(last) = self.records.last() {
            if record.timestamp < last.timestamp {
                return Err(Error::NonMonotonicTimestamp {
                    new: record.timestamp,
                    last: last.timestamp,
                });
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&VortexRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VortexRecord> {
        self.records.iter()
    }

    pub fn get_by_timestamp(&self, timestamp: i64) -> Option<&VortexRecord> {
        self.records.iter().find(|r| r.timestamp == timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficient::Parameter;

    fn record(timestamp: i64) -> VortexRecord {
        let tensor = CoefficientTensor::new(1, 3, 1, Parameter::slots_for_wavenumber(0));
        VortexRecord::new(timestamp, vec![], tensor, 1000.0, 5.0, -13.0)
    }

    #[test]
    fn identity_is_timestamp_only() {
        let mut a = record(100);
        let b = record(100);
        a.pressure_hpa = 999.0;
        assert_eq!(a, b);
    }

    #[test]
    fn append_rejects_earlier_timestamp() {
        let mut series = VortexSeries::new();
        series.append(record(100)).unwrap();
        let err = series.append(record(50)).unwrap_err();
        assert_eq!(err, Error::NonMonotonicTimestamp { new: 50, last: 100 });
    }

    #[test]
    fn append_accepts_equal_or_later_timestamp() {
        let mut series = VortexSeries::new();
        series.append(record(100)).unwrap();
        series.append(record(100)).unwrap();
        series.append(record(150)).unwrap();
        assert_eq!(series.len(), 3);
    }
}
