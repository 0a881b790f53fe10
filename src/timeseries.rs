//! Time-series value types shared by the masking and transposition steps.
//!
//! All series are aligned by timestamp: one entry per timestamp, timestamps
//! in ascending order, interpreted as local clock time at the site. The
//! types are plain data holders; reductions (hourly means, daily sums) are
//! provided so external renderers can consume the raw numbers directly.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Solar position time series.
///
/// Angles in degrees: zenith from vertical in [0, 180], azimuth from north,
/// clockwise, in [0, 360).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarGeometry {
    pub time: Vec<NaiveDateTime>,
    pub zenith: Vec<f64>,
    pub azimuth: Vec<f64>,
}

impl SolarGeometry {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Horizontal irradiance component time series (W/m²), non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Irradiance {
    pub time: Vec<NaiveDateTime>,
    /// Direct normal irradiance.
    pub dni: Vec<f64>,
    /// Global horizontal irradiance.
    pub ghi: Vec<f64>,
    /// Diffuse horizontal irradiance.
    pub dhi: Vec<f64>,
}

impl Irradiance {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Output of applying an obstruction profile to irradiance data.
///
/// Same time index as the inputs. `dni` is zeroed wherever the sun was
/// blocked, `ghi` is replaced by `dhi` wherever `dni` is zero, and `dhi`
/// passes through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedIrradiance {
    pub time: Vec<NaiveDateTime>,
    /// Profile elevation at the solar azimuth of each timestamp (degrees).
    pub blocked_elevation: Vec<f64>,
    pub dni: Vec<f64>,
    pub ghi: Vec<f64>,
    pub dhi: Vec<f64>,
}

impl MaskedIrradiance {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Plane-of-array irradiance time series (W/m²).
///
/// `poa_global` is the total on the tilted surface; the component columns
/// are reported by the reference transposition for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoaIrradiance {
    pub time: Vec<NaiveDateTime>,
    pub poa_global: Vec<f64>,
    pub poa_direct: Vec<f64>,
    pub poa_sky_diffuse: Vec<f64>,
    pub poa_ground_diffuse: Vec<f64>,
}

impl PoaIrradiance {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sum of `poa_global` over the full period (Wh/m² for hourly data).
    pub fn total(&self) -> f64 {
        self.poa_global.iter().sum()
    }

    /// Mean `poa_global` per hour of day (index 0-23).
    pub fn hourly_means(&self) -> [f64; 24] {
        let mut sums = [0.0; 24];
        let mut counts = [0usize; 24];
        for (t, &v) in self.time.iter().zip(&self.poa_global) {
            let h = t.hour() as usize;
            sums[h] += v;
            counts[h] += 1;
        }
        let mut means = [0.0; 24];
        for h in 0..24 {
            if counts[h] > 0 {
                means[h] = sums[h] / counts[h] as f64;
            }
        }
        means
    }

    /// Sum of `poa_global` per calendar day, in date order.
    pub fn daily_sums(&self) -> Vec<(NaiveDate, f64)> {
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (t, &v) in self.time.iter().zip(&self.poa_global) {
            *days.entry(t.date()).or_insert(0.0) += v;
        }
        days.into_iter().collect()
    }
}

/// Checks that two series share a common time index.
pub(crate) fn check_aligned(a: &[NaiveDateTime], b: &[NaiveDateTime]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::MisalignedSeries(format!(
            "{} vs {} timestamps",
            a.len(),
            b.len()
        )));
    }
    for (i, (ta, tb)) in a.iter().zip(b).enumerate() {
        if ta != tb {
            return Err(Error::MisalignedSeries(format!(
                "timestamps differ at position {i}: {ta} vs {tb}"
            )));
        }
    }
    Ok(())
}
