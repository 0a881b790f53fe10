//! Building surfaces (facades, balconies) and per-surface irradiance results.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::{ViewProfile, PANORAMIC};
use crate::site::Site;
use crate::timeseries::{Irradiance, PoaIrradiance, SolarGeometry};
use crate::transposition::{IsotropicSky, Transposition};

/// Kind of capture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    Unknown,
    Facade,
    Balcony,
}

impl FromStr for SurfaceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UNKNOWN" => Ok(Self::Unknown),
            "FACADE" => Ok(Self::Facade),
            "BALCONY" => Ok(Self::Balcony),
            other => Err(Error::UnknownSurfaceType(other.to_string())),
        }
    }
}

/// A building surface with an orientation, tilt and obstruction profile.
///
/// The stored view profile is the surface's own obstruction profile rotated
/// into absolute site azimuth and combined with the site terrain horizon;
/// it is fixed at construction and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Surface {
    pub name: String,
    pub surface_type: SurfaceType,
    /// Outward normal azimuth, degrees from north, clockwise.
    pub azimuth: f64,
    /// Tilt from horizontal in degrees; facades are vertical (90).
    pub tilt: f64,
    /// Capture area per building level (m²).
    pub area_per_level: f64,
    /// Conversion efficiency of the capture area (0-1).
    pub efficiency: f64,
    site: Arc<Site>,
    view_profile: ViewProfile,
}

impl Surface {
    /// Creates a vertical surface with a panoramic own profile, 0.2
    /// efficiency and the site horizon folded in.
    pub fn new(
        name: &str,
        surface_type: SurfaceType,
        azimuth: f64,
        site: Arc<Site>,
        area_per_level: f64,
    ) -> Self {
        let view_profile = PANORAMIC.rotate(azimuth).combine(site.horizon_profile());
        Self {
            name: name.to_string(),
            surface_type,
            azimuth,
            tilt: 90.0,
            area_per_level,
            efficiency: 0.2,
            site,
            view_profile,
        }
    }

    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Replaces the surface's own obstruction profile. The profile is given
    /// facade-relative and is rotated into site azimuth before being
    /// combined with the site horizon.
    pub fn with_profile(mut self, profile: &ViewProfile) -> Self {
        self.view_profile = profile
            .rotate(self.azimuth)
            .combine(self.site.horizon_profile());
        self
    }

    /// The combined (own + horizon) obstruction profile.
    pub fn view_profile(&self) -> &ViewProfile {
        &self.view_profile
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    /// Computes plane-of-array irradiance for this surface.
    ///
    /// Masks the inputs through the combined profile using the *solar*
    /// azimuth, then transposes with the surface orientation and tilt
    /// (overridable per call) using the reference isotropic model.
    pub fn solve_irradiance(
        &self,
        geometry: &SolarGeometry,
        irradiance: &Irradiance,
        tilt: Option<f64>,
        azimuth: Option<f64>,
    ) -> Result<SurfaceResult> {
        self.solve_irradiance_with(&IsotropicSky::default(), geometry, irradiance, tilt, azimuth)
    }

    /// Like [`solve_irradiance`](Self::solve_irradiance) with an explicit
    /// transposition model.
    pub fn solve_irradiance_with(
        &self,
        transposition: &dyn Transposition,
        geometry: &SolarGeometry,
        irradiance: &Irradiance,
        tilt: Option<f64>,
        azimuth: Option<f64>,
    ) -> Result<SurfaceResult> {
        let tilt = tilt.unwrap_or(self.tilt);
        let azimuth = azimuth.unwrap_or(self.azimuth);

        let masked = self.view_profile.apply(geometry, irradiance)?;
        let poa = transposition.transpose(tilt, azimuth, geometry, &masked)?;

        Ok(SurfaceResult {
            poa,
            azimuth,
            tilt,
            view_profile: self.view_profile.clone(),
            blocked_elevation: masked.blocked_elevation,
        })
    }

    /// Brute-force search for the tilt maximizing annual plane-of-array
    /// energy against the site's solar resources.
    ///
    /// Only a strictly greater total replaces the current best, so the
    /// first tilt achieving the maximum wins ties.
    pub fn find_optimal_tilt(&self, tilts: &[f64]) -> Result<TiltScan> {
        if tilts.is_empty() {
            return Err(Error::EmptyTiltRange);
        }

        let (geometry, irradiance) = self.site.solar_resources();

        let mut best_tilt = tilts[0];
        let mut best_total = f64::NEG_INFINITY;
        let mut results = Vec::with_capacity(tilts.len());

        for &tilt in tilts {
            let result = self.solve_irradiance(&geometry, &irradiance, Some(tilt), None)?;
            let total = result.total();
            if total > best_total {
                best_total = total;
                best_tilt = tilt;
            }
            results.push((tilt, result));
        }

        Ok(TiltScan { best_tilt, results })
    }
}

/// Outcome of a tilt scan: the winning tilt and every per-tilt result.
#[derive(Debug, Clone)]
pub struct TiltScan {
    pub best_tilt: f64,
    pub results: Vec<(f64, SurfaceResult)>,
}

/// Plane-of-array result for one surface solve.
///
/// Read-only value object bundling the transposed series with the
/// orientation, tilt and profile that produced it.
#[derive(Debug, Clone)]
pub struct SurfaceResult {
    pub poa: PoaIrradiance,
    pub azimuth: f64,
    pub tilt: f64,
    pub view_profile: ViewProfile,
    /// Profile elevation at the solar azimuth of each timestamp (degrees).
    pub blocked_elevation: Vec<f64>,
}

impl SurfaceResult {
    /// Total `poa_global` over the period (annual energy proxy, Wh/m² for
    /// hourly data).
    pub fn total(&self) -> f64 {
        self.poa.total()
    }

    /// Mean `poa_global` per hour of day.
    pub fn hourly_means(&self) -> [f64; 24] {
        self.poa.hourly_means()
    }

    /// `poa_global` summed per calendar day.
    pub fn daily_sums(&self) -> Vec<(NaiveDate, f64)> {
        self.poa.daily_sums()
    }
}
