//! Geographic site: location, terrain horizon and solar resources.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::Result;
use crate::profile::{ViewProfile, PANORAMIC};
use crate::solar::{clearsky_components, SolarPosition};
use crate::timeseries::{Irradiance, SolarGeometry};

/// Analysis year used when no weather series is attached.
pub const DEFAULT_ANALYSIS_YEAR: i32 = 2024;

/// A geographic site shared by all surfaces of a building.
///
/// Owns the terrain horizon profile and, optionally, a measured or
/// typical-year irradiance series. Where the horizon control points come
/// from (PVGIS, survey) is the caller's concern; they attach via
/// [`with_horizon`](Self::with_horizon).
#[derive(Debug, Clone)]
pub struct Site {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Timezone of the local timestamps, hours from UTC.
    pub timezone: f64,
    horizon: ViewProfile,
    weather: Option<Irradiance>,
}

impl Site {
    /// Creates a site with a flat (panoramic) horizon and no weather data.
    pub fn new(latitude: f64, longitude: f64, timezone: f64) -> Self {
        Self {
            latitude,
            longitude,
            timezone,
            horizon: PANORAMIC.clone(),
            weather: None,
        }
    }

    /// Sets the terrain horizon from sparse (azimuth, elevation) control
    /// points.
    pub fn with_horizon(mut self, azimuth: &[f64], elevation: &[f64]) -> Result<Self> {
        self.horizon = ViewProfile::new(azimuth, elevation)?;
        Ok(self)
    }

    /// Attaches a measured or typical-year irradiance series; it takes
    /// precedence over clear-sky generation in
    /// [`solar_resources`](Self::solar_resources).
    pub fn with_weather(mut self, weather: Irradiance) -> Self {
        self.weather = Some(weather);
        self
    }

    /// The terrain horizon profile.
    pub fn horizon_profile(&self) -> &ViewProfile {
        &self.horizon
    }

    /// Solar position for a single local timestamp.
    pub fn solar_position_at(&self, time: NaiveDateTime) -> SolarPosition {
        SolarPosition::calculate(self.latitude, self.longitude, self.timezone, time)
    }

    /// Solar positions for a list of local timestamps.
    pub fn solar_positions(&self, time: &[NaiveDateTime]) -> SolarGeometry {
        let mut zenith = Vec::with_capacity(time.len());
        let mut azimuth = Vec::with_capacity(time.len());
        for &t in time {
            let pos = self.solar_position_at(t);
            zenith.push(pos.zenith);
            azimuth.push(pos.azimuth);
        }
        SolarGeometry {
            time: time.to_vec(),
            zenith,
            azimuth,
        }
    }

    /// Generates hourly solar position and clear-sky irradiance between two
    /// local timestamps (inclusive).
    pub fn clearsky(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> (SolarGeometry, Irradiance) {
        let mut time = Vec::new();
        let mut t = start;
        while t <= end {
            time.push(t);
            t += Duration::hours(1);
        }

        let geometry = self.solar_positions(&time);
        let mut dni = Vec::with_capacity(time.len());
        let mut ghi = Vec::with_capacity(time.len());
        let mut dhi = Vec::with_capacity(time.len());
        for i in 0..time.len() {
            let pos = SolarPosition {
                altitude: 90.0 - geometry.zenith[i],
                azimuth: geometry.azimuth[i],
                zenith: geometry.zenith[i],
            };
            let (d, g, f) = clearsky_components(&pos);
            dni.push(d);
            ghi.push(g);
            dhi.push(f);
        }

        let irradiance = Irradiance {
            time,
            dni,
            ghi,
            dhi,
        };
        (geometry, irradiance)
    }

    /// Solar position and irradiance series for the analysis period.
    ///
    /// Uses the attached weather series when present (positions computed for
    /// its timestamps), otherwise a full clear-sky year
    /// ([`DEFAULT_ANALYSIS_YEAR`]).
    pub fn solar_resources(&self) -> (SolarGeometry, Irradiance) {
        if let Some(weather) = &self.weather {
            let geometry = self.solar_positions(&weather.time);
            return (geometry, weather.clone());
        }

        let start = NaiveDate::from_ymd_opt(DEFAULT_ANALYSIS_YEAR, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(DEFAULT_ANALYSIS_YEAR, 12, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        self.clearsky(start, end)
    }
}
