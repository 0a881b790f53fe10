//! Building-level aggregation of per-surface irradiance into captured energy.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::profile::profile_from_name;
use crate::site::Site;
use crate::surface::{Surface, SurfaceResult, SurfaceType};

/// One row of surface construction parameters, as produced by an external
/// tabular loader.
///
/// `azimuth` is relative to the building azimuth; `profile` is a registry
/// name and `surface_type` a type tag, both resolved during
/// [`Building::add_surface`] — unknown names fail loudly there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub name: String,
    pub surface_type: String,
    pub azimuth: f64,
    pub profile: String,
    pub tilt: f64,
    pub area_per_level: f64,
    pub efficiency: f64,
}

/// A building: a set of named capture surfaces sharing one site.
///
/// Every level replicates the per-level surface areas, so captured energy
/// scales linearly with the number of levels.
#[derive(Debug, Clone)]
pub struct Building {
    pub name: String,
    /// Base azimuth; surface azimuths from specs are rotated by this.
    pub azimuth: f64,
    pub levels: u32,
    site: Arc<Site>,
    surfaces: BTreeMap<String, Surface>,
}

impl Building {
    pub fn new(name: &str, azimuth: f64, site: Arc<Site>, levels: u32) -> Self {
        Self {
            name: name.to_string(),
            azimuth,
            levels,
            site,
            surfaces: BTreeMap::new(),
        }
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    pub fn surfaces(&self) -> &BTreeMap<String, Surface> {
        &self.surfaces
    }

    /// Constructs a surface from a parameter row and registers it under its
    /// name (replacing any previous surface of the same name).
    ///
    /// The surface type tag and profile identifier are resolved here;
    /// unknown values return configuration errors instead of defaulting.
    pub fn add_surface(&mut self, spec: &SurfaceSpec) -> Result<()> {
        let surface_type: SurfaceType = spec.surface_type.parse()?;
        let profile = profile_from_name(&spec.profile)?;
        let azimuth = (self.azimuth + spec.azimuth).rem_euclid(360.0);

        let surface = Surface::new(
            &spec.name,
            surface_type,
            azimuth,
            Arc::clone(&self.site),
            spec.area_per_level,
        )
        .with_tilt(spec.tilt)
        .with_efficiency(spec.efficiency)
        .with_profile(profile);

        self.surfaces.insert(spec.name.clone(), surface);
        Ok(())
    }

    /// Bulk-registers surfaces from parameter rows. Fails on the first bad
    /// row; rows before it stay registered.
    pub fn add_surfaces<'a, I>(&mut self, specs: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SurfaceSpec>,
    {
        for spec in specs {
            self.add_surface(spec)?;
        }
        Ok(())
    }

    /// Solves irradiance for every surface against the site's shared solar
    /// resources and aggregates captured energy.
    ///
    /// Captured energy per surface and timestamp is
    /// `poa_global * area_per_level * efficiency * levels / 1000` (kWh for
    /// hourly data), reshaped into long-form records keyed by
    /// (timestamp, surface name, surface type), timestamp-major.
    ///
    /// A surface that fails to solve aborts the whole calculation with its
    /// error; contributions are never silently zeroed.
    pub fn calculate_irradiance(&self) -> Result<BuildingResult> {
        let (geometry, irradiance) = self.site.solar_resources();

        let mut surfaces: BTreeMap<String, SurfaceResult> = BTreeMap::new();
        for (name, surface) in &self.surfaces {
            let result = surface.solve_irradiance(&geometry, &irradiance, None, None)?;
            surfaces.insert(name.clone(), result);
        }

        let mut generation = Vec::with_capacity(geometry.len() * self.surfaces.len());
        for (i, &time) in geometry.time.iter().enumerate() {
            for (name, surface) in &self.surfaces {
                let poa_global = surfaces[name].poa.poa_global[i];
                let captured_wh =
                    poa_global * surface.area_per_level * surface.efficiency * self.levels as f64;
                generation.push(GenerationRecord {
                    time,
                    surface: name.clone(),
                    surface_type: surface.surface_type,
                    generation_kwh: captured_wh / 1000.0,
                });
            }
        }

        Ok(BuildingResult {
            surfaces,
            generation,
        })
    }
}

/// Captured energy for one surface at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub time: NaiveDateTime,
    pub surface: String,
    pub surface_type: SurfaceType,
    pub generation_kwh: f64,
}

/// Result of a building irradiance calculation: per-surface plane-of-array
/// results plus the long-form captured-energy records.
#[derive(Debug, Clone)]
pub struct BuildingResult {
    pub surfaces: BTreeMap<String, SurfaceResult>,
    pub generation: Vec<GenerationRecord>,
}

impl BuildingResult {
    /// Total captured energy over the period (kWh).
    pub fn total_generation_kwh(&self) -> f64 {
        self.generation.iter().map(|r| r.generation_kwh).sum()
    }

    /// Captured energy per surface over the period (kWh).
    pub fn generation_by_surface(&self) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for record in &self.generation {
            *totals.entry(record.surface.clone()).or_insert(0.0) += record.generation_kwh;
        }
        totals
    }

    /// Mean building-wide capture per hour of day (kWh).
    pub fn hourly_mean_generation(&self) -> [f64; 24] {
        use chrono::Timelike;
        let mut sums = [0.0; 24];
        let mut counts = [0usize; 24];
        for record in &self.generation {
            let h = record.time.hour() as usize;
            sums[h] += record.generation_kwh;
            counts[h] += 1;
        }
        let surfaces = self.surfaces.len().max(1);
        let mut means = [0.0; 24];
        for h in 0..24 {
            if counts[h] > 0 {
                // Hours appear once per surface; average over days, not surfaces.
                means[h] = sums[h] * surfaces as f64 / counts[h] as f64;
            }
        }
        means
    }
}
