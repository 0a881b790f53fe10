//! Plane-of-array transposition.
//!
//! The core only depends on the [`Transposition`] contract: given a surface
//! orientation and masked irradiance components, produce a time-indexed
//! series with at least `poa_global`. [`IsotropicSky`] is the reference
//! implementation (isotropic diffuse sky, geometric beam projection,
//! isotropic ground reflection).

use crate::error::Result;
use crate::profile::ViewProfile;
use crate::timeseries::{check_aligned, Irradiance, MaskedIrradiance, PoaIrradiance, SolarGeometry};

/// Transposes horizontal irradiance components onto a tilted surface.
pub trait Transposition {
    /// Computes plane-of-array irradiance.
    ///
    /// - `surface_tilt`: degrees from horizontal (0 = horizontal, 90 = vertical)
    /// - `surface_azimuth`: outward normal azimuth, degrees from north, clockwise
    ///
    /// Fails with a misaligned-series error when the geometry and irradiance
    /// inputs do not share a common time index.
    fn transpose(
        &self,
        surface_tilt: f64,
        surface_azimuth: f64,
        geometry: &SolarGeometry,
        irradiance: &MaskedIrradiance,
    ) -> Result<PoaIrradiance>;
}

/// Isotropic-sky transposition model.
///
/// Beam: `dni * cos(incidence)`, zero when the sun is below the horizon.
/// Sky diffuse: `dhi * (1 + cos(tilt)) / 2`. Ground reflected:
/// `ghi * albedo * (1 - cos(tilt)) / 2`. The diffuse terms depend only on
/// the tilt, so twilight diffuse present in measured data is retained.
#[derive(Debug, Clone, Copy)]
pub struct IsotropicSky {
    /// Ground albedo (0.2 grass, up to ~0.6 snow).
    pub albedo: f64,
}

impl IsotropicSky {
    pub fn new(albedo: f64) -> Self {
        Self { albedo }
    }
}

impl Default for IsotropicSky {
    fn default() -> Self {
        Self { albedo: 0.2 }
    }
}

impl Transposition for IsotropicSky {
    fn transpose(
        &self,
        surface_tilt: f64,
        surface_azimuth: f64,
        geometry: &SolarGeometry,
        irradiance: &MaskedIrradiance,
    ) -> Result<PoaIrradiance> {
        check_aligned(&geometry.time, &irradiance.time)?;

        let n = geometry.len();
        let mut poa_global = Vec::with_capacity(n);
        let mut poa_direct = Vec::with_capacity(n);
        let mut poa_sky_diffuse = Vec::with_capacity(n);
        let mut poa_ground_diffuse = Vec::with_capacity(n);

        let tilt_cos = surface_tilt.to_radians().cos();
        let sky_view = (1.0 + tilt_cos) / 2.0;
        let ground_view = (1.0 - tilt_cos) / 2.0;

        for i in 0..n {
            let altitude = 90.0 - geometry.zenith[i];
            // No beam below the horizon; the diffuse terms still apply.
            let cos_incidence = if altitude > 0.0 {
                incidence_cosine(
                    altitude,
                    geometry.azimuth[i],
                    surface_tilt,
                    surface_azimuth,
                )
            } else {
                0.0
            };

            let beam = irradiance.dni[i] * cos_incidence;
            let sky = irradiance.dhi[i] * sky_view;
            let ground = irradiance.ghi[i] * self.albedo * ground_view;

            poa_direct.push(beam);
            poa_sky_diffuse.push(sky);
            poa_ground_diffuse.push(ground);
            poa_global.push(beam + sky + ground);
        }

        Ok(PoaIrradiance {
            time: irradiance.time.clone(),
            poa_global,
            poa_direct,
            poa_sky_diffuse,
            poa_ground_diffuse,
        })
    }
}

/// Cosine of the incidence angle between the sun and a surface normal,
/// clamped to zero when the sun is behind the surface.
///
/// Dot product of the sun vector and the surface normal in east-north-up
/// coordinates.
fn incidence_cosine(
    solar_altitude: f64,
    solar_azimuth: f64,
    surface_tilt: f64,
    surface_azimuth: f64,
) -> f64 {
    let alt = solar_altitude.to_radians();
    let az = solar_azimuth.to_radians();
    let beta = surface_tilt.to_radians();
    let gamma = surface_azimuth.to_radians();

    let cos_incidence = beta.sin() * gamma.sin() * alt.cos() * az.sin()
        + beta.sin() * gamma.cos() * alt.cos() * az.cos()
        + beta.cos() * alt.sin();

    cos_incidence.max(0.0)
}

/// An irradiance-computing array with an optional obstruction profile.
///
/// Composition replacement for subclassing a library array type: when a
/// profile is present the inputs are pre-masked before delegating to the
/// wrapped transposition strategy; without one, the inputs pass through
/// untouched.
#[derive(Debug, Clone)]
pub struct ShadedArray<T: Transposition> {
    pub profile: Option<ViewProfile>,
    pub transposition: T,
}

impl<T: Transposition> ShadedArray<T> {
    pub fn new(transposition: T) -> Self {
        Self {
            profile: None,
            transposition,
        }
    }

    pub fn with_profile(mut self, profile: ViewProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Masks the inputs through the profile (if any), then transposes.
    pub fn irradiance(
        &self,
        surface_tilt: f64,
        surface_azimuth: f64,
        geometry: &SolarGeometry,
        irradiance: &Irradiance,
    ) -> Result<PoaIrradiance> {
        let masked = match &self.profile {
            Some(profile) => profile.apply(geometry, irradiance)?,
            None => MaskedIrradiance {
                time: irradiance.time.clone(),
                blocked_elevation: vec![0.0; irradiance.len()],
                dni: irradiance.dni.clone(),
                ghi: irradiance.ghi.clone(),
                dhi: irradiance.dhi.clone(),
            },
        };
        self.transposition
            .transpose(surface_tilt, surface_azimuth, geometry, &masked)
    }
}
