//! Angular obstruction profiles and the irradiance masking engine.
//!
//! A [`ViewProfile`] maps every compass direction to the elevation angle
//! below which the sky is obstructed (terrain horizon, neighbouring walls,
//! balcony slabs). Profiles compose: a facade-relative profile is rotated
//! into site azimuth and combined with the site horizon, and the combined
//! profile is then applied to solar position / irradiance series to mask
//! the direct beam and adjust the global horizontal component.
//!
//! Conventions:
//! - Azimuth: degrees from north, clockwise (0=N, 90=E, 180=S, 270=W).
//! - Elevation: degrees above horizontal (0=open horizon, 90=fully blocked).

use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::timeseries::{check_aligned, Irradiance, MaskedIrradiance, SolarGeometry};

/// Number of samples in the canonical azimuth grid (one per degree).
pub const AZIMUTH_SAMPLES: usize = 360;

/// Obstruction elevation as a function of azimuth, sampled on a fixed
/// 360-point grid (one elevation value per integer azimuth degree).
///
/// Instances are immutable: [`mirror`](Self::mirror),
/// [`rotate`](Self::rotate) and [`combine`](Self::combine) all return new
/// profiles, so a single profile can be shared freely across surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProfile {
    elevation: [f64; AZIMUTH_SAMPLES],
}

impl ViewProfile {
    /// Builds a profile from sparse (azimuth, elevation) control points.
    ///
    /// Control points are sorted by azimuth and linearly interpolated onto
    /// the canonical grid; grid points outside the control azimuth range
    /// clamp to the nearest endpoint's elevation.
    pub fn new(azimuth: &[f64], elevation: &[f64]) -> Result<Self> {
        if azimuth.len() != elevation.len() {
            return Err(Error::MismatchedControlPoints {
                azimuths: azimuth.len(),
                elevations: elevation.len(),
            });
        }
        if azimuth.is_empty() {
            return Err(Error::EmptyControlPoints);
        }

        let mut points: Vec<(f64, f64)> = azimuth
            .iter()
            .copied()
            .zip(elevation.iter().copied())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut grid = [0.0; AZIMUTH_SAMPLES];
        for (deg, value) in grid.iter_mut().enumerate() {
            *value = interp(deg as f64, &points);
        }
        Ok(Self { elevation: grid })
    }

    /// The elevation samples on the canonical grid; index = azimuth degree.
    pub fn elevation(&self) -> &[f64; AZIMUTH_SAMPLES] {
        &self.elevation
    }

    /// Interpolated elevation at an arbitrary azimuth, wrapping at the
    /// 0/360 boundary (azimuth 359.5 interpolates between samples 359 and 0).
    pub fn elevation_at(&self, azimuth: f64) -> f64 {
        let az = azimuth.rem_euclid(360.0);
        let i0 = az.floor() as usize % AZIMUTH_SAMPLES;
        let i1 = (i0 + 1) % AZIMUTH_SAMPLES;
        let frac = az - az.floor();
        self.elevation[i0] * (1.0 - frac) + self.elevation[i1] * frac
    }

    /// Returns the profile reflected in azimuth (elevation array reversed).
    ///
    /// Used to produce symmetric counterparts, e.g. a north-west corner
    /// balcony profile and its north-east mirror image. Self-inverse.
    pub fn mirror(&self) -> Self {
        let mut flipped = [0.0; AZIMUTH_SAMPLES];
        for (i, value) in flipped.iter_mut().enumerate() {
            *value = self.elevation[AZIMUTH_SAMPLES - 1 - i];
        }
        Self { elevation: flipped }
    }

    /// Returns the profile rotated clockwise by `degrees`.
    ///
    /// Every sample azimuth is shifted modulo 360, the samples are re-sorted
    /// into ascending azimuth order and re-interpolated onto the canonical
    /// grid. Rotation reorients a facade-relative profile into absolute
    /// (site) azimuth.
    pub fn rotate(&self, degrees: f64) -> Self {
        let mut points: Vec<(f64, f64)> = self
            .elevation
            .iter()
            .enumerate()
            .map(|(deg, &elev)| ((deg as f64 + degrees).rem_euclid(360.0), elev))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut grid = [0.0; AZIMUTH_SAMPLES];
        for (deg, value) in grid.iter_mut().enumerate() {
            *value = interp(deg as f64, &points);
        }
        Self { elevation: grid }
    }

    /// Returns the union of two obstructions: the pointwise maximum of the
    /// two elevation arrays (the higher obstruction dominates at each
    /// azimuth).
    pub fn combine(&self, other: &Self) -> Self {
        let mut merged = [0.0; AZIMUTH_SAMPLES];
        for (i, value) in merged.iter_mut().enumerate() {
            *value = self.elevation[i].max(other.elevation[i]);
        }
        Self { elevation: merged }
    }

    /// Applies the profile to irradiance data.
    ///
    /// For each timestamp the profile elevation is interpolated at the solar
    /// azimuth and compared against the sun elevation (90 − zenith). If the
    /// sun elevation is not strictly above the blocking elevation, the
    /// direct beam is zeroed. Wherever the direct beam is zero (blocked or
    /// already zero in the input), the global horizontal signal reduces to
    /// its diffuse component (ghi := dhi). Diffuse irradiance is never
    /// altered.
    ///
    /// A profile with elevation 90 at some azimuth blocks the sun from that
    /// direction permanently, since the sun elevation never exceeds 90.
    ///
    /// Fails with a misaligned-series error if the geometry and irradiance
    /// inputs do not share a common time index.
    pub fn apply(
        &self,
        geometry: &SolarGeometry,
        irradiance: &Irradiance,
    ) -> Result<MaskedIrradiance> {
        check_aligned(&geometry.time, &irradiance.time)?;

        let n = geometry.len();
        let mut blocked_elevation = Vec::with_capacity(n);
        let mut dni = Vec::with_capacity(n);
        let mut ghi = Vec::with_capacity(n);

        for i in 0..n {
            let blocked = self.elevation_at(geometry.azimuth[i]);
            let sun_elevation = 90.0 - geometry.zenith[i];

            let masked_dni = if sun_elevation > blocked {
                irradiance.dni[i]
            } else {
                0.0
            };
            let adjusted_ghi = if masked_dni == 0.0 {
                irradiance.dhi[i]
            } else {
                irradiance.ghi[i]
            };

            blocked_elevation.push(blocked);
            dni.push(masked_dni);
            ghi.push(adjusted_ghi);
        }

        Ok(MaskedIrradiance {
            time: irradiance.time.clone(),
            blocked_elevation,
            dni,
            ghi,
            dhi: irradiance.dhi.clone(),
        })
    }
}

/// Linear interpolation over sorted (x, y) control points, clamping to the
/// endpoint values outside the control range.
fn interp(x: f64, points: &[(f64, f64)]) -> f64 {
    let first = points[0];
    let last = points[points.len() - 1];
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    // First control point at or beyond x; x is strictly inside the range here.
    let hi = points.partition_point(|p| p.0 < x);
    let (x1, y1) = points[hi];
    let (x0, y0) = points[hi - 1];
    if x1 == x0 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Fully open sky: zero obstruction at every azimuth.
pub static PANORAMIC: LazyLock<ViewProfile> = LazyLock::new(|| {
    ViewProfile::new(&[0.0, 360.0], &[0.0, 0.0]).expect("panoramic control points are valid")
});

/// Unobstructed view in front, fully obstructing wall behind (azimuths
/// 91-270 blocked to the zenith).
pub static BACKED: LazyLock<ViewProfile> = LazyLock::new(|| {
    ViewProfile::new(
        &[0.0, 90.0, 91.0, 270.0, 271.0, 360.0],
        &[0.0, 0.0, 90.0, 90.0, 0.0, 0.0],
    )
    .expect("backed control points are valid")
});

/// North-west corner balcony facing north, with the north-east quadrant
/// looking into another facade of the same building.
pub static NW_BALCONY: LazyLock<ViewProfile> = LazyLock::new(|| {
    ViewProfile::new(
        &[0.0, 12.36, 12.361, 90.0, 90.1, 270.0, 270.1],
        &[0.0, 0.0, 49.5, 79.639, 90.0, 90.0, 0.0],
    )
    .expect("balcony control points are valid")
});

/// Mirror image of [`NW_BALCONY`] for the north-east corner.
pub static NE_BALCONY: LazyLock<ViewProfile> = LazyLock::new(|| NW_BALCONY.mirror());

/// Looks up a predefined profile by its registry name.
///
/// Known names: `PANORAMIC`, `BACKED`, `NW_BALCONY`, `NE_BALCONY`.
pub fn profile_from_name(name: &str) -> Result<&'static ViewProfile> {
    match name {
        "PANORAMIC" => Ok(&PANORAMIC),
        "BACKED" => Ok(&BACKED),
        "NW_BALCONY" => Ok(&NW_BALCONY),
        "NE_BALCONY" => Ok(&NE_BALCONY),
        other => Err(Error::UnknownProfile(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn uniform(elevation: f64) -> ViewProfile {
        ViewProfile::new(&[0.0, 360.0], &[elevation, elevation]).unwrap()
    }

    fn single_step(geometry_azimuth: f64, zenith: f64) -> (SolarGeometry, Irradiance) {
        let time = vec![NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()];
        let geometry = SolarGeometry {
            time: time.clone(),
            zenith: vec![zenith],
            azimuth: vec![geometry_azimuth],
        };
        let irradiance = Irradiance {
            time,
            dni: vec![800.0],
            ghi: vec![600.0],
            dhi: vec![100.0],
        };
        (geometry, irradiance)
    }

    #[test]
    fn test_construction_length_mismatch() {
        let err = ViewProfile::new(&[0.0, 90.0], &[0.0]).unwrap_err();
        assert!(matches!(err, Error::MismatchedControlPoints { .. }));
    }

    #[test]
    fn test_construction_empty() {
        let err = ViewProfile::new(&[], &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyControlPoints));
    }

    #[test]
    fn test_construction_clamps_outside_control_range() {
        // Control points only cover 100-200; everything else clamps.
        let p = ViewProfile::new(&[100.0, 200.0], &[10.0, 30.0]).unwrap();
        assert!((p.elevation()[0] - 10.0).abs() < 1e-10);
        assert!((p.elevation()[359] - 30.0).abs() < 1e-10);
        assert!((p.elevation()[150] - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_construction_sorts_control_points() {
        let sorted = ViewProfile::new(&[0.0, 180.0, 360.0], &[0.0, 45.0, 0.0]).unwrap();
        let shuffled = ViewProfile::new(&[180.0, 360.0, 0.0], &[45.0, 0.0, 0.0]).unwrap();
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn test_rotate_zero_round_trip() {
        let p = BACKED.rotate(0.0);
        for deg in 0..AZIMUTH_SAMPLES {
            assert!(
                (p.elevation()[deg] - BACKED.elevation()[deg]).abs() < 1e-9,
                "rotate(0) changed elevation at azimuth {deg}"
            );
        }
    }

    #[test]
    fn test_mirror_is_self_inverse() {
        let p = NW_BALCONY.mirror().mirror();
        assert_eq!(p, *NW_BALCONY);
    }

    #[test]
    fn test_combine_commutative_and_idempotent() {
        let a = &*BACKED;
        let b = &*NW_BALCONY;
        assert_eq!(a.combine(b), b.combine(a));
        assert_eq!(a.combine(a), *a);
    }

    #[test]
    fn test_combine_takes_pointwise_maximum() {
        let a = &*BACKED;
        let b = &*NW_BALCONY;
        let c = a.combine(b);
        for deg in 0..AZIMUTH_SAMPLES {
            let expected = a.elevation()[deg].max(b.elevation()[deg]);
            assert!(
                (c.elevation()[deg] - expected).abs() < 1e-12,
                "combined elevation at {deg} should be the max of the inputs"
            );
        }
    }

    #[test]
    fn test_rotate_90_shifts_backed_arc() {
        // The obstructed arc [91, 270] moves to [181, 360] (mod 360), so the
        // elevation at 200 after rotation equals the original at 110.
        let rotated = BACKED.rotate(90.0);
        assert!(
            (rotated.elevation()[200] - BACKED.elevation()[110]).abs() < 1e-9,
            "rotated elevation at 200 should match original at 110"
        );
        assert!((rotated.elevation()[200] - 90.0).abs() < 1e-9);
        assert!((rotated.elevation()[45] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_elevation_at_wraps_across_north() {
        let azimuth: Vec<f64> = (0..360).map(f64::from).collect();
        let mut elevation = vec![0.0; 360];
        elevation[359] = 10.0;
        let p = ViewProfile::new(&azimuth, &elevation).unwrap();
        // Halfway between sample 359 (10.0) and sample 0 (0.0).
        assert!((p.elevation_at(359.5) - 5.0).abs() < 1e-10);
        assert!((p.elevation_at(-0.5) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_apply_panoramic_is_noop_above_horizon() {
        let (geometry, irradiance) = single_step(45.0, 30.0);
        let masked = PANORAMIC.apply(&geometry, &irradiance).unwrap();
        assert_eq!(masked.dni, irradiance.dni);
        assert_eq!(masked.ghi, irradiance.ghi);
        assert_eq!(masked.dhi, irradiance.dhi);
        assert!((masked.blocked_elevation[0] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_full_block_zeroes_dni_everywhere() {
        let wall = uniform(90.0);
        let (geometry, irradiance) = single_step(180.0, 0.1);
        let masked = wall.apply(&geometry, &irradiance).unwrap();
        assert_eq!(masked.dni[0], 0.0, "dni must be zero under a 90° profile");
        assert_eq!(masked.ghi[0], irradiance.dhi[0], "ghi must collapse to dhi");
        assert_eq!(masked.dhi[0], irradiance.dhi[0]);
    }

    #[test]
    fn test_apply_backed_front_arc_unblocked() {
        // Solar azimuth 45° is inside the open front arc: never blocked.
        let (geometry, irradiance) = single_step(45.0, 89.0);
        let masked = BACKED.apply(&geometry, &irradiance).unwrap();
        assert_eq!(masked.dni[0], irradiance.dni[0]);
        assert_eq!(masked.ghi[0], irradiance.ghi[0]);
    }

    #[test]
    fn test_apply_backed_rear_arc_blocked() {
        // Solar azimuth 180° faces the rear wall (blocking elevation 90):
        // blocked for any zenith, dni zeroed and ghi collapses to dhi.
        let (geometry, irradiance) = single_step(180.0, 5.0);
        let masked = BACKED.apply(&geometry, &irradiance).unwrap();
        assert_eq!(masked.dni[0], 0.0);
        assert_eq!(masked.ghi[0], irradiance.dhi[0]);
    }

    #[test]
    fn test_apply_keeps_ghi_collapse_for_already_zero_dni() {
        let (geometry, mut irradiance) = single_step(45.0, 30.0);
        irradiance.dni[0] = 0.0;
        let masked = PANORAMIC.apply(&geometry, &irradiance).unwrap();
        assert_eq!(
            masked.ghi[0], irradiance.dhi[0],
            "ghi must reduce to dhi whenever dni is zero, even unblocked"
        );
    }

    #[test]
    fn test_apply_rejects_misaligned_series() {
        let (geometry, irradiance) = single_step(45.0, 30.0);
        let mut shifted = irradiance.clone();
        shifted.time[0] += chrono::Duration::hours(1);
        let err = PANORAMIC.apply(&geometry, &shifted).unwrap_err();
        assert!(matches!(err, Error::MisalignedSeries(_)));
    }

    #[test]
    fn test_profile_registry_lookup() {
        assert!(profile_from_name("PANORAMIC").is_ok());
        assert!(profile_from_name("BACKED").is_ok());
        assert_eq!(
            profile_from_name("NE_BALCONY").unwrap(),
            &NW_BALCONY.mirror()
        );
        let err = profile_from_name("ROOFTOP").unwrap_err();
        assert!(matches!(err, Error::UnknownProfile(_)));
    }

    #[test]
    fn test_backed_profile_grid_values() {
        assert!((BACKED.elevation()[45] - 0.0).abs() < 1e-10);
        assert!((BACKED.elevation()[180] - 90.0).abs() < 1e-10);
        assert!((BACKED.elevation()[300] - 0.0).abs() < 1e-10);
    }
}
