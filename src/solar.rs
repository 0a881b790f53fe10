//! Solar position and clear-sky irradiance.
//!
//! The position algorithm follows the NOAA solar calculator equations
//! (Spencer series for the equation of time and declination). Timestamps
//! are local clock time; the site timezone offset enters the true-solar-time
//! correction together with the longitude.

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Sun position in the sky at a given time and location. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Altitude above the horizon (negative when the sun is below it).
    pub altitude: f64,
    /// Azimuth from north, clockwise (0=N, 90=E, 180=S, 270=W).
    pub azimuth: f64,
    /// Zenith angle from vertical; zenith = 90 − altitude.
    pub zenith: f64,
}

impl SolarPosition {
    /// Calculates the solar position for a local timestamp.
    ///
    /// - `latitude`: degrees, positive north
    /// - `longitude`: degrees, positive east
    /// - `timezone`: hours from UTC of the local timestamps
    pub fn calculate(latitude: f64, longitude: f64, timezone: f64, time: NaiveDateTime) -> Self {
        let day_of_year = time.ordinal() as f64;
        let days_in_year = if time.date().leap_year() { 366.0 } else { 365.0 };
        let hour = time.hour() as f64 + time.minute() as f64 / 60.0;

        // Fractional year in radians.
        let gamma =
            2.0 * std::f64::consts::PI * (day_of_year - 1.0 + (hour - 12.0) / 24.0) / days_in_year;

        // Equation of time in minutes (Spencer series).
        let eqtime = 229.18
            * (0.000075 + 0.001868 * gamma.cos()
                - 0.032077 * gamma.sin()
                - 0.014615 * (2.0 * gamma).cos()
                - 0.040849 * (2.0 * gamma).sin());

        // Solar declination in radians (Spencer series).
        let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        // True solar time in minutes, then hour angle in degrees.
        let time_offset = eqtime + 4.0 * longitude - 60.0 * timezone;
        let true_solar_time = hour * 60.0 + time_offset;
        let hour_angle = true_solar_time / 4.0 - 180.0;

        let lat = latitude.to_radians();
        let ha = hour_angle.to_radians();

        let cos_zenith = lat.sin() * declination.sin() + lat.cos() * declination.cos() * ha.cos();
        let zenith = cos_zenith.clamp(-1.0, 1.0).acos().to_degrees();
        let altitude = 90.0 - zenith;

        // East and north components of the sun vector; atan2 of the pair is
        // the clockwise-from-north azimuth.
        let east = -declination.cos() * ha.sin();
        let north = (declination.sin() - lat.sin() * cos_zenith) / lat.cos();
        let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);

        Self {
            altitude,
            azimuth,
            zenith,
        }
    }

    /// Returns true if the sun is above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Solar constant at the top of the atmosphere (W/m²).
const SOLAR_CONSTANT: f64 = 1367.0;

/// Fraction of the horizontal beam assumed to scatter into diffuse under
/// clear skies.
const CLEARSKY_DIFFUSE_FRACTION: f64 = 0.1;

/// Clear-sky irradiance components (dni, ghi, dhi) for a sun position.
///
/// Direct normal irradiance uses a simplified Kasten-Young atmospheric
/// attenuation: `dni = 1367 * 0.7^(AM^0.678)` with the air mass taken as
/// `1/sin(altitude)` away from the horizon. The diffuse component is a fixed
/// fraction of the horizontal beam, and `ghi = dni*sin(altitude) + dhi`.
/// All components are zero when the sun is below the horizon.
pub fn clearsky_components(position: &SolarPosition) -> (f64, f64, f64) {
    if !position.is_above_horizon() {
        return (0.0, 0.0, 0.0);
    }

    let altitude = position.altitude;
    let sin_alt = altitude.to_radians().sin();

    // Air mass, with a linear stand-in near the horizon to avoid the
    // 1/sin singularity.
    let air_mass = if altitude > 5.0 {
        1.0 / sin_alt
    } else {
        12.0 - altitude / 5.0
    };

    let transmittance = 0.7_f64.powf(air_mass.powf(0.678));
    let dni = SOLAR_CONSTANT * transmittance;
    let beam_horizontal = dni * sin_alt;
    let dhi = CLEARSKY_DIFFUSE_FRACTION * beam_horizontal;
    let ghi = beam_horizontal + dhi;

    (dni, ghi, dhi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_equator_equinox_noon_near_zenith() {
        let pos = SolarPosition::calculate(0.0, 0.0, 0.0, at(3, 20, 12));
        assert!(
            pos.altitude > 80.0,
            "sun should be near zenith at equator equinox noon, got {}",
            pos.altitude
        );
        assert!(pos.is_above_horizon());
    }

    #[test]
    fn test_winter_midnight_below_horizon() {
        let pos = SolarPosition::calculate(45.0, 0.0, 0.0, at(12, 21, 0));
        assert!(
            !pos.is_above_horizon(),
            "sun should be below horizon at winter midnight, got altitude {}",
            pos.altitude
        );
        assert!(pos.zenith > 90.0);
    }

    #[test]
    fn test_equator_equinox_morning_azimuth_near_due_east() {
        // At the equator on the equinox the sun rises due east and its
        // azimuth stays close to 90° through the morning.
        let pos = SolarPosition::calculate(0.0, 0.0, 0.0, at(3, 20, 8));
        assert!(
            (pos.azimuth - 90.0).abs() < 6.0,
            "equinox morning sun at the equator should sit near azimuth 90, got {}",
            pos.azimuth
        );
    }

    #[test]
    fn test_morning_sun_in_the_east() {
        let pos = SolarPosition::calculate(45.0, 0.0, 0.0, at(6, 21, 8));
        assert!(pos.is_above_horizon());
        assert!(
            pos.azimuth > 45.0 && pos.azimuth < 135.0,
            "morning sun should be east-ish, got azimuth {}",
            pos.azimuth
        );
    }

    #[test]
    fn test_afternoon_sun_in_the_west() {
        let pos = SolarPosition::calculate(45.0, 0.0, 0.0, at(6, 21, 17));
        assert!(
            pos.azimuth > 225.0 && pos.azimuth < 315.0,
            "late afternoon sun should be west-ish, got azimuth {}",
            pos.azimuth
        );
    }

    #[test]
    fn test_timezone_shifts_solar_noon() {
        // Longitude 30°E with tz=+2: solar noon stays close to clock noon.
        let noon = SolarPosition::calculate(45.0, 30.0, 2.0, at(6, 21, 12));
        let morning = SolarPosition::calculate(45.0, 30.0, 2.0, at(6, 21, 8));
        assert!(noon.altitude > morning.altitude);
    }

    #[test]
    fn test_clearsky_zero_at_night() {
        let pos = SolarPosition {
            altitude: -5.0,
            azimuth: 0.0,
            zenith: 95.0,
        };
        assert_eq!(clearsky_components(&pos), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_clearsky_component_closure() {
        let pos = SolarPosition {
            altitude: 60.0,
            azimuth: 180.0,
            zenith: 30.0,
        };
        let (dni, ghi, dhi) = clearsky_components(&pos);
        assert!(dni > 0.0 && dni < SOLAR_CONSTANT);
        let beam_horizontal = dni * 60.0_f64.to_radians().sin();
        assert!(
            (ghi - (beam_horizontal + dhi)).abs() < 1e-9,
            "ghi must equal horizontal beam plus dhi"
        );
    }

    #[test]
    fn test_clearsky_higher_sun_more_irradiance() {
        let high = SolarPosition {
            altitude: 70.0,
            azimuth: 180.0,
            zenith: 20.0,
        };
        let low = SolarPosition {
            altitude: 15.0,
            azimuth: 180.0,
            zenith: 75.0,
        };
        assert!(clearsky_components(&high).1 > clearsky_components(&low).1);
    }
}
