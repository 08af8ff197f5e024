//! # Classical orbital elements
//!
//! This module defines [`OrbitalElements`], the **osculating Keplerian element set**
//! consumed by the samplers.
//!
//! ## What are the elements?
//!
//! 1. **a** – Semi-major axis (km)
//! 2. **e** – Eccentricity (unitless, `[0, 1)` for the elliptical orbits handled here)
//! 3. **i** – Inclination (radians)
//! 4. **ω** – Argument of perigee (radians)
//! 5. **Ω** – Longitude of the ascending node (radians)
//! 6. **M** – Mean anomaly at epoch (radians)
//!
//! together with the epoch of validity as a Julian date.
//!
//! The record is immutable once derived from a propagator state: it is owned by the
//! caller and only read by this crate. Derived quantities (mean motion, period) use
//! Kepler's third law with the WGS-72 gravitational parameter [`EARTH_MU`], the gravity
//! model of the SGP4 propagator.
//!
//! ## Degeneracies
//!
//! - **Circular orbits (`e → 0`)**: ω is undefined, conventionally `0.0`.
//! - **Equatorial orbits (`i → 0`)**: Ω is undefined, conventionally `0.0`.
//!
//! Both cases stay well defined for sampling since only the sums `ω + v` and `Ω` enter
//! the perifocal rotation.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{JulianDate, Kilometer, Radian, DPI, EARTH_MU, MINUTES_PER_DAY};
use crate::frame_transform::rotmt;
use crate::groundtrack_errors::GroundTrackError;
use crate::kepler::true_anomaly;

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `semi_major_axis`: km.
/// * `eccentricity`: unitless.
/// * `inclination`, `periapsis_argument`, `ascending_node_longitude`, `mean_anomaly`: radians.
/// * `epoch`: Julian date.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub semi_major_axis: Kilometer,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub periapsis_argument: Radian,
    pub ascending_node_longitude: Radian,
    pub mean_anomaly: Radian,
    pub epoch: JulianDate,
}

impl OrbitalElements {
    /// Check the elements describe a bound elliptical orbit.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::InvalidEccentricity`] if `e ∉ [0, 1)` or NaN.
    /// * [`GroundTrackError::InvalidSemiMajorAxis`] if `a` is not a finite positive number.
    pub fn validate(&self) -> Result<(), GroundTrackError> {
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(GroundTrackError::InvalidEccentricity(self.eccentricity));
        }
        if !(self.semi_major_axis.is_finite() && self.semi_major_axis > 0.0) {
            return Err(GroundTrackError::InvalidSemiMajorAxis(self.semi_major_axis));
        }
        Ok(())
    }

    /// Semi-major axis (km) of an orbit with the given mean motion (rev/day).
    pub fn semi_major_axis_from_mean_motion(
        revolutions_per_day: f64,
    ) -> Result<Kilometer, GroundTrackError> {
        if !(revolutions_per_day.is_finite() && revolutions_per_day > 0.0) {
            return Err(GroundTrackError::InvalidMeanMotion(revolutions_per_day));
        }
        let n = revolutions_per_day * DPI / 86_400.0; // rad/s
        Ok((EARTH_MU / (n * n)).cbrt())
    }

    /// Mean motion in rad/min.
    pub fn mean_motion(&self) -> f64 {
        (EARTH_MU / self.semi_major_axis.powi(3)).sqrt() * 60.0
    }

    /// Mean motion in revolutions per day.
    pub fn revolutions_per_day(&self) -> f64 {
        self.mean_motion() * MINUTES_PER_DAY / DPI
    }

    /// Orbital period in minutes.
    pub fn period_minutes(&self) -> f64 {
        DPI / self.mean_motion()
    }

    /// Perigee radius `a(1 − e)` in km.
    pub fn perigee_radius(&self) -> Kilometer {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Apogee radius `a(1 + e)` in km.
    pub fn apogee_radius(&self) -> Kilometer {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Bit patterns of the seven fields, in declaration order.
    pub fn to_bits(&self) -> [u64; 7] {
        [
            self.semi_major_axis.to_bits(),
            self.eccentricity.to_bits(),
            self.inclination.to_bits(),
            self.periapsis_argument.to_bits(),
            self.ascending_node_longitude.to_bits(),
            self.mean_anomaly.to_bits(),
            self.epoch.to_bits(),
        ]
    }

    /// Rotation from the perifocal frame (x toward perigee, z along the orbit normal) to
    /// the inertial frame: `R_z(Ω) · R_x(i) · R_z(ω)`.
    pub fn perifocal_rotation(&self) -> Matrix3<f64> {
        rotmt(self.ascending_node_longitude, 2)
            * rotmt(self.inclination, 0)
            * rotmt(self.periapsis_argument, 2)
    }

    /// Inertial position (km) on the osculating ellipse at a given eccentric anomaly.
    ///
    /// The true anomaly `v` is derived from `E`, the radius is `a(1 − e·cos E)` and the
    /// perifocal point `(r cos v, r sin v, 0)` is rotated by [`Self::perifocal_rotation`].
    pub fn position_at(&self, eccentric_anomaly: Radian) -> Vector3<f64> {
        self.perifocal_rotation() * self.perifocal_position(eccentric_anomaly)
    }

    /// Perifocal position (km) at a given eccentric anomaly.
    pub(crate) fn perifocal_position(&self, eccentric_anomaly: Radian) -> Vector3<f64> {
        let v = true_anomaly(self.eccentricity, eccentric_anomaly);
        let radius = self.semi_major_axis * (1.0 - self.eccentricity * eccentric_anomaly.cos());
        Vector3::new(radius * v.cos(), radius * v.sin(), 0.0)
    }

    /// Perifocal velocity (km/s) at a given eccentric anomaly.
    ///
    /// `√(μ/p) · (−sin v, e + cos v, 0)` with `p = a(1 − e²)`.
    pub(crate) fn perifocal_velocity(&self, eccentric_anomaly: Radian) -> Vector3<f64> {
        let v = true_anomaly(self.eccentricity, eccentric_anomaly);
        let p = self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity);
        let k = (EARTH_MU / p).sqrt();
        Vector3::new(-k * v.sin(), k * (self.eccentricity + v.cos()), 0.0)
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 180.0 / std::f64::consts::PI;
        writeln!(f, "Orbital Elements @ epoch (JD): {:.6}", self.epoch)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.3} km",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of perigee)   = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6} rad ({:.6}°)",
            self.mean_anomaly,
            self.mean_anomaly * rad_to_deg
        )
    }
}
