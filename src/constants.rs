//! # Constants and type definitions for groundtrack
//!
//! This module centralizes the **Earth model**, **conversion factors**, the
//! **iteration caps** of the numerical solvers, and the type aliases used
//! throughout the crate.
//!
//! ## Overview
//!
//! - Reference ellipsoid and rotation rate of the Earth (WGS-72 flavoured, as used by SGP4)
//! - Unit conversions (degrees ↔ radians, days ↔ minutes ↔ seconds, JD ↔ MJD)
//! - Tolerances and iteration caps of the Kepler and geodetic solvers
//! - Type aliases documenting the unit carried by an `f64`
//!
//! All values are compile-time constants and are never mutated, so they can be
//! read from any thread without synchronization.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// One minute expressed in days
pub const DAYS_PER_MINUTE: f64 = 1.0 / MINUTES_PER_DAY;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00)
pub const JD2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// MJD epoch of J2000.0
pub const T2000: f64 = 51_544.5;

/// Days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

// -------------------------------------------------------------------------------------------------
// Earth model
// -------------------------------------------------------------------------------------------------

/// Earth equatorial radius in kilometers (reference ellipsoid of the geodetic inversion)
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378.135;

/// Squared eccentricity of the reference ellipsoid
pub const EARTH_ECCENTRICITY_SQUARED: f64 = 0.006_694_385_0;

/// Nominal Earth rotation rate in rad/s
pub const EARTH_ROTATION_RATE: f64 = 7.292_115_146_706_98e-5;

/// Earth gravitational parameter μ in km³/s² (WGS-72, the SGP4 gravity model)
pub const EARTH_MU: f64 = 398_600.8;

// -------------------------------------------------------------------------------------------------
// Solver tolerances and iteration caps
// -------------------------------------------------------------------------------------------------

/// Convergence threshold on successive eccentric anomaly iterates (radians)
pub const KEPLER_TOLERANCE: f64 = 1.0e-14;

/// Safety bound on the number of Kepler iterations
pub const KEPLER_MAX_ITERATIONS: usize = 100;

/// Convergence threshold on successive geodetic latitude iterates (radians)
pub const GEODETIC_TOLERANCE: f64 = 1.0e-8;

/// Fixed cap on geodetic latitude iterations
pub const GEODETIC_MAX_ITERATIONS: usize = 10;

/// Distance from the polar axis (km) under which longitude is undefined
pub const POLAR_AXIS_THRESHOLD: f64 = 1.0e-8;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian Date (days)
pub type JulianDate = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Time offset in minutes
pub type Minutes = f64;
