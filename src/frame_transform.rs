//! # Reference-frame transformations
//!
//! Pipeline from the propagator's pseudo-inertial output to geographic coordinates:
//!
//! ```text
//! TEME ──R_stᵀ──▶ PEF ──R_pmᵀ──▶ ECEF ──ellipsoid inversion──▶ (φ, λ, h)
//! ```
//!
//! - `R_st` is the sidereal rotation about the Z axis by GMST,
//! - `R_pm` is the polar-motion rotation built from the pole offsets `(xp, yp)`.
//!
//! Both matrices are conventionally defined for the **forward** direction
//! (Earth-fixed → inertial), hence the transposes applied in the conjugate order.
//! All functions are pure and return fresh matrices/vectors.
//!
//! The geodetic inversion is the classical fixed-point iteration on the geodetic
//! latitude against the reference ellipsoid (`a = 6378.135 km`, `e² = 0.0066943850`),
//! capped at [`GEODETIC_MAX_ITERATIONS`]; hitting the cap is an accepted approximation.

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::constants::{
    JulianDate, Kilometer, Radian, DPI, EARTH_ECCENTRICITY_SQUARED, EARTH_EQUATORIAL_RADIUS,
    EARTH_ROTATION_RATE, GEODETIC_MAX_ITERATIONS, GEODETIC_TOLERANCE, POLAR_AXIS_THRESHOLD,
    RADEG, SECONDS_PER_DAY,
};
use crate::state::{Frame, GeodeticCoordinate, StateVector};
use crate::time::gmst;

/// Earth orientation parameters entering the TEME → ECEF rotation.
///
/// Units
/// -----
/// * `polar_motion_x`, `polar_motion_y`: radians.
/// * `length_of_day`: excess length of day in seconds (LOD, typically a few ms).
///
/// The [`Default`] is all zeros: no polar wander and the nominal rotation rate, which is
/// what public ground-track renderers assume.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EarthOrientation {
    pub polar_motion_x: Radian,
    pub polar_motion_y: Radian,
    pub length_of_day: f64,
}

impl EarthOrientation {
    /// Effective Earth rotation rate (rad/s) adjusted by the length-of-day offset.
    pub fn rotation_rate(&self) -> f64 {
        EARTH_ROTATION_RATE * (1.0 - self.length_of_day / SECONDS_PER_DAY)
    }
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes (X, Y, or Z).
///
/// The matrix represents an **active rotation** of a vector by `alpha` in the direct
/// (counter-clockwise) sense.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Index of the axis of rotation: `0` → X, `1` → Y, `2` → Z.
///
/// # Panics
///
/// Panics if `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Sidereal rotation matrix `R_st` (PEF → TEME) for a GMST angle.
pub fn sidereal_matrix(gmst: Radian) -> Matrix3<f64> {
    rotmt(gmst, 2)
}

/// Polar-motion matrix `R_pm` (ECEF → PEF) for pole offsets `(xp, yp)`.
///
/// Equivalent to
///
/// ```text
/// ⎡ cos xp          0        −sin xp        ⎤
/// ⎢ sin xp·sin yp   cos yp    cos xp·sin yp ⎥
/// ⎣ sin xp·cos yp  −sin yp    cos xp·cos yp ⎦
/// ```
///
/// which reduces to the identity when both angles are zero.
pub fn polar_motion_matrix(xp: Radian, yp: Radian) -> Matrix3<f64> {
    rotmt(-yp, 0) * rotmt(-xp, 1)
}

/// Rotate a TEME position into the Earth-fixed frame.
///
/// Arguments
/// ---------
/// * `position`: TEME position (km).
/// * `polar_motion_x`, `polar_motion_y`: pole offsets (radians); zero ignores polar wander.
/// * `jd_ut1`: Julian date (UT1) of the position.
/// * `length_of_day`: excess length of day (s). Only the velocity transform uses the
///   resulting rotation rate, it is accepted here to keep the signature symmetric with
///   [`teme_to_ecef_state`].
///
/// Return
/// ------
/// * `R_pmᵀ · R_stᵀ · position`, in km.
pub fn teme_to_ecef(
    position: &Vector3<f64>,
    polar_motion_x: Radian,
    polar_motion_y: Radian,
    jd_ut1: JulianDate,
    length_of_day: f64,
) -> Vector3<f64> {
    let eop = EarthOrientation {
        polar_motion_x,
        polar_motion_y,
        length_of_day,
    };
    teme_to_ecef_with(position, &eop, jd_ut1)
}

/// [`teme_to_ecef`] with grouped Earth orientation parameters.
pub fn teme_to_ecef_with(
    position: &Vector3<f64>,
    eop: &EarthOrientation,
    jd_ut1: JulianDate,
) -> Vector3<f64> {
    let st = sidereal_matrix(gmst(jd_ut1));
    let pm = polar_motion_matrix(eop.polar_motion_x, eop.polar_motion_y);
    pm.transpose() * (st.transpose() * position)
}

/// Rotate a full TEME state into the Earth-fixed frame.
///
/// The velocity picks up the transport term of the rotating frame:
///
/// ```text
/// r_pef = R_stᵀ·r            v_pef = R_stᵀ·v − ω × r_pef
/// r_ecef = R_pmᵀ·r_pef       v_ecef = R_pmᵀ·v_pef
/// ```
///
/// with `ω = (0, 0, ω⊕)` the LOD-adjusted rotation rate. A state already tagged
/// [`Frame::Ecef`] is returned unchanged.
pub fn teme_to_ecef_state(
    state: &StateVector,
    eop: &EarthOrientation,
    jd_ut1: JulianDate,
) -> StateVector {
    if state.frame == Frame::Ecef {
        return *state;
    }

    let st_t = sidereal_matrix(gmst(jd_ut1)).transpose();
    let pm_t = polar_motion_matrix(eop.polar_motion_x, eop.polar_motion_y).transpose();
    let omega = Vector3::new(0.0, 0.0, eop.rotation_rate());

    let r_pef = st_t * state.position;
    let v_pef = st_t * state.velocity - omega.cross(&r_pef);

    StateVector::new(pm_t * r_pef, pm_t * v_pef, Frame::Ecef)
}

/// Convert an Earth-fixed position into geodetic coordinates.
///
/// Arguments
/// ---------
/// * `position`: ECEF position (km).
/// * `_jd_ut1`: Julian date of the position. The ECEF vector already carries the Earth
///   rotation, so the date does not enter the inversion; it is kept for callers that
///   thread the sample time through the pipeline.
///
/// Return
/// ------
/// * [`GeodeticCoordinate`] with longitude in `(-π, π]`.
///
/// Remarks
/// -------
/// * On the polar axis (`√(x²+y²) < 1e-8` km) longitude is `±π/2` by the sign of `z`
///   and the latitude is `±π/2`.
/// * Near a pole (`π/2 − |φ| ≤ 1°`) the height uses `z/sin φ − C(1 − e²)` instead of
///   dividing by a vanishing `cos φ`.
/// * The zero vector maps to the equator, longitude 0, height `−a`.
pub fn ecef_to_geodetic(position: &Vector3<f64>, _jd_ut1: JulianDate) -> GeodeticCoordinate {
    let (x, y, z) = (position.x, position.y, position.z);
    let rho = (x * x + y * y).sqrt();
    let r = position.norm();

    if r == 0.0 {
        return GeodeticCoordinate {
            geocentric_latitude: 0.0,
            geodetic_latitude: 0.0,
            longitude: 0.0,
            height: -EARTH_EQUATORIAL_RADIUS,
        };
    }

    let longitude = if rho < POLAR_AXIS_THRESHOLD {
        sign(z) * FRAC_PI_2
    } else {
        normalize_longitude(y.atan2(x))
    };

    let (geodetic_latitude, curvature) = if rho < POLAR_AXIS_THRESHOLD {
        let lat = sign(z) * FRAC_PI_2;
        (lat, prime_vertical_radius(lat))
    } else {
        iterate_geodetic_latitude(z, rho, (z / r).asin())
    };

    let height = if FRAC_PI_2 - geodetic_latitude.abs() > RADEG {
        rho / geodetic_latitude.cos() - curvature
    } else {
        z / geodetic_latitude.sin() - curvature * (1.0 - EARTH_ECCENTRICITY_SQUARED)
    };

    GeodeticCoordinate {
        geocentric_latitude: geocentric_latitude(geodetic_latitude),
        geodetic_latitude,
        longitude,
        height,
    }
}

/// Earth-fixed position (km) of a point given its geodetic coordinates.
///
/// Standard ellipsoid forward formula:
///
/// ```text
/// x = (C + h)·cos φ·cos λ
/// y = (C + h)·cos φ·sin λ
/// z = (C(1 − e²) + h)·sin φ
/// ```
pub fn geodetic_to_ecef(
    geodetic_latitude: Radian,
    longitude: Radian,
    height: Kilometer,
) -> Vector3<f64> {
    let c = prime_vertical_radius(geodetic_latitude);
    let (sin_lat, cos_lat) = geodetic_latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Vector3::new(
        (c + height) * cos_lat * cos_lon,
        (c + height) * cos_lat * sin_lon,
        (c * (1.0 - EARTH_ECCENTRICITY_SQUARED) + height) * sin_lat,
    )
}

/// Geocentric latitude of a point on the ellipsoid with the given geodetic latitude.
pub fn geocentric_latitude(geodetic_latitude: Radian) -> Radian {
    ((1.0 - EARTH_ECCENTRICITY_SQUARED) * geodetic_latitude.tan()).atan()
}

/// Wrap a longitude into `(-π, π]`.
pub fn normalize_longitude(lon: Radian) -> Radian {
    if lon > -PI && lon <= PI {
        return lon;
    }
    let wrapped = lon.rem_euclid(DPI);
    if wrapped > PI {
        wrapped - DPI
    } else {
        wrapped
    }
}

/// Radius of curvature in the prime vertical, `C = a / √(1 − e² sin² φ)`.
fn prime_vertical_radius(lat: Radian) -> Kilometer {
    let s = lat.sin();
    EARTH_EQUATORIAL_RADIUS / (1.0 - EARTH_ECCENTRICITY_SQUARED * s * s).sqrt()
}

/// Fixed-point iteration on the geodetic latitude, seeded with `seed`.
///
/// Returns the latitude and the curvature radius evaluated at that latitude.
fn iterate_geodetic_latitude(z: f64, rho: f64, seed: Radian) -> (Radian, Kilometer) {
    let mut lat = seed;

    for _ in 0..GEODETIC_MAX_ITERATIONS {
        let previous = lat;
        let curvature = prime_vertical_radius(previous);
        lat = ((z + curvature * EARTH_ECCENTRICITY_SQUARED * previous.sin()) / rho).atan();
        if (lat - previous).abs() < GEODETIC_TOLERANCE {
            break;
        }
    }

    (lat, prime_vertical_radius(lat))
}

fn sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
