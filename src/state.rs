//! # State and path value types
//!
//! Transient value objects exchanged between the solver, the frame transforms and the
//! samplers. Every type here is `Copy` or cheaply clonable and carries no shared state:
//! each call produces fresh values.
//!
//! ## Render space
//!
//! The host renders with a **y-up** convention: its `(x, y, z)` axes correspond to the
//! `(y, z, x)` axes of the physical frames used here (equatorial plane spanned by the
//! render `z`/`x` axes, north pole along render `y`). [`to_render_space`] applies this
//! permutation and rescales kilometers so that one Earth equatorial radius maps to a
//! caller-chosen number of render units.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{Kilometer, Radian, EARTH_EQUATORIAL_RADIUS};

/// Reference frame a Cartesian vector is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    /// True Equator, Mean Equinox (pseudo-inertial, native SGP4 output)
    Teme,
    /// Earth-Centered, Earth-Fixed
    Ecef,
}

/// Position/velocity pair tagged with its frame.
///
/// Units
/// -----
/// * `position`: km
/// * `velocity`: km/s
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub frame: Frame,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, frame: Frame) -> Self {
        StateVector {
            position,
            velocity,
            frame,
        }
    }

    /// Distance from the Earth's center (km).
    pub fn radius(&self) -> Kilometer {
        self.position.norm()
    }

    /// Speed in km/s.
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Geodetic position of a point relative to the reference ellipsoid.
///
/// Units
/// -----
/// * latitudes and longitude: radians, longitude in `(-π, π]`
/// * `height`: km above the ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    pub geocentric_latitude: Radian,
    pub geodetic_latitude: Radian,
    pub longitude: Radian,
    pub height: Kilometer,
}

impl GeodeticCoordinate {
    /// Unit direction of the point on a sphere, in render space.
    ///
    /// `x = cos φ·sin λ`, `y = sin φ`, `z = cos φ·cos λ` with φ the geodetic latitude.
    pub fn render_direction(&self) -> Vector3<f64> {
        let (sin_lat, cos_lat) = self.geodetic_latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        Vector3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
    }
}

impl fmt::Display for GeodeticCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat = {:.6}° (geocentric {:.6}°), lon = {:.6}°, h = {:.3} km",
            self.geodetic_latitude.to_degrees(),
            self.geocentric_latitude.to_degrees(),
            self.longitude.to_degrees(),
            self.height
        )
    }
}

/// Ordered, discretized orbital path.
///
/// `points` are Cartesian positions in km expressed in `frame`, in sampling order.
/// `skipped` counts the samples dropped because the propagator could not produce a
/// state; no substitute point is ever inserted for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    pub frame: Frame,
    pub points: Vec<Vector3<f64>>,
    pub skipped: usize,
}

impl PathSample {
    pub fn new(frame: Frame) -> Self {
        PathSample {
            frame,
            points: Vec::new(),
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points mapped into render space, see [`to_render_space`].
    pub fn to_render_space(&self, earth_radius_units: f64) -> Vec<Vector3<f64>> {
        self.points
            .iter()
            .map(|p| to_render_space(p, earth_radius_units))
            .collect()
    }
}

/// Map a physical-frame point (km) to the host's y-up render space.
///
/// Arguments
/// ---------
/// * `point`: Cartesian position in km (TEME or ECEF).
/// * `earth_radius_units`: render units per Earth equatorial radius.
///
/// Return
/// ------
/// * `(y, z, x)` of the input, scaled by `earth_radius_units / EARTH_EQUATORIAL_RADIUS`.
pub fn to_render_space(point: &Vector3<f64>, earth_radius_units: f64) -> Vector3<f64> {
    let scale = earth_radius_units / EARTH_EQUATORIAL_RADIUS;
    Vector3::new(point.y, point.z, point.x) * scale
}
