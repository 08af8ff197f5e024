//! # Live satellite position
//!
//! Single-instant counterpart of the ground-track sampler: where is the satellite now,
//! how high and how fast. Used to place the satellite marker over the globe.
//!
//! [`track_cluster`] does the same for a whole catalog, thinned by a [`Density`] level.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::constants::{JulianDate, Kilometer, Radian};
use crate::frame_transform::{ecef_to_geodetic, teme_to_ecef_with, EarthOrientation};
use crate::groundtrack_errors::GroundTrackError;
use crate::propagator::Propagator;

/// Sub-satellite point and kinematics at one instant.
///
/// Units
/// -----
/// * `latitude` (geodetic), `longitude`: radians, longitude in `(-π, π]`.
/// * `altitude`: km above the ellipsoid.
/// * `speed`: m/s, magnitude of the TEME (inertial) velocity.
/// * `render_direction`: unit vector toward the sub-satellite point in render space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatellitePosition {
    pub julian_date: JulianDate,
    pub latitude: Radian,
    pub longitude: Radian,
    pub altitude: Kilometer,
    pub speed: f64,
    pub render_direction: Vector3<f64>,
}

impl fmt::Display for SatellitePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JD {:.6}: lat {:.4}°, lon {:.4}°, alt {:.1} km, {:.0} m/s",
            self.julian_date,
            self.latitude.to_degrees(),
            self.longitude.to_degrees(),
            self.altitude,
            self.speed
        )
    }
}

/// Locate a satellite at an absolute Julian date.
///
/// Arguments
/// ---------
/// * `propagator`: source of TEME states.
/// * `jd`: Julian date (UT1) of the query.
/// * `eop`: Earth orientation parameters for the TEME → ECEF rotation.
///
/// Errors
/// ------
/// * Whatever [`Propagator::propagate`] reports, typically
///   [`GroundTrackError::PropagationFailed`]. Unlike the sampler there is no fallback.
pub fn track<P: Propagator + ?Sized>(
    propagator: &P,
    jd: JulianDate,
    eop: &EarthOrientation,
) -> Result<SatellitePosition, GroundTrackError> {
    let state = propagator.propagate_to(jd)?;
    let ecef = teme_to_ecef_with(&state.position, eop, jd);
    let geodetic = ecef_to_geodetic(&ecef, jd);

    let position = SatellitePosition {
        julian_date: jd,
        latitude: geodetic.geodetic_latitude,
        longitude: geodetic.longitude,
        altitude: geodetic.height,
        speed: state.speed() * 1000.0,
        render_direction: geodetic.render_direction(),
    };
    debug!(%position, "satellite position");
    Ok(position)
}

/// How much of a satellite catalog to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Density {
    All,
    High,
    #[default]
    Medium,
    Low,
    None,
}

impl Density {
    /// Share of the catalog kept at this level.
    pub fn fraction(self) -> f64 {
        match self {
            Density::All => 1.0,
            Density::High => 0.75,
            Density::Medium => 0.5,
            Density::Low => 0.25,
            Density::None => 0.0,
        }
    }

    /// Number of satellites kept out of `size`, rounded down.
    pub fn count(self, size: usize) -> usize {
        match self {
            Density::All => size,
            Density::None => 0,
            _ => (size as f64 * self.fraction()) as usize,
        }
    }

    /// Leading part of `items` kept at this level, in catalog order.
    pub fn subsample<T>(self, items: &[T]) -> &[T] {
        &items[..self.count(items.len())]
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Density::All => "all",
            Density::High => "high",
            Density::Medium => "medium",
            Density::Low => "low",
            Density::None => "none",
        };
        write!(f, "{name} ({:.0}%)", self.fraction() * 100.0)
    }
}

/// Locate the satellites of a catalog kept at a density level.
///
/// The first [`Density::count`] entries of `satellites` are tracked at `jd`. A satellite
/// whose propagation fails is left out of the result and logged at `debug`, so the
/// output may be shorter than the count.
pub fn track_cluster<P: Propagator>(
    satellites: &[P],
    density: Density,
    jd: JulianDate,
    eop: &EarthOrientation,
) -> Vec<SatellitePosition> {
    let kept = density.subsample(satellites);
    let positions: Vec<SatellitePosition> = kept
        .iter()
        .enumerate()
        .filter_map(|(index, satellite)| match track(satellite, jd, eop) {
            Ok(position) => Some(position),
            Err(error) => {
                debug!(index, %error, "satellite left out of cluster");
                None
            }
        })
        .collect();
    debug!(
        %density,
        catalog = satellites.len(),
        drawn = positions.len(),
        "cluster tracked"
    );
    positions
}
