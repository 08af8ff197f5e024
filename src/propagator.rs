//! # Orbit propagators
//!
//! A [`Propagator`] turns a time offset (minutes since its own epoch) into a TEME state
//! vector. The ground-track sampler and the tracking helpers only depend on this trait.
//!
//! Two implementations are provided:
//!
//! - [`KeplerPropagator`]: unperturbed two-body motion from a set of
//!   [`OrbitalElements`]. Never fails, useful for analytic checks.
//! - [`Sgp4Propagator`]: the SGP4/SDP4 model driven by a Two-Line Element set, through
//!   the [`sgp4`] crate. Propagation may fail (decayed orbit, diverging elements); the
//!   error is surfaced as [`GroundTrackError::PropagationFailed`].

use std::fmt;

use nalgebra::Vector3;
use tracing::trace;

use crate::constants::{JulianDate, Minutes, DAYS_PER_JULIAN_YEAR, JD2000, MINUTES_PER_DAY};
use crate::groundtrack_errors::GroundTrackError;
use crate::kepler::KeplerSolver;
use crate::orbital_elements::OrbitalElements;
use crate::state::{Frame, StateVector};
use crate::time::minutes_since_epoch;

/// Bit-exact identity of a propagator's inputs.
///
/// `kind` tags the propagation model so that two models fed the same elements never
/// compare equal; `bits` holds every numeric input of the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub kind: &'static str,
    pub bits: Vec<u64>,
}

/// Source of TEME states for a single satellite.
pub trait Propagator {
    /// Epoch of the underlying element set (Julian date, UTC).
    fn epoch(&self) -> JulianDate;

    /// Mean motion in revolutions per day.
    fn revolutions_per_day(&self) -> f64;

    /// TEME state `minutes_since_epoch` minutes after [`Propagator::epoch`].
    fn propagate(&self, minutes_since_epoch: Minutes) -> Result<StateVector, GroundTrackError>;

    /// TEME state at an absolute Julian date.
    fn propagate_to(&self, jd: JulianDate) -> Result<StateVector, GroundTrackError> {
        self.propagate(minutes_since_epoch(jd, self.epoch()))
    }

    /// Classical elements describing the orbit at [`Propagator::epoch`].
    fn elements(&self) -> Result<OrbitalElements, GroundTrackError>;

    /// Identity of the model and of all its inputs, used as a cache key.
    fn fingerprint(&self) -> Fingerprint;

    /// Orbital period in minutes.
    fn period_minutes(&self) -> Minutes {
        MINUTES_PER_DAY / self.revolutions_per_day()
    }
}

impl<P: Propagator + ?Sized> Propagator for &P {
    fn epoch(&self) -> JulianDate {
        (**self).epoch()
    }

    fn revolutions_per_day(&self) -> f64 {
        (**self).revolutions_per_day()
    }

    fn propagate(&self, minutes_since_epoch: Minutes) -> Result<StateVector, GroundTrackError> {
        (**self).propagate(minutes_since_epoch)
    }

    fn elements(&self) -> Result<OrbitalElements, GroundTrackError> {
        (**self).elements()
    }

    fn fingerprint(&self) -> Fingerprint {
        (**self).fingerprint()
    }
}

/// Two-body propagator over a fixed set of osculating elements.
///
/// The mean anomaly advances linearly, `M(t) = M₀ + n·t`; the eccentric anomaly comes
/// from the configured [`KeplerSolver`] and the state is rotated from the perifocal
/// frame into TEME with [`OrbitalElements::perifocal_rotation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerPropagator {
    elements: OrbitalElements,
    solver: KeplerSolver,
}

impl KeplerPropagator {
    /// Build a propagator, rejecting non-elliptical or degenerate elements.
    pub fn new(elements: OrbitalElements) -> Result<Self, GroundTrackError> {
        Self::with_solver(elements, KeplerSolver::default())
    }

    pub fn with_solver(
        elements: OrbitalElements,
        solver: KeplerSolver,
    ) -> Result<Self, GroundTrackError> {
        elements.validate()?;
        Ok(KeplerPropagator { elements, solver })
    }
}

impl Propagator for KeplerPropagator {
    fn epoch(&self) -> JulianDate {
        self.elements.epoch
    }

    fn revolutions_per_day(&self) -> f64 {
        self.elements.revolutions_per_day()
    }

    fn propagate(&self, minutes_since_epoch: Minutes) -> Result<StateVector, GroundTrackError> {
        let elements = &self.elements;
        let mean_anomaly = elements.mean_anomaly + elements.mean_motion() * minutes_since_epoch;
        let ecc_anomaly = self.solver.solve(mean_anomaly, elements.eccentricity)?;

        let rotation = elements.perifocal_rotation();
        let position = rotation * elements.perifocal_position(ecc_anomaly);
        let velocity = rotation * elements.perifocal_velocity(ecc_anomaly);

        Ok(StateVector::new(position, velocity, Frame::Teme))
    }

    fn elements(&self) -> Result<OrbitalElements, GroundTrackError> {
        Ok(self.elements)
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut bits = self.elements.to_bits().to_vec();
        bits.push(self.solver.tolerance.to_bits());
        bits.push(self.solver.max_iterations as u64);
        Fingerprint {
            kind: "kepler",
            bits,
        }
    }
}

/// SGP4/SDP4 propagator initialised from a Two-Line Element set.
pub struct Sgp4Propagator {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
    epoch: JulianDate,
}

impl Sgp4Propagator {
    /// Parse a TLE and initialise the SGP4 model.
    ///
    /// Arguments
    /// ---------
    /// * `name`: optional object name (title line of a three-line set).
    /// * `line1`, `line2`: the two 69-column element lines.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::TleParsing`] if the lines are malformed or the elements
    ///   cannot initialise the model.
    pub fn from_tle(
        name: Option<&str>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, GroundTrackError> {
        let elements = sgp4::Elements::from_tle(
            name.map(str::to_owned),
            line1.trim_end().as_bytes(),
            line2.trim_end().as_bytes(),
        )
        .map_err(|e| GroundTrackError::TleParsing(e.to_string()))?;
        Self::from_elements(elements)
    }

    /// Initialise the SGP4 model from already-parsed elements.
    pub fn from_elements(elements: sgp4::Elements) -> Result<Self, GroundTrackError> {
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| GroundTrackError::TleParsing(e.to_string()))?;
        // sgp4 counts the epoch in Julian years since J2000 (UTC)
        let epoch = JD2000 + elements.epoch() * DAYS_PER_JULIAN_YEAR;
        Ok(Sgp4Propagator {
            elements,
            constants,
            epoch,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.elements.object_name.as_deref()
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Raw mean elements as parsed from the TLE.
    pub fn tle_elements(&self) -> &sgp4::Elements {
        &self.elements
    }
}

impl fmt::Debug for Sgp4Propagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sgp4Propagator")
            .field("name", &self.elements.object_name)
            .field("norad_id", &self.elements.norad_id)
            .field("epoch", &self.epoch)
            .field("mean_motion", &self.elements.mean_motion)
            .finish()
    }
}

impl Propagator for Sgp4Propagator {
    fn epoch(&self) -> JulianDate {
        self.epoch
    }

    fn revolutions_per_day(&self) -> f64 {
        self.elements.mean_motion
    }

    fn propagate(&self, minutes_since_epoch: Minutes) -> Result<StateVector, GroundTrackError> {
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))
            .map_err(|e| GroundTrackError::PropagationFailed {
                minutes: minutes_since_epoch,
                reason: e.to_string(),
            })?;

        trace!(
            minutes = minutes_since_epoch,
            x = prediction.position[0],
            y = prediction.position[1],
            z = prediction.position[2],
            "sgp4 state"
        );

        Ok(StateVector::new(
            Vector3::from(prediction.position),
            Vector3::from(prediction.velocity),
            Frame::Teme,
        ))
    }

    /// Classical elements at the TLE epoch in this crate's units.
    ///
    /// The TLE carries Kozai mean elements; the semi-major axis is recovered from the
    /// mean motion with Kepler's third law. Good enough for drawing the orbit ellipse,
    /// not for precise state reconstruction.
    fn elements(&self) -> Result<OrbitalElements, GroundTrackError> {
        let tle = &self.elements;
        let elements = OrbitalElements {
            semi_major_axis: OrbitalElements::semi_major_axis_from_mean_motion(tle.mean_motion)?,
            eccentricity: tle.eccentricity,
            inclination: tle.inclination.to_radians(),
            periapsis_argument: tle.argument_of_perigee.to_radians(),
            ascending_node_longitude: tle.right_ascension.to_radians(),
            mean_anomaly: tle.mean_anomaly.to_radians(),
            epoch: self.epoch,
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Covers the whole TLE record, drag and mean-motion derivatives included.
    fn fingerprint(&self) -> Fingerprint {
        let tle = &self.elements;
        Fingerprint {
            kind: "sgp4",
            bits: vec![
                tle.norad_id,
                self.epoch.to_bits(),
                tle.mean_motion_dot.to_bits(),
                tle.mean_motion_ddot.to_bits(),
                tle.drag_term.to_bits(),
                tle.inclination.to_bits(),
                tle.right_ascension.to_bits(),
                tle.eccentricity.to_bits(),
                tle.argument_of_perigee.to_bits(),
                tle.mean_anomaly.to_bits(),
                tle.mean_motion.to_bits(),
                tle.element_set_number as u64,
                tle.revolution_number as u64,
                tle.ephemeris_type as u64,
            ],
        }
    }
}

#[cfg(test)]
mod propagator_test {
    use super::*;
    use crate::constants::EARTH_MU;
    use crate::orbital_elements::test_orbital_elements::iss_like;
    use approx::assert_relative_eq;

    #[test]
    fn test_kepler_propagator_at_epoch() {
        let elements = OrbitalElements {
            eccentricity: 0.1,
            semi_major_axis: 8_000.0,
            ..iss_like()
        };
        let propagator = KeplerPropagator::new(elements).unwrap();
        let state = propagator.propagate(0.0).unwrap();

        let ecc_anomaly = crate::kepler::solve_kepler(elements.mean_anomaly, 0.1).unwrap();
        assert_relative_eq!(state.position, elements.position_at(ecc_anomaly), epsilon = 1e-9);
        assert_eq!(state.frame, Frame::Teme);
    }

    #[test]
    fn test_kepler_propagator_is_periodic() {
        let propagator = KeplerPropagator::new(iss_like()).unwrap();
        let period = propagator.period_minutes();

        let s0 = propagator.propagate(12.0).unwrap();
        let s1 = propagator.propagate(12.0 + period).unwrap();
        assert_relative_eq!(s0.position, s1.position, epsilon = 1e-6);
        assert_relative_eq!(s0.velocity, s1.velocity, epsilon = 1e-9);
    }

    #[test]
    fn test_kepler_propagator_energy() {
        let elements = OrbitalElements {
            eccentricity: 0.3,
            semi_major_axis: 12_000.0,
            ..iss_like()
        };
        let propagator = KeplerPropagator::new(elements).unwrap();
        let expected = -EARTH_MU / (2.0 * elements.semi_major_axis);

        for t in [0.0, 17.0, 60.0, 133.3] {
            let s = propagator.propagate(t).unwrap();
            let energy = 0.5 * s.speed().powi(2) - EARTH_MU / s.radius();
            assert_relative_eq!(energy, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_propagate_to_uses_epoch() {
        let propagator = KeplerPropagator::new(iss_like()).unwrap();
        let jd = iss_like().epoch + 0.25;
        assert_eq!(
            propagator.propagate_to(jd).unwrap(),
            propagator.propagate(360.0).unwrap()
        );
    }

    #[test]
    fn test_kepler_propagator_rejects_bad_elements() {
        let elements = OrbitalElements {
            eccentricity: 1.0,
            ..iss_like()
        };
        assert_eq!(
            KeplerPropagator::new(elements),
            Err(GroundTrackError::InvalidEccentricity(1.0))
        );
    }

    #[test]
    fn test_kepler_fingerprint() {
        let a = KeplerPropagator::new(iss_like()).unwrap();
        assert_eq!(a.fingerprint(), a.fingerprint());
        assert_eq!(a.fingerprint().kind, "kepler");

        let nudged = OrbitalElements {
            mean_anomaly: iss_like().mean_anomaly + 1e-12,
            ..iss_like()
        };
        let b = KeplerPropagator::new(nudged).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());

        let coarse = KeplerPropagator::with_solver(iss_like(), KeplerSolver::new(1e-6, 5)).unwrap();
        assert_ne!(a.fingerprint(), coarse.fingerprint());
    }

    #[test]
    fn test_sgp4_rejects_garbage() {
        let res = Sgp4Propagator::from_tle(None, "1 not a tle", "2 not a tle");
        assert!(matches!(res, Err(GroundTrackError::TleParsing(_))));
    }
}
