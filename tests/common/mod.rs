#![allow(dead_code)]

use approx::assert_relative_eq;
use groundtrack::orbital_elements::OrbitalElements;
use groundtrack::Sgp4Propagator;

pub const ISS_NAME: &str = "ISS (ZARYA)";
pub const ISS_LINE1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
/// Same set with the drag term raised a hundredfold.
pub const ISS_HIGH_DRAG_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-2 0  9990";
pub const ISS_LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

pub fn iss() -> Sgp4Propagator {
    Sgp4Propagator::from_tle(Some(ISS_NAME), ISS_LINE1, ISS_LINE2).unwrap()
}

pub fn iss_high_drag() -> Sgp4Propagator {
    Sgp4Propagator::from_tle(Some(ISS_NAME), ISS_HIGH_DRAG_LINE1, ISS_LINE2).unwrap()
}

pub fn molniya() -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: 26_600.0,
        eccentricity: 0.74,
        inclination: 63.4_f64.to_radians(),
        periapsis_argument: 270.0_f64.to_radians(),
        ascending_node_longitude: 1.0,
        mean_anomaly: 0.0,
        epoch: 2_459_215.5,
    }
}

pub fn assert_elements_close(actual: &OrbitalElements, expected: &OrbitalElements, epsilon: f64) {
    assert_relative_eq!(actual.epoch, expected.epoch, epsilon = epsilon);
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity,
        expected.eccentricity,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    assert_relative_eq!(
        actual.ascending_node_longitude,
        expected.ascending_node_longitude,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.periapsis_argument,
        expected.periapsis_argument,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.mean_anomaly,
        expected.mean_anomaly,
        epsilon = epsilon
    );
}
