use approx::assert_abs_diff_eq;
use groundtrack::frame_transform::EarthOrientation;
use groundtrack::orbital_elements::OrbitalElements;
use groundtrack::time::julian_date;
use groundtrack::tracking::track;
use groundtrack::{CachedSampler, GroundTrackError, OrbitSampler, Propagator, Sgp4Propagator};

mod common;
use common::{assert_elements_close, iss, iss_high_drag};

#[test]
fn test_iss_tle_epoch_and_elements() {
    let propagator = iss();
    assert_eq!(propagator.name(), Some("ISS (ZARYA)"));
    assert_eq!(propagator.norad_id(), 25544);

    // 2020 day 194.88612269 UTC
    let expected_epoch = julian_date(2020, 1, 1, 0, 0, 0.0).unwrap() + 193.886_122_69;
    assert_abs_diff_eq!(propagator.epoch(), expected_epoch, epsilon = 1e-6);
    assert_abs_diff_eq!(propagator.revolutions_per_day(), 15.495_078_96, epsilon = 1e-9);

    let elements = propagator.elements().unwrap();
    let a = OrbitalElements::semi_major_axis_from_mean_motion(15.495_078_96).unwrap();
    let expected = OrbitalElements {
        semi_major_axis: a,
        eccentricity: 0.000_141_3,
        inclination: 51.6461_f64.to_radians(),
        periapsis_argument: 89.1723_f64.to_radians(),
        ascending_node_longitude: 221.2784_f64.to_radians(),
        mean_anomaly: 280.4612_f64.to_radians(),
        epoch: propagator.epoch(),
    };
    assert_elements_close(&elements, &expected, 1e-9);
    assert!(elements.semi_major_axis > 6_780.0 && elements.semi_major_axis < 6_810.0);
}

#[test]
fn test_iss_ground_track() {
    let propagator = iss();
    let sampler = OrbitSampler::default();
    let track = sampler
        .sample_ground_track(&propagator, propagator.epoch(), 120)
        .unwrap();

    assert_eq!(track.len(), 120);
    assert_eq!(track.skipped(), 0);

    let max_lat = track
        .samples
        .iter()
        .map(|s| s.geodetic.geodetic_latitude.to_degrees())
        .fold(f64::MIN, f64::max);
    assert!(max_lat > 51.0 && max_lat < 52.0, "max latitude {max_lat}");

    for s in &track.samples {
        assert!(
            s.geodetic.height > 380.0 && s.geodetic.height < 460.0,
            "altitude {}",
            s.geodetic.height
        );
    }

    // One revolution later the satellite crosses the same latitude band
    let first = track.samples.first().unwrap().geodetic.geodetic_latitude;
    let last = track.samples.last().unwrap().geodetic.geodetic_latitude;
    assert_abs_diff_eq!(first, last, epsilon = 1.5_f64.to_radians());
}

#[test]
fn test_iss_live_position() {
    let propagator = iss();
    let jd = propagator.epoch() + 1.0 / 24.0;
    let position = track(&propagator, jd, &EarthOrientation::default()).unwrap();

    assert!((position.speed - 7_660.0).abs() < 40.0, "speed {}", position.speed);
    assert!(position.latitude.abs() <= 52.0_f64.to_radians());
    assert!(position.altitude > 380.0 && position.altitude < 460.0);
}

#[test]
fn test_iss_ellipse_matches_propagated_radius() {
    let propagator = iss();
    let elements = propagator.elements().unwrap();
    let path = OrbitSampler::default()
        .sample_ellipse(&elements, 180)
        .unwrap();

    let state = propagator.propagate(0.0).unwrap();
    let r_min = path.points.iter().map(|p| p.norm()).fold(f64::MAX, f64::min);
    let r_max = path.points.iter().map(|p| p.norm()).fold(f64::MIN, f64::max);

    // SGP4 osculating radius stays within a few km of the mean ellipse
    assert!(state.radius() > r_min - 20.0 && state.radius() < r_max + 20.0);
}

#[test]
fn test_cached_sampler_with_sgp4() {
    let propagator = iss();
    let mut cache = CachedSampler::default();
    let start = propagator.epoch() + 0.25;

    let first = cache
        .sample_ground_track(&propagator, start, 64)
        .unwrap()
        .clone();
    let second = cache
        .sample_ground_track(&propagator, start, 64)
        .unwrap()
        .clone();
    assert_eq!(first, second);
}

#[test]
fn test_cached_sampler_sees_drag_term() {
    let low_drag = iss();
    let high_drag = iss_high_drag();
    assert_eq!(low_drag.elements(), high_drag.elements());
    assert_ne!(low_drag.fingerprint(), high_drag.fingerprint());

    let sampler = OrbitSampler::default();
    let start = low_drag.epoch() + 0.25;
    let direct_low = sampler.sample_ground_track(&low_drag, start, 64).unwrap();
    let direct_high = sampler.sample_ground_track(&high_drag, start, 64).unwrap();
    assert_ne!(direct_low, direct_high);

    let mut cache = CachedSampler::default();
    cache.sample_ground_track(&low_drag, start, 64).unwrap();
    let cached_high = cache
        .sample_ground_track(&high_drag, start, 64)
        .unwrap()
        .clone();
    assert_eq!(cached_high, direct_high);
    assert_ne!(cached_high, direct_low);
}

#[test]
fn test_malformed_tle() {
    let line2_truncated = "2 25544  51.6461 221.2784";
    let result = Sgp4Propagator::from_tle(None, common::ISS_LINE1, line2_truncated);
    assert!(matches!(result, Err(GroundTrackError::TleParsing(_))));
}
