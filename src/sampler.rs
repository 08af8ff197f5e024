//! # Orbit path sampling
//!
//! Discretizes an orbit into an ordered list of points for rendering. Two independent
//! strategies are offered by [`OrbitSampler`]:
//!
//! 1. **Element-space ellipse** ([`OrbitSampler::sample_ellipse`]): the osculating
//!    ellipse drawn from the classical elements alone, uniformly spaced in mean anomaly.
//!    No propagator is involved and the points stay in the inertial (TEME) frame.
//! 2. **Time-propagated ground track** ([`OrbitSampler::sample_ground_track`]): the
//!    propagator is queried over exactly one orbital period, each state is rotated into
//!    the Earth-fixed frame and converted to geodetic coordinates.
//!
//! Both are deterministic: the only time input is the explicit start date.
//!
//! [`CachedSampler`] keeps the last result of each strategy and recomputes only when
//! an input changes.
//!
//! ## Configuration
//!
//! [`SamplerParams`] groups the Kepler solver precision, the Earth orientation
//! parameters and the longitude-drift policy. Build it with [`SamplerParams::builder`]:
//!
//! ```rust
//! use groundtrack::sampler::{OrbitSampler, SamplerParams};
//!
//! let params = SamplerParams::builder()
//!     .kepler_tolerance(1e-12)
//!     .correct_longitude_drift(true)
//!     .build()
//!     .unwrap();
//! let sampler = OrbitSampler::new(params);
//! ```

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{
    JulianDate, Minutes, DAYS_PER_MINUTE, DPI, MINUTES_PER_DAY, SECONDS_PER_DAY,
};
use crate::frame_transform::{
    ecef_to_geodetic, geodetic_to_ecef, normalize_longitude, teme_to_ecef_with,
    EarthOrientation,
};
use crate::groundtrack_errors::GroundTrackError;
use crate::kepler::KeplerSolver;
use crate::orbital_elements::OrbitalElements;
use crate::propagator::{Fingerprint, Propagator};
use crate::state::{Frame, GeodeticCoordinate, PathSample};
use crate::time::minutes_since_epoch;

/// Configuration shared by both sampling strategies.
///
/// * `kepler`: precision of the eccentric-anomaly solver.
/// * `earth_orientation`: polar motion and length-of-day used by the TEME → ECEF step.
/// * `correct_longitude_drift`: when `true`, each ground-track longitude is advanced by
///   the Earth rotation accumulated since the first sample (`ω⊕ · Δt`), which pins the
///   track to the Earth orientation at the start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerParams {
    pub kepler: KeplerSolver,
    pub earth_orientation: EarthOrientation,
    pub correct_longitude_drift: bool,
}

impl SamplerParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`SamplerParamsBuilder`] initialised with the defaults.
    pub fn builder() -> SamplerParamsBuilder {
        SamplerParamsBuilder::new()
    }
}

impl Default for SamplerParams {
    fn default() -> Self {
        SamplerParams {
            kepler: KeplerSolver::default(),
            earth_orientation: EarthOrientation::default(),
            correct_longitude_drift: false,
        }
    }
}

impl fmt::Display for SamplerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sampler Parameters")?;
        writeln!(f, "------------------")?;
        writeln!(f, "  kepler_tolerance        = {:e}", self.kepler.tolerance)?;
        writeln!(f, "  kepler_max_iterations   = {}", self.kepler.max_iterations)?;
        writeln!(
            f,
            "  polar_motion (xp, yp)   = ({:e}, {:e}) rad",
            self.earth_orientation.polar_motion_x, self.earth_orientation.polar_motion_y
        )?;
        writeln!(
            f,
            "  length_of_day           = {} s",
            self.earth_orientation.length_of_day
        )?;
        write!(
            f,
            "  correct_longitude_drift = {}",
            self.correct_longitude_drift
        )
    }
}

/// Builder for [`SamplerParams`], with validation.
#[derive(Debug, Clone)]
pub struct SamplerParamsBuilder {
    params: SamplerParams,
}

impl Default for SamplerParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: SamplerParams::default(),
        }
    }

    // --- Kepler solver ---
    pub fn kepler_tolerance(mut self, v: f64) -> Self {
        self.params.kepler.tolerance = v;
        self
    }
    pub fn kepler_max_iterations(mut self, v: usize) -> Self {
        self.params.kepler.max_iterations = v;
        self
    }

    // --- Earth orientation ---
    pub fn earth_orientation(mut self, v: EarthOrientation) -> Self {
        self.params.earth_orientation = v;
        self
    }
    pub fn polar_motion(mut self, xp: f64, yp: f64) -> Self {
        self.params.earth_orientation.polar_motion_x = xp;
        self.params.earth_orientation.polar_motion_y = yp;
        self
    }
    pub fn length_of_day(mut self, v: f64) -> Self {
        self.params.earth_orientation.length_of_day = v;
        self
    }

    // --- Ground track ---
    pub fn correct_longitude_drift(mut self, v: bool) -> Self {
        self.params.correct_longitude_drift = v;
        self
    }

    /// Validate and produce the [`SamplerParams`].
    ///
    /// Rules
    /// -----
    /// * `kepler_tolerance` finite and `> 0`.
    /// * `kepler_max_iterations >= 1`.
    /// * polar motion angles finite.
    /// * `length_of_day` finite with `|lod| < 86400 s`.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::InvalidSamplerParameter`] naming the first failed rule.
    pub fn build(self) -> Result<SamplerParams, GroundTrackError> {
        let p = &self.params;

        if !(p.kepler.tolerance.is_finite() && p.kepler.tolerance > 0.0) {
            return Err(GroundTrackError::InvalidSamplerParameter(
                "kepler_tolerance must be > 0".into(),
            ));
        }
        if p.kepler.max_iterations == 0 {
            return Err(GroundTrackError::InvalidSamplerParameter(
                "kepler_max_iterations must be >= 1".into(),
            ));
        }

        let eop = &p.earth_orientation;
        if !(eop.polar_motion_x.is_finite() && eop.polar_motion_y.is_finite()) {
            return Err(GroundTrackError::InvalidSamplerParameter(
                "polar motion angles must be finite".into(),
            ));
        }
        if !(eop.length_of_day.is_finite() && eop.length_of_day.abs() < SECONDS_PER_DAY) {
            return Err(GroundTrackError::InvalidSamplerParameter(
                "length_of_day must be finite and shorter than a day".into(),
            ));
        }

        Ok(self.params)
    }
}

/// One geodetic sample of a ground track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTrackPoint {
    /// Time offset of the sample from the propagator epoch.
    pub minutes_since_epoch: Minutes,
    pub julian_date: JulianDate,
    pub geodetic: GeodeticCoordinate,
}

/// Result of [`OrbitSampler::sample_ground_track`].
///
/// `samples` and `path.points` are parallel: the i-th ECEF point is the i-th geodetic
/// sample mapped back onto the ellipsoid (after drift correction, if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTrack {
    pub samples: Vec<GroundTrackPoint>,
    pub path: PathSample,
}

impl GroundTrack {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples dropped because the propagator failed.
    pub fn skipped(&self) -> usize {
        self.path.skipped
    }

    /// Track points in render space, see [`crate::state::to_render_space`].
    pub fn render_points(&self, earth_radius_units: f64) -> Vec<Vector3<f64>> {
        self.path.to_render_space(earth_radius_units)
    }
}

/// Stateless orbit discretizer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitSampler {
    params: SamplerParams,
}

impl OrbitSampler {
    pub fn new(params: SamplerParams) -> Self {
        OrbitSampler { params }
    }

    pub fn params(&self) -> &SamplerParams {
        &self.params
    }

    /// Sample the osculating ellipse of a set of elements.
    ///
    /// Arguments
    /// ---------
    /// * `elements`: classical elements, `e ∈ [0, 1)`, `a > 0`.
    /// * `points`: number of samples, at least 2.
    ///
    /// Return
    /// ------
    /// * A [`PathSample`] in [`Frame::Teme`] with exactly `points` positions (km). The
    ///   mean anomaly steps by `2π / points` from 0, so the loop is open: the first point
    ///   is not repeated at the end.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::InvalidSampleCount`] if `points < 2`.
    /// * [`GroundTrackError::InvalidEccentricity`] / [`GroundTrackError::InvalidSemiMajorAxis`]
    ///   for degenerate elements.
    pub fn sample_ellipse(
        &self,
        elements: &OrbitalElements,
        points: usize,
    ) -> Result<PathSample, GroundTrackError> {
        if points < 2 {
            return Err(GroundTrackError::InvalidSampleCount(points));
        }
        elements.validate()?;

        let rotation = elements.perifocal_rotation();
        let step = DPI / points as f64;

        let mut path = PathSample::new(Frame::Teme);
        path.points.reserve(points);
        for k in 0..points {
            let mean_anomaly = k as f64 * step;
            let ecc_anomaly = self.params.kepler.solve(mean_anomaly, elements.eccentricity)?;
            path.points.push(rotation * elements.perifocal_position(ecc_anomaly));
        }

        Ok(path)
    }

    /// Sample the ground track of a propagated orbit over one period.
    ///
    /// Arguments
    /// ---------
    /// * `propagator`: source of TEME states.
    /// * `start_jd`: Julian date (UT1) of the first sample.
    /// * `points`: number of samples, at least 2.
    ///
    /// Return
    /// ------
    /// * A [`GroundTrack`]. Sample `k` is taken `k · T / (points − 1)` minutes after
    ///   `start_jd`, with `T` the period from the propagator's mean motion, so the first
    ///   and last samples are one full revolution apart.
    ///
    /// Remarks
    /// -------
    /// * A sample whose propagation fails is dropped and counted in
    ///   [`GroundTrack::skipped`]; sampling continues with the next offset.
    /// * With [`SamplerParams::correct_longitude_drift`] the longitude of each sample is
    ///   advanced by `ω⊕ · Δt`, `Δt` being the seconds elapsed since `start_jd`.
    ///
    /// Errors
    /// ------
    /// * [`GroundTrackError::InvalidSampleCount`] if `points < 2`.
    /// * [`GroundTrackError::InvalidMeanMotion`] if the propagator reports a non-positive
    ///   or non-finite mean motion.
    pub fn sample_ground_track<P: Propagator + ?Sized>(
        &self,
        propagator: &P,
        start_jd: JulianDate,
        points: usize,
    ) -> Result<GroundTrack, GroundTrackError> {
        if points < 2 {
            return Err(GroundTrackError::InvalidSampleCount(points));
        }
        let revolutions_per_day = propagator.revolutions_per_day();
        if !(revolutions_per_day.is_finite() && revolutions_per_day > 0.0) {
            return Err(GroundTrackError::InvalidMeanMotion(revolutions_per_day));
        }

        let period = MINUTES_PER_DAY / revolutions_per_day;
        let step = period / (points - 1) as f64;
        let start_offset = minutes_since_epoch(start_jd, propagator.epoch());
        let eop = &self.params.earth_orientation;
        let rotation_rate = eop.rotation_rate();

        let mut samples = Vec::with_capacity(points);
        let mut path = PathSample::new(Frame::Ecef);
        path.points.reserve(points);

        for k in 0..points {
            let elapsed = k as f64 * step;
            let minutes = start_offset + elapsed;
            let julian_date = start_jd + elapsed * DAYS_PER_MINUTE;

            let state = match propagator.propagate(minutes) {
                Ok(state) => state,
                Err(err) => {
                    debug!(sample = k, minutes, error = %err, "skipping ground-track sample");
                    path.skipped += 1;
                    continue;
                }
            };

            let ecef = teme_to_ecef_with(&state.position, eop, julian_date);
            let mut geodetic = ecef_to_geodetic(&ecef, julian_date);
            if self.params.correct_longitude_drift {
                geodetic.longitude =
                    normalize_longitude(geodetic.longitude + rotation_rate * elapsed * 60.0);
            }

            trace!(sample = k, minutes, %geodetic, "ground-track sample");

            path.points.push(geodetic_to_ecef(
                geodetic.geodetic_latitude,
                geodetic.longitude,
                geodetic.height,
            ));
            samples.push(GroundTrackPoint {
                minutes_since_epoch: minutes,
                julian_date,
                geodetic,
            });
        }

        if path.skipped > 0 {
            debug!(
                skipped = path.skipped,
                kept = samples.len(),
                "ground track sampled with missing points"
            );
        }

        Ok(GroundTrack { samples, path })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Strategy {
    Ellipse,
    GroundTrack,
}

/// Bit-exact fingerprint of the inputs of one sampling call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SampleKey {
    strategy: Strategy,
    source: Fingerprint,
    start: u64,
    points: usize,
    correct_longitude_drift: bool,
}

impl SampleKey {
    fn new(
        strategy: Strategy,
        source: Fingerprint,
        start: JulianDate,
        points: usize,
        correct_longitude_drift: bool,
    ) -> Self {
        SampleKey {
            strategy,
            source,
            start: start.to_bits(),
            points,
            correct_longitude_drift,
        }
    }
}

/// [`OrbitSampler`] that remembers the last result of each strategy.
///
/// A call with the same inputs as the previous one returns the stored path; any change
/// of elements, propagation model, start time, point count or drift policy recomputes
/// it. One slot per strategy, owned by a single caller.
#[derive(Debug, Clone, Default)]
pub struct CachedSampler {
    sampler: OrbitSampler,
    ellipse: Option<(SampleKey, PathSample)>,
    ground_track: Option<(SampleKey, GroundTrack)>,
}

impl CachedSampler {
    pub fn new(sampler: OrbitSampler) -> Self {
        CachedSampler {
            sampler,
            ellipse: None,
            ground_track: None,
        }
    }

    pub fn sampler(&self) -> &OrbitSampler {
        &self.sampler
    }

    /// Drop both cached results.
    pub fn invalidate(&mut self) {
        self.ellipse = None;
        self.ground_track = None;
    }

    /// Cached [`OrbitSampler::sample_ellipse`].
    pub fn sample_ellipse(
        &mut self,
        elements: &OrbitalElements,
        points: usize,
    ) -> Result<&PathSample, GroundTrackError> {
        let source = Fingerprint {
            kind: "elements",
            bits: elements.to_bits().to_vec(),
        };
        let key = SampleKey::new(Strategy::Ellipse, source, elements.epoch, points, false);

        let path = match self.ellipse.take() {
            Some((cached_key, path)) if cached_key == key => {
                debug!(points, "orbit ellipse cache hit");
                path
            }
            _ => {
                debug!(points, "orbit ellipse cache miss");
                self.sampler.sample_ellipse(elements, points)?
            }
        };

        let (_, path) = self.ellipse.insert((key, path));
        Ok(path)
    }

    /// Cached [`OrbitSampler::sample_ground_track`].
    ///
    /// The propagator is identified by its [`Propagator::fingerprint`].
    pub fn sample_ground_track<P: Propagator + ?Sized>(
        &mut self,
        propagator: &P,
        start_jd: JulianDate,
        points: usize,
    ) -> Result<&GroundTrack, GroundTrackError> {
        let key = SampleKey::new(
            Strategy::GroundTrack,
            propagator.fingerprint(),
            start_jd,
            points,
            self.sampler.params.correct_longitude_drift,
        );

        let track = match self.ground_track.take() {
            Some((cached_key, track)) if cached_key == key => {
                debug!(points, start_jd, "ground track cache hit");
                track
            }
            _ => {
                debug!(points, start_jd, "ground track cache miss");
                self.sampler.sample_ground_track(propagator, start_jd, points)?
            }
        };

        let (_, track) = self.ground_track.insert((key, track));
        Ok(track)
    }
}
