use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GroundTrackError {
    #[error("Eccentricity must lie in [0, 1) for an elliptical orbit, got {0}")]
    InvalidEccentricity(f64),

    #[error("Semi-major axis must be strictly positive (km), got {0}")]
    InvalidSemiMajorAxis(f64),

    #[error("At least 2 samples are required to build an orbit path, got {0}")]
    InvalidSampleCount(usize),

    #[error("Mean motion must be strictly positive, got {0} rev/day")]
    InvalidMeanMotion(f64),

    #[error("Invalid sampler parameter: {0}")]
    InvalidSamplerParameter(String),

    #[error("Propagation failed at {minutes} min since epoch: {reason}")]
    PropagationFailed { minutes: f64, reason: String },

    #[error("Unable to initialise the propagator from TLE: {0}")]
    TleParsing(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl PartialEq for GroundTrackError {
    fn eq(&self, other: &Self) -> bool {
        use GroundTrackError::*;
        match (self, other) {
            // NaN inputs still compare equal on the variant
            (InvalidEccentricity(a), InvalidEccentricity(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (InvalidSemiMajorAxis(a), InvalidSemiMajorAxis(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (InvalidSampleCount(a), InvalidSampleCount(b)) => a == b,
            (InvalidMeanMotion(a), InvalidMeanMotion(b)) => a == b || (a.is_nan() && b.is_nan()),
            (InvalidSamplerParameter(a), InvalidSamplerParameter(b)) => a == b,
            (
                PropagationFailed {
                    minutes: m1,
                    reason: r1,
                },
                PropagationFailed {
                    minutes: m2,
                    reason: r2,
                },
            ) => m1 == m2 && r1 == r2,
            (TleParsing(a), TleParsing(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,

            _ => false,
        }
    }
}
