pub mod constants;
pub mod frame_transform;
pub mod groundtrack_errors;
pub mod kepler;
pub mod orbital_elements;
pub mod propagator;
pub mod sampler;
pub mod state;
pub mod time;
pub mod tracking;

pub use groundtrack_errors::GroundTrackError;
pub use propagator::{KeplerPropagator, Propagator, Sgp4Propagator};
pub use sampler::{CachedSampler, GroundTrack, OrbitSampler, SamplerParams};
