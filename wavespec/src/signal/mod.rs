//! Waveform synthesis and spectrum analysis.

pub mod traits;
pub mod wave;

#[cfg(feature = "std")]
pub mod spectral;
