//! Periodic waveform synthesis and magnitude spectra.
//!
//! `wavespec` generates sampled sine, square, triangle and sawtooth signals
//! from closed-form expressions and computes their one-sided magnitude
//! spectrum with a zero-padded radix-2 FFT.
//!
//! ```
//! use wavespec::signal::spectral::spectrum;
//! use wavespec::signal::wave::{generate, SignalParameters, Waveform};
//!
//! let params = SignalParameters {
//!     amplitude: 1.0,
//!     frequency: 10.0,
//!     phase: 0.0,
//!     sample_rate: 100.0,
//!     duration: 1.0,
//! };
//! let samples = generate(Waveform::Sine, &params)?;
//! assert_eq!(samples.len(), 100);
//!
//! let result = spectrum(&samples, params.sample_rate)?;
//! assert_eq!(result.padded_len, 128);
//! assert_eq!(result.len(), 64);
//! # Ok::<(), wavespec::error::Error>(())
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod kernel;
pub mod signal;

#[cfg(feature = "plot")]
pub mod plot;

pub use nalgebra as na;
