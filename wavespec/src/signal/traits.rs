//! Trait interfaces for signal-processing capabilities.
//!
//! Kernels are built through [`KernelLifecycle`](crate::kernel::KernelLifecycle)
//! and then run through one of these traits, either into a caller-provided
//! buffer (`run_into`) or into a freshly allocated one (`run_alloc`).

use crate::kernel::{bind_output, ExecInvariantViolation, Read1D, Write1D};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// 1D periodic-waveform generation capability.
///
/// Each output sample depends only on its own time instant, so generators
/// carry no state between samples.
pub trait PeriodicWave1D<T: Copy> {
    /// Evaluate the waveform at time `t` in seconds.
    fn sample(&self, t: T) -> T;

    /// Generate samples for the time instants in `input` into a caller-provided buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = bind_output("out", out, input.len())?;
        out.iter_mut()
            .zip(input.iter())
            .for_each(|(out, t)| *out = self.sample(*t));
        Ok(())
    }

    /// Generate samples for the time instants in `input` and allocate output.
    #[cfg(feature = "alloc")]
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        Ok(input.iter().map(|t| self.sample(*t)).collect())
    }
}

/// Uniform sample-instant generation capability.
pub trait SampleTimes1D<T> {
    /// Number of instants produced.
    fn len(&self) -> usize;

    /// Whether no instants are produced.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write sample instants into a caller-provided buffer of exactly [`len`](Self::len) elements.
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<T> + ?Sized;

    /// Generate sample instants and allocate output.
    #[cfg(feature = "alloc")]
    fn run_alloc(&self) -> Result<Vec<T>, ExecInvariantViolation>;
}

/// One-sided magnitude spectrum capability.
pub trait MagnitudeSpectrum1D {
    /// Allocated result type.
    type Output;

    /// Number of magnitude bins produced for an input of `input_len` samples.
    fn expected_len(&self, input_len: usize) -> usize;

    /// Write the frequency axis and magnitudes into caller-provided buffers.
    fn run_into<I, OF, OM>(
        &self,
        input: &I,
        freqs: &mut OF,
        mags: &mut OM,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        OF: Write1D<f64> + ?Sized,
        OM: Write1D<f64> + ?Sized;

    /// Compute the spectrum and allocate output.
    #[cfg(feature = "alloc")]
    fn run_alloc<I>(&self, input: &I) -> Result<Self::Output, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized;
}
