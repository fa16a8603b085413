//! One-sided magnitude spectra of real signals via a zero-padded radix-2 FFT.

use crate::error::Error;
use crate::kernel::{
    bind_output, ensure_finite, ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D,
    Write1D,
};
use crate::signal::traits::MagnitudeSpectrum1D;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitude spectrum bundle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumResult {
    /// `|X[k]|` for `k < padded_len / 2`, unscaled.
    pub magnitudes: Vec<f64>,
    /// Frequency of each magnitude bin in Hz.
    pub frequencies: Vec<f64>,
    /// FFT length after zero-padding.
    pub padded_len: usize,
}

impl SpectrumResult {
    /// Number of magnitude bins.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Whether the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Index and magnitude of the strongest bin, ignoring NaN bins.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.magnitudes
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, m)| !m.is_nan())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// FFT length for an input of `n` samples.
///
/// `0` stays `0`, a power of two is kept as is, anything else is rounded up
/// to the next power of two.
pub fn padded_len(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        n.next_power_of_two()
    }
}

/// Frequency axis for `n_bins` magnitude bins at sampling rate `fs`.
///
/// Bin `k` sits at `k · fs / (2 · n_bins)`; with `n_bins = padded_len / 2`
/// this is the usual `k · fs / padded_len` spacing.
pub fn spectrum_frequencies(n_bins: usize, fs: f64) -> Vec<f64> {
    let mut out = vec![0.0; n_bins];
    fill_frequencies(&mut out, fs);
    out
}

fn fill_frequencies(out: &mut [f64], fs: f64) {
    let df = fs / (2.0 * out.len() as f64);
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = k as f64 * df;
    }
}

fn rfft_real(x: &[f64], nfft: usize) -> Vec<Complex<f64>> {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);
    let mut buf = vec![Complex::new(0.0, 0.0); nfft];
    for (dst, src) in buf.iter_mut().zip(x.iter().copied()) {
        *dst = Complex::new(src, 0.0);
    }
    fft.process(&mut buf);
    buf
}

/// Write `|X[k]|` for the first half of the padded transform of `x` into `out`.
///
/// `out` must hold exactly `padded_len(x.len()) / 2` elements.
fn fill_magnitudes(x: &[f64], out: &mut [f64]) {
    let nfft = padded_len(x.len());
    if nfft == 0 {
        return;
    }
    let spec = rfft_real(x, nfft);
    for (slot, c) in out.iter_mut().zip(spec.iter()) {
        *slot = c.norm();
    }
}

fn magnitudes_impl(x: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; padded_len(x.len()) / 2];
    fill_magnitudes(x, &mut out);
    out
}

/// Constructor config for [`MagnitudeSpectrumKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeSpectrumConfig {
    /// Sampling frequency in Hz, used for the frequency axis.
    pub fs: f64,
}

/// Trait-first magnitude spectrum kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeSpectrumKernel {
    fs: f64,
}

impl KernelLifecycle for MagnitudeSpectrumKernel {
    type Config = MagnitudeSpectrumConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let fs = ensure_finite("fs", config.fs)?;
        if fs <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "fs",
                reason: "fs must be > 0",
            });
        }
        Ok(Self { fs })
    }
}

impl MagnitudeSpectrum1D for MagnitudeSpectrumKernel {
    type Output = SpectrumResult;

    fn expected_len(&self, input_len: usize) -> usize {
        padded_len(input_len) / 2
    }

    fn run_into<I, OF, OM>(
        &self,
        input: &I,
        freqs: &mut OF,
        mags: &mut OM,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        OF: Write1D<f64> + ?Sized,
        OM: Write1D<f64> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let expected = self.expected_len(input.len());
        let freqs_out = bind_output("freqs", freqs, expected)?;
        let mags_out = bind_output("mags", mags, expected)?;

        fill_frequencies(freqs_out, self.fs);
        fill_magnitudes(input, mags_out);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<SpectrumResult, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let magnitudes = magnitudes_impl(input);
        Ok(SpectrumResult {
            frequencies: spectrum_frequencies(magnitudes.len(), self.fs),
            magnitudes,
            padded_len: padded_len(input.len()),
        })
    }
}

/// One-sided magnitude spectrum of `x`.
///
/// `x` is zero-padded to [`padded_len`] samples and transformed without
/// normalization; the magnitudes of the first `padded_len / 2` coefficients
/// (DC up to, not including, Nyquist) are returned. Empty input gives an
/// empty spectrum. NaN or infinite samples are not detected and propagate
/// into the magnitudes.
pub fn magnitude_spectrum(x: &[f64]) -> Vec<f64> {
    magnitudes_impl(x)
}

/// Magnitude spectrum of `x` together with its frequency axis for sampling rate `fs`.
///
/// `x` may be any contiguous buffer: a slice, `Vec` or `Array1`.
pub fn spectrum<I>(x: &I, fs: f64) -> Result<SpectrumResult, Error>
where
    I: Read1D<f64> + ?Sized,
{
    let kernel = MagnitudeSpectrumKernel::try_new(MagnitudeSpectrumConfig { fs })?;
    Ok(kernel.run_alloc(x)?)
}
