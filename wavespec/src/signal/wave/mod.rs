use crate::error::Error;
use crate::kernel::KernelLifecycle;
use crate::signal::traits::PeriodicWave1D;
#[cfg(feature = "alloc")]
use crate::signal::traits::SampleTimes1D;
use nalgebra::RealField;
use ndarray::{Array, ArrayBase, Data, Dimension};
#[cfg(feature = "alloc")]
use ndarray::Array1;
use num_traits::{FromPrimitive, ToPrimitive};

mod kernels;
pub use kernels::*;

/// Parameters shared by every waveform family.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalParameters<F> {
    /// Peak amplitude.
    pub amplitude: F,
    /// Frequency in Hz.
    pub frequency: F,
    /// Initial phase in radians. Only the sine family applies it.
    pub phase: F,
    /// Sampling frequency in Hz, strictly positive.
    pub sample_rate: F,
    /// Duration in seconds, strictly positive.
    pub duration: F,
}

impl<F> SignalParameters<F>
where
    F: RealField + Copy + FromPrimitive + ToPrimitive,
{
    /// Validate the sampling grid and build its clock.
    pub fn clock(&self) -> Result<SampleClock<F>, Error> {
        Ok(SampleClock::try_new(SampleClockConfig {
            sample_rate: self.sample_rate,
            duration: self.duration,
        })?)
    }

    /// `floor(sample_rate · duration)`.
    pub fn sample_count(&self) -> Result<usize, Error> {
        Ok(self.clock()?.len())
    }

    /// Build the generator for `waveform` with these parameters.
    pub fn kernel(&self, waveform: Waveform<F>) -> Result<WaveformKernel<F>, Error> {
        Ok(WaveformKernel::try_new(WaveformConfig {
            waveform,
            amplitude: self.amplitude,
            frequency: self.frequency,
            phase: self.phase,
        })?)
    }
}

fn run_nd<F, S, D, K>(t: &ArrayBase<S, D>, kernel: &K) -> Array<F, D>
where
    F: RealField + Copy,
    S: Data<Elem = F>,
    D: Dimension,
    K: PeriodicWave1D<F>,
{
    t.mapv(|v| kernel.sample(v))
}

/// Return a sine waveform evaluated at times `t` (seconds).
pub fn sine<F, S, D>(
    t: &ArrayBase<S, D>,
    config: SineWaveConfig<F>,
) -> Result<Array<F, D>, Error>
where
    F: RealField + Copy,
    S: Data<Elem = F>,
    D: Dimension,
{
    let kernel = SineWaveKernel::try_new(config)?;
    Ok(run_nd(t, &kernel))
}

/// Return a square waveform evaluated at times `t` (seconds).
///
/// The output is `+amplitude` while the position within the cycle is below
/// `duty_percent / 100` and `-amplitude` otherwise.
pub fn square<F, S, D>(
    t: &ArrayBase<S, D>,
    config: SquareWaveConfig<F>,
) -> Result<Array<F, D>, Error>
where
    F: RealField + Copy + FromPrimitive,
    S: Data<Elem = F>,
    D: Dimension,
{
    let kernel = SquareWaveKernel::try_new(config)?;
    Ok(run_nd(t, &kernel))
}

/// Return a triangle waveform evaluated at times `t` (seconds).
///
/// Each cycle starts at `+amplitude`, falls linearly to `-amplitude` at
/// mid-cycle and rises back.
pub fn triangle<F, S, D>(
    t: &ArrayBase<S, D>,
    config: TriangleWaveConfig<F>,
) -> Result<Array<F, D>, Error>
where
    F: RealField + Copy,
    S: Data<Elem = F>,
    D: Dimension,
{
    let kernel = TriangleWaveKernel::try_new(config)?;
    Ok(run_nd(t, &kernel))
}

/// Return a sawtooth waveform evaluated at times `t` (seconds).
///
/// The waveform rises from `-amplitude` to `+amplitude` over the first
/// `width` of each cycle and falls back over the remainder. Fails when
/// `width` is not strictly inside `(0, 1)`.
pub fn sawtooth<F, S, D>(
    t: &ArrayBase<S, D>,
    config: SawtoothWaveConfig<F>,
) -> Result<Array<F, D>, Error>
where
    F: RealField + Copy,
    S: Data<Elem = F>,
    D: Dimension,
{
    let kernel = SawtoothWaveKernel::try_new(config)?;
    Ok(run_nd(t, &kernel))
}

/// Return the sampling instants `i / sample_rate` for `i < floor(sample_rate · duration)`.
#[cfg(feature = "alloc")]
pub fn sample_times<F>(params: &SignalParameters<F>) -> Result<Array1<F>, Error>
where
    F: RealField + Copy + FromPrimitive + ToPrimitive,
{
    let clock = params.clock()?;
    let mut out = Array1::from_elem(clock.len(), F::zero());
    clock.run_into(&mut out)?;
    Ok(out)
}

/// Generate `floor(sample_rate · duration)` samples of `waveform`.
///
/// All parameters are validated before any sample is computed, so a domain
/// error never comes with partial output.
#[cfg(feature = "alloc")]
pub fn generate<F>(
    waveform: Waveform<F>,
    params: &SignalParameters<F>,
) -> Result<Array1<F>, Error>
where
    F: RealField + Copy + FromPrimitive + ToPrimitive,
{
    let kernel = params.kernel(waveform)?;
    let times = sample_times(params)?;
    let mut out = Array1::from_elem(times.len(), F::zero());
    kernel.run_into(&times, &mut out)?;
    Ok(out)
}
