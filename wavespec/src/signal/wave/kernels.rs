//! Trait-first kernels for periodic waveform generation.

use crate::kernel::{
    bind_output, ensure_finite, ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D,
};
use crate::signal::traits::{PeriodicWave1D, SampleTimes1D};
use nalgebra::RealField;
use num_traits::{FromPrimitive, ToPrimitive};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Position of `x` within its unit cycle, wrapped into `[0, 1)`.
fn cycle_fraction<F>(x: F) -> F
where
    F: RealField + Copy,
{
    let mut c = x % F::one();
    if c < F::zero() {
        c += F::one();
    }
    // A tiny negative remainder can round up to exactly one.
    if c >= F::one() {
        c = F::zero();
    }
    c
}

fn half<F>() -> F
where
    F: RealField + Copy,
{
    F::one() / (F::one() + F::one())
}

/// Waveform family with its family-specific shape parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
pub enum Waveform<F> {
    /// `A·sin(2π·f·t + φ)`.
    Sine,
    /// `+A` for the first `duty_percent` of each cycle, `-A` for the rest.
    Square {
        /// High fraction of the cycle, in percent. `50` is symmetric.
        duty_percent: F,
    },
    /// Symmetric triangle starting at `+A`, reaching `-A` mid-cycle.
    Triangle,
    /// Rising ramp over `width` of the cycle, falling ramp over the rest.
    Sawtooth {
        /// Rising fraction of the cycle, strictly between `0` and `1`.
        width: F,
    },
}

impl<F> Waveform<F> {
    /// Lowercase family name.
    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square { .. } => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth { .. } => "sawtooth",
        }
    }
}

/// Constructor config for [`SineWaveKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWaveConfig<F>
where
    F: RealField + Copy,
{
    /// Peak amplitude.
    pub amplitude: F,
    /// Frequency in Hz.
    pub frequency: F,
    /// Initial phase in radians.
    pub phase: F,
}

/// Trait-first 1D sine-wave generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWaveKernel<F>
where
    F: RealField + Copy,
{
    amplitude: F,
    frequency: F,
    phase: F,
}

impl<F> SineWaveKernel<F>
where
    F: RealField + Copy,
{
    /// Return configured initial phase.
    pub fn phase(&self) -> F {
        self.phase
    }
}

impl<F> KernelLifecycle for SineWaveKernel<F>
where
    F: RealField + Copy,
{
    type Config = SineWaveConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            amplitude: ensure_finite("amplitude", config.amplitude)?,
            frequency: ensure_finite("frequency", config.frequency)?,
            phase: ensure_finite("phase", config.phase)?,
        })
    }
}

impl<F> PeriodicWave1D<F> for SineWaveKernel<F>
where
    F: RealField + Copy,
{
    fn sample(&self, t: F) -> F {
        self.amplitude * (F::two_pi() * self.frequency * t + self.phase).sin()
    }
}

/// Constructor config for [`SquareWaveKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareWaveConfig<F>
where
    F: RealField + Copy,
{
    /// Peak amplitude.
    pub amplitude: F,
    /// Frequency in Hz.
    pub frequency: F,
    /// Duty cycle in percent. Values outside `(0, 100)` give a constant output.
    pub duty_percent: F,
}

/// Trait-first 1D square-wave generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareWaveKernel<F>
where
    F: RealField + Copy,
{
    amplitude: F,
    frequency: F,
    duty: F,
}

impl<F> SquareWaveKernel<F>
where
    F: RealField + Copy,
{
    /// Return configured duty cycle as a fraction of the period.
    pub fn duty(&self) -> F {
        self.duty
    }
}

impl<F> KernelLifecycle for SquareWaveKernel<F>
where
    F: RealField + Copy + FromPrimitive,
{
    type Config = SquareWaveConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let percent = F::from_u8(100).ok_or(ConfigError::InvalidArgument {
            arg: "duty_percent",
            reason: "duty conversion failed",
        })?;
        Ok(Self {
            amplitude: ensure_finite("amplitude", config.amplitude)?,
            frequency: ensure_finite("frequency", config.frequency)?,
            duty: ensure_finite("duty_percent", config.duty_percent)? / percent,
        })
    }
}

impl<F> PeriodicWave1D<F> for SquareWaveKernel<F>
where
    F: RealField + Copy,
{
    fn sample(&self, t: F) -> F {
        if cycle_fraction(t * self.frequency) < self.duty {
            self.amplitude
        } else {
            -self.amplitude
        }
    }
}

/// Constructor config for [`TriangleWaveKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleWaveConfig<F>
where
    F: RealField + Copy,
{
    /// Peak amplitude.
    pub amplitude: F,
    /// Frequency in Hz.
    pub frequency: F,
}

/// Trait-first 1D triangle-wave generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleWaveKernel<F>
where
    F: RealField + Copy,
{
    amplitude: F,
    frequency: F,
}

impl<F> KernelLifecycle for TriangleWaveKernel<F>
where
    F: RealField + Copy,
{
    type Config = TriangleWaveConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self {
            amplitude: ensure_finite("amplitude", config.amplitude)?,
            frequency: ensure_finite("frequency", config.frequency)?,
        })
    }
}

impl<F> PeriodicWave1D<F> for TriangleWaveKernel<F>
where
    F: RealField + Copy,
{
    fn sample(&self, t: F) -> F {
        let four = F::one() + F::one() + F::one() + F::one();
        let cycle = cycle_fraction(t * self.frequency);
        four * self.amplitude * (cycle - half()).abs() - self.amplitude
    }
}

/// Constructor config for [`SawtoothWaveKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SawtoothWaveConfig<F>
where
    F: RealField + Copy,
{
    /// Peak amplitude.
    pub amplitude: F,
    /// Frequency in Hz.
    pub frequency: F,
    /// Width of the rising ramp, strictly inside `(0, 1)`.
    pub width: F,
}

/// Trait-first 1D sawtooth-wave generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SawtoothWaveKernel<F>
where
    F: RealField + Copy,
{
    amplitude: F,
    frequency: F,
    width: F,
}

impl<F> SawtoothWaveKernel<F>
where
    F: RealField + Copy,
{
    /// Return configured width.
    pub fn width(&self) -> F {
        self.width
    }
}

impl<F> KernelLifecycle for SawtoothWaveKernel<F>
where
    F: RealField + Copy,
{
    type Config = SawtoothWaveConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let width = ensure_finite("width", config.width)?;
        // Both ramps divide by their share of the cycle.
        if width <= F::zero() || width >= F::one() {
            return Err(ConfigError::InvalidArgument {
                arg: "width",
                reason: "width must lie strictly between 0 and 1",
            });
        }
        Ok(Self {
            amplitude: ensure_finite("amplitude", config.amplitude)?,
            frequency: ensure_finite("frequency", config.frequency)?,
            width,
        })
    }
}

impl<F> PeriodicWave1D<F> for SawtoothWaveKernel<F>
where
    F: RealField + Copy,
{
    fn sample(&self, t: F) -> F {
        let two = F::one() + F::one();
        let cycle = cycle_fraction(t * self.frequency);
        if cycle < self.width {
            two * self.amplitude * cycle / self.width - self.amplitude
        } else {
            two * self.amplitude * (F::one() - cycle) / (F::one() - self.width) - self.amplitude
        }
    }
}

/// Constructor config for [`WaveformKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformConfig<F>
where
    F: RealField + Copy,
{
    /// Waveform family and its shape parameter.
    pub waveform: Waveform<F>,
    /// Peak amplitude.
    pub amplitude: F,
    /// Frequency in Hz.
    pub frequency: F,
    /// Initial phase in radians. Only the sine family applies it.
    pub phase: F,
}

/// Any of the four waveform generators, selected at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveformKernel<F>
where
    F: RealField + Copy,
{
    /// Sine generator.
    Sine(SineWaveKernel<F>),
    /// Square generator.
    Square(SquareWaveKernel<F>),
    /// Triangle generator.
    Triangle(TriangleWaveKernel<F>),
    /// Sawtooth generator.
    Sawtooth(SawtoothWaveKernel<F>),
}

impl<F> KernelLifecycle for WaveformKernel<F>
where
    F: RealField + Copy + FromPrimitive,
{
    type Config = WaveformConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let WaveformConfig {
            waveform,
            amplitude,
            frequency,
            phase,
        } = config;
        Ok(match waveform {
            Waveform::Sine => Self::Sine(SineWaveKernel::try_new(SineWaveConfig {
                amplitude,
                frequency,
                phase,
            })?),
            Waveform::Square { duty_percent } => {
                Self::Square(SquareWaveKernel::try_new(SquareWaveConfig {
                    amplitude,
                    frequency,
                    duty_percent,
                })?)
            }
            Waveform::Triangle => Self::Triangle(TriangleWaveKernel::try_new(
                TriangleWaveConfig {
                    amplitude,
                    frequency,
                },
            )?),
            Waveform::Sawtooth { width } => {
                Self::Sawtooth(SawtoothWaveKernel::try_new(SawtoothWaveConfig {
                    amplitude,
                    frequency,
                    width,
                })?)
            }
        })
    }
}

impl<F> PeriodicWave1D<F> for WaveformKernel<F>
where
    F: RealField + Copy,
{
    fn sample(&self, t: F) -> F {
        match self {
            WaveformKernel::Sine(k) => k.sample(t),
            WaveformKernel::Square(k) => k.sample(t),
            WaveformKernel::Triangle(k) => k.sample(t),
            WaveformKernel::Sawtooth(k) => k.sample(t),
        }
    }
}

/// Constructor config for [`SampleClock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleClockConfig<F>
where
    F: RealField + Copy,
{
    /// Sampling frequency in Hz.
    pub sample_rate: F,
    /// Signal duration in seconds.
    pub duration: F,
}

/// Uniform sampling instants `t_i = i / sample_rate` for
/// `i < floor(sample_rate · duration)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleClock<F>
where
    F: RealField + Copy,
{
    sample_rate: F,
    len: usize,
}

impl<F> SampleClock<F>
where
    F: RealField + Copy,
{
    /// Sampling frequency in Hz.
    pub fn sample_rate(&self) -> F {
        self.sample_rate
    }

    /// Seconds between consecutive instants.
    pub fn sample_period(&self) -> F {
        F::one() / self.sample_rate
    }
}

/// Largest sample count whose `F` buffer stays within `isize::MAX` bytes.
pub fn max_sample_count<F>() -> usize {
    isize::MAX as usize / core::mem::size_of::<F>().max(1)
}

impl<F> KernelLifecycle for SampleClock<F>
where
    F: RealField + Copy + ToPrimitive,
{
    type Config = SampleClockConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        let sample_rate = ensure_finite("sample_rate", config.sample_rate)?;
        let duration = ensure_finite("duration", config.duration)?;
        if sample_rate <= F::zero() {
            return Err(ConfigError::InvalidArgument {
                arg: "sample_rate",
                reason: "sample_rate must be > 0",
            });
        }
        if duration <= F::zero() {
            return Err(ConfigError::InvalidArgument {
                arg: "duration",
                reason: "duration must be > 0",
            });
        }
        let len = (sample_rate * duration)
            .floor()
            .to_usize()
            .ok_or(ConfigError::InvalidArgument {
                arg: "duration",
                reason: "sample count does not fit in usize",
            })?;
        if len > max_sample_count::<F>() {
            return Err(ConfigError::InvalidArgument {
                arg: "duration",
                reason: "sample count exceeds the largest allocatable buffer",
            });
        }
        Ok(Self { sample_rate, len })
    }
}

impl<F> SampleTimes1D<F> for SampleClock<F>
where
    F: RealField + Copy + FromPrimitive,
{
    fn len(&self) -> usize {
        self.len
    }

    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<F> + ?Sized,
    {
        let out = bind_output("out", out, self.len)?;
        for (i, slot) in out.iter_mut().enumerate() {
            let index = F::from_usize(i).ok_or(ConfigError::InvalidArgument {
                arg: "duration",
                reason: "sample index is not representable",
            })?;
            *slot = index / self.sample_rate;
        }
        Ok(())
    }

    #[cfg(feature = "alloc")]
    fn run_alloc(&self) -> Result<Vec<F>, ExecInvariantViolation> {
        let mut out = alloc::vec![F::zero(); self.len];
        self.run_into(&mut out)?;
        Ok(out)
    }
}
