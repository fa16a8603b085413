//! Signal requests: defaults, JSON request files and command-line overrides.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wavespec::signal::wave::{SignalParameters, Waveform};

/// Waveform family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WaveformKind {
    /// Sinusoid; the only family that applies `phase`.
    #[default]
    Sine,
    /// Two-level wave shaped by `duty_cycle`.
    Square,
    /// Symmetric triangle starting at the positive peak.
    Triangle,
    /// Rising/falling ramp shaped by `width`.
    Sawtooth,
}

/// Everything needed to produce one output.
///
/// Missing fields in a request file take their default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalRequest {
    /// Waveform family.
    pub waveform: WaveformKind,
    /// Peak amplitude.
    pub amplitude: f64,
    /// Frequency in Hz.
    pub frequency: f64,
    /// Initial phase in radians.
    pub phase: f64,
    /// Sampling frequency in Hz.
    pub sample_rate: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Square-wave duty cycle in percent.
    pub duty_cycle: f64,
    /// Sawtooth rise fraction, strictly between 0 and 1.
    pub width: f64,
    /// Emit the magnitude spectrum instead of the time series.
    pub spectrum: bool,
}

impl Default for SignalRequest {
    fn default() -> Self {
        Self {
            waveform: WaveformKind::Sine,
            amplitude: 1.0,
            frequency: 10.0,
            phase: 0.0,
            sample_rate: 44_100.0,
            duration: 1.0,
            duty_cycle: 50.0,
            width: 0.5,
            spectrum: false,
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RequestOverrides {
    pub waveform: Option<WaveformKind>,
    pub amplitude: Option<f64>,
    pub frequency: Option<f64>,
    pub phase: Option<f64>,
    pub sample_rate: Option<f64>,
    pub duration: Option<f64>,
    pub duty_cycle: Option<f64>,
    pub width: Option<f64>,
    pub spectrum: bool,
}

impl SignalRequest {
    /// Parse a JSON request.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid signal request")
    }

    /// Read and parse a JSON request file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in request file {}", path.display()))
    }

    /// Apply command-line values on top of this request.
    pub fn merge(mut self, overrides: &RequestOverrides) -> Self {
        if let Some(v) = overrides.waveform {
            self.waveform = v;
        }
        if let Some(v) = overrides.amplitude {
            self.amplitude = v;
        }
        if let Some(v) = overrides.frequency {
            self.frequency = v;
        }
        if let Some(v) = overrides.phase {
            self.phase = v;
        }
        if let Some(v) = overrides.sample_rate {
            self.sample_rate = v;
        }
        if let Some(v) = overrides.duration {
            self.duration = v;
        }
        if let Some(v) = overrides.duty_cycle {
            self.duty_cycle = v;
        }
        if let Some(v) = overrides.width {
            self.width = v;
        }
        self.spectrum |= overrides.spectrum;
        self
    }

    /// Waveform selector with its shape parameter attached.
    pub fn waveform(&self) -> Waveform<f64> {
        match self.waveform {
            WaveformKind::Sine => Waveform::Sine,
            WaveformKind::Square => Waveform::Square {
                duty_percent: self.duty_cycle,
            },
            WaveformKind::Triangle => Waveform::Triangle,
            WaveformKind::Sawtooth => Waveform::Sawtooth { width: self.width },
        }
    }

    /// Shared generator parameters.
    pub fn parameters(&self) -> SignalParameters<f64> {
        SignalParameters {
            amplitude: self.amplitude,
            frequency: self.frequency,
            phase: self.phase,
            sample_rate: self.sample_rate,
            duration: self.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_request_files_fill_in_defaults() {
        let req = SignalRequest::from_json(r#"{"waveform": "sawtooth", "width": 0.25}"#)
            .expect("valid request");
        assert_eq!(req.waveform, WaveformKind::Sawtooth);
        assert_eq!(req.waveform(), Waveform::Sawtooth { width: 0.25 });
        assert_eq!(req.sample_rate, 44_100.0);
        assert_eq!(req.frequency, 10.0);
        assert!(!req.spectrum);
    }

    #[test]
    fn unknown_fields_and_families_are_rejected() {
        assert!(SignalRequest::from_json(r#"{"fs": 100.0}"#).is_err());
        assert!(SignalRequest::from_json(r#"{"waveform": "noise"}"#).is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let file = SignalRequest::from_json(
            r#"{"waveform": "square", "duty_cycle": 25.0, "sample_rate": 8000.0}"#,
        )
        .expect("valid request");
        let merged = file.merge(&RequestOverrides {
            duty_cycle: Some(75.0),
            amplitude: Some(0.5),
            spectrum: true,
            ..Default::default()
        });
        assert_eq!(merged.waveform(), Waveform::Square { duty_percent: 75.0 });
        assert_eq!(merged.amplitude, 0.5);
        assert_eq!(merged.sample_rate, 8000.0);
        assert!(merged.spectrum);
    }

    #[test]
    fn spectrum_flag_cannot_turn_off_a_file_setting() {
        let file = SignalRequest {
            spectrum: true,
            ..Default::default()
        };
        assert!(file.merge(&RequestOverrides::default()).spectrum);
    }

    #[test]
    fn default_width_is_accepted_by_the_generator() {
        let req = SignalRequest {
            waveform: WaveformKind::Sawtooth,
            duration: 0.01,
            ..Default::default()
        };
        let y = wavespec::signal::wave::generate(req.waveform(), &req.parameters())
            .expect("default width is valid");
        assert_eq!(y.len(), 441);
    }

    #[test]
    fn load_reports_the_missing_path() {
        let err = SignalRequest::load(Path::new("does/not/exist.json")).expect_err("missing");
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
