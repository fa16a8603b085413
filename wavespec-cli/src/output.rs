//! Rendering of generated series as CSV or JSON.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write as _;
use wavespec::plot::LineChart;
use wavespec::signal::spectral::SpectrumResult;
use wavespec::signal::wave::{SignalParameters, Waveform};

use crate::request::SignalRequest;

/// Serialization format for stdout or `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Two-column CSV with a header row.
    #[default]
    Csv,
    /// One JSON object with the request, axis and values.
    Json,
}

/// Which view of the signal a [`Series`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Samples against time.
    Time,
    /// Magnitudes against frequency.
    Spectrum,
}

impl View {
    fn headers(self) -> (&'static str, &'static str) {
        match self {
            View::Time => ("time_s", "amplitude"),
            View::Spectrum => ("frequency_hz", "magnitude"),
        }
    }

    /// Chart labels for this view.
    pub fn chart(self) -> LineChart {
        match self {
            View::Time => LineChart::time_domain(),
            View::Spectrum => LineChart::spectrum(),
        }
    }
}

/// A y-over-x series ready to be written or plotted.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub view: View,
    pub axis: Vec<f64>,
    pub values: Vec<f64>,
    /// FFT length, spectrum view only.
    pub padded_len: Option<usize>,
}

impl Series {
    pub fn time(times: Vec<f64>, samples: Vec<f64>) -> Self {
        Self {
            view: View::Time,
            axis: times,
            values: samples,
            padded_len: None,
        }
    }

    pub fn spectrum(result: SpectrumResult) -> Self {
        Self {
            view: View::Spectrum,
            axis: result.frequencies,
            values: result.magnitudes,
            padded_len: Some(result.padded_len),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    request: &'a SignalRequest,
    /// Waveform and parameters exactly as handed to the generator.
    waveform: Waveform<f64>,
    parameters: SignalParameters<f64>,
    view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    padded_len: Option<usize>,
    axis: &'a [f64],
    values: &'a [f64],
}

/// CSV with one row per point.
pub fn render_csv(series: &Series) -> String {
    let (x, y) = series.view.headers();
    let mut out = String::with_capacity(24 * (series.axis.len() + 1));
    let _ = writeln!(out, "{x},{y}");
    for (x, y) in series.axis.iter().zip(series.values.iter()) {
        let _ = writeln!(out, "{x},{y}");
    }
    out
}

/// Pretty-printed JSON; non-finite values become `null`.
pub fn render_json(request: &SignalRequest, series: &Series) -> Result<String> {
    let report = JsonReport {
        request,
        waveform: request.waveform(),
        parameters: request.parameters(),
        view: series.view,
        padded_len: series.padded_len,
        axis: &series.axis,
        values: &series.values,
    };
    serde_json::to_string_pretty(&report).context("failed to serialise output")
}

/// Render `series` in `format`.
pub fn render(format: OutputFormat, request: &SignalRequest, series: &Series) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(render_csv(series)),
        OutputFormat::Json => render_json(request, series),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_view_specific_header() {
        let series = Series::time(vec![0.0, 0.5], vec![0.0, -1.25]);
        assert_eq!(render_csv(&series), "time_s,amplitude\n0,0\n0.5,-1.25\n");

        let series = Series::spectrum(SpectrumResult {
            magnitudes: vec![4.0, 0.0],
            frequencies: vec![0.0, 25.0],
            padded_len: 4,
        });
        assert_eq!(render_csv(&series), "frequency_hz,magnitude\n0,4\n25,0\n");
    }

    #[test]
    fn empty_series_is_header_only() {
        let series = Series::time(Vec::new(), Vec::new());
        assert_eq!(render_csv(&series), "time_s,amplitude\n");
    }

    #[test]
    fn json_carries_request_and_padding() {
        let request = SignalRequest {
            spectrum: true,
            ..Default::default()
        };
        let series = Series::spectrum(SpectrumResult {
            magnitudes: vec![f64::NAN, 1.0],
            frequencies: vec![0.0, 10.0],
            padded_len: 4,
        });
        let text = render(OutputFormat::Json, &request, &series).expect("serialisable");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["view"], "spectrum");
        assert_eq!(value["padded_len"], 4);
        assert_eq!(value["request"]["waveform"], "sine");
        assert_eq!(value["request"]["sample_rate"], 44_100.0);
        assert!(value["values"][0].is_null());
        assert_eq!(value["axis"][1], 10.0);
        assert_eq!(value["waveform"], serde_json::json!({ "kind": "sine" }));
        assert_eq!(value["parameters"]["sample_rate"], 44_100.0);
    }

    #[test]
    fn json_waveform_carries_shape_parameter() {
        let request = SignalRequest {
            waveform: crate::request::WaveformKind::Sawtooth,
            width: 0.25,
            duty_cycle: 80.0,
            ..Default::default()
        };
        let series = Series::time(vec![0.0], vec![-1.0]);
        let text = render_json(&request, &series).expect("serialisable");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(
            value["waveform"],
            serde_json::json!({ "kind": "sawtooth", "width": 0.25 })
        );
        let waveform: Waveform<f64> =
            serde_json::from_value(value["waveform"].clone()).expect("tagged waveform");
        assert_eq!(waveform, Waveform::Sawtooth { width: 0.25 });
        let parameters: SignalParameters<f64> =
            serde_json::from_value(value["parameters"].clone()).expect("parameters");
        assert_eq!(parameters, request.parameters());
    }

    #[test]
    fn time_view_json_omits_padding() {
        let series = Series::time(vec![0.0], vec![1.0]);
        let text = render_json(&SignalRequest::default(), &series).expect("serialisable");
        assert!(!text.contains("padded_len"));
        assert!(text.contains("\"view\": \"time\""));
    }

    #[test]
    fn chart_labels_follow_view() {
        assert_eq!(View::Time.chart().x_label, "Time (s)");
        assert_eq!(View::Spectrum.chart().title, "Magnitude spectrum (FFT)");
    }
}
