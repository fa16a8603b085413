//! `wavespec`: generate periodic test signals and their magnitude spectra.
//!
//! ```bash
//! # 10 Hz sine at 100 Hz for one second, as CSV
//! wavespec generate --sample-rate 100
//!
//! # spectrum of a 30 % duty square wave, as JSON, with a chart
//! wavespec generate --waveform square --duty-cycle 30 --spectrum \
//!     --format json --output square.json --plot square.png
//!
//! # request file with a command-line override
//! wavespec --log-level debug generate --config request.json --frequency 440
//! ```

mod logging;
mod output;
mod request;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use logging::{init_logging, LogConfig, LogFormat, LogLevel};
use output::{render, OutputFormat, Series};
use request::{RequestOverrides, SignalRequest, WaveformKind};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use wavespec::signal::spectral::spectrum;
use wavespec::signal::wave::{generate, sample_times};

#[derive(Parser, Debug)]
#[command(name = "wavespec")]
#[command(about = "Generate periodic signals and their magnitude spectra")]
#[command(version)]
struct Cli {
    /// Log verbosity; RUST_LOG overrides it
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a signal, or its spectrum, and write it out
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// JSON signal request; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Waveform family [default: sine]
    #[arg(long, value_enum)]
    waveform: Option<WaveformKind>,

    /// Peak amplitude [default: 1.0]
    #[arg(long, allow_negative_numbers = true)]
    amplitude: Option<f64>,

    /// Frequency in Hz [default: 10.0]
    #[arg(long, allow_negative_numbers = true)]
    frequency: Option<f64>,

    /// Initial phase in radians, sine only [default: 0.0]
    #[arg(long, allow_negative_numbers = true)]
    phase: Option<f64>,

    /// Sampling frequency in Hz [default: 44100]
    #[arg(long, allow_negative_numbers = true)]
    sample_rate: Option<f64>,

    /// Duration in seconds [default: 1.0]
    #[arg(long, allow_negative_numbers = true)]
    duration: Option<f64>,

    /// Square-wave duty cycle in percent [default: 50]
    #[arg(long, allow_negative_numbers = true)]
    duty_cycle: Option<f64>,

    /// Sawtooth rise fraction, strictly between 0 and 1 [default: 0.5]
    #[arg(long, allow_negative_numbers = true)]
    width: Option<f64>,

    /// Emit the magnitude spectrum instead of the time series
    #[arg(long)]
    spectrum: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write output here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also render a PNG line chart here
    #[arg(long)]
    plot: Option<PathBuf>,
}

impl GenerateArgs {
    fn overrides(&self) -> RequestOverrides {
        RequestOverrides {
            waveform: self.waveform,
            amplitude: self.amplitude,
            frequency: self.frequency,
            phase: self.phase,
            sample_rate: self.sample_rate,
            duration: self.duration,
            duty_cycle: self.duty_cycle,
            width: self.width,
            spectrum: self.spectrum,
        }
    }

    fn request(&self) -> Result<SignalRequest> {
        let base = match &self.config {
            Some(path) => SignalRequest::load(path)?,
            None => SignalRequest::default(),
        };
        Ok(base.merge(&self.overrides()))
    }
}

/// Validate, generate and optionally transform the requested signal.
fn build_series(request: &SignalRequest) -> Result<Series> {
    let waveform = request.waveform();
    let params = request.parameters();
    info!(
        waveform = waveform.name(),
        amplitude = params.amplitude,
        frequency = params.frequency,
        sample_rate = params.sample_rate,
        duration = params.duration,
        "generating signal"
    );

    let samples = generate(waveform, &params)
        .with_context(|| format!("cannot generate {} signal", waveform.name()))?;
    debug!(samples = samples.len(), "signal generated");

    if request.spectrum {
        let result = spectrum(&samples, params.sample_rate)
            .context("cannot compute magnitude spectrum")?;
        match result.peak() {
            Some((bin, magnitude)) => info!(
                padded_len = result.padded_len,
                bins = result.len(),
                peak_bin = bin,
                peak_hz = result.frequencies[bin],
                peak_magnitude = magnitude,
                "spectrum computed"
            ),
            None => info!(padded_len = result.padded_len, "spectrum is empty"),
        }
        Ok(Series::spectrum(result))
    } else {
        let times = sample_times(&params).context("cannot compute sample times")?;
        Ok(Series::time(times.to_vec(), samples.to_vec()))
    }
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let request = args.request()?;
    let series = build_series(&request)?;
    let text = render(args.format, &request, &series)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), points = series.values.len(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")?;
        }
    }

    if let Some(path) = &args.plot {
        let written = wavespec::plot::plot_line_chart(
            &series.axis,
            &series.values,
            &series.view.chart(),
            path,
        )
        .with_context(|| format!("failed to render chart {}", path.display()))?;
        info!(path = %written.display(), "chart written");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        level: cli.log_level,
        format: cli.log_format,
    });

    match &cli.command {
        Command::Generate(args) => run_generate(args),
    }
}
