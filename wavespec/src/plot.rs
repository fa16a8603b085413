//! Line-chart rendering through a non-interactive matplotlib subprocess.

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Interpreter used when `WAVESPEC_PYTHON` is not set.
pub const DEFAULT_PYTHON_BIN: &str = "python";

/// Errors raised by plot utilities.
#[derive(Debug)]
pub enum PlotError {
    /// Underlying process or filesystem I/O failure.
    Io(std::io::Error),
    /// Python subprocess stdin was unavailable.
    StdinUnavailable,
    /// Python subprocess exited unsuccessfully.
    PythonExitFailure(ExitStatus),
    /// The x and y series differ in length.
    LengthMismatch {
        /// Length of the x series.
        x: usize,
        /// Length of the y series.
        y: usize,
    },
}

impl core::fmt::Display for PlotError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlotError::Io(err) => write!(f, "plot I/O failure: {err}"),
            PlotError::StdinUnavailable => {
                write!(f, "failed to open stdin for python plotting process")
            }
            PlotError::PythonExitFailure(status) => {
                write!(f, "python plotting script failed with status: {status}")
            }
            PlotError::LengthMismatch { x, y } => {
                write!(f, "cannot plot {y} values against {x} axis points")
            }
        }
    }
}

impl std::error::Error for PlotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlotError::Io(err) => Some(err),
            PlotError::StdinUnavailable
            | PlotError::PythonExitFailure(_)
            | PlotError::LengthMismatch { .. } => None,
        }
    }
}

impl From<std::io::Error> for PlotError {
    fn from(value: std::io::Error) -> Self {
        PlotError::Io(value)
    }
}

/// Chart title and axis labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChart {
    /// Chart title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
}

impl LineChart {
    /// Labels for a sampled signal plotted against time.
    pub fn time_domain() -> Self {
        Self {
            title: "Generated signal".into(),
            x_label: "Time (s)".into(),
            y_label: "Amplitude".into(),
        }
    }

    /// Labels for a magnitude spectrum plotted against frequency.
    pub fn spectrum() -> Self {
        Self {
            title: "Magnitude spectrum (FFT)".into(),
            x_label: "Frequency (Hz)".into(),
            y_label: "Magnitude".into(),
        }
    }
}

fn python_list(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 12 + 2);
    out.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if v.is_finite() {
            let _ = write!(out, "{v:?}");
        } else if v.is_nan() {
            out.push_str("float('nan')");
        } else if *v > 0.0 {
            out.push_str("float('inf')");
        } else {
            out.push_str("float('-inf')");
        }
    }
    out.push(']');
    out
}

fn python_str(s: &str) -> String {
    format!("{s:?}")
}

/// Build the matplotlib script that draws `y` against `x` into `output_path`.
pub fn line_chart_script(x: &[f64], y: &[f64], chart: &LineChart, output_path: &Path) -> String {
    let output_path_literal = output_path.to_string_lossy().replace('\\', "\\\\");
    format!(
        r#"
import matplotlib
matplotlib.use("Agg")
import matplotlib.pyplot as plt

x = {x}
y = {y}
fig = plt.figure(figsize=(12, 6))
ax = fig.add_subplot(1, 1, 1)
ax.plot(x, y, linewidth=1.0)
ax.set_title({title})
ax.set_xlabel({x_label})
ax.set_ylabel({y_label})
ax.grid(True, alpha=0.3)
fig.tight_layout()
fig.savefig(r"{path}", dpi=150)
plt.close(fig)
"#,
        x = python_list(x),
        y = python_list(y),
        title = python_str(&chart.title),
        x_label = python_str(&chart.x_label),
        y_label = python_str(&chart.y_label),
        path = output_path_literal,
    )
}

/// Render `y` against `x` as a PNG line chart at `output_path`.
///
/// The interpreter is taken from `WAVESPEC_PYTHON`, falling back to
/// [`DEFAULT_PYTHON_BIN`]. Parent directories are created as needed.
pub fn plot_line_chart<P: AsRef<Path>>(
    x: &[f64],
    y: &[f64],
    chart: &LineChart,
    output_path: P,
) -> Result<PathBuf, PlotError> {
    if x.len() != y.len() {
        return Err(PlotError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let output_path = output_path.as_ref().to_path_buf();
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let script = line_chart_script(x, y, chart, &output_path);
    let python_bin =
        std::env::var("WAVESPEC_PYTHON").unwrap_or_else(|_| DEFAULT_PYTHON_BIN.to_string());
    let mut python = std::process::Command::new(python_bin)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::null()) // noisy
        .stderr(std::process::Stdio::null()) // noisy
        .spawn()?;

    if let Some(mut stdin) = python.stdin.take() {
        stdin.write_all(script.as_bytes())?;
    } else {
        return Err(PlotError::StdinUnavailable);
    }

    let status = python.wait()?;
    if !status.success() {
        return Err(PlotError::PythonExitFailure(status));
    }
    Ok(output_path)
}
