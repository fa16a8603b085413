use anyhow::{anyhow, bail, Context, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use wavespec::kernel::KernelLifecycle;
use wavespec::signal::spectral::{
    magnitude_spectrum as spectrum_baseline, MagnitudeSpectrumConfig, MagnitudeSpectrumKernel,
};
use wavespec::signal::traits::{MagnitudeSpectrum1D, PeriodicWave1D};
use wavespec::signal::wave::{
    generate, sample_times, sawtooth as sawtooth_baseline, sine as sine_baseline,
    square as square_baseline, triangle as triangle_baseline, SawtoothWaveConfig,
    SawtoothWaveKernel, SignalParameters, SineWaveConfig, SineWaveKernel, SquareWaveConfig,
    SquareWaveKernel, TriangleWaveConfig, TriangleWaveKernel, Waveform,
};

const DEFAULT_PYTHON_BIN: &str = "python";

/// Largest accepted `max_abs` against numpy for waveform cases.
const WAVE_TOLERANCE: f64 = 1e-9;
/// Largest accepted `max_abs` against numpy for spectra, relative to the peak magnitude.
const SPECTRUM_REL_TOLERANCE: f64 = 1e-9;

const PY_SIGNAL_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np

env = json.loads(sys.stdin.read())
op = env["op"]
iters = int(env["iters"])
p = env["payload"]

def _as_array(key):
    return np.asarray(p[key], dtype=float)

def _cycle():
    c = np.mod(_as_array("t") * float(p["frequency"]), 1.0)
    return np.where(c >= 1.0, 0.0, c)

def _compute():
    a = float(p.get("amplitude", 1.0))
    if op == "sine":
        t = _as_array("t")
        return a * np.sin(2.0 * np.pi * float(p["frequency"]) * t + float(p["phase"]))
    if op == "square":
        return np.where(_cycle() < float(p["duty_percent"]) / 100.0, a, -a)
    if op == "triangle":
        return 4.0 * a * np.abs(_cycle() - 0.5) - a
    if op == "sawtooth":
        c = _cycle()
        w = float(p["width"])
        return np.where(c < w, 2.0 * a * c / w - a, 2.0 * a * (1.0 - c) / (1.0 - w) - a)
    if op == "magnitude_spectrum":
        x = _as_array("x")
        n = 0 if len(x) == 0 else 1 << (len(x) - 1).bit_length()
        return np.abs(np.fft.fft(x, n=n))[: n // 2]

    raise RuntimeError(f"unsupported op: {op}")

y = np.asarray(_compute(), dtype=float).reshape(-1)

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": y.tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    samples: usize,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    tolerance: f64,
    passed: bool,
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
    speedup_vs_baseline: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    rows: Vec<ContractRow>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();
    let mut versions = None;

    // Negative instants exercise cycle wrapping.
    let t: Vec<f64> = (0..2048).map(|i| (i as f64 - 512.0) / 1000.0).collect();
    let t_nd = Array1::from_vec(t.clone());

    // Sine
    {
        let config = SineWaveConfig {
            amplitude: 1.5,
            frequency: 7.0,
            phase: 0.4,
        };
        let kernel = SineWaveKernel::try_new(config)?;
        let candidate = run_wave(&kernel, &t)?;
        let baseline = sine_baseline(&t_nd, config)?.to_vec();
        let py = python_signal_eval(
            &python_bin,
            "sine",
            json!({ "t": t, "amplitude": 1.5, "frequency": 7.0, "phase": 0.4 }),
            200,
        )?;
        let candidate_ns = benchmark_avg_ns(200, || run_wave(&kernel, &t).map(drop))?;
        let baseline_ns = benchmark_avg_ns(200, || sine_baseline(&t_nd, config).map(drop).map_err(anyhow::Error::from))?;
        record_case(
            &mut rows,
            &mut versions,
            "sine_f64",
            candidate,
            baseline,
            py,
            candidate_ns,
            baseline_ns,
            WAVE_TOLERANCE,
        )?;
    }

    // Square
    for duty_percent in [50.0, 30.0] {
        let case_id = format!("square_duty{duty_percent}_f64");
        let config = SquareWaveConfig {
            amplitude: 2.0,
            frequency: 3.5,
            duty_percent,
        };
        let kernel = SquareWaveKernel::try_new(config)?;
        let candidate = run_wave(&kernel, &t)?;
        let baseline = square_baseline(&t_nd, config)?.to_vec();
        let py = python_signal_eval(
            &python_bin,
            "square",
            json!({ "t": t, "amplitude": 2.0, "frequency": 3.5, "duty_percent": duty_percent }),
            200,
        )?;
        let candidate_ns = benchmark_avg_ns(200, || run_wave(&kernel, &t).map(drop))?;
        let baseline_ns = benchmark_avg_ns(200, || square_baseline(&t_nd, config).map(drop).map_err(anyhow::Error::from))?;
        record_case(
            &mut rows,
            &mut versions,
            &case_id,
            candidate,
            baseline,
            py,
            candidate_ns,
            baseline_ns,
            WAVE_TOLERANCE,
        )?;
    }

    // Triangle
    {
        let config = TriangleWaveConfig {
            amplitude: 0.75,
            frequency: 5.0,
        };
        let kernel = TriangleWaveKernel::try_new(config)?;
        let candidate = run_wave(&kernel, &t)?;
        let baseline = triangle_baseline(&t_nd, config)?.to_vec();
        let py = python_signal_eval(
            &python_bin,
            "triangle",
            json!({ "t": t, "amplitude": 0.75, "frequency": 5.0 }),
            200,
        )?;
        let candidate_ns = benchmark_avg_ns(200, || run_wave(&kernel, &t).map(drop))?;
        let baseline_ns = benchmark_avg_ns(200, || triangle_baseline(&t_nd, config).map(drop).map_err(anyhow::Error::from))?;
        record_case(
            &mut rows,
            &mut versions,
            "triangle_f64",
            candidate,
            baseline,
            py,
            candidate_ns,
            baseline_ns,
            WAVE_TOLERANCE,
        )?;
    }

    // Sawtooth
    for width in [0.5, 0.8] {
        let case_id = format!("sawtooth_width{width}_f64");
        let config = SawtoothWaveConfig {
            amplitude: 1.0,
            frequency: 4.0,
            width,
        };
        let kernel = SawtoothWaveKernel::try_new(config)?;
        let candidate = run_wave(&kernel, &t)?;
        let baseline = sawtooth_baseline(&t_nd, config)?.to_vec();
        let py = python_signal_eval(
            &python_bin,
            "sawtooth",
            json!({ "t": t, "amplitude": 1.0, "frequency": 4.0, "width": width }),
            200,
        )?;
        let candidate_ns = benchmark_avg_ns(200, || run_wave(&kernel, &t).map(drop))?;
        let baseline_ns = benchmark_avg_ns(200, || sawtooth_baseline(&t_nd, config).map(drop).map_err(anyhow::Error::from))?;
        record_case(
            &mut rows,
            &mut versions,
            &case_id,
            candidate,
            baseline,
            py,
            candidate_ns,
            baseline_ns,
            WAVE_TOLERANCE,
        )?;
    }

    // Magnitude spectrum of generated signals, padded and unpadded.
    for (case_id, waveform, fs, duration) in [
        ("spectrum_sine_100hz_n100", Waveform::Sine, 100.0, 1.0),
        (
            "spectrum_square_1khz_n256",
            Waveform::Square { duty_percent: 50.0 },
            1000.0,
            0.256,
        ),
        (
            "spectrum_sawtooth_8khz_n1000",
            Waveform::Sawtooth { width: 0.3 },
            8000.0,
            0.125,
        ),
    ] {
        let params = SignalParameters {
            amplitude: 1.0,
            frequency: 10.0 * fs / 100.0,
            phase: 0.0,
            sample_rate: fs,
            duration,
        };
        let x = generate(waveform, &params)?.to_vec();
        let kernel = MagnitudeSpectrumKernel::try_new(MagnitudeSpectrumConfig { fs })?;
        let candidate = kernel
            .run_alloc(x.as_slice())
            .map_err(|e| anyhow!("spectrum candidate execution failed: {e}"))?
            .magnitudes;
        let baseline = spectrum_baseline(&x);
        let tolerance = SPECTRUM_REL_TOLERANCE * baseline.iter().copied().fold(1.0, f64::max);
        let py = python_signal_eval(&python_bin, "magnitude_spectrum", json!({ "x": x }), 100)?;
        let candidate_ns = benchmark_avg_ns(100, || {
            kernel
                .run_alloc(x.as_slice())
                .map(drop)
                .map_err(|e| anyhow!("spectrum candidate execution failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(100, || {
            spectrum_baseline(&x);
            Ok(())
        })?;
        record_case(
            &mut rows,
            &mut versions,
            case_id,
            candidate,
            baseline,
            py,
            candidate_ns,
            baseline_ns,
            tolerance,
        )?;
    }

    // Sampling grid
    {
        let params = SignalParameters {
            amplitude: 1.0,
            frequency: 1.0,
            phase: 0.0,
            sample_rate: 44_100.0,
            duration: 0.05,
        };
        let candidate = sample_times(&params)?.to_vec();
        if candidate.len() != 2205 {
            bail!("sample grid has {} instants, expected 2205", candidate.len());
        }
        if let Some((i, t)) = candidate
            .iter()
            .enumerate()
            .find(|(i, t)| **t != *i as f64 / params.sample_rate)
        {
            bail!("sample instant {i} is {t}, expected i / fs");
        }
    }

    let (python_version, numpy_version) = versions.unwrap_or_default();
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.to_string_lossy().into_owned(),
        python_version,
        numpy_version,
        rows,
    };

    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_vec_pretty(&bundle).context("serializing summary bundle")?,
    )
    .context("writing summary.json")?;

    println!("Contract artifacts generated in: {}", out_dir.display());
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", out_dir.join("summary.json").display());
    println!("  - cases: {}", bundle.rows.len());
    let worst = bundle.rows.iter().map(|r| r.max_abs).fold(0.0, f64::max);
    println!("  - worst max_abs vs numpy: {worst:.3e}");

    let breaches = tolerance_breaches(&bundle.rows);
    if !breaches.is_empty() {
        bail!(
            "{} case(s) exceed their numpy tolerance:\n  {}",
            breaches.len(),
            breaches.join("\n  ")
        );
    }
    Ok(())
}

fn tolerance_breaches(rows: &[ContractRow]) -> Vec<String> {
    rows.iter()
        .filter(|row| !row.passed)
        .map(|row| {
            format!(
                "{}: max_abs {:e} > tolerance {:e}",
                row.case_id, row.max_abs, row.tolerance
            )
        })
        .collect()
}

fn run_wave<K: PeriodicWave1D<f64>>(kernel: &K, t: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; t.len()];
    kernel
        .run_into(t, out.as_mut_slice())
        .map_err(|e| anyhow!("waveform candidate execution failed: {e}"))?;
    Ok(out)
}

fn detect_python_bin() -> PathBuf {
    std::env::var_os("WAVESPEC_PYTHON")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON_BIN))
}

fn python_signal_eval(
    python_bin: &Path,
    op: &str,
    payload: serde_json::Value,
    iters: usize,
) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        PY_SIGNAL_SCRIPT,
        json!({
            "op": op,
            "iters": iters,
            "payload": payload
        }),
    )
}

fn run_python_eval(
    python_bin: &Path,
    script: &str,
    payload: serde_json::Value,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&payload).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    let parsed: PythonEval = serde_json::from_str(stdout.trim()).context("parsing python json")?;
    Ok(parsed)
}

#[allow(clippy::too_many_arguments)]
fn record_case(
    rows: &mut Vec<ContractRow>,
    versions: &mut Option<(String, String)>,
    case_id: &str,
    candidate: Vec<f64>,
    baseline: Vec<f64>,
    py: PythonEval,
    candidate_ns: f64,
    baseline_ns: f64,
    tolerance: f64,
) -> Result<()> {
    ensure_same_length(case_id, &candidate, &baseline)?;
    ensure_same_length(case_id, &candidate, &py.output)?;
    if candidate != baseline {
        bail!("case {case_id}: kernel and ndarray helper disagree");
    }

    versions.get_or_insert_with(|| (py.python_version.clone(), py.numpy_version.clone()));
    rows.push(build_row(RowBuildInput {
        case_id,
        rust_candidate: &candidate,
        python_reference: &py.output,
        rust_candidate_ns: candidate_ns,
        rust_baseline_ns: baseline_ns,
        python_ns: py.avg_ns,
        tolerance,
    }));
    Ok(())
}

fn ensure_same_length(case_id: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        bail!(
            "case {case_id} has mismatched output lengths: left={}, right={}",
            a.len(),
            b.len()
        );
    }
    Ok(())
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

struct RowBuildInput<'a> {
    case_id: &'a str,
    rust_candidate: &'a [f64],
    python_reference: &'a [f64],
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
    tolerance: f64,
}

fn build_row(args: RowBuildInput<'_>) -> ContractRow {
    let max_abs = max_abs_error(args.rust_candidate, args.python_reference);
    ContractRow {
        case_id: args.case_id.to_string(),
        samples: args.rust_candidate.len(),
        pearson_r: pearson(args.rust_candidate, args.python_reference),
        mae: mean_abs_error(args.rust_candidate, args.python_reference),
        rmse: root_mean_squared_error(args.rust_candidate, args.python_reference),
        max_abs,
        tolerance: args.tolerance,
        // NaN max_abs fails too.
        passed: max_abs <= args.tolerance,
        rust_candidate_ns: args.rust_candidate_ns,
        rust_baseline_ns: args.rust_baseline_ns,
        python_ns: args.python_ns,
        speedup_vs_baseline: args.rust_baseline_ns / args.rust_candidate_ns,
        speedup_vs_python: args.python_ns / args.rust_candidate_ns,
    }
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, |acc, d| if d.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(d) })
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,samples,pearson_r,mae,rmse,max_abs,tolerance,passed,rust_candidate_ns,rust_baseline_ns,python_ns,speedup_vs_baseline,speedup_vs_python\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{:.12},{:.12},{:.12},{:.12},{:e},{},{:.3},{:.3},{:.3},{:.6},{:.6}\n",
            row.case_id,
            row.samples,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.tolerance,
            row.passed,
            row.rust_candidate_ns,
            row.rust_baseline_ns,
            row.python_ns,
            row.speedup_vs_baseline,
            row.speedup_vs_python,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
