use approx::assert_abs_diff_eq;
use wavespec::kernel::KernelLifecycle;
use wavespec::signal::spectral::{
    magnitude_spectrum, spectrum, MagnitudeSpectrumConfig, MagnitudeSpectrumKernel,
};
use wavespec::signal::traits::MagnitudeSpectrum1D;
use wavespec::signal::wave::{generate, sample_times, SignalParameters, Waveform};

fn params(frequency: f64, sample_rate: f64, duration: f64) -> SignalParameters<f64> {
    SignalParameters {
        amplitude: 1.0,
        frequency,
        phase: 0.0,
        sample_rate,
        duration,
    }
}

#[test]
fn ten_hertz_sine_peaks_at_ten_hertz() {
    let p = params(10.0, 100.0, 1.0);
    let samples = generate(Waveform::Sine, &p).expect("valid sine");
    assert_eq!(samples.len(), 100);

    let kernel = MagnitudeSpectrumKernel::try_new(MagnitudeSpectrumConfig { fs: 100.0 })
        .expect("valid config");
    let result = kernel.run_alloc(&samples).expect("spectrum");
    assert_eq!(result.padded_len, 128);
    assert_eq!(result.len(), 64);

    let (peak, magnitude) = result.peak().expect("non-empty spectrum");
    // 10 Hz sits at 12.8 bins of 100/128 Hz.
    assert_eq!(peak, 13);
    assert!(magnitude > 40.0);
    let df = result.frequencies[1] - result.frequencies[0];
    assert_abs_diff_eq!(df, 100.0 / 128.0, epsilon = 1e-12);
    assert!((result.frequencies[peak] - 10.0).abs() < df);
}

#[test]
fn square_wave_has_odd_harmonics() {
    // 50 Hz at 1 kHz over 256 samples: fundamental at 12.8 bins, third harmonic at 38.4.
    let p = params(50.0, 1000.0, 0.256);
    let samples = generate(Waveform::Square { duty_percent: 50.0 }, &p).expect("valid square");
    assert_eq!(samples.len(), 256);

    let mags = magnitude_spectrum(samples.as_slice().expect("contiguous samples"));
    assert_eq!(mags.len(), 128);
    let mut order: Vec<usize> = (0..mags.len()).collect();
    order.sort_by(|a, b| mags[*b].total_cmp(&mags[*a]));
    assert_eq!(order[0], 13);
    assert_eq!(order[1], 38);
    assert!(mags[38] < mags[13] / 2.0);
}

#[test]
fn spectrum_of_generated_triangle_matches_time_axis_rate() {
    let p = params(5.0, 64.0, 2.0);
    let t = sample_times(&p).expect("valid clock");
    assert_eq!(t.len(), 128);
    assert_abs_diff_eq!(t[1] - t[0], 1.0 / 64.0, epsilon = 1e-15);

    let samples = generate(Waveform::Triangle, &p).expect("valid triangle");
    let result = spectrum(&samples, p.sample_rate).expect("spectrum");
    assert_eq!(result.padded_len, 128);
    // 5 Hz at 0.5 Hz per bin.
    assert_eq!(result.peak().map(|(i, _)| i), Some(10));
    assert_abs_diff_eq!(result.frequencies[10], 5.0, epsilon = 1e-12);
}

#[test]
fn invalid_requests_fail_before_any_output() {
    let p = params(10.0, 100.0, 1.0);
    let err = generate(Waveform::Sawtooth { width: 1.0 }, &p).expect_err("width 1");
    assert!(err.is_invalid_arg());
    assert!(err.to_string().contains("width"));

    let err = generate(Waveform::Sine, &params(10.0, 0.0, 1.0)).expect_err("zero rate");
    assert!(err.to_string().contains("sample_rate"));
}
