use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use wavespec::kernel::KernelLifecycle;
use wavespec::signal::traits::PeriodicWave1D;
use wavespec::signal::wave::{
    generate, SignalParameters, Waveform, WaveformConfig, WaveformKernel,
};

const WAVEFORMS: [Waveform<f64>; 4] = [
    Waveform::Sine,
    Waveform::Square { duty_percent: 30.0 },
    Waveform::Triangle,
    Waveform::Sawtooth { width: 0.7 },
];

/// One second of audio-rate samples per waveform family.
fn generate_one_second(c: &mut Criterion) {
    let params = SignalParameters {
        amplitude: 1.0,
        frequency: 440.0,
        phase: 0.25,
        sample_rate: 44_100.0,
        duration: 1.0,
    };
    let mut group = c.benchmark_group("generate_44k1");
    for waveform in WAVEFORMS {
        group.bench_with_input(
            BenchmarkId::from_parameter(waveform.name()),
            &waveform,
            |b, waveform| b.iter(|| generate(black_box(*waveform), black_box(&params))),
        );
    }
    group.finish();
}

/// Kernels evaluated at jittered, unsorted instants.
fn sample_random_times(c: &mut Criterion) {
    let mut rng = rand::rng();
    let times: Vec<f64> = (0..16_384).map(|_| rng.random_range(-5.0..5.0)).collect();
    let mut out = vec![0.0; times.len()];

    let mut group = c.benchmark_group("run_into_random_times");
    for waveform in WAVEFORMS {
        let kernel = WaveformKernel::try_new(WaveformConfig {
            waveform,
            amplitude: 1.0,
            frequency: 3.0,
            phase: 0.0,
        })
        .expect("bench waveform config should be valid");
        group.bench_function(waveform.name(), |b| {
            b.iter(|| kernel.run_into(black_box(times.as_slice()), out.as_mut_slice()))
        });
    }
    group.finish();
}

criterion_group!(benches, generate_one_second, sample_random_times);
criterion_main!(benches);
