use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::ThreadRng;
use rand::Rng;
use wavespec::signal::spectral::magnitude_spectrum;

/// Noisy two-tone signal of `n` samples.
fn noisy_signal(rng: &mut ThreadRng, n: usize, fs: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            (2.0 * std::f64::consts::PI * 50.0 * t).sin()
                + 0.3 * (2.0 * std::f64::consts::PI * 120.0 * t).sin()
                + rng.random_range(-0.1..0.1)
        })
        .collect()
}

/// Padded (non power of two) versus exact power-of-two lengths.
fn magnitude_spectrum_lengths(c: &mut Criterion) {
    let mut rng = rand::rng();
    let mut group = c.benchmark_group("magnitude_spectrum");
    for n in [1_000usize, 1_024, 44_100, 65_536] {
        let x = noisy_signal(&mut rng, n, 1_000.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &x, |b, x| {
            b.iter(|| magnitude_spectrum(black_box(x)))
        });
    }
    group.finish();
}

criterion_group!(benches, magnitude_spectrum_lengths);
criterion_main!(benches);
