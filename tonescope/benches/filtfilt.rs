use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tonescope::signal::filter::apply;
use tonescope::signal::filter::design::{design, FilterFamily, FilterSpec};

const FS: f64 = 44_100.0;

fn filtfilt_families(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let signal: Vec<f64> = (0..(3.0 * FS) as usize)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();

    let mut group = c.benchmark_group("filtfilt");
    for (family, order) in [
        (FilterFamily::Butterworth, 8),
        (FilterFamily::Elliptic, 8),
        (FilterFamily::Fir, 100),
    ] {
        let coefficients = design(&FilterSpec {
            family,
            order,
            cutoff_hz: 5000.0,
            ripple_db: 1.0,
            attenuation_db: 40.0,
            sample_rate: FS,
        })
        .expect("benchmark filter should design")
        .coefficients;

        group.bench_with_input(
            BenchmarkId::new(family.name(), order),
            &signal,
            |bench, sig| bench.iter(|| apply(black_box(&coefficients), black_box(sig))),
        );
    }
    group.finish();
}

criterion_group!(benches, filtfilt_families);
criterion_main!(benches);
