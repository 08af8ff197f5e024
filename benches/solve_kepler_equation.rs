use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use groundtrack::kepler::KeplerSolver;

/// Uniform random in [0, 2π)
#[inline]
fn rand_angle(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

fn random_cases(rng: &mut StdRng, samples: usize, e_min: f64, e_max: f64) -> Vec<(f64, f64)> {
    (0..samples)
        .map(|_| (rand_angle(rng), rng.random_range(e_min..e_max)))
        .collect()
}

/// Typical LEO/MEO regime: e ∈ [0.0, 0.1)
fn bench_low_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let solver = KeplerSolver::default();

    c.bench_function("solve_kepler_equation/low_e<0.1", |b| {
        b.iter_batched(
            || random_cases(&mut rng, 10_000, 0.0, 0.1),
            |cases| {
                for (m, e) in cases {
                    black_box(solver.solve(black_box(m), black_box(e)).unwrap());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Molniya-like and beyond: e ∈ [0.7, 0.99)
fn bench_high_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let solver = KeplerSolver::default();

    c.bench_function("solve_kepler_equation/high_e_0.7..0.99", |b| {
        b.iter_batched(
            || random_cases(&mut rng, 10_000, 0.7, 0.99),
            |cases| {
                for (m, e) in cases {
                    let _ = black_box(solver.solve(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Worst case for the starting guess: M → 0 with e → 1.
fn bench_fixed_stress(c: &mut Criterion) {
    let solver = KeplerSolver::default();
    let (m, e) = (1e-3_f64, 0.999_f64);

    c.bench_function("solve_kepler_equation/fixed_stress_case", |b| {
        b.iter(|| black_box(solver.solve(black_box(m), black_box(e)).ok()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_low_e, bench_high_e, bench_fixed_stress
);
criterion_main!(benches);
