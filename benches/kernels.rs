use cashkarp::ode::{
    integrate_with, quality_step, IntegrateSettings, KernelChoice, ParallelKernel, ScalarKernel,
    StepKernel,
};
use criterion::{criterion_group, criterion_main, Criterion};

fn blasius(_eta: f64, u: &[f64], dudt: &mut [f64]) {
    dudt[0] = u[1];
    dudt[1] = u[2];
    dudt[2] = -0.5 * u[0] * u[2];
}

fn lorenz(_t: f64, u: &[f64], dudt: &mut [f64]) {
    dudt[0] = 10.0 * (u[1] - u[0]);
    dudt[1] = u[0] * (28.0 - u[2]) - u[1];
    dudt[2] = u[0] * u[1] - 8.0 / 3.0 * u[2];
}

// ---------------------------------------------------------------------------
// Single embedded step, n = 3
// ---------------------------------------------------------------------------

fn step_n3(c: &mut Criterion) {
    let mut g = c.benchmark_group("step_n3");
    let u = [1.0, 0.5, 0.33206];
    let mut dudt = [0.0; 3];
    blasius(0.0, &u, &mut dudt);

    g.bench_function("scalar", |b| {
        let kernel = ScalarKernel::new();
        let mut out = [0.0; 3];
        let mut err = [0.0; 3];
        b.iter(|| {
            kernel.step(
                std::hint::black_box(&u[..]),
                &dudt[..],
                0.0,
                0.1,
                &mut blasius,
                &mut out[..],
                &mut err[..],
            );
            out
        })
    });

    g.bench_function("parallel", |b| {
        let kernel = ParallelKernel::new();
        let mut out = [0.0; 3];
        let mut err = [0.0; 3];
        b.iter(|| {
            kernel.step(
                std::hint::black_box(&u[..]),
                &dudt[..],
                0.0,
                0.1,
                &mut blasius,
                &mut out[..],
                &mut err[..],
            );
            out
        })
    });

    g.bench_function("parallel_portable", |b| {
        let kernel = ParallelKernel::portable();
        let mut out = [0.0; 3];
        let mut err = [0.0; 3];
        b.iter(|| {
            kernel.step(
                std::hint::black_box(&u[..]),
                &dudt[..],
                0.0,
                0.1,
                &mut blasius,
                &mut out[..],
                &mut err[..],
            );
            out
        })
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Controlled step (kernel selection + error control)
// ---------------------------------------------------------------------------

fn quality_step_n3(c: &mut Criterion) {
    let mut g = c.benchmark_group("quality_step_n3");
    let u0 = [1.0, 1.0, 1.0];
    let mut dudt = [0.0; 3];
    lorenz(0.0, &u0, &mut dudt);
    let u_scaled: Vec<f64> = u0
        .iter()
        .zip(&dudt)
        .map(|(u, d)| u.abs() + (d * 0.01).abs() + 1e-30)
        .collect();

    for (name, kernel) in [("scalar", KernelChoice::Scalar), ("parallel", KernelChoice::Parallel)] {
        let settings = IntegrateSettings {
            tolerance: 1e-8,
            kernel,
            ..IntegrateSettings::default()
        };
        g.bench_function(name, |b| {
            b.iter(|| {
                let mut u = u0;
                quality_step(&mut u[..], &dudt[..], &u_scaled, 0.0, 0.01, &settings, &mut lorenz)
            })
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Full integrations
// ---------------------------------------------------------------------------

fn blasius_full(c: &mut Criterion) {
    let mut g = c.benchmark_group("blasius_0_50");

    for (name, kernel) in [("scalar", KernelChoice::Scalar), ("parallel", KernelChoice::Parallel)] {
        let settings = IntegrateSettings {
            tolerance: 1e-5,
            initial_step: 0.1,
            kernel,
            ..IntegrateSettings::default()
        };
        g.bench_function(name, |b| {
            b.iter(|| integrate_with(&[0.0, 0.0, 0.33206], (0.0, 50.0), &settings, blasius))
        });
    }

    g.finish();
}

fn lorenz_full(c: &mut Criterion) {
    let mut g = c.benchmark_group("lorenz_0_10");

    for (name, kernel) in [("scalar", KernelChoice::Scalar), ("parallel", KernelChoice::Parallel)] {
        let settings = IntegrateSettings {
            tolerance: 1e-8,
            kernel,
            ..IntegrateSettings::default()
        };
        g.bench_function(name, |b| {
            b.iter(|| integrate_with(&[1.0, 1.0, 1.0], (0.0, 10.0), &settings, lorenz))
        });
    }

    g.finish();
}

criterion_group!(benches, step_n3, quality_step_n3, blasius_full, lorenz_full);
criterion_main!(benches);
