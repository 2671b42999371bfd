//! Blasius boundary layer: `f''' = -½ f f''`, written as the first-order
//! system `u = [f, f', f'']`.

use cashkarp::ode::{integrate_with, IntegrateSettings, KernelChoice};
use cashkarp::{integrate, OdeError};

/// `f''(0)` of the Blasius solution, to the usual five digits.
const SHEAR: f64 = 0.33206;

fn blasius(_eta: f64, u: &[f64], dudt: &mut [f64]) {
    dudt[0] = u[1];
    dudt[1] = u[2];
    dudt[2] = -0.5 * u[0] * u[2];
}

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

#[test]
fn far_field_exhausts_step_budget() -> Result<(), OdeError> {
    // Once f'' settles near 1e-35 the 1e-30 scale floor and the -f/2
    // eigenvalue of the f'' equation make the far field stiff, so the full
    // [0, 50000] span does not fit in 100_000 steps.
    let end = 50_000.0;
    let traj = integrate(&[0.0, 0.0, SHEAR], (0.0, end), 1e-5, 0.1, 0.0, 100_000, blasius)?;

    assert!(!traj.reached(end));
    assert_eq!(traj.accepted, 100_001);
    assert_eq!(traj.len(), 100_002);
    let (eta, u) = traj.last().unwrap();
    assert_near(eta, 1224.6496, 1e-3, "final eta");

    assert_near(u[0], 1222.934, 1e-2, "f");
    assert_near(u[1], 1.0, 1e-5, "f'");
    assert!(u[2] > 1.3e-35 && u[2] < 1.4e-35, "f'' = {}", u[2]);
    Ok(())
}

#[test]
fn outer_edge_reaches_end() -> Result<(), OdeError> {
    let end = 50.0;
    let traj = integrate(&[0.0, 0.0, SHEAR], (0.0, end), 1e-5, 0.1, 0.0, 100_000, blasius)?;

    assert!(traj.reached(end), "truncated after {} steps", traj.accepted);
    let (eta, u) = traj.last().unwrap();
    assert_eq!(eta, end);

    // Outside the layer f' → 1, f'' → 0 and f grows like eta - 1.7208.
    assert_near(u[1], 1.0, 1e-3, "f'");
    assert!(u[2].abs() < 1e-6, "f'' = {}", u[2]);
    assert_near(u[0], end - 1.7208, 1e-2, "f");
    Ok(())
}

#[test]
fn profile_matches_table() -> Result<(), OdeError> {
    let settings = IntegrateSettings {
        tolerance: 1e-9,
        initial_step: 0.1,
        ..IntegrateSettings::default()
    };
    let traj = integrate_with(&[0.0, 0.0, SHEAR], (0.0, 5.0), &settings, blasius)?;
    let (eta, u) = traj.last().unwrap();
    assert_eq!(eta, 5.0);

    // Howarth's table at eta = 5.
    assert_near(u[0], 3.28329, 1e-3, "f(5)");
    assert_near(u[1], 0.99155, 1e-4, "f'(5)");
    assert_near(u[2], 0.01591, 1e-4, "f''(5)");

    // Monotone velocity profile.
    for w in traj.u.windows(2) {
        assert!(w[1][1] >= w[0][1]);
    }
    Ok(())
}

#[test]
fn backward_recovers_wall_values() -> Result<(), OdeError> {
    let settings = IntegrateSettings {
        tolerance: 1e-11,
        initial_step: 0.1,
        ..IntegrateSettings::default()
    };
    let forward = integrate_with(&[0.0, 0.0, SHEAR], (0.0, 5.0), &settings, blasius)?;
    let (_, edge) = forward.last().unwrap();

    let backward = integrate_with(edge, (5.0, 0.0), &settings, blasius)?;
    assert_eq!(backward.t[0], 5.0);
    let (eta, u) = backward.last().unwrap();
    assert_eq!(eta, 0.0);
    for w in backward.t.windows(2) {
        assert!(w[1] < w[0]);
    }

    assert!(u[0].abs() < 1e-6);
    assert!(u[1].abs() < 1e-6);
    assert_near(u[2], SHEAR, 1e-6, "f''(0)");
    Ok(())
}

#[test]
fn kernels_agree_on_blasius() -> Result<(), OdeError> {
    let run = |kernel: KernelChoice| {
        let settings = IntegrateSettings {
            tolerance: 1e-8,
            initial_step: 0.1,
            kernel,
            ..IntegrateSettings::default()
        };
        integrate_with(&[0.0, 0.0, SHEAR], (0.0, 10.0), &settings, blasius)
    };
    let scalar = run(KernelChoice::Scalar)?;
    let parallel = run(KernelChoice::Parallel)?;
    assert_eq!(scalar.t, parallel.t);
    assert_eq!(scalar.u, parallel.u);
    assert_eq!(scalar.accepted, parallel.accepted);
    Ok(())
}
