//! # Kepler equation solver
//!
//! Solves the elliptic Kepler equation `M = E − e·sin(E)` for the eccentric anomaly `E`
//! and derives the true anomaly `v` from it.
//!
//! The solver follows M. A. Murison, *A Practical Method for Solving the Kepler Equation*
//! (2006):
//!
//! - the starting value is a closed-form third-order series in `e` and `cos(M)`,
//!   which is already accurate to `O(e⁴)`,
//! - every iteration applies a third-order correction, so convergence is cubic
//!   rather than the quadratic rate of a plain Newton–Raphson step.
//!
//! Angles are raw radians: the solver never wraps `M` into `[0, 2π)`, so the returned
//! `E` lives on the same branch as the input mean anomaly.
//!
//! ## Example
//!
//! ```rust
//! use groundtrack::kepler::{solve_kepler, true_anomaly};
//!
//! let e = 0.1;
//! let ecc_anomaly = solve_kepler(1.0, e).unwrap();
//! assert!((ecc_anomaly - e * ecc_anomaly.sin() - 1.0).abs() < 1e-12);
//!
//! let v = true_anomaly(e, ecc_anomaly);
//! assert!(v > ecc_anomaly);
//! ```

use std::f64::consts::PI;

use tracing::warn;

use crate::constants::{Radian, DPI, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE};
use crate::groundtrack_errors::GroundTrackError;

/// Iterative Kepler equation solver with tunable precision.
///
/// Fields
/// ------
/// * `tolerance` – stop when two successive iterates differ by less than this (radians).
/// * `max_iterations` – safety bound on the number of corrections; reaching it is not an
///   error, the last iterate is returned.
///
/// The [`Default`] implementation uses [`KEPLER_TOLERANCE`] and [`KEPLER_MAX_ITERATIONS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        KeplerSolver {
            tolerance: KEPLER_TOLERANCE,
            max_iterations: KEPLER_MAX_ITERATIONS,
        }
    }
}

impl KeplerSolver {
    /// Build a solver with explicit precision settings.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        KeplerSolver {
            tolerance,
            max_iterations,
        }
    }

    /// Solve Kepler's equation for the eccentric anomaly.
    ///
    /// Arguments
    /// ---------
    /// * `mean_anomaly`: mean anomaly `M` in radians (any real value).
    /// * `eccentricity`: orbital eccentricity, must lie in `[0, 1)`.
    ///
    /// Return
    /// ------
    /// * `Ok(E)` – eccentric anomaly in radians.
    /// * `Err(GroundTrackError::InvalidEccentricity)` if `e` is outside `[0, 1)` or NaN.
    ///
    /// Remarks
    /// -------
    /// * `e = 0` yields `E = M` exactly after one correction.
    /// * Close to `e → 1` convergence slows down; the iteration cap then bounds the work.
    pub fn solve(&self, mean_anomaly: Radian, eccentricity: f64) -> Result<Radian, GroundTrackError> {
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(GroundTrackError::InvalidEccentricity(eccentricity));
        }

        let mut e_prev = murison_initial_guess(mean_anomaly, eccentricity);
        let mut e_next = e_prev;

        for _ in 0..self.max_iterations {
            e_next = e_prev - murison_correction(mean_anomaly, eccentricity, e_prev);
            if (e_next - e_prev).abs() < self.tolerance {
                return Ok(e_next);
            }
            e_prev = e_next;
        }

        warn!(
            mean_anomaly,
            eccentricity,
            max_iterations = self.max_iterations,
            "Kepler solver reached its iteration cap before converging"
        );
        Ok(e_next)
    }
}

/// Solve Kepler's equation with the default [`KeplerSolver`] settings.
///
/// See [`KeplerSolver::solve`].
pub fn solve_kepler(mean_anomaly: Radian, eccentricity: f64) -> Result<Radian, GroundTrackError> {
    KeplerSolver::default().solve(mean_anomaly, eccentricity)
}

/// Third-order starting value for the eccentric anomaly.
fn murison_initial_guess(m: f64, ecc: f64) -> f64 {
    let e2 = ecc * ecc;
    let e3 = ecc * e2;
    let cos_m = m.cos();
    m + (-0.5 * e3 + ecc + (e2 + 1.5 * cos_m * e3) * cos_m) * m.sin()
}

/// Third-order correction `ε` such that `E_next = E − ε`.
fn murison_correction(m: f64, ecc: f64, x: f64) -> f64 {
    let (sin_x, cos_x) = x.sin_cos();
    let t2 = ecc * cos_x - 1.0;
    let t4 = ecc * sin_x;
    let residual = m - x + t4;
    let t6 = residual / (0.5 * residual * t4 / t2 + t2);
    residual / ((0.5 * sin_x - cos_x * t6 / 6.0) * ecc * t6 + t2)
}

/// True anomaly from the eccentric anomaly.
///
/// Uses the half-angle relation
///
/// ```text
/// v = 2·atan2( √(1+e)·sin(E/2), √(1−e)·cos(E/2) )
/// ```
///
/// which never divides by a vanishing denominator and has no quadrant ambiguity.
/// The result stays continuous across `E = π` (the branch cut sits at `E = ±2π`).
pub fn true_anomaly(eccentricity: f64, eccentric_anomaly: Radian) -> Radian {
    let (sin_half, cos_half) = (0.5 * eccentric_anomaly).sin_cos();
    2.0 * ((1.0 + eccentricity).sqrt() * sin_half).atan2((1.0 - eccentricity).sqrt() * cos_half)
}

/// Mean anomaly from the eccentric anomaly (Kepler's equation, forward direction).
pub fn mean_anomaly(eccentric_anomaly: Radian, eccentricity: f64) -> Radian {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Principal value of an angle in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Principal difference between two angles, in `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = principal_angle(a) - principal_angle(b);

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_residual_over_eccentricity_grid() {
        for i in 0..=99 {
            let e = i as f64 * 0.01;
            for j in 0..64 {
                let m = j as f64 * DPI / 64.0;
                let ecc_anomaly = solve_kepler(m, e).unwrap();
                let residual = ecc_anomaly - e * ecc_anomaly.sin() - m;
                assert!(
                    residual.abs() < 1e-12,
                    "e = {e}, M = {m}, residual = {residual}"
                );
            }
        }
    }

    #[test]
    fn test_residual_random_inputs() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..5_000 {
            let e = rng.random_range(0.0..=0.99);
            let m = rng.random_range(0.0..DPI);
            let ecc_anomaly = solve_kepler(m, e).unwrap();
            assert!((mean_anomaly(ecc_anomaly, e) - m).abs() < 1e-12);
        }
    }

    #[test]
    fn test_circular_orbit_is_identity() {
        for m in [0.0, 0.3, 1.0, PI, 4.5, 6.2, -2.0, 17.0] {
            assert_eq!(solve_kepler(m, 0.0).unwrap(), m);
        }
    }

    #[test]
    fn test_no_wraparound() {
        let e = 0.3;
        let m = 3.0 * DPI + 0.5;
        let ecc_anomaly = solve_kepler(m, e).unwrap();
        assert!(ecc_anomaly > 3.0 * DPI);
        assert!((mean_anomaly(ecc_anomaly, e) - m).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_eccentricity() {
        assert_eq!(
            solve_kepler(1.0, 1.0),
            Err(GroundTrackError::InvalidEccentricity(1.0))
        );
        assert_eq!(
            solve_kepler(1.0, -0.1),
            Err(GroundTrackError::InvalidEccentricity(-0.1))
        );
        assert!(solve_kepler(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_iteration_cap_returns_last_iterate() {
        let solver = KeplerSolver::new(0.0, 3);
        let ecc_anomaly = solver.solve(2.0, 0.5).unwrap();
        assert!((mean_anomaly(ecc_anomaly, 0.5) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_true_anomaly_reference_points() {
        assert_abs_diff_eq!(true_anomaly(0.5, 0.0), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(true_anomaly(0.5, PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(true_anomaly(0.0, 1.234), 1.234, epsilon = 1e-15);

        // cos(v) = (cos E − e) / (1 − e cos E)
        let (e, ecc_anomaly) = (0.3_f64, 1.1_f64);
        let v = true_anomaly(e, ecc_anomaly);
        let expected_cos = (ecc_anomaly.cos() - e) / (1.0 - e * ecc_anomaly.cos());
        assert_abs_diff_eq!(v.cos(), expected_cos, epsilon = 1e-14);
    }

    #[test]
    fn test_true_anomaly_continuous_across_pi() {
        for e in [0.0, 0.1, 0.5, 0.9, 0.99] {
            let before = true_anomaly(e, PI - 1e-6);
            let after = true_anomaly(e, PI + 1e-6);
            // dv/dE at apoapsis is sqrt((1 - e) / (1 + e))
            let slope = ((1.0 - e) / (1.0 + e)).sqrt();
            assert!(after > before);
            assert!(after - before < 4e-6, "jump at e = {e}");
            assert_abs_diff_eq!(after - before, 2e-6 * slope, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_angle_helpers() {
        assert_abs_diff_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(DPI + 0.25), 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-15);
        assert_abs_diff_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-15);
    }
}
