//! Runge-Kutta-Fehlberg 4(5) Stepper
//!
//! One embedded RK4(5) step for the planar three-body problem. The system is
//! integrated as two coupled 6-dimensional first-order ODEs:
//!
//! - dx/dt = v
//! - dv/dt = a(x)
//!
//! Each velocity stage feeds the next position stage and each position stage
//! feeds the next velocity stage. The 4th-order solution advances the state;
//! the 5th-order solution is never formed, only its difference from the
//! 4th-order one.
//!
//! The stepper holds no mutable state: identical inputs produce bit-identical
//! results.

use crate::coefficients::{A, C4, E, STAGES};
use crate::config::IntegratorConfig;
use crate::gravity::{ForceField, GravityField};
use crate::state::{Axes, SystemState, AXES_LEN, BODIES};

/// Safety factor of the error-based step proposal
pub const PROPOSAL_SAFETY: f64 = 0.84;

/// Exponent of the error-based step proposal, 1/(order of the advancing method)
pub const PROPOSAL_EXPONENT: f64 = 0.25;

/// Result of a single RKF45 step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Candidate state after the step (4th order solution)
    pub state: SystemState,
    /// Mean acceleration over the step, per axis
    pub accelerations: Axes,
    /// L∞ local truncation error estimate (absolute, unscaled)
    pub error: f64,
    /// Step size used
    pub h: f64,
    /// Error-based step proposal `0.84 h (tol h / error)^(1/4)`
    pub h_proposed: f64,
}

/// Stage increments of one step, already multiplied by `h`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stages {
    /// Position increments `kx_i = h * v_i`
    pub kx: [Axes; STAGES],
    /// Velocity increments `kv_i = h * a(x_i)`
    pub kv: [Axes; STAGES],
}

/// Runge-Kutta-Fehlberg 4(5) stepper
///
/// # Type Parameters
/// * `F` - Acceleration law, [`GravityField`] for the simulation
///
/// # Example
/// ```
/// use threebody::{Body, IntegratorConfig, NVec2, Rkf45, SystemState};
///
/// let config = IntegratorConfig::default();
/// let stepper = Rkf45::gravity(&config);
///
/// let bodies = [
///     Body::new(3e12, NVec2::new(460.0, 180.0), NVec2::zeros()),
///     Body::new(4e12, NVec2::new(580.0, 340.0), NVec2::zeros()),
///     Body::new(5e12, NVec2::new(460.0, 340.0), NVec2::zeros()),
/// ];
/// let state = SystemState::from_bodies(&bodies);
/// let result = stepper.step(&state, &[3e12, 4e12, 5e12], 0.132);
/// assert!(result.error >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Rkf45<F> {
    field: F,
    /// Maximum acceptable per-component error
    pub tolerance: f64,
    /// Returned as the proposal when the error estimate is exactly zero
    pub h_max: f64,
}

impl Rkf45<GravityField> {
    /// Stepper over Newtonian gravity with the constants in `config`
    pub fn gravity(config: &IntegratorConfig) -> Self {
        Self::new(GravityField::new(config.gravitational_constant), config)
    }
}

impl<F: ForceField> Rkf45<F> {
    /// Create a stepper over an arbitrary force field
    pub fn new(field: F, config: &IntegratorConfig) -> Self {
        Self {
            field,
            tolerance: config.error_tolerance,
            h_max: config.max_step_size,
        }
    }

    /// The acceleration law this stepper integrates
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Perform a single integration step of size `h`
    ///
    /// This computes the 6 stages, forms the 4th order solution, estimates the
    /// error and proposes a next step. Acceptance is left to the caller.
    /// Non-finite inputs or degenerate separations propagate into the result.
    pub fn step(&self, state: &SystemState, masses: &[f64; BODIES], h: f64) -> StepResult {
        let stages = self.compute_stages(state, masses, h);

        let dx = weighted_c4(&stages.kx);
        let dv = weighted_c4(&stages.kv);

        let mut positions = state.positions;
        let mut velocities = state.velocities;
        let mut accelerations = [0.0; AXES_LEN];
        for n in 0..AXES_LEN {
            positions[n] += dx[n];
            velocities[n] += dv[n];
            accelerations[n] = dv[n] / h;
        }

        let error = compute_error(&stages);

        StepResult {
            state: SystemState {
                positions,
                velocities,
            },
            accelerations,
            error,
            h,
            h_proposed: self.propose(h, error),
        }
    }

    /// Compute all 6 stages
    ///
    /// Every stage gets fresh position and velocity points built from the base
    /// state plus the row-weighted increments of earlier stages.
    pub fn compute_stages(&self, state: &SystemState, masses: &[f64; BODIES], h: f64) -> Stages {
        let mut kx = [[0.0; AXES_LEN]; STAGES];
        let mut kv = [[0.0; AXES_LEN]; STAGES];

        for i in 0..STAGES {
            let x = stage_point(&state.positions, &kx, i);
            let v = stage_point(&state.velocities, &kv, i);
            let a = self.field.accelerations(&x, masses);

            for n in 0..AXES_LEN {
                kx[i][n] = v[n] * h;
                kv[i][n] = a[n] * h;
            }
        }

        Stages { kx, kv }
    }

    /// Error-based step proposal
    ///
    /// h_new = 0.84 * h * (tol * h / error)^(1/4)
    ///
    /// A zero error has nothing to scale against; the step is kept or grown
    /// to `h_max` instead of dividing by zero.
    pub fn propose(&self, h: f64, error: f64) -> f64 {
        if error == 0.0 {
            return h.max(self.h_max);
        }
        PROPOSAL_SAFETY * h * (self.tolerance * h / error).powf(PROPOSAL_EXPONENT)
    }
}

/// `base + Σ_{j<i} A[i][j] * k_j`, accumulated left to right onto the base
fn stage_point(base: &Axes, k: &[Axes; STAGES], i: usize) -> Axes {
    let mut point = *base;
    for (n, p) in point.iter_mut().enumerate() {
        for j in 0..i {
            *p += A[i][j] * k[j][n];
        }
    }
    point
}

/// `Σ C4[j] * k_j` over the first five stages (C4 has no weight on stage 6)
fn weighted_c4(k: &[Axes; STAGES]) -> Axes {
    let mut sum = [0.0; AXES_LEN];
    for (n, s) in sum.iter_mut().enumerate() {
        for j in 0..STAGES - 1 {
            *s += C4[j] * k[j][n];
        }
    }
    sum
}

/// Compute the local truncation error estimate
///
/// Uses the infinity norm over all 12 components, velocities first:
/// error = max_n |Σ_j E[j] * k_j[n]|
///
/// A NaN in any component makes the whole estimate NaN.
pub fn compute_error(stages: &Stages) -> f64 {
    let mut max_err: f64 = 0.0;

    for k in [&stages.kv, &stages.kx] {
        for n in 0..AXES_LEN {
            let mut err_n = 0.0;
            for j in 0..STAGES {
                err_n += E[j] * k[j][n];
            }
            let err_n = f64::abs(err_n);

            if err_n > max_err || err_n.is_nan() {
                max_err = err_n;
            }
            if max_err.is_nan() {
                return max_err;
            }
        }
    }

    max_err
}
