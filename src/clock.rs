//! Simulation clock and step-size control
//!
//! Owns the global simulation time `t` and the step size `dt` to attempt on
//! the next tick. Each tick runs a retry loop:
//!
//! ```text
//! Attempting(h) ── error <= tol ──────────────▶ Accepted   next dt = min(1.2 h, h_max)
//!      │
//!      └── error > tol ── h > h_min ─▶ Attempting(max(0.8 h, h_min))
//!                     └── h = h_min ─▶ Forced     next dt = h_min
//! ```
//!
//! The stepper's error-based proposal is not used for the next step; the
//! fixed ±20% policy is. The proposal is still reported in [`AcceptedStep`].

use tracing::debug;

use crate::coefficients::STAGES;
use crate::config::IntegratorConfig;
use crate::gravity::ForceField;
use crate::solver::{Rkf45, StepResult};
use crate::state::{SystemState, BODIES};

/// Step shrink factor after a rejected attempt
pub const SHRINK_FACTOR: f64 = 0.8;

/// Step growth factor after an accepted step
pub const GROWTH_FACTOR: f64 = 1.2;

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of force-field evaluations
    pub fn_evals: u64,
    /// Steps accepted within tolerance
    pub accepted_steps: u64,
    /// Attempts rejected and retried with a smaller step
    pub rejected_steps: u64,
    /// Steps accepted at the step-size floor regardless of error
    pub forced_steps: u64,
}

/// Why a step was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Error estimate within tolerance
    WithinTolerance,
    /// Step-size floor reached; accepted regardless of error
    Forced,
}

/// A committed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedStep {
    /// Stepper output that was committed; `result.h` is the step taken
    pub result: StepResult,
    /// Acceptance reason
    pub acceptance: Acceptance,
    /// Number of rejected attempts before this one
    pub rejections: u32,
    /// Step size that will be attempted next tick
    pub next_h: f64,
}

/// Owner of simulation time and step size
#[derive(Debug, Clone)]
pub struct SimulationClock {
    t: f64,
    dt: f64,
    tolerance: f64,
    /// Minimum step size
    pub h_min: f64,
    /// Maximum step size
    pub h_max: f64,
    /// Integration statistics
    pub stats: Stats,
}

impl SimulationClock {
    /// Start at `t = 0` with `initial_step` clamped into the configured bounds
    pub fn new(config: &IntegratorConfig, initial_step: f64) -> Self {
        Self {
            t: 0.0,
            dt: initial_step.clamp(config.min_step_size, config.max_step_size),
            tolerance: config.error_tolerance,
            h_min: config.min_step_size,
            h_max: config.max_step_size,
            stats: Stats::default(),
        }
    }

    /// Elapsed simulation time
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Step size the next tick will attempt first
    pub fn step_size(&self) -> f64 {
        self.dt
    }

    /// Run the retry loop until a step is accepted
    ///
    /// Rejected attempts leave time untouched; only the accepted attempt's `h`
    /// is added to `t`. The caller commits `result.state` to its bodies.
    pub fn advance<F: ForceField>(
        &mut self,
        stepper: &Rkf45<F>,
        state: &SystemState,
        masses: &[f64; BODIES],
    ) -> AcceptedStep {
        let mut h = self.dt;
        let mut rejections = 0u32;

        loop {
            let result = stepper.step(state, masses, h);
            self.stats.fn_evals += STAGES as u64;

            if result.error <= self.tolerance {
                self.stats.accepted_steps += 1;
                let next_h = (GROWTH_FACTOR * h).min(self.h_max);
                return self.commit(result, Acceptance::WithinTolerance, rejections, next_h);
            }

            if h <= self.h_min {
                self.stats.forced_steps += 1;
                debug!(
                    t = self.t,
                    h,
                    error = result.error,
                    "step-size floor reached, forcing acceptance"
                );
                return self.commit(result, Acceptance::Forced, rejections, self.h_min);
            }

            self.stats.rejected_steps += 1;
            rejections += 1;
            debug!(h, error = result.error, "step rejected");
            h = (SHRINK_FACTOR * h).max(self.h_min);
        }
    }

    fn commit(
        &mut self,
        result: StepResult,
        acceptance: Acceptance,
        rejections: u32,
        next_h: f64,
    ) -> AcceptedStep {
        self.t += result.h;
        self.dt = next_h;
        AcceptedStep {
            result,
            acceptance,
            rejections,
            next_h,
        }
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }
}
