//! Simulation context and per-frame driver
//!
//! [`Simulation`] bundles everything a run needs: the bodies, the clock, the
//! stepper and the read-only configuration. A rendering loop calls
//! [`Simulation::advance_frame`] once per display refresh and draws the
//! returned [`Frame`].

use tracing::{info, trace};

use crate::clock::{Acceptance, AcceptedStep, SimulationClock, Stats};
use crate::config::{ConfigError, IntegratorConfig, ScenarioConfig};
use crate::gravity::GravityField;
use crate::solver::Rkf45;
use crate::state::{self, vector_at, Body, NVec2, SystemState, BODIES};

/// Output of one accepted tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Simulation time after the step
    pub time: f64,
    /// Step size that was committed
    pub step_size: f64,
    /// Step size the next tick will attempt
    pub next_step_size: f64,
    /// Error estimate of the committed step
    pub error: f64,
    /// Error-based proposal from the stepper (diagnostic only)
    pub proposed_step_size: f64,
    /// Whether the step was accepted within tolerance or forced at the floor
    pub acceptance: Acceptance,
    /// Body states after the step
    pub bodies: [Body; BODIES],
}

/// A three-body run
#[derive(Debug, Clone)]
pub struct Simulation {
    config: IntegratorConfig,
    initial_bodies: [Body; BODIES],
    initial_step: f64,
    bodies: [Body; BODIES],
    clock: SimulationClock,
    stepper: Rkf45<GravityField>,
    paused: bool,
}

impl Simulation {
    /// Create a run from already validated inputs
    pub fn new(config: IntegratorConfig, bodies: [Body; BODIES], initial_step: f64) -> Self {
        Self {
            config,
            initial_bodies: bodies,
            initial_step,
            bodies,
            clock: SimulationClock::new(&config, initial_step),
            stepper: Rkf45::gravity(&config),
            paused: false,
        }
    }

    /// Validate a scenario and build a run from it
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, ConfigError> {
        scenario.validate()?;
        let bodies = scenario.to_bodies()?;
        info!(
            g = scenario.integrator.gravitational_constant,
            tol = scenario.integrator.error_tolerance,
            h0 = scenario.initial_step_size,
            "scenario loaded"
        );
        Ok(Self::new(scenario.integrator, bodies, scenario.initial_step_size))
    }

    /// Advance by one accepted step, ignoring the pause flag
    ///
    /// Runs the clock's retry loop and commits the accepted state to every
    /// body at once. Rejected attempts never touch the bodies.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn tick(&mut self) -> Frame {
        let state = SystemState::from_bodies(&self.bodies);
        let masses = state::masses(&self.bodies);

        let step = self.clock.advance(&self.stepper, &state, &masses);
        self.commit(&step);

        trace!(
            t = self.clock.time(),
            h = step.result.h,
            error = step.result.error,
            rejections = step.rejections,
            "step accepted"
        );

        Frame {
            time: self.clock.time(),
            step_size: step.result.h,
            next_step_size: step.next_h,
            error: step.result.error,
            proposed_step_size: step.result.h_proposed,
            acceptance: step.acceptance,
            bodies: self.bodies,
        }
    }

    /// Advance one display frame
    ///
    /// Returns `None` without touching the integrator while paused.
    pub fn advance_frame(&mut self) -> Option<Frame> {
        if self.paused {
            return None;
        }
        Some(self.tick())
    }

    fn commit(&mut self, step: &AcceptedStep) {
        let next = &step.result.state;
        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.update(
                next.position(i),
                next.velocity(i),
                vector_at(&step.result.accelerations, i),
            );
        }
    }

    /// Stop taking ticks
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume taking ticks
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the pause flag, returning the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Whether ticks are suspended
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Re-create bodies and clock from the initial conditions
    ///
    /// The pause flag is left as it was.
    pub fn reset(&mut self) {
        self.bodies = self.initial_bodies;
        self.clock = SimulationClock::new(&self.config, self.initial_step);
    }

    /// Current body states
    pub fn bodies(&self) -> &[Body; BODIES] {
        &self.bodies
    }

    /// Elapsed simulation time
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Step size the next tick will attempt
    pub fn step_size(&self) -> f64 {
        self.clock.step_size()
    }

    /// Integration statistics since start or last reset
    pub fn stats(&self) -> &Stats {
        &self.clock.stats
    }

    /// Configuration of this run
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Total linear momentum
    pub fn total_momentum(&self) -> NVec2 {
        state::total_momentum(&self.bodies)
    }

    /// Kinetic plus gravitational potential energy
    pub fn total_energy(&self) -> f64 {
        let positions = SystemState::from_bodies(&self.bodies).positions;
        let masses = state::masses(&self.bodies);
        state::kinetic_energy(&self.bodies)
            + self.stepper.field().potential_energy(&positions, &masses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_run() -> Simulation {
        Simulation::from_scenario(&ScenarioConfig::default()).unwrap()
    }

    #[test]
    fn tick_commits_all_bodies_and_advances_time() {
        let mut sim = default_run();
        let before = *sim.bodies();

        let frame = sim.tick();

        assert_eq!(frame.time, frame.step_size);
        assert_eq!(sim.time(), frame.time);
        assert_eq!(frame.bodies, *sim.bodies());
        for (b0, b1) in before.iter().zip(sim.bodies()) {
            assert_ne!(b0.x, b1.x);
            assert_ne!(b0.v, b1.v);
            assert_ne!(b1.a, NVec2::zeros());
            assert_eq!(b0.m, b1.m);
        }
    }

    #[test]
    fn paused_frames_do_not_advance() {
        let mut sim = default_run();
        sim.tick();
        let snapshot = *sim.bodies();
        let t = sim.time();
        let stats = sim.stats().clone();

        assert!(sim.toggle_pause());
        assert!(sim.advance_frame().is_none());
        assert!(sim.advance_frame().is_none());

        assert_eq!(*sim.bodies(), snapshot);
        assert_eq!(sim.time(), t);
        assert_eq!(*sim.stats(), stats);

        sim.resume();
        assert!(!sim.is_paused());
        assert!(sim.advance_frame().is_some());
        assert!(sim.time() > t);
    }

    #[test]
    fn reset_restores_initial_conditions() {
        let mut sim = default_run();
        let initial = *sim.bodies();
        let h0 = sim.step_size();
        for _ in 0..50 {
            sim.tick();
        }
        sim.pause();

        sim.reset();

        assert_eq!(*sim.bodies(), initial);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.step_size(), h0);
        assert_eq!(*sim.stats(), Stats::default());
        assert!(sim.is_paused());
    }

    #[test]
    fn rerun_after_reset_is_reproducible() {
        let mut sim = default_run();
        let first: Vec<Frame> = (0..20).map(|_| sim.tick()).collect();
        sim.reset();
        let second: Vec<Frame> = (0..20).map(|_| sim.tick()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_scenario_is_rejected() {
        let mut scenario = ScenarioConfig::default();
        scenario.bodies[0].m = -1.0;
        assert!(Simulation::from_scenario(&scenario).is_err());
    }
}
