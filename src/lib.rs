//! # threebody: Planar Three-Body Problem with RKF4(5)
//!
//! Real-time integration of three mutually gravitating point masses in two
//! dimensions, advanced by an adaptive Runge-Kutta-Fehlberg 4(5) stepper.
//!
//! ## Features
//!
//! - 6-stage embedded RK4(5) pair; the 4th-order solution advances the state
//! - L∞ local truncation error from the embedded 5th-order difference
//! - Bounded retry loop: shrink by 0.8 on rejection, grow by 1.2 on
//!   acceptance, forced acceptance at the step-size floor
//! - Pure stepper: identical inputs give bit-identical results
//! - YAML scenarios and a headless command-line runner
//!
//! ## Basic Usage
//!
//! ```rust
//! use threebody::{ScenarioConfig, Simulation};
//!
//! let scenario = ScenarioConfig::default();
//! let mut sim = Simulation::from_scenario(&scenario).unwrap();
//!
//! let p0 = sim.total_momentum();
//! for _ in 0..100 {
//!     let frame = sim.tick();
//!     assert!(frame.step_size <= scenario.integrator.max_step_size);
//! }
//! assert!((sim.total_momentum() - p0).norm() < 1.0);
//! ```
//!
//! ## Single Steps
//!
//! The stepper can be driven directly; it never commits anything.
//!
//! ```rust
//! use threebody::{Body, IntegratorConfig, NVec2, Rkf45, SimulationClock, SystemState};
//!
//! let config = IntegratorConfig { gravitational_constant: 1.0, ..Default::default() };
//! let bodies = [
//!     Body::new(1.0, NVec2::new(-1.0, 0.0), NVec2::new(0.0, -0.5)),
//!     Body::new(1.0, NVec2::new(1.0, 0.0), NVec2::new(0.0, 0.5)),
//!     Body::new(1e-9, NVec2::new(0.0, 40.0), NVec2::zeros()),
//! ];
//! let state = SystemState::from_bodies(&bodies);
//! let masses = [1.0, 1.0, 1e-9];
//!
//! let stepper = Rkf45::gravity(&config);
//! let mut clock = SimulationClock::new(&config, 0.05);
//! let step = clock.advance(&stepper, &state, &masses);
//! assert_eq!(clock.time(), step.result.h);
//! ```
//!
//! ## Error Control
//!
//! The tolerance is absolute and applied to every position and velocity
//! component. The error-based proposal `0.84 h (tol h / err)^(1/4)` is computed
//! for every step and reported, but the next step size follows the fixed
//! ±20% policy, which grows more readily in practice.
//!
//! ## References
//!
//! 1. Fehlberg, E. (1969). "Low-Order Classical Runge-Kutta Formulas with
//!    Stepsize Control and their Application to some Heat Transfer
//!    Problems". NASA TR R-315.
//!
//! 2. Mathews, J.H. & Fink, K.K. (2004). "Numerical Methods Using Matlab",
//!    4th ed., Prentice-Hall.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod clock;
pub mod coefficients;
pub mod config;
pub mod gravity;
pub mod simulation;
pub mod solver;
pub mod state;

pub use clock::{Acceptance, AcceptedStep, SimulationClock, Stats};
pub use config::{BodyConfig, ConfigError, IntegratorConfig, ScenarioConfig};
pub use gravity::{ForceField, GravityField};
pub use simulation::{Frame, Simulation};
pub use solver::{Rkf45, StepResult};
pub use state::{Axes, Body, NVec2, SystemState, BODIES};
