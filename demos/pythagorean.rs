//! Pythagorean-style three-body run: conservation check.
//!
//! Releases three bodies from rest on a 3-4-5 triangle and integrates until
//! the first close encounters have played out, reporting how well energy and
//! momentum were kept and how hard the step-size controller had to work.
//!
//! Run with:
//!   cargo run --example pythagorean

use threebody::{Acceptance, ScenarioConfig, Simulation};

fn main() {
    let scenario = ScenarioConfig::default();
    let mut sim = Simulation::from_scenario(&scenario).expect("default scenario is valid");

    let e0 = sim.total_energy();
    let p0 = sim.total_momentum();

    let mut smallest = f64::INFINITY;
    let mut largest_error: f64 = 0.0;
    let mut forced = 0u64;
    for _ in 0..5000 {
        let frame = sim.tick();
        smallest = smallest.min(frame.step_size);
        largest_error = largest_error.max(frame.error);
        if frame.acceptance == Acceptance::Forced {
            forced += 1;
        }
    }

    let e1 = sim.total_energy();
    let p1 = sim.total_momentum();

    println!("Three bodies, masses 3:4:5, released from rest");
    println!("  Tolerance:       {:.1e}", scenario.integrator.error_tolerance);
    println!();
    println!("  Final time:      {:.3} s", sim.time());
    println!("  Smallest step:   {:.3e} s", smallest);
    println!("  Largest error:   {:.3e}", largest_error);
    println!("  Forced steps:    {forced}");
    println!();
    println!("  Energy drift (relative): {:.3e}", ((e1 - e0) / e0).abs());
    println!("  Momentum drift:          {:.3e}", (p1 - p0).norm());
    println!();
    for (i, b) in sim.bodies().iter().enumerate() {
        println!(
            "  body {i}: x = ({:.2}, {:.2})  v = ({:.4}, {:.4})",
            b.x.x, b.x.y, b.v.x, b.v.y
        );
    }
    println!();
    let stats = sim.stats();
    println!("  Accepted steps: {}", stats.accepted_steps);
    println!("  Rejected steps: {}", stats.rejected_steps);
    println!("  Function evals: {}", stats.fn_evals);
}
