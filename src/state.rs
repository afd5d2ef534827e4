//! Core state types for the three-body simulation.
//!
//! - [`Body`] holds one point mass with `NVec2` vectors.
//! - [`SystemState`] is the 12-scalar phase-space point the integrator
//!   advances, stored per axis as `[x0, x1, x2, y0, y1, y2]`.

use nalgebra::Vector2;

/// 2D vector used for body kinematics
pub type NVec2 = Vector2<f64>;

/// Number of bodies in a run
pub const BODIES: usize = 3;

/// Length of a per-axis component array (x block followed by y block)
pub const AXES_LEN: usize = 2 * BODIES;

/// Per-axis component array: `[x0, x1, x2, y0, y1, y2]`
pub type Axes = [f64; AXES_LEN];

/// Unordered body pairs `(i, j)` with `i < j`, in summation order
pub const PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Read body `i` out of a per-axis array.
#[inline]
pub fn vector_at(axes: &Axes, i: usize) -> NVec2 {
    NVec2::new(axes[i], axes[BODIES + i])
}

/// Build a per-axis array from one vector per body.
pub fn axes_from(vectors: [NVec2; BODIES]) -> Axes {
    let mut axes = [0.0; AXES_LEN];
    for (i, v) in vectors.iter().enumerate() {
        axes[i] = v.x;
        axes[BODIES + i] = v.y;
    }
    axes
}

/// One gravitating point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Position
    pub x: NVec2,
    /// Velocity
    pub v: NVec2,
    /// Mean acceleration over the last accepted step
    pub a: NVec2,
    /// Mass, constant for the run
    pub m: f64,
}

impl Body {
    /// Create a body with zero acceleration; `a` is filled by the first step.
    pub fn new(m: f64, x: NVec2, v: NVec2) -> Self {
        Self { x, v, a: NVec2::zeros(), m }
    }

    /// Overwrite the kinematic state from an accepted step.
    pub fn update(&mut self, x: NVec2, v: NVec2, a: NVec2) {
        self.x = x;
        self.v = v;
        self.a = a;
    }

    /// Linear momentum `m v`
    pub fn momentum(&self) -> NVec2 {
        self.v * self.m
    }

    /// Kinetic energy `m |v|² / 2`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}

/// Positions and velocities of all bodies at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemState {
    /// Positions `[x0, x1, x2, y0, y1, y2]`
    pub positions: Axes,
    /// Velocities `[vx0, vx1, vx2, vy0, vy1, vy2]`
    pub velocities: Axes,
}

impl SystemState {
    /// Snapshot the positions and velocities of `bodies`.
    pub fn from_bodies(bodies: &[Body; BODIES]) -> Self {
        Self {
            positions: axes_from([bodies[0].x, bodies[1].x, bodies[2].x]),
            velocities: axes_from([bodies[0].v, bodies[1].v, bodies[2].v]),
        }
    }

    /// Position of body `i`
    pub fn position(&self, i: usize) -> NVec2 {
        vector_at(&self.positions, i)
    }

    /// Velocity of body `i`
    pub fn velocity(&self, i: usize) -> NVec2 {
        vector_at(&self.velocities, i)
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(self.velocities.iter())
            .all(|c| c.is_finite())
    }
}

/// Masses in body order.
pub fn masses(bodies: &[Body; BODIES]) -> [f64; BODIES] {
    [bodies[0].m, bodies[1].m, bodies[2].m]
}

/// Total linear momentum `Σ m_i v_i`.
pub fn total_momentum(bodies: &[Body]) -> NVec2 {
    bodies.iter().fold(NVec2::zeros(), |p, b| p + b.momentum())
}

/// Total kinetic energy of `bodies`.
pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}
