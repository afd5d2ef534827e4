//! Acceleration sources for the three-body right-hand side.
//!
//! The stepper only sees the [`ForceField`] trait. [`GravityField`] is the
//! pairwise Newtonian field used by the simulation.

use crate::state::{Axes, AXES_LEN, BODIES, PAIRS};

/// Position-dependent acceleration law: dv/dt = a(x)
///
/// The right-hand side is autonomous (no explicit time dependence),
/// so only positions and masses are passed.
pub trait ForceField {
    /// Evaluate the acceleration of every body
    ///
    /// # Arguments
    /// * `positions` - Per-axis positions `[x0, x1, x2, y0, y1, y2]`
    /// * `masses` - Body masses
    ///
    /// # Returns
    /// Per-axis accelerations in the same layout as `positions`
    fn accelerations(&self, positions: &Axes, masses: &[f64; BODIES]) -> Axes;
}

/// Unsoftened Newtonian gravity between point masses
///
/// a_i = G * Σ_{j≠i} m_j (r_j - r_i) / |r_j - r_i|³
///
/// Coincident bodies divide by zero; the resulting infinities or NaNs are
/// returned as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    /// Gravitational constant
    pub g: f64,
}

impl GravityField {
    /// Create a field with gravitational constant `g`.
    pub fn new(g: f64) -> Self {
        Self { g }
    }

    /// Gravitational potential energy -G Σ_{i<j} m_i m_j / |r_i - r_j|
    pub fn potential_energy(&self, positions: &Axes, masses: &[f64; BODIES]) -> f64 {
        PAIRS
            .iter()
            .map(|&(i, j)| -self.g * masses[i] * masses[j] / separation(positions, i, j))
            .sum()
    }
}

impl ForceField for GravityField {
    fn accelerations(&self, positions: &Axes, masses: &[f64; BODIES]) -> Axes {
        // |r_ij|³ for every ordered pair
        let mut r3 = [[0.0; BODIES]; BODIES];
        for &(i, j) in PAIRS.iter() {
            let r = separation(positions, i, j).powi(3);
            r3[i][j] = r;
            r3[j][i] = r;
        }

        let mut acc = [0.0; AXES_LEN];
        for i in 0..BODIES {
            // Ascending j keeps the summation order fixed
            for j in (0..BODIES).filter(|&j| j != i) {
                let pull = self.g * masses[j];
                for axis in [0, BODIES] {
                    acc[axis + i] += pull * (positions[axis + j] - positions[axis + i]) / r3[i][j];
                }
            }
        }
        acc
    }
}

/// Euclidean distance between bodies `i` and `j`.
#[inline]
fn separation(positions: &Axes, i: usize, j: usize) -> f64 {
    let dx = positions[i] - positions[j];
    let dy = positions[BODIES + i] - positions[BODIES + j];
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{axes_from, vector_at, NVec2};

    fn positions(a: NVec2, b: NVec2, c: NVec2) -> Axes {
        axes_from([a, b, c])
    }

    #[test]
    fn gravity_newton_third_law() {
        let field = GravityField::new(0.1);
        let masses = [2.0, 3.0, 5.0];
        let pos = positions(NVec2::new(-1.0, 0.0), NVec2::new(2.0, 0.5), NVec2::new(0.3, 4.0));

        let acc = field.accelerations(&pos, &masses);

        let net = (0..BODIES).fold(NVec2::zeros(), |f, i| f + vector_at(&acc, i) * masses[i]);
        assert!(net.norm() < 1e-15, "Net force not zero: {:?}", net);
    }

    #[test]
    fn gravity_points_toward_other_bodies() {
        let field = GravityField::new(1.0);
        let masses = [1.0, 1.0, 0.0];
        let pos = positions(NVec2::new(0.0, 0.0), NVec2::new(2.0, 0.0), NVec2::new(0.0, 100.0));

        let acc = field.accelerations(&pos, &masses);

        let a0 = vector_at(&acc, 0);
        let a1 = vector_at(&acc, 1);
        assert!(a0.x > 0.0, "Body 0 not pulled toward body 1: {:?}", a0);
        assert!(a1.x < 0.0, "Body 1 not pulled toward body 0: {:?}", a1);
        assert_eq!(a0.y, 0.0);
        // 1 / 2² at unit mass and G
        assert!((a0.x - 0.25).abs() < 1e-15);
    }

    #[test]
    fn gravity_inverse_square_law() {
        let field = GravityField::new(1.0);
        let masses = [1.0, 1.0, 0.0];
        let far = NVec2::new(0.0, 1e6);
        let near = field.accelerations(&positions(NVec2::zeros(), NVec2::new(1.0, 0.0), far), &masses);
        let wide = field.accelerations(&positions(NVec2::zeros(), NVec2::new(2.0, 0.0), far), &masses);

        let ratio = vector_at(&near, 0).norm() / vector_at(&wide, 0).norm();
        assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
    }

    #[test]
    fn zero_gravity_gives_zero_acceleration() {
        let field = GravityField::new(0.0);
        let pos = positions(NVec2::new(1.0, 1.0), NVec2::new(2.0, 3.0), NVec2::new(-4.0, 0.5));
        let acc = field.accelerations(&pos, &[1.0, 2.0, 3.0]);
        assert!(acc.iter().all(|&a| a == 0.0));
    }

    #[test]
    fn coincident_bodies_propagate_non_finite() {
        let field = GravityField::new(1.0);
        let p = NVec2::new(3.0, 3.0);
        let acc = field.accelerations(&positions(p, p, NVec2::new(10.0, 0.0)), &[1.0, 1.0, 1.0]);
        assert!(acc.iter().any(|a| !a.is_finite()));
    }

    #[test]
    fn potential_energy_of_single_pair() {
        let field = GravityField::new(2.0);
        let pos = positions(NVec2::zeros(), NVec2::new(3.0, 4.0), NVec2::new(100.0, 0.0));
        let u = field.potential_energy(&pos, &[1.5, 2.0, 0.0]);
        assert!((u - (-2.0 * 1.5 * 2.0 / 5.0)).abs() < 1e-15);
    }
}
