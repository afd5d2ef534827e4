//! Runge-Kutta-Fehlberg 4(5) Coefficients
//!
//! Coefficients for the classic 6-stage embedded RK4(5) pair from:
//! Fehlberg, E. (1969). "Low-Order Classical Runge-Kutta Formulas with
//! Stepsize Control and their Application to some Heat Transfer Problems"
//! NASA TR R-315, Table III.
//!
//! The 4th-order solution advances the state; the 5th-order weights are
//! only used through their difference from the 4th-order ones.

/// Number of stages in the RKF45 method
pub const STAGES: usize = 6;

/// Order of the solution used to advance the state
pub const ORDER: u8 = 4;

/// Order of the embedded solution (used for error estimation)
pub const EMBEDDED_ORDER: u8 = 5;

/// Node coefficients (c_i)
///
/// The gravitational right-hand side is autonomous, so the stepper never
/// reads these. They are kept to check the row-sum condition of [`A`].
pub const C: [f64; STAGES] = [
    0.0,          // c[0]
    1.0 / 4.0,    // c[1] = 1/4
    3.0 / 8.0,    // c[2] = 3/8
    12.0 / 13.0,  // c[3] = 12/13
    1.0,          // c[4] = 1
    1.0 / 2.0,    // c[5] = 1/2
];

/// Runge-Kutta matrix (a_ij) coefficients
///
/// k_i = h * f(y_n + sum_{j=0}^{i-1} a_{i,j} * k_j)
///
/// Stored as A[i][j] for row i, column j (j < i)
pub const A: [[f64; STAGES - 1]; STAGES] = [
    // Row 0: k_0 = h f(y_n)
    [0.0; 5],

    [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0],

    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],

    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],

    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],

    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];

/// Weights for the 4th-order solution
///
/// y_{n+1} = y_n + sum_{i=0}^{5} c4[i] * k_i
///
/// The last stage has zero weight; it only feeds the error estimate.
pub const C4: [f64; STAGES] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];

/// Weights for the 5th-order solution
pub const C5: [f64; STAGES] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];

/// Error weights: C5[i] - C4[i]
///
/// The local truncation error of a component is |sum_i E[i] * k_i|.
pub const E: [f64; STAGES] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    // Row 4 carries entries near 8, so roundoff is a few ulps of that
    const TOL: f64 = 1e-14;

    #[test]
    fn test_row_sum_condition() {
        for i in 0..STAGES {
            let row_sum: f64 = A[i].iter().sum();
            assert!(
                (row_sum - C[i]).abs() < TOL,
                "Row {} sum = {}, expected c[{}] = {}",
                i, row_sum, i, C[i]
            );
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let c4_sum: f64 = C4.iter().sum();
        assert!((c4_sum - 1.0).abs() < TOL, "4th order weights sum to {}", c4_sum);

        let c5_sum: f64 = C5.iter().sum();
        assert!((c5_sum - 1.0).abs() < TOL, "5th order weights sum to {}", c5_sum);
    }

    #[test]
    fn test_error_weights_are_difference() {
        for i in 0..STAGES {
            let diff = C5[i] - C4[i];
            assert!(
                (E[i] - diff).abs() < TOL,
                "E[{}] = {}, expected C5 - C4 = {}",
                i, E[i], diff
            );
        }

        let err_sum: f64 = E.iter().sum();
        assert!(err_sum.abs() < TOL, "Error weights sum to {}, expected 0.0", err_sum);
    }

    #[test]
    fn test_last_stage_only_feeds_error() {
        assert_eq!(C4[STAGES - 1], 0.0);
        assert!(E[STAGES - 1] != 0.0);
        assert_eq!(C4[1], 0.0);
        assert_eq!(C5[1], 0.0);
    }
}
