//! Classical Runge-Kutta 4 Coefficients
//!
//! Butcher tableau of the classical fourth-order Runge-Kutta method:
//!
//! ```text
//!   0   |
//!  1/2  | 1/2
//!  1/2  |  0   1/2
//!   1   |  0    0    1
//! ------+--------------------
//!       | 1/6  1/3  1/3  1/6
//! ```
//!
//! The weights are stored as integer multiplicities over a common
//! denominator so the update reads `y + (h k1 + 2h k2 + 2h k3 + h k4) / 6`.

/// Number of stages in the classical RK4 method
pub const STAGES: usize = 4;

/// Order of the method
pub const ORDER: u8 = 4;

/// Node coefficients (c_i): stage i is evaluated at t_n + c[i]*h
pub const C: [f64; STAGES] = [0.0, 0.5, 0.5, 1.0];

/// Runge-Kutta matrix (a_ij), lower triangular
///
/// k_i = f(t_n + c_i*h, y_n + h * sum_{j<i} a_{i,j} * k_j)
pub const A: [[f64; STAGES - 1]; STAGES] = [
    [0.0, 0.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, 0.0, 1.0],
];

/// Weight multiplicities (b_i * B_DENOM)
pub const B_NUM: [f64; STAGES] = [1.0, 2.0, 2.0, 1.0];

/// Common denominator of the weights
pub const B_DENOM: f64 = 6.0;
