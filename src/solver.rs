//! Classical Runge-Kutta 4 stepper with tiered step sizes
//!
//! The stepper advances any [`OdeSystem`] by one fixed step. Step sizes are
//! not error controlled: a [`StepPolicy`] picks one of three tiers from the
//! current radius, refining time resolution as the bubble collapses.

use serde::{Deserialize, Serialize};

use crate::coefficients::{A, B_DENOM, B_NUM, C, STAGES};

/// System of ordinary differential equations: dy/dt = f(t, y)
pub trait OdeSystem<const N: usize> {
    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `t` - Current time
    /// * `y` - Current state vector
    /// * `dydt` - Output: derivative dy/dt
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

/// Step-size tier selected from the bubble radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepTier {
    /// Radius at or above the fine threshold
    Coarse,
    /// Radius below the fine threshold
    Fine,
    /// Radius below the finest threshold
    Finest,
}

/// Amplitude-triggered step policy
///
/// ```text
/// R <  finest_threshold · R0  ->  finest_scale · dt_fine
/// R <  fine_threshold   · R0  ->  dt_fine
/// otherwise                   ->  dt_coarse
/// ```
///
/// A NaN radius fails both comparisons and falls through to the coarse tier.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPolicy {
    /// Equilibrium radius the thresholds are relative to
    pub r0: f64,
    /// Step above the fine threshold
    pub dt_coarse: f64,
    /// Step below the fine threshold
    pub dt_fine: f64,
    /// Fraction of R0 below which the fine step is used (default 0.6)
    pub fine_threshold: f64,
    /// Fraction of R0 below which the finest step is used (default 0.06)
    pub finest_threshold: f64,
    /// Scale applied to `dt_fine` in the finest tier (default 0.02)
    pub finest_scale: f64,
}

impl StepPolicy {
    /// Policy with the default thresholds
    pub fn new(r0: f64, dt_coarse: f64, dt_fine: f64) -> Self {
        Self {
            r0,
            dt_coarse,
            dt_fine,
            fine_threshold: 0.6,
            finest_threshold: 0.06,
            finest_scale: 0.02,
        }
    }

    /// Tier for a given radius
    pub fn tier(&self, radius: f64) -> StepTier {
        if radius < self.fine_threshold * self.r0 {
            if radius < self.finest_threshold * self.r0 {
                StepTier::Finest
            } else {
                StepTier::Fine
            }
        } else {
            StepTier::Coarse
        }
    }

    /// Step size of a tier
    pub fn step_size(&self, tier: StepTier) -> f64 {
        match tier {
            StepTier::Coarse => self.dt_coarse,
            StepTier::Fine => self.dt_fine,
            StepTier::Finest => self.finest_scale * self.dt_fine,
        }
    }

    /// Tier and step size for a given radius
    pub fn select(&self, radius: f64) -> (StepTier, f64) {
        let tier = self.tier(radius);
        (tier, self.step_size(tier))
    }
}

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Total number of function evaluations
    pub fn_evals: u64,
    /// Number of accepted steps
    pub accepted_steps: u64,
    /// Steps taken in the coarse tier
    pub coarse_steps: u64,
    /// Steps taken in the fine tier
    pub fine_steps: u64,
    /// Steps taken in the finest tier
    pub finest_steps: u64,
}

impl Stats {
    /// Account for one accepted step
    pub fn record(&mut self, tier: StepTier) {
        self.fn_evals += STAGES as u64;
        self.accepted_steps += 1;
        match tier {
            StepTier::Coarse => self.coarse_steps += 1,
            StepTier::Fine => self.fine_steps += 1,
            StepTier::Finest => self.finest_steps += 1,
        }
    }
}

/// Classical fourth-order Runge-Kutta stepper
///
/// # Type Parameters
/// * `N` - Dimension of the state vector
///
/// # Example
/// ```
/// use rp_bubble::{OdeSystem, Rk4};
///
/// struct Decay;
///
/// impl OdeSystem<1> for Decay {
///     fn rhs(&self, _t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
///         dydt[0] = -y[0];
///     }
/// }
///
/// let mut rk4 = Rk4::<1>::new();
/// let y = rk4.step(&Decay, 0.0, &[1.0], 0.1);
/// assert!((y[0] - (-0.1f64).exp()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Rk4<const N: usize> {
    /// Stage evaluations (pre-allocated workspace)
    k: [[f64; N]; STAGES],
}

impl<const N: usize> Default for Rk4<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Rk4<N> {
    /// Create a new stepper
    pub fn new() -> Self {
        Self {
            k: [[0.0; N]; STAGES],
        }
    }

    /// Advance `y` at time `t` by one step of size `h`
    ///
    /// Returns `y + (h k1 + 2h k2 + 2h k3 + h k4) / 6`.
    pub fn step<S: OdeSystem<N>>(&mut self, sys: &S, t: f64, y: &[f64; N], h: f64) -> [f64; N] {
        self.compute_stages(sys, t, y, h);
        self.compute_solution(y, h)
    }

    /// Compute the four stages
    #[allow(clippy::needless_range_loop)]
    fn compute_stages<S: OdeSystem<N>>(&mut self, sys: &S, t: f64, y: &[f64; N], h: f64) {
        let mut y_temp = [0.0; N];

        sys.rhs(t, y, &mut self.k[0]);

        for i in 1..STAGES {
            // y_temp = y + sum_j (a[i][j] h) k[j], skipping structural zeros
            for n in 0..N {
                let mut acc = y[n];
                for j in 0..i {
                    if A[i][j] != 0.0 {
                        acc += A[i][j] * h * self.k[j][n];
                    }
                }
                y_temp[n] = acc;
            }

            // The last node is t + h exactly, matching the committed time
            let t_stage = if C[i] == 1.0 { t + h } else { t + C[i] * h };
            sys.rhs(t_stage, &y_temp, &mut self.k[i]);
        }
    }

    /// Combine the stages into the new state
    #[allow(clippy::needless_range_loop)]
    fn compute_solution(&self, y: &[f64; N], h: f64) -> [f64; N] {
        let mut y_new = [0.0; N];

        for n in 0..N {
            let mut sum = 0.0;
            for i in 0..STAGES {
                sum += B_NUM[i] * h * self.k[i][n];
            }
            y_new[n] = y[n] + sum / B_DENOM;
        }

        y_new
    }
}
