//! Bubble simulation driver
//!
//! [`Bubble`] owns the parameters, the recorded trajectory and the lagged
//! pressure feedback, and runs the tiered RK4 loop:
//!
//! 1. pick the step from the last committed radius,
//! 2. take one RK4 step with the lagged `ṗ_gas` bound into the model,
//! 3. commit time, state and gas pressure,
//!
//! until the last committed time reaches `t_start + t_run`. The last step may
//! overshoot the end time; it is not shortened.

use log::{debug, info, warn};

use crate::error::{BubbleError, Result};
use crate::feedback::PressureFeedback;
use crate::model::RayleighPlesset;
use crate::params::BubbleParams;
use crate::solver::{Rk4, Stats, StepPolicy, StepTier};
use crate::trajectory::{FinalizedTrajectory, Trajectory};

/// One committed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Time at the end of the step
    pub t: f64,
    /// State `[R, Ṙ]` at the end of the step
    pub y: [f64; 2],
    /// Gas pressure at the end of the step
    pub p_gas: f64,
    /// Step size taken
    pub h: f64,
    /// Tier the step size came from
    pub tier: StepTier,
    /// Whether the radiation term entered this step
    pub radiation_applied: bool,
}

/// A single driven gas bubble and its recorded history
///
/// # Example
/// ```
/// use rp_bubble::{Bubble, BubbleParams};
///
/// let params = BubbleParams {
///     t_run: 1e-7,
///     ..Default::default()
/// };
/// let mut bubble = Bubble::new(params).unwrap();
/// let (t, y) = bubble.integrate().unwrap();
///
/// assert!(t >= 1e-7);
/// assert!(y[0] > 0.0);
/// assert_eq!(bubble.trajectory().len(), bubble.stats.accepted_steps as usize + 1);
/// ```
#[derive(Debug, Clone)]
pub struct Bubble {
    params: BubbleParams,
    model: RayleighPlesset,
    policy: StepPolicy,
    trajectory: Trajectory,
    feedback: PressureFeedback,
    stepper: Rk4<2>,
    /// Integration statistics
    pub stats: Stats,
    /// Optional ceiling on the number of steps a single call may take
    pub max_steps: Option<u64>,
    warned_non_finite: bool,
}

impl Bubble {
    /// Validate the parameters and seed the trajectory with the initial state
    pub fn new(params: BubbleParams) -> Result<Self> {
        params.validate()?;
        let mut bubble = Self::assemble(params, Trajectory::new(), Stats::default());
        bubble.seed();
        Ok(bubble)
    }

    /// Rebuild a simulation from previously recorded parts.
    ///
    /// The feedback state is recovered from the tail of the trajectory, so
    /// continuing the run reproduces an uninterrupted one. A non-empty
    /// trajectory must start at the seeded time and state of `params`.
    pub fn from_parts(params: BubbleParams, trajectory: Trajectory, stats: Stats) -> Result<Self> {
        params.validate()?;
        trajectory.check()?;
        if let (Some(&t0), Some(&y0)) = (trajectory.time().first(), trajectory.states().first()) {
            let seed = [params.r_start, params.dr_start];
            if t0 != params.t_start || y0 != seed {
                return Err(BubbleError::InvalidTrajectory(format!(
                    "first sample (t = {:e}, y = {:?}) does not match the seed (t = {:e}, y = {:?})",
                    t0, y0, params.t_start, seed
                )));
            }
        }
        let mut bubble = Self::assemble(params, trajectory, stats);
        if bubble.trajectory.is_empty() {
            bubble.seed();
        }
        bubble.warned_non_finite = bubble
            .trajectory
            .states()
            .iter()
            .any(|y| !y[0].is_finite());
        Ok(bubble)
    }

    fn assemble(params: BubbleParams, trajectory: Trajectory, stats: Stats) -> Self {
        let model = RayleighPlesset::new(&params);
        let policy = StepPolicy::new(params.r0, params.dt_coarse, params.dt_fine);
        let feedback = PressureFeedback::from_trajectory(&trajectory);
        Self {
            params,
            model,
            policy,
            trajectory,
            feedback,
            stepper: Rk4::new(),
            stats,
            max_steps: None,
            warned_non_finite: false,
        }
    }

    fn seed(&mut self) {
        let y0 = [self.params.r_start, self.params.dr_start];
        self.commit(self.params.t_start, y0, self.model.gas_pressure(y0[0]));
    }

    fn commit(&mut self, t: f64, y: [f64; 2], p_gas: f64) {
        self.trajectory.push(t, y, p_gas);
        self.feedback.commit(t, p_gas);
    }

    /// Simulation parameters
    pub fn params(&self) -> &BubbleParams {
        &self.params
    }

    /// Physical model built from the parameters
    pub fn model(&self) -> &RayleighPlesset {
        &self.model
    }

    /// Step policy built from the parameters
    pub fn policy(&self) -> &StepPolicy {
        &self.policy
    }

    /// Recorded history
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Gas pressure for radius `r`
    pub fn calculate_pgas(&self, r: f64) -> f64 {
        self.model.gas_pressure(r)
    }

    /// True once the configured end time has been reached
    pub fn is_complete(&self) -> bool {
        self.last_time() >= self.params.t_end()
    }

    // The trajectory always holds at least the seed sample.
    fn last_time(&self) -> f64 {
        self.trajectory.last().map_or(self.params.t_start, |(t, _, _)| t)
    }

    fn last_state(&self) -> [f64; 2] {
        self.trajectory
            .last()
            .map_or([self.params.r_start, self.params.dr_start], |(_, y, _)| y)
    }

    /// Take and commit one step
    pub fn step(&mut self) -> StepRecord {
        let t = self.last_time();
        let y = self.last_state();

        let (tier, dt) = self.policy.select(y[0]);
        let t_new = t + dt;
        let h = t_new - t;

        let pg_dot = self.feedback.rate();
        let radiation_applied = self.model.radiates() && pg_dot.is_some();
        let rhs = self.model.with_feedback(pg_dot);
        let y_new = self.stepper.step(&rhs, t, &y, h);
        let p_gas = self.model.gas_pressure(y_new[0]);

        self.commit(t_new, y_new, p_gas);
        self.stats.record(tier);

        if !y_new[0].is_finite() && !self.warned_non_finite {
            warn!("radius became non-finite at t = {:e}; values propagate", t_new);
            self.warned_non_finite = true;
        }

        StepRecord {
            t: t_new,
            y: y_new,
            p_gas,
            h,
            tier,
            radiation_applied,
        }
    }

    /// Run until the configured end time `t_start + t_run`.
    ///
    /// Returns the last committed time and state. Once the end time has been
    /// reached, further calls take no step; use [`Bubble::integrate_until`]
    /// to extend the run or [`Bubble::reset`] to start over.
    pub fn integrate(&mut self) -> Result<(f64, [f64; 2])> {
        self.integrate_until(self.params.t_end())
    }

    /// Run until the last committed time reaches `t_end`
    ///
    /// Fails with `InvalidParameter` if `t_end` is so large that a step would
    /// no longer advance time before reaching it.
    pub fn integrate_until(&mut self, t_end: f64) -> Result<(f64, [f64; 2])> {
        if self.last_time() < t_end {
            self.params.check_step_resolution(self.last_time(), t_end)?;
        }
        let start_steps = self.stats.accepted_steps;
        let mut tier = self.policy.tier(self.last_state()[0]);
        let mut taken = 0u64;

        while self.last_time() < t_end {
            if let Some(limit) = self.max_steps {
                if taken >= limit {
                    return Err(BubbleError::MaxStepsExceeded {
                        steps: limit,
                        t: self.last_time(),
                    });
                }
            }

            let record = self.step();
            taken += 1;
            if record.tier != tier {
                debug!(
                    "step tier {:?} -> {:?} at t = {:e}, R = {:e}",
                    tier, record.tier, record.t, record.y[0]
                );
                tier = record.tier;
            }
        }

        info!(
            "integrated to t = {:e} in {} steps (coarse {}, fine {}, finest {})",
            self.last_time(),
            self.stats.accepted_steps - start_steps,
            self.stats.coarse_steps,
            self.stats.fine_steps,
            self.stats.finest_steps
        );
        Ok((self.last_time(), self.last_state()))
    }

    /// Discard the history and reseed the initial state
    pub fn reset(&mut self) {
        self.trajectory.clear();
        self.feedback.clear();
        self.stats = Stats::default();
        self.warned_non_finite = false;
        self.seed();
    }

    /// Hand out the parameters and the frozen trajectory
    pub fn finalize(self) -> (BubbleParams, FinalizedTrajectory) {
        (self.params, self.trajectory.finalize())
    }

    /// Split into the parts a persisted record stores
    pub fn into_parts(self) -> (BubbleParams, Trajectory, Stats) {
        (self.params, self.trajectory, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run(radiates: bool) -> BubbleParams {
        BubbleParams {
            t_run: 2e-8,
            bubble_radiates: radiates,
            ..Default::default()
        }
    }

    #[test]
    fn test_seeded_state() {
        let params = BubbleParams {
            r_start: 4e-5,
            dr_start: 1.5,
            t_start: 2e-6,
            ..Default::default()
        };
        let bubble = Bubble::new(params.clone()).unwrap();
        let traj = bubble.trajectory();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.time(), &[2e-6]);
        assert_eq!(traj.states(), &[[4e-5, 1.5]]);
        assert_eq!(traj.gas_pressure(), &[bubble.calculate_pgas(4e-5)]);
        assert_eq!(bubble.stats, Stats::default());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = BubbleParams {
            r0: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Bubble::new(params),
            Err(BubbleError::InvalidParameter { name: "r0", .. })
        ));
    }

    #[test]
    fn test_step_sizes_follow_radius() {
        let r0 = BubbleParams::default().r0;
        for (r_start, expected) in [
            (r0, 1e-9),
            (0.3 * r0, 1e-12),
            (0.05 * r0, 0.02 * 1e-12),
        ] {
            let mut bubble = Bubble::new(BubbleParams {
                r_start,
                ..Default::default()
            })
            .unwrap();
            let record = bubble.step();
            assert_eq!(record.t, expected, "r_start = {}", r_start);
            assert_eq!(bubble.trajectory().time()[1], expected);
        }
    }

    #[test]
    fn test_radiation_starts_on_third_step() {
        let mut bubble = Bubble::new(short_run(true)).unwrap();
        let applied: Vec<bool> = (0..4).map(|_| bubble.step().radiation_applied).collect();
        assert_eq!(applied, vec![false, false, true, true]);

        let mut silent = Bubble::new(short_run(false)).unwrap();
        assert!((0..4).all(|_| !silent.step().radiation_applied));
    }

    #[test]
    fn test_integrate_terminates_at_bound() {
        let mut bubble = Bubble::new(short_run(false)).unwrap();
        let (t, _) = bubble.integrate().unwrap();
        let time = bubble.trajectory().time();
        assert!(t >= 2e-8);
        assert!(time[time.len() - 2] < 2e-8);
        assert_eq!(bubble.stats.accepted_steps as usize, time.len() - 1);
        assert!(bubble.is_complete());
    }

    #[test]
    fn test_integrate_twice_adds_nothing() {
        let mut bubble = Bubble::new(short_run(true)).unwrap();
        bubble.integrate().unwrap();
        let len = bubble.trajectory().len();
        bubble.integrate().unwrap();
        assert_eq!(bubble.trajectory().len(), len);
    }

    #[test]
    fn test_integrate_until_extends() {
        let mut bubble = Bubble::new(short_run(true)).unwrap();
        bubble.integrate().unwrap();
        let len = bubble.trajectory().len();
        bubble.integrate_until(4e-8).unwrap();
        assert!(bubble.trajectory().len() > len);
        bubble.trajectory().check().unwrap();
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut bubble = Bubble::new(short_run(true)).unwrap();
        let seeded = bubble.trajectory().clone();
        bubble.integrate().unwrap();
        bubble.reset();
        assert_eq!(bubble.trajectory(), &seeded);
        assert_eq!(bubble.stats, Stats::default());

        // after a reset the radiation guard applies again
        assert!(!bubble.step().radiation_applied);
    }

    #[test]
    fn test_max_steps() {
        let mut bubble = Bubble::new(short_run(false)).unwrap();
        bubble.max_steps = Some(5);
        match bubble.integrate() {
            Err(BubbleError::MaxStepsExceeded { steps, .. }) => assert_eq!(steps, 5),
            other => panic!("expected MaxStepsExceeded, got {:?}", other),
        }
        assert_eq!(bubble.trajectory().len(), 6);
    }

    #[test]
    fn test_from_parts_resumes_identically() {
        let params = short_run(true);
        let mut reference = Bubble::new(params.clone()).unwrap();
        reference.integrate().unwrap();

        let mut first = Bubble::new(params).unwrap();
        for _ in 0..7 {
            first.step();
        }
        let (params, traj, stats) = first.into_parts();
        let mut resumed = Bubble::from_parts(params, traj, stats).unwrap();
        resumed.integrate().unwrap();

        assert_eq!(resumed.trajectory(), reference.trajectory());
        assert_eq!(resumed.stats, reference.stats);
    }

    #[test]
    fn test_from_parts_rejects_broken_trajectory() {
        let mut traj = Trajectory::new();
        traj.push(1.0, [5e-5, 0.0], 1e5);
        traj.push(0.5, [5e-5, 0.0], 1e5);
        let result = Bubble::from_parts(BubbleParams::default(), traj, Stats::default());
        assert!(matches!(result, Err(BubbleError::InvalidTrajectory(_))));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_seed() {
        let mut bubble = Bubble::new(short_run(true)).unwrap();
        bubble.step();
        let (params, traj, stats) = bubble.into_parts();

        let shifted = BubbleParams {
            t_start: 1e-9,
            ..params.clone()
        };
        let result = Bubble::from_parts(shifted, traj.clone(), stats.clone());
        assert!(matches!(result, Err(BubbleError::InvalidTrajectory(_))));

        let moved = BubbleParams {
            r_start: 0.9 * params.r_start,
            ..params.clone()
        };
        let result = Bubble::from_parts(moved, traj.clone(), stats.clone());
        assert!(matches!(result, Err(BubbleError::InvalidTrajectory(_))));

        Bubble::from_parts(params, traj, stats).unwrap();
    }

    #[test]
    fn test_integrate_until_rejects_unreachable_end() {
        let mut bubble = Bubble::new(short_run(false)).unwrap();
        let result = bubble.integrate_until(1e6);
        assert!(matches!(
            result,
            Err(BubbleError::InvalidParameter { name: "dt_fine", .. })
        ));
        assert_eq!(bubble.trajectory().len(), 1);
    }

    #[test]
    fn test_unresolvable_negative_start_rejected() {
        let params = BubbleParams {
            t_start: -1e6,
            t_run: 1e6,
            r_start: 0.05 * 0.5e-4,
            ..Default::default()
        };
        assert!(Bubble::new(params).is_err());
    }

    #[test]
    fn test_finalize() {
        let mut bubble = Bubble::new(short_run(false)).unwrap();
        bubble.integrate().unwrap();
        let traj = bubble.trajectory().clone();
        let (params, fin) = bubble.finalize();
        assert_eq!(params, short_run(false));
        assert_eq!(fin.time(), traj.time());
        assert_eq!(fin.states(), traj.states());
        assert_eq!(fin.gas_pressure(), traj.gas_pressure());
    }
}
