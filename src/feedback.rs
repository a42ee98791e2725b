//! Lagged gas-pressure feedback for the radiation loss term.
//!
//! The radiation loss needs `ṗ_gas`, which the engine estimates by a backward
//! difference over the two most recently committed samples. Only those two
//! samples and the number of committed points are kept.

use crate::trajectory::Trajectory;

/// Committed points required before a rate is reported
pub const MIN_COMMITTED: usize = 3;

/// Bounded record of the last two committed `(t, p_gas)` samples
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressureFeedback {
    /// Most recent sample last: `[older, newer]`
    recent: [(f64, f64); 2],
    committed: usize,
}

impl PressureFeedback {
    /// Empty feedback, no samples committed yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the feedback state from a recorded trajectory
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let mut feedback = Self::new();
        let n = trajectory.len();
        let tail = n.saturating_sub(2);
        for i in tail..n {
            feedback.commit(trajectory.time()[i], trajectory.gas_pressure()[i]);
        }
        feedback.committed = n;
        feedback
    }

    /// Record a newly committed sample
    pub fn commit(&mut self, t: f64, p_gas: f64) {
        self.recent[0] = self.recent[1];
        self.recent[1] = (t, p_gas);
        self.committed += 1;
    }

    /// Number of samples committed so far
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Backward-difference gas pressure rate, once enough points exist
    pub fn rate(&self) -> Option<f64> {
        if self.committed < MIN_COMMITTED {
            return None;
        }
        let (t_old, p_old) = self.recent[0];
        let (t_new, p_new) = self.recent[1];
        Some((p_new - p_old) / (t_new - t_old))
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
