//! Per-stage transition model.
//!
//! One attempt at a stage resolves in exactly one of `n + 1` ways: every event
//! passes (probability `q_succ`, ends the stage after `succ_frames`), or event
//! `k` is the first to fail (probability `q_fail(k)`, costs `fail_frames(k)`
//! and restarts the stage). These `n + 1` probabilities partition 1.
//!
//! The success branch and the failure branches are kept as separate fields.

use crate::frames::discretize;
use crate::types::Stage;

/// One "first failure at event k" outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FailureBranch {
    /// `(prod_{i<k} p_i) * (1 - p_k)`.
    pub prob: f64,
    /// `discretize(t_k) + discretize(restart)`.
    pub frames: usize,
}

/// Transition parameters of a single stage, in frame units.
#[derive(Clone, Debug, PartialEq)]
pub struct StageTransitions {
    /// Probability that one attempt passes every event.
    pub q_succ: f64,
    /// Frames from stage start to completion on a clean attempt.
    pub succ_frames: usize,
    /// One entry per event, in event order.
    pub failures: Vec<FailureBranch>,
}

impl StageTransitions {
    /// Derive the model for `stage` with the scenario-wide restart delay.
    pub fn from_stage(stage: &Stage, restart_seconds: f64, fps: f64) -> Self {
        debug_assert!(!stage.events.is_empty());
        let restart_frames = discretize(restart_seconds, fps);

        let mut prefix = 1.0;
        let failures = stage
            .events
            .iter()
            .map(|ev| {
                let p = ev.success_fraction();
                let branch = FailureBranch {
                    prob: prefix * (1.0 - p),
                    frames: discretize(ev.check_seconds, fps) + restart_frames,
                };
                prefix *= p;
                branch
            })
            .collect();

        Self {
            q_succ: prefix,
            succ_frames: discretize(stage.success_seconds, fps),
            failures,
        }
    }

    /// `sum_k q_fail(k)`.
    pub fn failure_mass(&self) -> f64 {
        self.failures.iter().map(|f| f.prob).sum()
    }

    /// Mass of failures that cost zero frames. Such failures retry
    /// instantly and are folded into the row in closed form by the solvers.
    pub fn zero_frame_mass(&self) -> f64 {
        self.failures
            .iter()
            .filter(|f| f.frames == 0)
            .map(|f| f.prob)
            .sum()
    }

    /// `1 / (1 - zero_frame_mass)`, or 0 when every attempt fails instantly.
    pub(crate) fn instant_retry_gain(&self) -> f64 {
        let stay = self.zero_frame_mass();
        if stay < 1.0 {
            1.0 / (1.0 - stay)
        } else {
            0.0
        }
    }

    /// Expected frames until the stage first succeeds:
    /// `succ_frames + sum_k q_fail(k) * fail_frames(k) / q_succ`.
    ///
    /// `None` when `q_succ == 0`.
    pub fn expected_frames(&self) -> Option<f64> {
        if self.q_succ <= 0.0 {
            return None;
        }
        let waste: f64 = self
            .failures
            .iter()
            .map(|f| f.prob * f.frames as f64)
            .sum();
        Some(self.succ_frames as f64 + waste / self.q_succ)
    }
}

/// Transition models for every stage of a scenario, in stage order.
pub fn compute_transitions(stages: &[Stage], restart_seconds: f64, fps: f64) -> Vec<StageTransitions> {
    stages
        .iter()
        .map(|s| StageTransitions::from_stage(s, restart_seconds, fps))
        .collect()
}
