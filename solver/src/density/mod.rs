//! Exact completion-time distributions via renewal convolution.
//!
//! Instead of simulating attempts, these solvers push probability mass forward
//! along a discretized time axis. Entry `t` of a distribution is the
//! probability that the run first completes exactly `t` frames after its
//! minimum possible completion time. Entries depend only on smaller `t`, so a
//! flat array filled left to right is the whole algorithm.
//!
//! - [`single`]: one stage in isolation.
//! - [`sequential`]: several stages in order sharing one budget. With one
//!   stage it produces the same array as [`single`].

pub mod sequential;
pub mod single;

use crate::transitions::StageTransitions;

/// PMF over excess frames, truncated at the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionDistribution {
    /// `pmf[t]` = P(first completion at `min_frames + t`).
    /// Empty when the threshold is below `min_frames`.
    pub pmf: Vec<f64>,
    /// Minimum possible completion time in frames.
    pub min_frames: usize,
}

impl CompletionDistribution {
    /// Distribution for a threshold that cannot be met at all.
    pub fn unreachable(min_frames: usize) -> Self {
        Self {
            pmf: Vec::new(),
            min_frames,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.pmf.is_empty()
    }

    /// Probability of completing within the full computed horizon.
    pub fn total(&self) -> f64 {
        self.pmf.iter().sum()
    }

    /// Running sum of the PMF: `cdf[t]` = P(complete within `min_frames + t`).
    pub fn cumulative(&self) -> Vec<f64> {
        let mut acc = 0.0;
        self.pmf
            .iter()
            .map(|&p| {
                acc += p;
                acc
            })
            .collect()
    }
}

/// `sum_k q_fail(k) * row[t - fail_frames(k)]` over failures with
/// `0 < fail_frames(k) <= t`. Zero-frame failures are handled by the caller.
#[inline]
pub(crate) fn retry_sum(tr: &StageTransitions, row: &[f64], t: usize) -> f64 {
    let mut s = 0.0;
    for f in &tr.failures {
        if f.frames > 0 && f.frames <= t {
            s += f.prob * row[t - f.frames];
        }
    }
    s
}
