//! Multi-stage sequential aggregation.
//!
//! `dp[i][t]` is the probability that stages `0..=i` have all completed with
//! exactly `t` frames of waste beyond `sum(succ_frames)`:
//!
//! ```text
//! dp[0][t] = [t == 0] * q_succ_0 + sum_k q_fail_0(k) * dp[0][t - f_0(k)]
//! dp[i][t] = dp[i-1][t] * q_succ_i + sum_k q_fail_i(k) * dp[i][t - f_i(k)]
//! ```
//!
//! Stage `i` starts accumulating only once stage `i - 1` is done; a clean
//! first attempt adds no waste, every failure adds its frame cost.
//!
//! The table is one flat `Vec<f64>` indexed `i * width + t`. Each cell reads
//! only smaller `t` in its own row and the same `t` in the previous row, so
//! the `t`-outer / stage-inner sweep below sees every dependency filled.

use super::{retry_sum, CompletionDistribution};
use crate::transitions::StageTransitions;

/// Sum of every stage's clean-attempt completion frames, `None` on overflow.
pub fn total_min_frames(stages: &[StageTransitions]) -> Option<usize> {
    stages
        .iter()
        .try_fold(0usize, |acc, s| acc.checked_add(s.succ_frames))
}

/// Number of f64 cells the DP table needs for this threshold (0 if unreachable).
/// `None` when the count does not fit in `usize`.
pub fn table_cells(stages: &[StageTransitions], threshold_frames: usize) -> Option<usize> {
    let total_min = match total_min_frames(stages) {
        Some(total) => total,
        // More minimum frames than usize holds is more than any threshold.
        None => return Some(0),
    };
    match threshold_frames.checked_sub(total_min) {
        Some(max_waste) => max_waste.checked_add(1)?.checked_mul(stages.len()),
        None => Some(0),
    }
}

/// Distribution of total waste frames across all `stages`, truncated at
/// `threshold_frames`.
pub fn sequential_completion_distribution(
    stages: &[StageTransitions],
    threshold_frames: usize,
) -> CompletionDistribution {
    debug_assert!(!stages.is_empty());
    let Some(total_min) = total_min_frames(stages) else {
        return CompletionDistribution::unreachable(usize::MAX);
    };
    if threshold_frames < total_min {
        return CompletionDistribution::unreachable(total_min);
    }
    // Callers size-check through `table_cells` first, so this cannot overflow.
    let width = threshold_frames - total_min + 1;
    let num_stages = stages.len();
    let gains: Vec<f64> = stages.iter().map(|s| s.instant_retry_gain()).collect();

    let mut dp = vec![0.0f64; num_stages * width];

    for t in 0..width {
        for (i, tr) in stages.iter().enumerate() {
            let seed = if i == 0 {
                if t == 0 {
                    tr.q_succ
                } else {
                    0.0
                }
            } else {
                dp[(i - 1) * width + t] * tr.q_succ
            };
            let row = &dp[i * width..i * width + t];
            let retries = retry_sum(tr, row, t);
            dp[i * width + t] = (retries + seed) * gains[i];
        }
    }

    let last = (num_stages - 1) * width;
    dp.truncate(last + width);
    let pmf = dp.split_off(last);

    CompletionDistribution {
        pmf,
        min_frames: total_min,
    }
}
