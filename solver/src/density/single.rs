//! Single-stage completion distribution.
//!
//! Renewal equation for one stage, `max_offset = threshold - succ_frames`:
//!
//! ```text
//! x[0] = q_succ
//! x[t] = sum_k q_fail(k) * x[t - fail_frames(k)]     (fail_frames(k) <= t)
//! ```
//!
//! A run that completes at offset `t` either succeeded cleanly on its first
//! attempt (`t = 0`) or failed at some event `k` and then completed the
//! remaining `t - fail_frames(k)` offset from a fresh start.

use super::{retry_sum, CompletionDistribution};
use crate::transitions::StageTransitions;

/// Distribution of excess frames for `tr`, truncated at `threshold_frames`.
pub fn stage_completion_distribution(
    tr: &StageTransitions,
    threshold_frames: usize,
) -> CompletionDistribution {
    if threshold_frames < tr.succ_frames {
        return CompletionDistribution::unreachable(tr.succ_frames);
    }
    // Callers size-check through `table_cells` first, so `max_offset + 1` fits.
    let max_offset = threshold_frames - tr.succ_frames;
    let gain = tr.instant_retry_gain();

    let mut x = vec![0.0f64; max_offset + 1];
    x[0] = tr.q_succ * gain;
    for t in 1..=max_offset {
        x[t] = retry_sum(tr, &x, t) * gain;
    }

    CompletionDistribution {
        pmf: x,
        min_frames: tr.succ_frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions::FailureBranch;

    fn one_event(p: f64, fail_frames: usize, succ_frames: usize) -> StageTransitions {
        StageTransitions {
            q_succ: p,
            succ_frames,
            failures: vec![FailureBranch {
                prob: 1.0 - p,
                frames: fail_frames,
            }],
        }
    }

    #[test]
    fn below_minimum_is_unreachable() {
        let tr = one_event(0.75, 10, 180);
        let d = stage_completion_distribution(&tr, 179);
        assert!(d.is_unreachable());
        assert_eq!(d.total(), 0.0);
    }

    #[test]
    fn zero_offset_is_clean_success_only() {
        let tr = one_event(0.75, 10, 180);
        let d = stage_completion_distribution(&tr, 180);
        assert_eq!(d.pmf, vec![0.75]);
    }

    #[test]
    fn mass_lands_on_multiples_of_failure_cost() {
        let tr = one_event(0.75, 10, 180);
        let d = stage_completion_distribution(&tr, 200);
        assert_eq!(d.pmf.len(), 21);
        for (t, &p) in d.pmf.iter().enumerate() {
            match t {
                0 => assert_eq!(p, 0.75),
                10 => assert!((p - 0.75 * 0.25).abs() < 1e-15),
                20 => assert!((p - 0.75 * 0.0625).abs() < 1e-15),
                _ => assert_eq!(p, 0.0, "t={t}"),
            }
        }
        assert!((d.total() - 0.984375).abs() < 1e-15);
    }

    #[test]
    fn two_failure_costs_interleave() {
        // p1 = 0.5 fails at 2, p2 = 0.5 fails at 3; q_succ = 0.25
        let tr = StageTransitions {
            q_succ: 0.25,
            succ_frames: 0,
            failures: vec![
                FailureBranch { prob: 0.5, frames: 2 },
                FailureBranch { prob: 0.25, frames: 3 },
            ],
        };
        let d = stage_completion_distribution(&tr, 5);
        let expected = [0.25, 0.0, 0.125, 0.0625, 0.0625, 0.0625];
        for (got, want) in d.pmf.iter().zip(expected) {
            assert!((got - want).abs() < 1e-15, "got {got}, want {want}");
        }
    }

    #[test]
    fn zero_frame_failure_is_instant_retry() {
        // Half the attempts fail instantly; they cannot cost time, so the
        // stage always completes at offset 0.
        let tr = StageTransitions {
            q_succ: 0.5,
            succ_frames: 4,
            failures: vec![FailureBranch { prob: 0.5, frames: 0 }],
        };
        let d = stage_completion_distribution(&tr, 10);
        assert!((d.pmf[0] - 1.0).abs() < 1e-15);
        assert!(d.pmf[1..].iter().all(|&p| p == 0.0));
    }
}
