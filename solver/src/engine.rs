//! Top-level probability query.
//!
//! validate → discretize the window → per-stage transition model →
//! single-stage solver or sequential aggregator → threshold resolver.
//!
//! Every call is a pure function of its arguments; nothing is cached between
//! queries, so concurrent callers never interfere.

use std::time::Instant;

use tracing::debug;

use crate::constants::{DEFAULT_MAX_POINTS, DEFAULT_MAX_TABLE_CELLS};
use crate::density::sequential::{sequential_completion_distribution, table_cells};
use crate::density::single::stage_completion_distribution;
use crate::density::CompletionDistribution;
use crate::error::{Result, ScenarioError};
use crate::transitions::{compute_transitions, StageTransitions};
use crate::types::{ProbabilityReport, Scenario};
use crate::validate::{check_table_size, validate_scenario};

/// Resource bounds for one query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest DP table (stages × (max_waste + 1)) a query may allocate.
    pub max_table_cells: usize,
    /// Largest curve or ticket table a query may return.
    pub max_points: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

/// A solved window: transition models plus the completion distribution.
#[derive(Clone, Debug)]
pub struct SolvedWindow {
    pub transitions: Vec<StageTransitions>,
    pub threshold_frames: usize,
    pub distribution: CompletionDistribution,
}

impl SolvedWindow {
    /// P(all stages complete within the window).
    pub fn probability(&self) -> f64 {
        self.distribution.total()
    }

    /// Expected frames to finish every stage, `None` if some stage never succeeds.
    pub fn expected_frames(&self) -> Option<f64> {
        self.transitions.iter().map(|t| t.expected_frames()).sum()
    }
}

/// Validate `scenario` and solve its evaluation window.
pub fn solve_window(scenario: &Scenario, config: &EngineConfig) -> Result<SolvedWindow> {
    validate_scenario(scenario)?;

    let threshold_frames = scenario.threshold.window_frames(scenario.fps);
    let transitions = compute_transitions(&scenario.stages, scenario.restart_seconds, scenario.fps);
    let cells = table_cells(&transitions, threshold_frames).ok_or(ScenarioError::TableTooLarge {
        cells: usize::MAX,
        limit: config.max_table_cells,
    })?;
    check_table_size(cells, config.max_table_cells)?;

    let started = Instant::now();
    let distribution = match transitions.as_slice() {
        [only] => stage_completion_distribution(only, threshold_frames),
        stages => sequential_completion_distribution(stages, threshold_frames),
    };
    debug!(
        stages = transitions.len(),
        threshold_frames,
        min_frames = distribution.min_frames,
        unreachable = distribution.is_unreachable(),
        cells,
        elapsed_us = started.elapsed().as_micros() as u64,
        "solved window"
    );

    Ok(SolvedWindow {
        transitions,
        threshold_frames,
        distribution,
    })
}

/// Full report for one scenario.
pub fn evaluate_with(scenario: &Scenario, config: &EngineConfig) -> Result<ProbabilityReport> {
    let solved = solve_window(scenario, config)?;
    let window_probability = solved.probability();
    Ok(ProbabilityReport {
        probability: scenario.threshold.resolve(window_probability),
        window_probability,
        threshold_frames: solved.threshold_frames,
        min_frames: solved.distribution.min_frames,
        expected_seconds: solved.expected_frames().map(|f| f / scenario.fps),
    })
}

/// [`evaluate_with`] under the default limits.
pub fn evaluate(scenario: &Scenario) -> Result<ProbabilityReport> {
    evaluate_with(scenario, &EngineConfig::default())
}

/// Just the final probability.
pub fn success_probability(scenario: &Scenario) -> Result<f64> {
    evaluate(scenario).map(|r| r.probability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Event, Stage, Threshold};

    fn one_stage(threshold: Threshold) -> Scenario {
        Scenario::new(
            vec![Stage::new(vec![Event::new(75.0, 10.0)], 180.0)],
            0.0,
            1.0,
            threshold,
        )
    }

    #[test]
    fn explicit_duration_report() {
        let r = evaluate(&one_stage(Threshold::Duration { seconds: 200.0 })).unwrap();
        assert!((r.probability - 0.984375).abs() < 1e-12);
        assert_eq!(r.probability, r.window_probability);
        assert_eq!(r.threshold_frames, 200);
        assert_eq!(r.min_frames, 180);
        assert!((r.expected_seconds.unwrap() - (180.0 + 10.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn unreachable_threshold_is_zero_not_error() {
        let r = evaluate(&one_stage(Threshold::Duration { seconds: 100.0 })).unwrap();
        assert_eq!(r.probability, 0.0);
    }

    #[test]
    fn ticket_report_amplifies_window() {
        let mut s = one_stage(Threshold::Tickets { count: 2.0 });
        s.stages[0].events[0].success_percent = 1.0;
        s.stages[0].success_seconds = 3000.0;
        let r = evaluate(&s).unwrap();
        let p = r.window_probability;
        assert!(p > 0.0 && p < 1.0);
        assert!((r.probability - (1.0 - (1.0 - p).powi(2))).abs() < 1e-12);
    }

    #[test]
    fn oversized_table_rejected() {
        let s = one_stage(Threshold::Duration { seconds: 3600.0 });
        let cfg = EngineConfig {
            max_table_cells: 100,
            ..EngineConfig::default()
        };
        assert_eq!(
            evaluate_with(&s, &cfg),
            Err(ScenarioError::TableTooLarge { cells: 3421, limit: 100 })
        );
    }

    #[test]
    fn huge_frame_rate_rejected_before_allocation() {
        let s = Scenario::new(
            vec![Stage::new(vec![Event::new(50.0, 0.0)], 0.0)],
            0.0,
            1e300,
            Threshold::Duration { seconds: 3600.0 },
        );
        assert!(matches!(evaluate(&s), Err(ScenarioError::TooManyFrames { .. })));
    }

    #[test]
    fn huge_stage_times_rejected_before_summing() {
        let stage = Stage::new(vec![Event::new(50.0, 1.0)], 1e19);
        let s = Scenario::new(
            vec![stage.clone(), stage],
            0.0,
            1.0,
            Threshold::Duration { seconds: 3600.0 },
        );
        assert!(matches!(evaluate(&s), Err(ScenarioError::TooManyFrames { .. })));
    }

    #[test]
    fn malformed_input_rejected() {
        let mut s = one_stage(Threshold::Duration { seconds: 3600.0 });
        s.fps = 0.0;
        assert!(evaluate(&s).is_err());
    }

    #[test]
    fn impossible_stage_has_no_expectation() {
        let mut s = one_stage(Threshold::Duration { seconds: 3600.0 });
        s.stages[0].events[0].success_percent = 0.0;
        let r = evaluate(&s).unwrap();
        assert_eq!(r.probability, 0.0);
        assert_eq!(r.expected_seconds, None);
    }
}
