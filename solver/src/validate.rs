//! Fail-fast input checks.
//!
//! The numeric core assumes its inputs are well formed. Every public query
//! path runs [`validate_scenario`] first and rejects, never coerces.

use crate::constants::{MAX_FRAMES, PERCENT};
use crate::error::{Result, ScenarioError};
use crate::types::{Scenario, Threshold};

fn finite(field: impl FnOnce() -> String, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScenarioError::NonFinite { field: field() })
    }
}

fn non_negative_time(field: impl Fn() -> String, value: f64) -> Result<()> {
    finite(&field, value)?;
    if value < 0.0 {
        return Err(ScenarioError::NegativeTime {
            field: field(),
            value,
        });
    }
    Ok(())
}

fn within_frame_limit(field: impl FnOnce() -> String, seconds: f64, fps: f64) -> Result<()> {
    let frames = seconds * fps;
    if frames > MAX_FRAMES {
        return Err(ScenarioError::TooManyFrames {
            field: field(),
            frames,
            limit: MAX_FRAMES,
        });
    }
    Ok(())
}

/// Check every invariant the engine relies on.
pub fn validate_scenario(scenario: &Scenario) -> Result<()> {
    if scenario.stages.is_empty() {
        return Err(ScenarioError::NoStages);
    }

    finite(|| "fps".into(), scenario.fps)?;
    if scenario.fps < 1.0 {
        return Err(ScenarioError::FpsTooLow(scenario.fps));
    }
    non_negative_time(|| "restart_seconds".into(), scenario.restart_seconds)?;
    within_frame_limit(|| "restart_seconds".into(), scenario.restart_seconds, scenario.fps)?;

    for (si, stage) in scenario.stages.iter().enumerate() {
        if stage.events.is_empty() {
            return Err(ScenarioError::NoEvents { stage: si });
        }
        non_negative_time(
            || format!("stages[{si}].success_seconds"),
            stage.success_seconds,
        )?;
        // Check times never exceed the success time, so this bounds them too.
        within_frame_limit(
            || format!("stages[{si}].success_seconds"),
            stage.success_seconds,
            scenario.fps,
        )?;

        for (ei, ev) in stage.events.iter().enumerate() {
            let p_field = || format!("stages[{si}].events[{ei}].success_percent");
            finite(&p_field, ev.success_percent)?;
            if !(0.0..=PERCENT).contains(&ev.success_percent) {
                return Err(ScenarioError::ProbabilityOutOfRange {
                    field: p_field(),
                    value: ev.success_percent,
                });
            }
            non_negative_time(
                || format!("stages[{si}].events[{ei}].check_seconds"),
                ev.check_seconds,
            )?;
            if stage.success_seconds < ev.check_seconds {
                return Err(ScenarioError::SuccessBeforeEvent {
                    stage: si,
                    success_seconds: stage.success_seconds,
                    check_seconds: ev.check_seconds,
                });
            }
        }
    }

    validate_threshold(&scenario.threshold)?;
    within_frame_limit(
        || "threshold window".into(),
        scenario.threshold.window_seconds(),
        scenario.fps,
    )
}

pub fn validate_threshold(threshold: &Threshold) -> Result<()> {
    match *threshold {
        Threshold::Tickets { count } => {
            if !count.is_finite() || count < 0.0 {
                return Err(ScenarioError::InvalidTicketCount(count));
            }
        }
        Threshold::Duration { seconds } => {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(ScenarioError::InvalidDuration(seconds));
            }
        }
    }
    Ok(())
}

/// Reject DP tables above `limit` cells before allocating them.
pub fn check_table_size(cells: usize, limit: usize) -> Result<()> {
    if cells > limit {
        tracing::warn!(cells, limit, "rejecting oversized DP table");
        return Err(ScenarioError::TableTooLarge { cells, limit });
    }
    Ok(())
}

/// Reject curves and ticket tables of more than `limit` points before
/// building them. `points` is a float so an unbounded request still compares.
pub fn check_point_count(points: f64, limit: usize) -> Result<()> {
    if points > limit as f64 {
        tracing::warn!(points, limit, "rejecting oversized output table");
        return Err(ScenarioError::TooManyPoints { points, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Event, Stage};

    fn scenario() -> Scenario {
        Scenario::new(
            vec![Stage::new(vec![Event::new(75.0, 10.0)], 180.0)],
            0.0,
            1.0,
            Threshold::Duration { seconds: 3600.0 },
        )
    }

    #[test]
    fn accepts_well_formed() {
        assert_eq!(validate_scenario(&scenario()), Ok(()));
    }

    #[test]
    fn rejects_empty_lists() {
        let mut s = scenario();
        s.stages[0].events.clear();
        assert_eq!(validate_scenario(&s), Err(ScenarioError::NoEvents { stage: 0 }));
        s.stages.clear();
        assert_eq!(validate_scenario(&s), Err(ScenarioError::NoStages));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut s = scenario();
        s.stages[0].events[0].success_percent = 100.5;
        assert!(matches!(
            validate_scenario(&s),
            Err(ScenarioError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_and_negative() {
        let mut s = scenario();
        s.stages[0].events[0].check_seconds = f64::NAN;
        assert!(matches!(validate_scenario(&s), Err(ScenarioError::NonFinite { .. })));

        let mut s = scenario();
        s.restart_seconds = -1.0;
        assert!(matches!(validate_scenario(&s), Err(ScenarioError::NegativeTime { .. })));
    }

    #[test]
    fn rejects_low_fps() {
        let mut s = scenario();
        s.fps = 0.5;
        assert_eq!(validate_scenario(&s), Err(ScenarioError::FpsTooLow(0.5)));
    }

    #[test]
    fn rejects_success_before_event() {
        let mut s = scenario();
        s.stages[0].success_seconds = 5.0;
        assert!(matches!(
            validate_scenario(&s),
            Err(ScenarioError::SuccessBeforeEvent { stage: 0, .. })
        ));
    }

    #[test]
    fn rejects_bad_thresholds() {
        assert!(validate_threshold(&Threshold::Tickets { count: -1.0 }).is_err());
        assert!(validate_threshold(&Threshold::Tickets { count: f64::INFINITY }).is_err());
        assert!(validate_threshold(&Threshold::Duration { seconds: -0.1 }).is_err());
        assert!(validate_threshold(&Threshold::Tickets { count: 0.0 }).is_ok());
    }

    #[test]
    fn rejects_times_beyond_frame_ceiling() {
        let mut s = scenario();
        s.fps = 1e300;
        s.stages[0].events[0].check_seconds = 0.0;
        s.stages[0].success_seconds = 0.0;
        assert!(matches!(
            validate_scenario(&s),
            Err(ScenarioError::TooManyFrames { ref field, .. }) if field == "threshold window"
        ));

        let mut s = scenario();
        s.stages[0].success_seconds = 1e19;
        assert!(matches!(
            validate_scenario(&s),
            Err(ScenarioError::TooManyFrames { ref field, .. }) if field == "stages[0].success_seconds"
        ));

        let mut s = scenario();
        s.restart_seconds = 5e9;
        assert!(matches!(validate_scenario(&s), Err(ScenarioError::TooManyFrames { .. })));

        // Exactly at the ceiling is still accepted.
        let mut s = scenario();
        s.threshold = Threshold::Duration { seconds: MAX_FRAMES };
        assert_eq!(validate_scenario(&s), Ok(()));
    }

    #[test]
    fn table_limit() {
        assert!(check_table_size(100, 100).is_ok());
        assert_eq!(
            check_table_size(101, 100),
            Err(ScenarioError::TableTooLarge { cells: 101, limit: 100 })
        );
    }

    #[test]
    fn point_limit() {
        assert!(check_point_count(10.0, 10).is_ok());
        assert!(check_point_count(11.0, 10).is_err());
        assert!(check_point_count(f64::INFINITY, usize::MAX).is_err());
    }
}
