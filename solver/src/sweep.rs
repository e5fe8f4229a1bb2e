//! Batch evaluation and derived tables.
//!
//! A single DP run already contains the answer for every shorter window, so
//! curves and ticket tables reuse one solved window instead of re-solving.
//! Independent scenarios fan out over the rayon pool.

use rayon::prelude::*;
use serde::Serialize;

use crate::engine::{evaluate_with, solve_window, EngineConfig};
use crate::error::{Result, ScenarioError};
use crate::frames::discretize;
use crate::threshold::amplify_tickets;
use crate::types::{ProbabilityReport, Scenario, Threshold};
use crate::validate::check_point_count;

/// Window length → probability of finishing inside one window of that length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub seconds: f64,
    pub probability: f64,
}

/// Ticket count → amplified probability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TicketPoint {
    pub tickets: u32,
    pub probability: f64,
}

/// Evaluate every scenario in parallel. Output order matches input order.
pub fn evaluate_batch(
    scenarios: &[Scenario],
    config: &EngineConfig,
) -> Vec<Result<ProbabilityReport>> {
    scenarios
        .par_iter()
        .map(|s| evaluate_with(s, config))
        .collect()
}

/// Single-window probability at every `step_seconds` from 0 up to the
/// scenario's window, from one DP run. The window edge itself is always the
/// last point. Ticket amplification is not applied.
///
/// Rejected up front if it would produce more than `config.max_points` points.
pub fn probability_curve(
    scenario: &Scenario,
    step_seconds: f64,
    config: &EngineConfig,
) -> Result<Vec<CurvePoint>> {
    if !step_seconds.is_finite() || step_seconds <= 0.0 {
        return Err(ScenarioError::InvalidDuration(step_seconds));
    }
    let window = scenario.threshold.window_seconds();
    // One point per step strictly below the window, plus the window edge.
    check_point_count((window / step_seconds).ceil() + 1.0, config.max_points)?;

    let solved = solve_window(scenario, config)?;
    let fps = scenario.fps;
    let min_frames = solved.distribution.min_frames;
    let cdf = solved.distribution.cumulative();

    let mut points = Vec::new();
    let mut k = 0u64;
    loop {
        let seconds = k as f64 * step_seconds;
        if seconds >= window {
            break;
        }
        let frames = discretize(seconds, fps);
        let probability = match frames.checked_sub(min_frames) {
            Some(w) if !cdf.is_empty() => cdf[w.min(cdf.len() - 1)],
            _ => 0.0,
        };
        points.push(CurvePoint {
            seconds,
            probability,
        });
        k += 1;
    }
    points.push(CurvePoint {
        seconds: window,
        probability: cdf.last().copied().unwrap_or(0.0),
    });
    Ok(points)
}

/// Probability for `0..=max_tickets` one-hour tickets, from one window solve.
/// The scenario's own threshold is ignored.
pub fn ticket_table(
    scenario: &Scenario,
    max_tickets: u32,
    config: &EngineConfig,
) -> Result<Vec<TicketPoint>> {
    check_point_count(f64::from(max_tickets) + 1.0, config.max_points)?;
    let one_window = scenario.with_threshold(Threshold::Tickets { count: 1.0 });
    let p = solve_window(&one_window, config)?.probability();
    Ok((0..=max_tickets)
        .map(|n| TicketPoint {
            tickets: n,
            probability: amplify_tickets(p, n as f64),
        })
        .collect())
}
