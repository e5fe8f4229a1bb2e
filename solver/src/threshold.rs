//! Threshold resolution: which window to evaluate, and how a single-window
//! probability becomes the reported one.

use crate::constants::TICKET_WINDOW_SECONDS;
use crate::error::{Result, ScenarioError};
use crate::frames::discretize;
use crate::types::Threshold;

impl Threshold {
    /// Length in seconds of the one window the DP evaluates.
    pub fn window_seconds(&self) -> f64 {
        match *self {
            Threshold::Tickets { .. } => TICKET_WINDOW_SECONDS,
            Threshold::Duration { seconds } => seconds,
        }
    }

    /// Discretized window length.
    pub fn window_frames(&self, fps: f64) -> usize {
        discretize(self.window_seconds(), fps)
    }

    /// Map a single-window probability to the reported probability.
    ///
    /// Duration mode passes it through. Ticket mode treats each ticket as an
    /// independent window: `1 - (1 - p)^N`.
    pub fn resolve(&self, window_probability: f64) -> f64 {
        match *self {
            Threshold::Duration { .. } => window_probability,
            Threshold::Tickets { count } => amplify_tickets(window_probability, count),
        }
    }
}

/// `1 - (1 - p)^n`: probability that at least one of `n` independent windows
/// succeeds. `n = 0` gives 0.
pub fn amplify_tickets(window_probability: f64, tickets: f64) -> f64 {
    if tickets <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - window_probability).powf(tickets)
}

/// Parse `ss`, `ss.sss`, `mm:ss` or `hh:mm:ss` into seconds.
pub fn parse_duration(input: &str) -> Result<f64> {
    let fail = |reason: &'static str| ScenarioError::DurationFormat {
        input: input.to_string(),
        reason,
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(fail("empty"));
    }

    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.len() > 3 {
        return Err(fail("expected hh:mm:ss, mm:ss or ss"));
    }

    let mut seconds = 0.0;
    for part in &parts {
        let value: f64 = part.parse().map_err(|_| fail("component is not a number"))?;
        if !value.is_finite() {
            return Err(fail("component is not a number"));
        }
        if value < 0.0 {
            return Err(fail("component is negative"));
        }
        seconds = seconds * 60.0 + value;
    }
    Ok(seconds)
}
