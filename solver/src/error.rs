//! Input rejection errors.
//!
//! An unreachable threshold is not an error: the engine reports probability 0
//! for it. Everything here is a malformed or oversized request.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("scenario has no stages")]
    NoStages,
    #[error("stage {stage} has no events")]
    NoEvents { stage: usize },
    #[error("{field} must be a finite number")]
    NonFinite { field: String },
    #[error("{field} must be between 0 and 100 percent, got {value}")]
    ProbabilityOutOfRange { field: String, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    NegativeTime { field: String, value: f64 },
    #[error("fps must be at least 1, got {0}")]
    FpsTooLow(f64),
    #[error(
        "stage {stage} success time {success_seconds}s is earlier than event check time {check_seconds}s"
    )]
    SuccessBeforeEvent {
        stage: usize,
        success_seconds: f64,
        check_seconds: f64,
    },
    #[error("ticket count must be a non-negative finite number, got {0}")]
    InvalidTicketCount(f64),
    #[error("duration must be a non-negative finite number of seconds, got {0}")]
    InvalidDuration(f64),
    #[error("cannot parse duration {input:?}: {reason}")]
    DurationFormat { input: String, reason: &'static str },
    #[error("{field} spans {frames} frames, more than the limit of {limit}")]
    TooManyFrames { field: String, frames: f64, limit: f64 },
    #[error("DP table of {cells} cells exceeds the limit of {limit}")]
    TableTooLarge { cells: usize, limit: usize },
    #[error("request asks for {points} output points, more than the limit of {limit}")]
    TooManyPoints { points: f64, limit: usize },
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
