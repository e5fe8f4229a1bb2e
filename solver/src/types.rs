//! Core data structures: events, stages, scenarios and the query report.
//!
//! All of these are immutable value data. A [`Scenario`] is built by the
//! caller (HTTP body, CLI file), checked once by [`crate::validate`], and then
//! read by the engine for exactly one probability query.
//!
//! Field names are snake_case on the wire; the camelCase names used by the
//! browser form are accepted as aliases.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DEFAULT_FPS;

/// One checkpoint within a stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Success probability in percent, `0..=100`.
    #[serde(alias = "p", alias = "successPercent")]
    pub success_percent: f64,
    /// Seconds from stage start at which the check happens.
    #[serde(alias = "t", alias = "checkSeconds")]
    pub check_seconds: f64,
}

impl Event {
    pub fn new(success_percent: f64, check_seconds: f64) -> Self {
        Self {
            success_percent,
            check_seconds,
        }
    }

    /// Success probability as a fraction in `[0, 1]`.
    pub fn success_fraction(&self) -> f64 {
        self.success_percent / crate::constants::PERCENT
    }
}

/// An ordered group of events that must all pass for the stage to complete.
/// Any failure restarts the whole stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub events: Vec<Event>,
    /// Seconds from stage start to completion when every event passes.
    #[serde(alias = "successSeconds", alias = "success_time")]
    pub success_seconds: f64,
}

impl Stage {
    pub fn new(events: Vec<Event>, success_seconds: f64) -> Self {
        Self {
            events,
            success_seconds,
        }
    }
}

/// How the time budget is specified.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Threshold {
    /// `count` independent one-hour windows.
    Tickets { count: f64 },
    /// One window of an explicit length.
    Duration { seconds: f64 },
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Tickets { count: 1.0 }
    }
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

/// Stages that must complete in order inside one shared time window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub stages: Vec<Stage>,
    /// Seconds added to every failure before the stage restarts.
    #[serde(default, alias = "restartSeconds")]
    pub restart_seconds: f64,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub threshold: Threshold,
}

impl Scenario {
    pub fn new(stages: Vec<Stage>, restart_seconds: f64, fps: f64, threshold: Threshold) -> Self {
        Self {
            stages,
            restart_seconds,
            fps,
            threshold,
        }
    }

    /// Same scenario with a different threshold.
    pub fn with_threshold(&self, threshold: Threshold) -> Self {
        Self {
            threshold,
            ..self.clone()
        }
    }
}

/// Flat single-stage input shape: one stage's fields inlined at top level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingleStageScenario {
    pub events: Vec<Event>,
    #[serde(alias = "successSeconds", alias = "tSuccess")]
    pub success_seconds: f64,
    #[serde(default, alias = "restartSeconds", alias = "restartDelay")]
    pub restart_seconds: f64,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub threshold: Threshold,
}

impl From<SingleStageScenario> for Scenario {
    fn from(s: SingleStageScenario) -> Self {
        Scenario {
            stages: vec![Stage::new(s.events, s.success_seconds)],
            restart_seconds: s.restart_seconds,
            fps: s.fps,
            threshold: s.threshold,
        }
    }
}

/// Either accepted input shape, chosen by key: `stages` means multi-stage,
/// otherwise `events` means single-stage.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioRequest {
    Multi(Scenario),
    Single(SingleStageScenario),
}

impl<'de> Deserialize<'de> for ScenarioRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let Some(object) = value.as_object() else {
            return Err(D::Error::custom("scenario must be a JSON object"));
        };
        if object.contains_key("stages") {
            serde_json::from_value(value)
                .map(ScenarioRequest::Multi)
                .map_err(D::Error::custom)
        } else if object.contains_key("events") {
            serde_json::from_value(value)
                .map(ScenarioRequest::Single)
                .map_err(D::Error::custom)
        } else {
            Err(D::Error::custom(
                "scenario needs a `stages` array (multi-stage) or an `events` array (single-stage)",
            ))
        }
    }
}

impl From<ScenarioRequest> for Scenario {
    fn from(req: ScenarioRequest) -> Self {
        match req {
            ScenarioRequest::Multi(s) => s,
            ScenarioRequest::Single(s) => s.into(),
        }
    }
}

/// Result of one probability query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbabilityReport {
    /// Final probability in `[0, 1]`, after ticket amplification if any.
    pub probability: f64,
    /// Probability of finishing inside one window (equals `probability` in
    /// duration mode).
    pub window_probability: f64,
    /// Discretized length of the evaluated window.
    pub threshold_frames: usize,
    /// Sum of every stage's minimum completion frames.
    pub min_frames: usize,
    /// Expected seconds to finish all stages, `None` when some stage can
    /// never succeed.
    pub expected_seconds: Option<f64>,
}
