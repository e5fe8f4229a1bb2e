//! # tl-prob: completion probability for retryable multi-stage runs
//!
//! Estimates the probability that an ordered sequence of stages all complete
//! inside one fixed time budget, when any checkpoint in a stage can fail and
//! force a timed restart of that stage.
//!
//! ## Algorithm overview
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | 1 | [`frames`] | Seconds × fps → integer frames (ties to even) |
//! | 2 | [`transitions`] | Per-stage `q_succ`, `q_fail(k)`, failure frame costs |
//! | 3 | [`density::single`] | Renewal convolution for one stage |
//! | 4 | [`density::sequential`] | Two-dimensional DP chaining stages in order |
//! | 5 | [`threshold`] | Window selection and ticket amplification `1 - (1 - p)^N` |
//!
//! [`engine::evaluate`] runs all five steps after [`validate`] has checked
//! the input. [`sweep`] derives curves, ticket tables and parallel batches
//! from the same solver.
//!
//! ## Discretization
//!
//! All DP indices are frames past the minimum possible completion time
//! ("waste"). The table has `stages × (threshold − Σ succ_frames + 1)` f64
//! cells; queries above the configured bound are rejected before allocation.

#![allow(clippy::needless_range_loop)]

pub mod constants;
pub mod density;
pub mod engine;
pub mod env_config;
pub mod error;
pub mod frames;
pub mod server;
pub mod sweep;
pub mod threshold;
pub mod transitions;
pub mod types;
pub mod validate;

pub use engine::{evaluate, evaluate_with, success_probability, EngineConfig};
pub use error::ScenarioError;
pub use types::{Event, ProbabilityReport, Scenario, SingleStageScenario, Stage, Threshold};
