//! Fixed values shared by the engine, the server and the CLI.
//!
//! Time values are in seconds unless the name says frames. Frame counts only
//! exist after [`crate::frames::discretize`] has been applied.

/// Length of one ticket window in seconds. Ticket-count thresholds always
/// evaluate a single window of exactly this length.
pub const TICKET_WINDOW_SECONDS: f64 = 3600.0;

/// Frame rate used when a request does not name one.
pub const DEFAULT_FPS: f64 = 1.0;

/// Default upper bound on `stages * (max_waste + 1)` DP cells.
///
/// One cell is an f64, so the default caps a single query at ~160 MB.
/// Overridden by `TL_PROB_MAX_TABLE_CELLS` or `--max-table-cells`.
pub const DEFAULT_MAX_TABLE_CELLS: usize = 20_000_000;

/// Largest discretized time (`seconds * fps`) any single input may reach.
/// Keeps every frame sum the engine forms far inside `usize`.
pub const MAX_FRAMES: f64 = u32::MAX as f64;

/// Default upper bound on points in one curve or ticket table.
/// Overridden by `TL_PROB_MAX_POINTS` or `--max-points`.
pub const DEFAULT_MAX_POINTS: usize = 1_000_000;

/// Default HTTP port for `tl-prob-server`.
pub const DEFAULT_PORT: u16 = 9000;

/// Tolerance for the transition partition `q_succ + sum(q_fail) = 1`.
pub const PARTITION_TOLERANCE: f64 = 1e-9;

/// Percent-to-fraction factor for event success probabilities.
pub const PERCENT: f64 = 100.0;
