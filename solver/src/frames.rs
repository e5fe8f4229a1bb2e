//! Frame discretization.
//!
//! Every time value the engine touches (check times, success times, the
//! restart delay and the threshold) goes through [`discretize`] exactly once,
//! so all DP indices are integers and boundaries are stable.

/// `round(seconds * fps)` with ties to even.
///
/// Inputs are finite and non-negative (checked by [`crate::validate`]).
#[inline]
pub fn discretize(seconds: f64, fps: f64) -> usize {
    debug_assert!(seconds.is_finite() && seconds >= 0.0, "seconds={seconds}");
    debug_assert!(fps.is_finite() && fps >= 1.0, "fps={fps}");
    (seconds * fps).round_ties_even() as usize
}

/// Inverse of [`discretize`] for reporting, exact only on frame boundaries.
#[inline]
pub fn frames_to_seconds(frames: usize, fps: f64) -> f64 {
    frames as f64 / fps
}
