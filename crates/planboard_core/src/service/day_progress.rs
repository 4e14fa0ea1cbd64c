//! Daily progress bar computation.

/// Seconds in one civil day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Snapshot of how much of the current day has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayProgress {
    /// Elapsed share of the day in `0.0..=100.0`.
    pub percent: f64,
    pub remaining_seconds: u32,
}

/// Computes day progress from local seconds since midnight.
///
/// Values past the end of the day clamp to 100%.
pub fn day_progress(seconds_since_midnight: u32) -> DayProgress {
    let elapsed = seconds_since_midnight.min(SECONDS_PER_DAY);
    DayProgress {
        percent: f64::from(elapsed) * 100.0 / f64::from(SECONDS_PER_DAY),
        remaining_seconds: SECONDS_PER_DAY - elapsed,
    }
}
