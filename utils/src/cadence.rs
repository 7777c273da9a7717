//! Wall-clock cadence helpers for the elimination scheduler.
//!
//! Ticks are anchored to fixed UTC boundaries: with a 12-hour period the
//! scheduler fires at 00:00 and 12:00 every day, regardless of when the
//! process started.

use outlast_types::Timestamp;

/// Seconds until the next period boundary after `now`.
///
/// Boundaries are multiples of `period_secs` counted from the Unix epoch,
/// so a 43200-second period yields 00:00 and 12:00 UTC. If `now` is exactly
/// on a boundary, the full period is returned (the current tick is assumed
/// to have already fired).
pub fn secs_until_next_boundary(now: Timestamp, period_secs: u64) -> u64 {
    assert!(period_secs > 0, "cadence period must be nonzero");
    period_secs - (now.as_secs() % period_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_DAY: u64 = 12 * 60 * 60;

    #[test]
    fn mid_period_returns_remainder() {
        // 03:00 UTC -> 9 hours until 12:00
        let now = Timestamp::new(3 * 3600);
        assert_eq!(secs_until_next_boundary(now, HALF_DAY), 9 * 3600);
    }

    #[test]
    fn on_boundary_returns_full_period() {
        let now = Timestamp::new(HALF_DAY * 10);
        assert_eq!(secs_until_next_boundary(now, HALF_DAY), HALF_DAY);
    }

    #[test]
    fn one_second_before_boundary() {
        let now = Timestamp::new(HALF_DAY - 1);
        assert_eq!(secs_until_next_boundary(now, HALF_DAY), 1);
    }
}
