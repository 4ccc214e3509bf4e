//! Repeated-call counting.
//!
//! "N calls from the same number within 30 minutes" detection. The
//! counter is volatile, tied to the running monitoring session; a process
//! restart clears progress toward the threshold.

use chrono::{DateTime, Duration, Utc};

/// Length of the rolling window.
pub const ROLLING_WINDOW_MINUTES: i64 = 30;

/// Rolling-window call counter.
///
/// The window is pure elapsed time from the first counted call. A call
/// from a different number, or one arriving after the window has lapsed,
/// starts a fresh window.
#[derive(Debug, Clone, Default)]
pub struct CallWindowCounter {
    number: Option<String>,
    window_start: Option<DateTime<Utc>>,
    count: u32,
}

impl CallWindowCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a qualifying call from `number` at `now` and return the
    /// count accumulated within the current window, including this call.
    pub fn record(&mut self, number: &str, now: DateTime<Utc>) -> u32 {
        let window = Duration::minutes(ROLLING_WINDOW_MINUTES);
        let same_number = self.number.as_deref() == Some(number);
        let within_window = self
            .window_start
            .map(|start| now >= start && now - start <= window)
            .unwrap_or(false);

        if same_number && within_window {
            self.count += 1;
        } else {
            self.number = Some(number.to_string());
            self.window_start = Some(now);
            self.count = 1;
        }
        self.count
    }

    /// Drop all progress. Used when monitoring stops.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    #[test]
    fn counts_repeats_within_window() {
        let mut counter = CallWindowCounter::new();
        assert_eq!(counter.record("0712345678", at(0)), 1);
        assert_eq!(counter.record("0712345678", at(25)), 2);
    }

    #[test]
    fn lapsed_window_starts_over() {
        let mut counter = CallWindowCounter::new();
        assert_eq!(counter.record("0712345678", at(0)), 1);
        // 35 minutes later: outside the 30-minute window.
        assert_eq!(counter.record("0712345678", at(35)), 1);
    }

    #[test]
    fn call_at_window_edge_still_counts() {
        let mut counter = CallWindowCounter::new();
        counter.record("0712345678", at(0));
        assert_eq!(counter.record("0712345678", at(30)), 2);
    }

    #[test]
    fn different_number_starts_fresh_window() {
        let mut counter = CallWindowCounter::new();
        counter.record("0712345678", at(0));
        assert_eq!(counter.record("0798765432", at(5)), 1);
        // The original number lost its progress too.
        assert_eq!(counter.record("0712345678", at(10)), 1);
    }

    #[test]
    fn window_spanning_midnight_keeps_counting() {
        let mut counter = CallWindowCounter::new();
        let before_midnight = Utc.with_ymd_and_hms(2025, 6, 1, 23, 50, 0).unwrap();
        let after_midnight = Utc.with_ymd_and_hms(2025, 6, 2, 0, 10, 0).unwrap();
        counter.record("0712345678", before_midnight);
        assert_eq!(counter.record("0712345678", after_midnight), 2);
    }

    #[test]
    fn clock_moving_backwards_resets() {
        let mut counter = CallWindowCounter::new();
        counter.record("0712345678", at(10));
        // Earlier than the window start: treat as a fresh window rather
        // than trusting a deranged clock.
        assert_eq!(counter.record("0712345678", at(-5)), 1);
    }

    #[test]
    fn reset_clears_progress() {
        let mut counter = CallWindowCounter::new();
        counter.record("0712345678", at(0));
        counter.reset();
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.record("0712345678", at(1)), 1);
    }
}
