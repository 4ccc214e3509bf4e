//! Window membership math.
//!
//! Pure minute-of-day arithmetic, no clock access. The controller feeds
//! it the current minute and acts on the result; nothing here is cached
//! across calls, so a wall-clock jump is healed by the next evaluation.

use serde::{Deserialize, Serialize};

/// Minutes in a day; all minute-of-day values are taken modulo this.
pub const MINUTES_PER_DAY: u32 = 1440;

/// The configured recurring daily window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub enabled: bool,
    /// Window start, minute of day in `[0, 1440)`.
    pub start_minute: u32,
    /// Window end, minute of day in `[0, 1440)`. `end < start` means the
    /// window crosses midnight; `end == start` means a 24h window.
    pub end_minute: u32,
    /// Manual hold: the window is active regardless of the calendar.
    pub forced: bool,
}

impl ScheduleConfig {
    pub fn new(enabled: bool, start_minute: u32, end_minute: u32, forced: bool) -> Self {
        Self {
            enabled,
            start_minute: start_minute % MINUTES_PER_DAY,
            end_minute: end_minute % MINUTES_PER_DAY,
            forced,
        }
    }

    /// A 24h window: active at every minute of the day.
    pub fn is_all_day(&self) -> bool {
        self.start_minute == self.end_minute
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        // 22:00 - 07:00, disabled until the user turns it on.
        Self {
            enabled: false,
            start_minute: 22 * 60,
            end_minute: 7 * 60,
            forced: false,
        }
    }
}

/// Result of evaluating the window at a given minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStatus {
    pub in_window: bool,
    /// Forward distance in minutes to the next start boundary, when one
    /// is scheduled.
    pub minutes_until_start: Option<u32>,
    /// Forward distance in minutes to the next stop boundary, when one
    /// is scheduled.
    pub minutes_until_stop: Option<u32>,
}

impl WindowStatus {
    fn unscheduled(in_window: bool) -> Self {
        Self {
            in_window,
            minutes_until_start: None,
            minutes_until_stop: None,
        }
    }
}

/// Forward distance from `from` to `to` on the 1440-minute circle.
///
/// Zero distance maps to a full day: a boundary "now" is the next
/// occurrence tomorrow, never an immediate re-fire.
fn minutes_until(from: u32, to: u32) -> u32 {
    let delta = (to + MINUTES_PER_DAY - from) % MINUTES_PER_DAY;
    if delta == 0 {
        MINUTES_PER_DAY
    } else {
        delta
    }
}

/// Evaluate window membership and the next boundaries at `now_minute`.
///
/// Disabled and forced configs schedule no transitions: disabled because
/// there is nothing to do, forced because the manual hold suppresses the
/// calendar until it is explicitly cleared. The hold applies even while
/// the calendar itself is switched off, so force-start works from the
/// Disabled state.
pub fn evaluate(config: &ScheduleConfig, now_minute: u32) -> WindowStatus {
    let now = now_minute % MINUTES_PER_DAY;

    if config.forced {
        return WindowStatus::unscheduled(true);
    }
    if !config.enabled {
        return WindowStatus::unscheduled(false);
    }
    if config.is_all_day() {
        return WindowStatus::unscheduled(true);
    }

    let (start, end) = (config.start_minute, config.end_minute);
    let in_window = if end < start {
        now >= start || now < end
    } else {
        now >= start && now < end
    };

    WindowStatus {
        in_window,
        minutes_until_start: Some(minutes_until(now, start)),
        minutes_until_stop: Some(minutes_until(now, end)),
    }
}
