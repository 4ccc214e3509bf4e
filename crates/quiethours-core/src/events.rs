use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bypass::BypassReason;

/// Every observable state change produces an Event.
///
/// The notification/alert layer consumes these; the CLI prints them. The
/// core never renders anything itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Quiet hours became active (window opened or force-start).
    QuietHoursStarted {
        forced: bool,
        at: DateTime<Utc>,
    },
    /// Quiet hours became inactive (window closed or force cleared
    /// outside the window).
    QuietHoursStopped {
        at: DateTime<Utc>,
    },
    /// The feature was switched off entirely.
    QuietHoursDisabled {
        at: DateTime<Utc>,
    },
    /// Manual pause: suppression off until resumed, window untouched.
    QuietHoursPaused {
        at: DateTime<Utc>,
    },
    QuietHoursResumed {
        at: DateTime<Utc>,
    },
    /// Self-expiring pause.
    QuietHoursSnoozed {
        minutes: u32,
        until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    SnoozeExpired {
        at: DateTime<Utc>,
    },
    /// A call was allowed to ring through despite quiet hours.
    CallBypassed {
        number: String,
        reason: BypassReason,
        at: DateTime<Utc>,
    },
    /// A call was suppressed. `notify` reflects the notification-enabled
    /// flag so the alert layer knows whether to surface it.
    CallSilenced {
        number: String,
        notify: bool,
        at: DateTime<Utc>,
    },
    SmsBypassed {
        number: String,
        reason: BypassReason,
        at: DateTime<Utc>,
    },
    SmsSilenced {
        number: String,
        notify: bool,
        at: DateTime<Utc>,
    },
    /// An automatic reply was handed to the messenger.
    AutoReplySent {
        number: String,
        at: DateTime<Utc>,
    },
}
