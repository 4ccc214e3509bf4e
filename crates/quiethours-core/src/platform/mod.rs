//! Collaborator interfaces.
//!
//! The scheduler core never talks to real telephony, contacts or alarm
//! hardware directly -- it consumes these narrow traits. The host process
//! wires concrete implementations at startup; tests wire doubles.

mod manual;
mod tokio_alarm;

pub use manual::ManualAlarmScheduler;
pub use tokio_alarm::TokioAlarmScheduler;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The fixed set of one-shot alarms the controller arms.
///
/// At most one alarm per kind is pending at any time; re-arming a kind
/// replaces its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    /// Fires at the next window start boundary.
    WindowStart,
    /// Fires at the next window stop boundary.
    WindowStop,
    /// Fires when a snooze runs out.
    SnoozeExpiry,
}

impl AlarmKind {
    pub const ALL: [AlarmKind; 3] = [
        AlarmKind::WindowStart,
        AlarmKind::WindowStop,
        AlarmKind::SnoozeExpiry,
    ];
}

/// One-shot wall-clock alarm source.
///
/// Implementations must deliver at least once even across process sleep
/// (wake-capable). Delivery happens by invoking the handler the host
/// registered; the controller treats a redundant delivery as a no-op.
pub trait AlarmScheduler: Send + Sync {
    /// Arm `kind` to fire at the absolute instant `at`, replacing any
    /// pending alarm of the same kind.
    fn schedule_at(&self, at: DateTime<Utc>, kind: AlarmKind) -> Result<(), CoreError>;

    /// Cancel the pending alarm of `kind`, if any.
    fn cancel(&self, kind: AlarmKind);
}

/// What the contacts database knows about a phone number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactStatus {
    /// The number resolves to a saved contact.
    pub is_known_contact: bool,
    /// The contact is starred/favorited.
    pub is_starred: bool,
    /// Display name, when the contact is known.
    pub display_name: Option<String>,
}

impl ContactStatus {
    /// Status for a number with no contacts entry.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Phone number to contact resolution.
pub trait ContactDirectory: Send + Sync {
    fn lookup(&self, number: &str) -> ContactStatus;
}

/// Outbound SMS channel, used by the auto-reply path.
pub trait Messenger: Send + Sync {
    fn send_text(&self, number: &str, body: &str) -> Result<(), Box<dyn std::error::Error>>;
}

/// Call state reported by the telephony collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallState {
    Ringing,
    Active,
    Idle,
}
