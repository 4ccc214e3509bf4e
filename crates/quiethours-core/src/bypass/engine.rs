//! Bypass decisions.
//!
//! Pure functions deciding whether a call or SMS should alert the user
//! while quiet hours are active. The whitelist always wins over the
//! general policy; the general policy then gates who participates in
//! repeated-call counting (calls) or bypass-code matching (SMS).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::counter::CallWindowCounter;
use super::whitelist::CallWhitelist;
use crate::platform::ContactStatus;

/// Who qualifies for bypass under the general policy.
///
/// Stored as an integer setting; unknown values read back as `Off`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassPolicy {
    #[default]
    Off,
    AllNumbers,
    ContactsOnly,
    StarredOnly,
}

impl BypassPolicy {
    pub fn from_setting(value: i64) -> Self {
        match value {
            1 => Self::AllNumbers,
            2 => Self::ContactsOnly,
            3 => Self::StarredOnly,
            _ => Self::Off,
        }
    }

    pub fn as_setting(self) -> i64 {
        match self {
            Self::Off => 0,
            Self::AllNumbers => 1,
            Self::ContactsOnly => 2,
            Self::StarredOnly => 3,
        }
    }

    /// Whether a caller with `contact` status qualifies under this policy.
    pub fn qualifies(self, contact: &ContactStatus) -> bool {
        match self {
            Self::Off => false,
            Self::AllNumbers => true,
            Self::ContactsOnly => contact.is_known_contact,
            Self::StarredOnly => contact.is_starred,
        }
    }
}

/// Why a call or SMS was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassReason {
    /// The number carries an explicit whitelist flag.
    Whitelisted,
    /// Enough qualifying calls arrived within the rolling window.
    RepeatedCalls,
    /// SMS containing the bypass code from a qualifying sender.
    BypassCode,
}

/// Decide whether a ringing call bypasses quiet hours.
///
/// The whitelist wins outright and leaves the counter untouched; only
/// calls that qualify under the general policy are counted toward the
/// repeat threshold.
pub fn should_bypass_call(
    policy: BypassPolicy,
    whitelist: &CallWhitelist,
    number: &str,
    contact: &ContactStatus,
    counter: &mut CallWindowCounter,
    required_count: u32,
    now: DateTime<Utc>,
) -> Option<BypassReason> {
    if whitelist.find(number).map(|e| e.bypass_calls) == Some(true) {
        return Some(BypassReason::Whitelisted);
    }

    if !policy.qualifies(contact) {
        return None;
    }

    if counter.record(number, now) >= required_count.max(1) {
        Some(BypassReason::RepeatedCalls)
    } else {
        None
    }
}

/// Decide whether an incoming SMS bypasses quiet hours.
///
/// A single qualifying message is enough; there is no counting. The body
/// must contain the configured bypass code, and the sender must either
/// carry the message whitelist flag or qualify under the general policy.
pub fn should_bypass_sms(
    policy: BypassPolicy,
    whitelist: &CallWhitelist,
    number: &str,
    contact: &ContactStatus,
    body: &str,
    bypass_code: &str,
) -> Option<BypassReason> {
    if bypass_code.is_empty() || !body.contains(bypass_code) {
        return None;
    }
    if whitelist.find(number).map(|e| e.bypass_messages) == Some(true) {
        return Some(BypassReason::Whitelisted);
    }
    if policy.qualifies(contact) {
        return Some(BypassReason::BypassCode);
    }
    None
}
