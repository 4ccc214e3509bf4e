//! Automatic SMS replies.
//!
//! When quiet hours swallow a call or message, the auto-reply policy may
//! answer with a canned text. Sending is best-effort and owned by the
//! monitor; this module only decides whether and with what body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bypass::BypassPolicy;
use crate::platform::ContactStatus;

/// Who gets an automatic reply, and what it says.
///
/// One instance each for the call-ended and SMS-received triggers,
/// independently configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoReplyPolicy {
    pub scope: BypassPolicy,
    pub message_template: String,
}

impl AutoReplyPolicy {
    pub fn off() -> Self {
        Self::default()
    }
}

/// Decides auto-replies and debounces duplicates.
///
/// The telephony stack can report the same call teardown more than once
/// in quick succession; replying to the same number twice within the same
/// clock minute is suppressed.
#[derive(Debug, Default)]
pub struct AutoReplyEngine {
    last_number: Option<String>,
    last_minute: Option<i64>,
}

impl AutoReplyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the reply body for `number`, or `None` when the policy does
    /// not apply, the template is empty, or this (number, minute) pair
    /// was already answered.
    pub fn maybe_reply(
        &mut self,
        policy: &AutoReplyPolicy,
        number: &str,
        contact: &ContactStatus,
        now: DateTime<Utc>,
    ) -> Option<String> {
        if policy.message_template.is_empty() || !policy.scope.qualifies(contact) {
            return None;
        }

        let epoch_minute = now.timestamp() / 60;
        if self.last_number.as_deref() == Some(number) && self.last_minute == Some(epoch_minute) {
            return None;
        }

        self.last_number = Some(number.to_string());
        self.last_minute = Some(epoch_minute);
        Some(policy.message_template.clone())
    }
}
