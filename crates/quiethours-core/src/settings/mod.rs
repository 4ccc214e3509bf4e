//! Persisted settings access.
//!
//! The device settings store is an external collaborator; the core sees
//! it through the [`SettingsStore`] trait over a fixed, typed key set.
//! Typed accessors in [`SettingsExt`] parse persisted values and fall
//! back to documented defaults on anything malformed -- a bad value in
//! storage degrades behavior, it never aborts it.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bypass::{BypassPolicy, CallWhitelist};
use crate::error::StorageError;
use crate::reply::AutoReplyPolicy;
use crate::scheduler::ScheduleConfig;

/// Default repeated-call threshold.
pub const DEFAULT_REQUIRED_CALL_COUNT: u32 = 2;
/// Default snooze length in minutes.
pub const DEFAULT_SNOOZE_MINUTES: u32 = 10;

/// The watched settings keys.
///
/// A closed enum rather than free strings, so settings-change
/// notifications dispatch precisely and a typo cannot silently create a
/// new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    Enabled,
    StartMinute,
    EndMinute,
    Forced,
    Active,
    Paused,
    Snoozed,
    CallBypassPolicy,
    SmsBypassPolicy,
    RequiredCallCount,
    SmsBypassCode,
    AutoReplyCallPolicy,
    AutoReplyCallTemplate,
    AutoReplySmsPolicy,
    AutoReplySmsTemplate,
    Whitelist,
    SnoozeMinutes,
    NotificationsEnabled,
}

impl SettingKey {
    pub const ALL: [SettingKey; 18] = [
        SettingKey::Enabled,
        SettingKey::StartMinute,
        SettingKey::EndMinute,
        SettingKey::Forced,
        SettingKey::Active,
        SettingKey::Paused,
        SettingKey::Snoozed,
        SettingKey::CallBypassPolicy,
        SettingKey::SmsBypassPolicy,
        SettingKey::RequiredCallCount,
        SettingKey::SmsBypassCode,
        SettingKey::AutoReplyCallPolicy,
        SettingKey::AutoReplyCallTemplate,
        SettingKey::AutoReplySmsPolicy,
        SettingKey::AutoReplySmsTemplate,
        SettingKey::Whitelist,
        SettingKey::SnoozeMinutes,
        SettingKey::NotificationsEnabled,
    ];

    /// Storage key string, stable across releases.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Enabled => "quiet_hours_enabled",
            SettingKey::StartMinute => "quiet_hours_start",
            SettingKey::EndMinute => "quiet_hours_end",
            SettingKey::Forced => "quiet_hours_forced",
            SettingKey::Active => "quiet_hours_active",
            SettingKey::Paused => "quiet_hours_paused",
            SettingKey::Snoozed => "quiet_hours_snoozed",
            SettingKey::CallBypassPolicy => "call_bypass_policy",
            SettingKey::SmsBypassPolicy => "sms_bypass_policy",
            SettingKey::RequiredCallCount => "required_call_count",
            SettingKey::SmsBypassCode => "sms_bypass_code",
            SettingKey::AutoReplyCallPolicy => "auto_reply_call_policy",
            SettingKey::AutoReplyCallTemplate => "auto_reply_call_template",
            SettingKey::AutoReplySmsPolicy => "auto_reply_sms_policy",
            SettingKey::AutoReplySmsTemplate => "auto_reply_sms_template",
            SettingKey::Whitelist => "quiet_hours_whitelist",
            SettingKey::SnoozeMinutes => "quiet_hours_snooze_minutes",
            SettingKey::NotificationsEnabled => "quiet_hours_notifications",
        }
    }

    pub fn from_str(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }

    /// Keys whose change invalidates the controller's schedule.
    pub fn affects_schedule(self) -> bool {
        matches!(
            self,
            SettingKey::Enabled
                | SettingKey::StartMinute
                | SettingKey::EndMinute
                | SettingKey::Forced
        )
    }
}

/// Callback invoked after a watched key changes.
pub type SettingsObserver = Arc<dyn Fn(SettingKey) + Send + Sync>;

/// Flat key/value settings store.
///
/// `put_*` implementations notify observers registered for the written
/// key after the write lands.
pub trait SettingsStore: Send + Sync {
    fn get_int(&self, key: SettingKey) -> Result<Option<i64>, StorageError>;
    fn put_int(&self, key: SettingKey, value: i64) -> Result<(), StorageError>;
    fn get_string(&self, key: SettingKey) -> Result<Option<String>, StorageError>;
    fn put_string(&self, key: SettingKey, value: &str) -> Result<(), StorageError>;
    fn observe(&self, key: SettingKey, observer: SettingsObserver);
}

/// Typed, defaulting accessors over a [`SettingsStore`].
pub trait SettingsExt: SettingsStore {
    /// Integer value or `default` when missing or malformed. Malformed
    /// values are logged, not propagated.
    fn int_or(&self, key: SettingKey, default: i64) -> i64 {
        match self.get_int(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                tracing::warn!(key = key.as_str(), %err, "malformed setting, using default");
                default
            }
        }
    }

    fn string_or(&self, key: SettingKey, default: &str) -> String {
        match self.get_string(key) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(err) => {
                tracing::warn!(key = key.as_str(), %err, "malformed setting, using default");
                default.to_string()
            }
        }
    }

    fn flag(&self, key: SettingKey) -> bool {
        self.int_or(key, 0) != 0
    }

    fn set_flag(&self, key: SettingKey, value: bool) -> Result<(), StorageError> {
        self.put_int(key, i64::from(value))
    }

    /// The configured window, with the default 22:00 - 07:00 bounds.
    fn schedule_config(&self) -> ScheduleConfig {
        let defaults = ScheduleConfig::default();
        ScheduleConfig::new(
            self.flag(SettingKey::Enabled),
            self.int_or(SettingKey::StartMinute, i64::from(defaults.start_minute)) as u32,
            self.int_or(SettingKey::EndMinute, i64::from(defaults.end_minute)) as u32,
            self.flag(SettingKey::Forced),
        )
    }

    /// Repeated-call threshold, clamped to at least 1. Defaults to 2.
    fn required_call_count(&self) -> u32 {
        self.int_or(SettingKey::RequiredCallCount, i64::from(DEFAULT_REQUIRED_CALL_COUNT))
            .clamp(1, i64::from(u32::MAX)) as u32
    }

    /// Default snooze length, at least 1 minute. Defaults to 10.
    fn snooze_minutes(&self) -> u32 {
        self.int_or(SettingKey::SnoozeMinutes, i64::from(DEFAULT_SNOOZE_MINUTES))
            .clamp(1, i64::from(u32::MAX)) as u32
    }

    fn call_bypass_policy(&self) -> BypassPolicy {
        BypassPolicy::from_setting(self.int_or(SettingKey::CallBypassPolicy, 0))
    }

    fn sms_bypass_policy(&self) -> BypassPolicy {
        BypassPolicy::from_setting(self.int_or(SettingKey::SmsBypassPolicy, 0))
    }

    fn sms_bypass_code(&self) -> String {
        self.string_or(SettingKey::SmsBypassCode, "")
    }

    fn auto_reply_call_policy(&self) -> AutoReplyPolicy {
        AutoReplyPolicy {
            scope: BypassPolicy::from_setting(self.int_or(SettingKey::AutoReplyCallPolicy, 0)),
            message_template: self.string_or(SettingKey::AutoReplyCallTemplate, ""),
        }
    }

    fn auto_reply_sms_policy(&self) -> AutoReplyPolicy {
        AutoReplyPolicy {
            scope: BypassPolicy::from_setting(self.int_or(SettingKey::AutoReplySmsPolicy, 0)),
            message_template: self.string_or(SettingKey::AutoReplySmsTemplate, ""),
        }
    }

    fn whitelist(&self) -> CallWhitelist {
        CallWhitelist::parse(&self.string_or(SettingKey::Whitelist, ""))
    }

    fn set_whitelist(&self, whitelist: &CallWhitelist) -> Result<(), StorageError> {
        self.put_string(SettingKey::Whitelist, &whitelist.serialize())
    }

    fn notifications_enabled(&self) -> bool {
        self.int_or(SettingKey::NotificationsEnabled, 1) != 0
    }
}

impl<T: SettingsStore + ?Sized> SettingsExt for T {}
