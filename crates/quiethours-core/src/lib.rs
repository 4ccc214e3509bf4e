//! # Quiet Hours Core Library
//!
//! Core business logic for the Quiet Hours do-not-disturb scheduler: a
//! recurring daily window the device enters and leaves autonomously via
//! wall-clock alarms, manual overrides (pause, snooze, force), and
//! bypass rules deciding which calls and messages still alert the user
//! while the window is active.
//!
//! ## Architecture
//!
//! - **Scheduler**: [`QuietHoursController`], a wall-clock state machine
//!   that re-derives its full schedule from config on every trigger
//! - **Bypass**: pure decision functions over the whitelist, the general
//!   policy and a 30-minute repeated-call window
//! - **Monitor**: the inbound call/SMS surface composing the above with
//!   best-effort auto-replies
//! - **Settings**: a typed trait over the device's flat key/value store,
//!   with in-memory and TOML-file implementations
//!
//! Telephony, contacts, alarms and outbound SMS are consumed through
//! the narrow traits in [`platform`]; the core renders nothing and owns
//! no threads.

pub mod bypass;
pub mod error;
pub mod events;
pub mod monitor;
pub mod platform;
pub mod reply;
pub mod scheduler;
pub mod settings;

pub use bypass::{BypassPolicy, BypassReason, CallWhitelist, CallWindowCounter, WhitelistEntry};
pub use error::{CoreError, StorageError, WhitelistError};
pub use events::Event;
pub use monitor::{CallMonitor, RingDecision, SmsDecision};
pub use platform::{AlarmKind, AlarmScheduler, CallState, ContactDirectory, ContactStatus, Messenger};
pub use reply::{AutoReplyEngine, AutoReplyPolicy};
pub use scheduler::{ControllerSnapshot, ControllerState, QuietHoursController, ScheduleConfig};
pub use settings::{FileStore, MemoryStore, SettingKey, SettingsExt, SettingsStore};
