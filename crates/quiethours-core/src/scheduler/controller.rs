//! Quiet hours lifecycle.
//!
//! The controller is the only component with wall-clock side effects. It
//! owns the enabled/active/paused/snoozed state, re-derives the full
//! schedule from config on every trigger (alarm, settings change, boot,
//! user action) and persists the runtime flags after each transition.
//!
//! ## State machine
//!
//! ```text
//! Disabled -> Waiting <-> Active -> Active+Paused | Active+Snoozed
//! ```
//!
//! Every transition cancels pending alarms before arming new ones and is
//! safe to invoke redundantly: an alarm firing, a settings notification
//! and a boot event for the same boundary collapse into one net change.
//!
//! Locking invariant: schedule config keys (enabled/start/end/forced)
//! are never written while the state lock is held, so a settings
//! observer calling back into [`QuietHoursController::on_settings_changed`]
//! on the writing thread cannot deadlock.
//!
//! All convenience entry points stamp `Utc::now()`; the `_at` variants
//! take the instant explicitly so the host can supply the device wall
//! clock and tests can step time.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::window::{self, ScheduleConfig, WindowStatus};
use crate::events::Event;
use crate::platform::{AlarmKind, AlarmScheduler};
use crate::settings::{SettingKey, SettingsExt, SettingsStore};

/// Volatile-per-field but persisted runtime flags.
///
/// `active` is the only flag the autonomous scheduler toggles; `paused`
/// and `snoozed` are manual overrides layered on top of it and never
/// outlive it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    pub active: bool,
    pub paused: bool,
    pub snoozed: bool,
}

/// The five externally visible states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    Disabled,
    Waiting,
    Active,
    ActivePaused,
    ActiveSnoozed,
}

/// JSON-friendly view of the controller for status surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub state: ControllerState,
    pub config: ScheduleConfig,
    pub runtime: RuntimeState,
    pub suppressing: bool,
    pub window: WindowStatus,
    pub at: DateTime<Utc>,
}

pub struct QuietHoursController {
    store: Arc<dyn SettingsStore>,
    alarms: Arc<dyn AlarmScheduler>,
    state: Mutex<RuntimeState>,
}

impl QuietHoursController {
    /// Restore the controller from persisted flags.
    ///
    /// Construction has no side effects; call [`Self::resync`] (the boot
    /// path) afterwards to derive `active` from the clock and arm alarms.
    pub fn new(store: Arc<dyn SettingsStore>, alarms: Arc<dyn AlarmScheduler>) -> Self {
        let restored = RuntimeState {
            active: store.flag(SettingKey::Active),
            paused: store.flag(SettingKey::Paused),
            snoozed: store.flag(SettingKey::Snoozed),
        };
        Self {
            store,
            alarms,
            state: Mutex::new(restored),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn runtime_state(&self) -> RuntimeState {
        *self.state.lock().expect("state poisoned")
    }

    pub fn state(&self) -> ControllerState {
        let runtime = self.runtime_state();
        if !self.store.flag(SettingKey::Enabled) && !self.store.flag(SettingKey::Forced) {
            return ControllerState::Disabled;
        }
        match (runtime.active, runtime.paused, runtime.snoozed) {
            (false, _, _) => ControllerState::Waiting,
            (true, true, _) => ControllerState::ActivePaused,
            (true, false, true) => ControllerState::ActiveSnoozed,
            (true, false, false) => ControllerState::Active,
        }
    }

    /// Whether incoming calls/SMS are currently being suppressed.
    ///
    /// False while paused or snoozed: quiet hours are nominally on but
    /// the user asked to hear everything right now.
    pub fn is_suppressing(&self) -> bool {
        let runtime = self.runtime_state();
        runtime.active && !runtime.paused && !runtime.snoozed
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> ControllerSnapshot {
        let config = self.store.schedule_config();
        ControllerSnapshot {
            state: self.state(),
            window: window::evaluate(&config, minute_of_day(now)),
            config,
            runtime: self.runtime_state(),
            suppressing: self.is_suppressing(),
            at: now,
        }
    }

    // ── User operations ──────────────────────────────────────────────

    pub fn enable(&self) -> Option<Event> {
        self.enable_at(Utc::now())
    }

    pub fn enable_at(&self, now: DateTime<Utc>) -> Option<Event> {
        self.write_config_flag(SettingKey::Enabled, true);
        self.resync_at(now)
    }

    pub fn disable(&self) -> Option<Event> {
        self.disable_at(Utc::now())
    }

    pub fn disable_at(&self, now: DateTime<Utc>) -> Option<Event> {
        let was_enabled =
            self.store.flag(SettingKey::Enabled) || self.store.flag(SettingKey::Forced);
        self.write_config_flag(SettingKey::Enabled, false);
        self.write_config_flag(SettingKey::Forced, false);

        let mut state = self.state.lock().expect("state poisoned");
        for kind in AlarmKind::ALL {
            self.alarms.cancel(kind);
        }
        *state = RuntimeState::default();
        self.persist(&state);
        drop(state);

        if was_enabled {
            tracing::info!("quiet hours disabled");
            Some(Event::QuietHoursDisabled { at: now })
        } else {
            None
        }
    }

    pub fn pause(&self) -> Option<Event> {
        self.pause_at(Utc::now())
    }

    pub fn pause_at(&self, now: DateTime<Utc>) -> Option<Event> {
        let mut state = self.state.lock().expect("state poisoned");
        if !state.active || state.paused {
            return None;
        }
        state.paused = true;
        state.snoozed = false;
        self.alarms.cancel(AlarmKind::SnoozeExpiry);
        self.persist(&state);
        tracing::info!("quiet hours paused");
        Some(Event::QuietHoursPaused { at: now })
    }

    pub fn resume(&self) -> Option<Event> {
        self.resume_at(Utc::now())
    }

    pub fn resume_at(&self, now: DateTime<Utc>) -> Option<Event> {
        let mut state = self.state.lock().expect("state poisoned");
        if !state.active || (!state.paused && !state.snoozed) {
            return None;
        }
        state.paused = false;
        state.snoozed = false;
        self.alarms.cancel(AlarmKind::SnoozeExpiry);
        self.persist(&state);
        tracing::info!("quiet hours resumed");
        Some(Event::QuietHoursResumed { at: now })
    }

    /// Pause with an auto-expiring timer. `minutes: None` uses the
    /// configured default.
    pub fn snooze(&self, minutes: Option<u32>) -> Option<Event> {
        self.snooze_at(minutes, Utc::now())
    }

    pub fn snooze_at(&self, minutes: Option<u32>, now: DateTime<Utc>) -> Option<Event> {
        let minutes = minutes
            .filter(|m| *m >= 1)
            .unwrap_or_else(|| self.store.snooze_minutes());

        let mut state = self.state.lock().expect("state poisoned");
        if !state.active {
            return None;
        }
        state.snoozed = true;
        state.paused = false;
        let until = minute_floor(now) + Duration::minutes(i64::from(minutes));
        self.arm(AlarmKind::SnoozeExpiry, until);
        self.persist(&state);
        tracing::info!(minutes, "quiet hours snoozed");
        Some(Event::QuietHoursSnoozed { minutes, until, at: now })
    }

    /// Hold quiet hours active regardless of the calendar until
    /// [`Self::force_stop`] clears it.
    pub fn force_start(&self) -> Option<Event> {
        self.force_start_at(Utc::now())
    }

    pub fn force_start_at(&self, now: DateTime<Utc>) -> Option<Event> {
        self.write_config_flag(SettingKey::Forced, true);
        self.resync_at(now)
    }

    pub fn force_stop(&self) -> Option<Event> {
        self.force_stop_at(Utc::now())
    }

    pub fn force_stop_at(&self, now: DateTime<Utc>) -> Option<Event> {
        self.write_config_flag(SettingKey::Forced, false);
        self.resync_at(now)
    }

    // ── External triggers ────────────────────────────────────────────

    /// Boot path and general self-heal: re-derive everything from config.
    pub fn resync(&self) -> Option<Event> {
        self.resync_at(Utc::now())
    }

    pub fn resync_at(&self, now: DateTime<Utc>) -> Option<Event> {
        let mut state = self.state.lock().expect("state poisoned");
        self.resync_locked(&mut state, now)
    }

    /// A one-shot alarm fired.
    pub fn on_alarm(&self, kind: AlarmKind) -> Option<Event> {
        self.on_alarm_at(kind, Utc::now())
    }

    pub fn on_alarm_at(&self, kind: AlarmKind, now: DateTime<Utc>) -> Option<Event> {
        match kind {
            // Boundary alarms carry no payload; the clock and config
            // decide, so a stale alarm for an already invalidated
            // boundary degrades to a redundant resync.
            AlarmKind::WindowStart | AlarmKind::WindowStop => self.resync_at(now),
            AlarmKind::SnoozeExpiry => {
                let mut state = self.state.lock().expect("state poisoned");
                if !state.active || !state.snoozed {
                    return None;
                }
                state.snoozed = false;
                self.persist(&state);
                tracing::info!("snooze expired");
                Some(Event::SnoozeExpired { at: now })
            }
        }
    }

    /// A watched settings key changed. Only schedule-affecting keys
    /// trigger work; the rest are read on demand by their consumers.
    pub fn on_settings_changed(&self, key: SettingKey) -> Option<Event> {
        self.on_settings_changed_at(key, Utc::now())
    }

    pub fn on_settings_changed_at(&self, key: SettingKey, now: DateTime<Utc>) -> Option<Event> {
        if !key.affects_schedule() {
            return None;
        }
        self.resync_at(now)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Cancel, recompute and re-arm. Single source of truth for
    /// `active`; never patches incrementally.
    fn resync_locked(&self, state: &mut RuntimeState, now: DateTime<Utc>) -> Option<Event> {
        self.alarms.cancel(AlarmKind::WindowStart);
        self.alarms.cancel(AlarmKind::WindowStop);

        let config = self.store.schedule_config();
        let status = window::evaluate(&config, minute_of_day(now));
        let origin = minute_floor(now);

        if let Some(minutes) = status.minutes_until_start {
            self.arm(AlarmKind::WindowStart, origin + Duration::minutes(i64::from(minutes)));
        }
        if let Some(minutes) = status.minutes_until_stop {
            self.arm(AlarmKind::WindowStop, origin + Duration::minutes(i64::from(minutes)));
        }

        let was_active = state.active;
        state.active = status.in_window;
        if !state.active && (state.paused || state.snoozed) {
            state.paused = false;
            state.snoozed = false;
            self.alarms.cancel(AlarmKind::SnoozeExpiry);
        }
        self.persist(state);

        if state.active && !was_active {
            tracing::info!(forced = config.forced, "quiet hours started");
            Some(Event::QuietHoursStarted { forced: config.forced, at: now })
        } else if !state.active && was_active {
            tracing::info!("quiet hours stopped");
            Some(Event::QuietHoursStopped { at: now })
        } else {
            None
        }
    }

    /// Arm a one-shot alarm. A scheduling failure is logged and left to
    /// self-heal: the next trigger re-derives the schedule anyway.
    fn arm(&self, kind: AlarmKind, at: DateTime<Utc>) {
        if let Err(err) = self.alarms.schedule_at(at, kind) {
            tracing::warn!(?kind, %err, "failed to arm alarm, will retry on next trigger");
        }
    }

    fn persist(&self, state: &RuntimeState) {
        for (key, value) in [
            (SettingKey::Active, state.active),
            (SettingKey::Paused, state.paused),
            (SettingKey::Snoozed, state.snoozed),
        ] {
            if let Err(err) = self.store.set_flag(key, value) {
                tracing::warn!(key = key.as_str(), %err, "failed to persist runtime flag");
            }
        }
    }

    /// Config keys are written without the state lock held; see the
    /// module docs.
    fn write_config_flag(&self, key: SettingKey, value: bool) {
        debug_assert!(key.affects_schedule());
        if let Err(err) = self.store.set_flag(key, value) {
            tracing::warn!(key = key.as_str(), %err, "failed to write config flag");
        }
    }
}

fn minute_of_day(now: DateTime<Utc>) -> u32 {
    now.hour() * 60 + now.minute()
}

/// Truncate to the start of the minute, so alarm deadlines land exactly
/// on boundary minutes.
fn minute_floor(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(i64::from(now.second()))
        - Duration::nanoseconds(i64::from(now.nanosecond()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualAlarmScheduler;
    use crate::settings::MemoryStore;
    use chrono::TimeZone;

    struct Fixture {
        store: Arc<MemoryStore>,
        alarms: Arc<ManualAlarmScheduler>,
        controller: QuietHoursController,
    }

    /// Store configured for 22:00 - 07:00, nothing enabled yet.
    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        store.put_int(SettingKey::StartMinute, 1320).unwrap();
        store.put_int(SettingKey::EndMinute, 420).unwrap();
        let alarms = Arc::new(ManualAlarmScheduler::new());
        let controller = QuietHoursController::new(store.clone(), alarms.clone());
        Fixture {
            store,
            alarms,
            controller,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 30).unwrap()
    }

    #[test]
    fn enable_outside_window_waits_and_arms_start() {
        let f = fixture();
        let event = f.controller.enable_at(at(12, 0));
        assert!(event.is_none());
        assert_eq!(f.controller.state(), ControllerState::Waiting);

        let start = f.alarms.deadline(AlarmKind::WindowStart).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap());
    }

    #[test]
    fn enable_inside_window_activates_immediately() {
        let f = fixture();
        let event = f.controller.enable_at(at(23, 30));
        assert!(matches!(event, Some(Event::QuietHoursStarted { forced: false, .. })));
        assert_eq!(f.controller.state(), ControllerState::Active);
        assert!(f.controller.is_suppressing());

        let stop = f.alarms.deadline(AlarmKind::WindowStop).unwrap();
        assert_eq!(stop, Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap());
    }

    #[test]
    fn enable_twice_is_idempotent() {
        let f = fixture();
        f.controller.enable_at(at(23, 30));
        let second = f.controller.enable_at(at(23, 31));
        assert!(second.is_none());
        assert_eq!(f.controller.state(), ControllerState::Active);
        // Still exactly one alarm per boundary.
        assert_eq!(f.alarms.pending_count(), 2);
    }

    #[test]
    fn start_alarm_fires_into_active_then_stop_returns_to_waiting() {
        let f = fixture();
        f.controller.enable_at(at(12, 0));

        let event = f.controller.on_alarm_at(AlarmKind::WindowStart, at(22, 0));
        assert!(matches!(event, Some(Event::QuietHoursStarted { .. })));
        assert_eq!(f.controller.state(), ControllerState::Active);

        let event = f
            .controller
            .on_alarm_at(AlarmKind::WindowStop, Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap());
        assert!(matches!(event, Some(Event::QuietHoursStopped { .. })));
        assert_eq!(f.controller.state(), ControllerState::Waiting);
        // Next start is re-armed for the same evening.
        assert_eq!(
            f.alarms.deadline(AlarmKind::WindowStart),
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 22, 0, 0).unwrap())
        );
    }

    #[test]
    fn stale_alarm_for_invalidated_boundary_follows_latest_config() {
        let f = fixture();
        f.controller.enable_at(at(12, 0));
        // The user moves the window to all-day before the old start
        // boundary fires.
        f.store.put_int(SettingKey::EndMinute, 1320).unwrap();
        f.controller
            .on_settings_changed_at(SettingKey::EndMinute, at(12, 1));
        assert_eq!(f.controller.state(), ControllerState::Active);

        // The stale boundary alarm degrades to a no-op resync.
        let event = f.controller.on_alarm_at(AlarmKind::WindowStart, at(22, 0));
        assert!(event.is_none());
        assert_eq!(f.controller.state(), ControllerState::Active);
    }

    #[test]
    fn pause_resume_cycle() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));

        assert!(matches!(
            f.controller.pause_at(at(23, 5)),
            Some(Event::QuietHoursPaused { .. })
        ));
        assert_eq!(f.controller.state(), ControllerState::ActivePaused);
        assert!(!f.controller.is_suppressing());
        // Redundant pause succeeds silently.
        assert!(f.controller.pause_at(at(23, 6)).is_none());

        assert!(matches!(
            f.controller.resume_at(at(23, 10)),
            Some(Event::QuietHoursResumed { .. })
        ));
        assert!(f.controller.is_suppressing());
    }

    #[test]
    fn resume_while_waiting_is_a_noop() {
        let f = fixture();
        f.controller.enable_at(at(12, 0));
        assert!(f.controller.resume_at(at(12, 1)).is_none());
        assert!(f.controller.pause_at(at(12, 1)).is_none());
    }

    #[test]
    fn snooze_arms_expiry_and_expiry_restores_active() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));

        let event = f.controller.snooze_at(Some(10), at(23, 5));
        assert!(matches!(event, Some(Event::QuietHoursSnoozed { minutes: 10, .. })));
        assert_eq!(f.controller.state(), ControllerState::ActiveSnoozed);
        assert!(!f.controller.is_suppressing());
        assert_eq!(
            f.alarms.deadline(AlarmKind::SnoozeExpiry),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 23, 15, 0).unwrap())
        );

        let event = f.controller.on_alarm_at(AlarmKind::SnoozeExpiry, at(23, 15));
        assert!(matches!(event, Some(Event::SnoozeExpired { .. })));
        // Back to Active, not ActivePaused.
        assert_eq!(f.controller.state(), ControllerState::Active);
        assert!(f.controller.is_suppressing());
    }

    #[test]
    fn snooze_default_minutes_come_from_settings() {
        let f = fixture();
        f.store.put_int(SettingKey::SnoozeMinutes, 25).unwrap();
        f.controller.enable_at(at(23, 0));
        let event = f.controller.snooze_at(None, at(23, 5));
        assert!(matches!(event, Some(Event::QuietHoursSnoozed { minutes: 25, .. })));
    }

    #[test]
    fn pause_cancels_pending_snooze() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));
        f.controller.snooze_at(Some(10), at(23, 5));
        f.controller.pause_at(at(23, 6));

        assert_eq!(f.alarms.deadline(AlarmKind::SnoozeExpiry), None);
        assert_eq!(f.controller.state(), ControllerState::ActivePaused);
        // A late expiry delivery is ignored.
        assert!(f
            .controller
            .on_alarm_at(AlarmKind::SnoozeExpiry, at(23, 15))
            .is_none());
        assert_eq!(f.controller.state(), ControllerState::ActivePaused);
    }

    #[test]
    fn window_stop_clears_manual_overrides() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));
        f.controller.snooze_at(Some(120), at(23, 5));

        f.controller
            .on_alarm_at(AlarmKind::WindowStop, Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap());
        let runtime = f.controller.runtime_state();
        assert!(!runtime.active && !runtime.paused && !runtime.snoozed);
        assert_eq!(f.alarms.deadline(AlarmKind::SnoozeExpiry), None);
    }

    #[test]
    fn force_start_holds_active_regardless_of_calendar() {
        let f = fixture();
        let event = f.controller.force_start_at(at(12, 0));
        assert!(matches!(event, Some(Event::QuietHoursStarted { forced: true, .. })));
        assert_eq!(f.controller.state(), ControllerState::Active);
        // Forced suppresses the calendar: no boundary alarms pending.
        assert_eq!(f.alarms.pending_count(), 0);

        // Clearing force outside the window drops back to inactive.
        let event = f.controller.force_stop_at(at(12, 30));
        assert!(matches!(event, Some(Event::QuietHoursStopped { .. })));
    }

    #[test]
    fn force_stop_inside_window_stays_active() {
        let f = fixture();
        f.store.put_int(SettingKey::Enabled, 1).unwrap();
        f.controller.force_start_at(at(23, 0));
        let event = f.controller.force_stop_at(at(23, 30));
        // The calendar window still covers 23:30.
        assert!(event.is_none());
        assert_eq!(f.controller.state(), ControllerState::Active);
        assert_eq!(f.alarms.pending_count(), 2);
    }

    #[test]
    fn disable_from_any_state_cancels_everything() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));
        f.controller.snooze_at(Some(10), at(23, 5));

        let event = f.controller.disable_at(at(23, 6));
        assert!(matches!(event, Some(Event::QuietHoursDisabled { .. })));
        assert_eq!(f.controller.state(), ControllerState::Disabled);
        assert_eq!(f.alarms.pending_count(), 0);
        // Disabling again is silent.
        assert!(f.controller.disable_at(at(23, 7)).is_none());
    }

    #[test]
    fn boot_restores_persisted_state_and_rearms() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));
        drop(f.controller);

        // New process: flags come back from the store, resync re-arms.
        let controller = QuietHoursController::new(f.store.clone(), f.alarms.clone());
        assert!(controller.runtime_state().active);
        controller.resync_at(at(23, 40));
        assert_eq!(controller.state(), ControllerState::Active);
        assert_eq!(
            f.alarms.deadline(AlarmKind::WindowStop),
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap())
        );
    }

    #[test]
    fn boot_after_window_ended_while_powered_off() {
        let f = fixture();
        f.controller.enable_at(at(23, 0));
        drop(f.controller);

        let controller = QuietHoursController::new(f.store.clone(), f.alarms.clone());
        // Device was off past 07:00; boot resync corrects `active`.
        let event = controller.resync_at(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
        assert!(matches!(event, Some(Event::QuietHoursStopped { .. })));
        assert_eq!(controller.state(), ControllerState::Waiting);
    }

    #[test]
    fn failed_alarm_scheduling_heals_on_next_trigger() {
        let f = fixture();
        f.alarms.set_fail_scheduling(true);
        f.controller.enable_at(at(12, 0));
        assert_eq!(f.alarms.pending_count(), 0);

        // Collaborator comes back; the next settings change re-arms.
        f.alarms.set_fail_scheduling(false);
        f.controller
            .on_settings_changed_at(SettingKey::StartMinute, at(12, 5));
        assert!(f.alarms.deadline(AlarmKind::WindowStart).is_some());
    }

    #[test]
    fn unrelated_settings_change_is_ignored() {
        let f = fixture();
        f.controller.enable_at(at(12, 0));
        let before = f.alarms.deadline(AlarmKind::WindowStart);
        assert!(f
            .controller
            .on_settings_changed_at(SettingKey::Whitelist, at(12, 5))
            .is_none());
        assert_eq!(f.alarms.deadline(AlarmKind::WindowStart), before);
    }

    #[test]
    fn all_day_window_has_no_boundary_alarms() {
        let f = fixture();
        f.store.put_int(SettingKey::StartMinute, 420).unwrap();
        f.store.put_int(SettingKey::EndMinute, 420).unwrap();
        let event = f.controller.enable_at(at(12, 0));
        assert!(matches!(event, Some(Event::QuietHoursStarted { .. })));
        assert_eq!(f.alarms.pending_count(), 0);
        assert_eq!(f.controller.state(), ControllerState::Active);
    }

    #[test]
    fn snapshot_reflects_current_shape() {
        let f = fixture();
        f.controller.enable_at(at(5, 0));
        let snapshot = f.controller.snapshot_at(at(5, 0));
        assert_eq!(snapshot.state, ControllerState::Active);
        assert!(snapshot.suppressing);
        assert_eq!(snapshot.window.minutes_until_stop, Some(120));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "active");
    }
}
