//! Deterministic alarm scheduler for tests and simulation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{AlarmKind, AlarmScheduler};
use crate::error::CoreError;

/// Records armed alarms instead of sleeping; the caller fires them.
///
/// Lets tests step wall-clock boundaries without waiting, and lets the CLI
/// simulate a schedule run.
#[derive(Default)]
pub struct ManualAlarmScheduler {
    pending: Mutex<HashMap<AlarmKind, DateTime<Utc>>>,
    /// When true, `schedule_at` reports failure. Exercises the retry-on-
    /// next-trigger recovery path.
    fail_scheduling: Mutex<bool>,
}

impl ManualAlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The deadline armed for `kind`, if any.
    pub fn deadline(&self, kind: AlarmKind) -> Option<DateTime<Utc>> {
        self.pending
            .lock()
            .expect("alarm table poisoned")
            .get(&kind)
            .copied()
    }

    /// Number of currently armed alarms.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("alarm table poisoned").len()
    }

    /// Disarm `kind` and return whether it was armed. The caller then
    /// delivers the firing to the controller itself.
    pub fn take(&self, kind: AlarmKind) -> Option<DateTime<Utc>> {
        self.pending
            .lock()
            .expect("alarm table poisoned")
            .remove(&kind)
    }

    /// The earliest armed alarm, if any.
    pub fn next_due(&self) -> Option<(AlarmKind, DateTime<Utc>)> {
        self.pending
            .lock()
            .expect("alarm table poisoned")
            .iter()
            .min_by_key(|(_, at)| **at)
            .map(|(kind, at)| (*kind, *at))
    }

    pub fn set_fail_scheduling(&self, fail: bool) {
        *self.fail_scheduling.lock().expect("flag poisoned") = fail;
    }
}

impl AlarmScheduler for ManualAlarmScheduler {
    fn schedule_at(&self, at: DateTime<Utc>, kind: AlarmKind) -> Result<(), CoreError> {
        if *self.fail_scheduling.lock().expect("flag poisoned") {
            return Err(CoreError::Alarm("alarm backend unavailable".into()));
        }
        self.pending
            .lock()
            .expect("alarm table poisoned")
            .insert(kind, at);
        Ok(())
    }

    fn cancel(&self, kind: AlarmKind) {
        self.pending
            .lock()
            .expect("alarm table poisoned")
            .remove(&kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rearming_replaces_previous_deadline() {
        let alarms = ManualAlarmScheduler::new();
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 1, 23, 0, 0).unwrap();

        alarms.schedule_at(t1, AlarmKind::WindowStart).unwrap();
        alarms.schedule_at(t2, AlarmKind::WindowStart).unwrap();

        assert_eq!(alarms.pending_count(), 1);
        assert_eq!(alarms.deadline(AlarmKind::WindowStart), Some(t2));
    }

    #[test]
    fn cancel_disarms() {
        let alarms = ManualAlarmScheduler::new();
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap();
        alarms.schedule_at(t, AlarmKind::SnoozeExpiry).unwrap();
        alarms.cancel(AlarmKind::SnoozeExpiry);
        assert_eq!(alarms.pending_count(), 0);
    }

    #[test]
    fn next_due_returns_earliest() {
        let alarms = ManualAlarmScheduler::new();
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();
        alarms.schedule_at(start, AlarmKind::WindowStart).unwrap();
        alarms.schedule_at(stop, AlarmKind::WindowStop).unwrap();
        assert_eq!(alarms.next_due(), Some((AlarmKind::WindowStop, stop)));
    }

    #[test]
    fn failure_mode_reports_error() {
        let alarms = ManualAlarmScheduler::new();
        alarms.set_fail_scheduling(true);
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap();
        assert!(alarms.schedule_at(t, AlarmKind::WindowStart).is_err());
        assert_eq!(alarms.pending_count(), 0);
    }
}
