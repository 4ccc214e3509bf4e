//! Tokio-backed alarm scheduler.
//!
//! Each armed kind is one spawned task sleeping until its deadline, then
//! invoking the registered handler. Re-arming a kind aborts the previous
//! task first, so delivery for a stale deadline cannot race a fresh one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use super::{AlarmKind, AlarmScheduler};
use crate::error::CoreError;

type AlarmHandler = Arc<dyn Fn(AlarmKind) + Send + Sync>;

/// In-process alarm source for daemon mode.
///
/// Not wake-capable across device suspend -- on a phone this seam is the
/// platform alarm service; the tokio implementation covers a long-running
/// host process.
pub struct TokioAlarmScheduler {
    handler: Mutex<Option<AlarmHandler>>,
    tasks: Mutex<HashMap<AlarmKind, JoinHandle<()>>>,
}

impl TokioAlarmScheduler {
    pub fn new() -> Self {
        Self {
            handler: Mutex::new(None),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Register the firing handler. Must be called before the first
    /// `schedule_at`; alarms armed without a handler fire into the void
    /// with a warning.
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(AlarmKind) + Send + Sync + 'static,
    {
        *self.handler.lock().expect("handler poisoned") = Some(Arc::new(handler));
    }

    fn current_handler(&self) -> Option<AlarmHandler> {
        self.handler.lock().expect("handler poisoned").clone()
    }
}

impl Default for TokioAlarmScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmScheduler for TokioAlarmScheduler {
    fn schedule_at(&self, at: DateTime<Utc>, kind: AlarmKind) -> Result<(), CoreError> {
        let handler = self.current_handler();
        let delay = (at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match handler {
                Some(handler) => handler(kind),
                None => tracing::warn!(?kind, "alarm fired with no handler registered"),
            }
        });

        let mut tasks = self.tasks.lock().expect("task table poisoned");
        if let Some(previous) = tasks.insert(kind, task) {
            previous.abort();
        }
        Ok(())
    }

    fn cancel(&self, kind: AlarmKind) {
        if let Some(task) = self
            .tasks
            .lock()
            .expect("task table poisoned")
            .remove(&kind)
        {
            task.abort();
        }
    }
}
