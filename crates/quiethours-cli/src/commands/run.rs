//! Foreground scheduler daemon.
//!
//! Wires the file-backed settings store, the tokio alarm scheduler and
//! the controller together, then sleeps until interrupted. Settings
//! edits (from another `quiethours` invocation or a text editor plus
//! restart) and alarm firings drive all state changes.

use std::sync::Arc;

use super::CliResult;
use quiethours_core::platform::TokioAlarmScheduler;
use quiethours_core::{FileStore, QuietHoursController, SettingKey, SettingsStore};

pub fn run() -> CliResult {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(daemon())
}

async fn daemon() -> CliResult {
    let store = Arc::new(FileStore::open_default()?);
    let alarms = Arc::new(TokioAlarmScheduler::new());
    let controller = Arc::new(QuietHoursController::new(store.clone(), alarms.clone()));

    {
        let controller = controller.clone();
        alarms.set_handler(move |kind| {
            if let Some(event) = controller.on_alarm(kind) {
                tracing::info!(?event, "alarm transition");
            }
        });
    }

    // React to schedule edits made through this process.
    for key in SettingKey::ALL.into_iter().filter(|k| k.affects_schedule()) {
        let controller = controller.clone();
        store.observe(
            key,
            Arc::new(move |key| {
                if let Some(event) = controller.on_settings_changed(key) {
                    tracing::info!(?event, "settings transition");
                }
            }),
        );
    }

    // Boot path: derive everything from config before waiting.
    if let Some(event) = controller.resync() {
        tracing::info!(?event, "startup transition");
    }
    tracing::info!(state = ?controller.state(), "quiet hours daemon running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}
