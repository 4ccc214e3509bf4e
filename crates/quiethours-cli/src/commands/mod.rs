pub mod config;
pub mod control;
pub mod run;
pub mod whitelist;

use std::sync::Arc;

use quiethours_core::platform::ManualAlarmScheduler;
use quiethours_core::{FileStore, QuietHoursController};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the settings file and restore the controller from it.
///
/// One-shot commands use the manual alarm scheduler: state changes are
/// persisted, and a running `quiethours run` daemon picks up the new
/// schedule through its settings observers the next time it reloads.
pub fn open_controller() -> Result<(Arc<FileStore>, QuietHoursController), Box<dyn std::error::Error>>
{
    let store = Arc::new(FileStore::open_default()?);
    let controller =
        QuietHoursController::new(store.clone(), Arc::new(ManualAlarmScheduler::new()));
    Ok((store, controller))
}
