mod controller;
mod window;

pub use controller::{ControllerSnapshot, ControllerState, QuietHoursController, RuntimeState};
pub use window::{evaluate, ScheduleConfig, WindowStatus, MINUTES_PER_DAY};
