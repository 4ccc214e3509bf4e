use clap::Subcommand;

use super::{open_controller, CliResult};
use quiethours_core::Event;

#[derive(Subcommand)]
pub enum ForceAction {
    /// Hold quiet hours active until `force stop`
    Start,
    /// Clear the manual hold
    Stop,
}

pub fn status() -> CliResult {
    let (_store, controller) = open_controller()?;
    let snapshot = controller.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

pub fn enable() -> CliResult {
    let (_store, controller) = open_controller()?;
    report(controller.enable());
    Ok(())
}

pub fn disable() -> CliResult {
    let (_store, controller) = open_controller()?;
    report(controller.disable());
    Ok(())
}

pub fn pause() -> CliResult {
    let (_store, controller) = open_controller()?;
    controller.resync();
    report(controller.pause());
    Ok(())
}

pub fn resume() -> CliResult {
    let (_store, controller) = open_controller()?;
    controller.resync();
    report(controller.resume());
    Ok(())
}

pub fn snooze(minutes: Option<u32>) -> CliResult {
    let (_store, controller) = open_controller()?;
    controller.resync();
    report(controller.snooze(minutes));
    Ok(())
}

pub fn force(action: ForceAction) -> CliResult {
    let (_store, controller) = open_controller()?;
    let event = match action {
        ForceAction::Start => controller.force_start(),
        ForceAction::Stop => controller.force_stop(),
    };
    report(event);
    Ok(())
}

fn report(event: Option<Event>) {
    match event {
        Some(event) => println!("{}", serde_json::to_string(&event).unwrap_or_default()),
        None => println!("no change"),
    }
}
