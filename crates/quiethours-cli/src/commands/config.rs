use clap::Subcommand;

use super::CliResult;
use quiethours_core::{FileStore, SettingKey, SettingsExt, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get { key: String },
    /// Write one setting (integers are stored as integers)
    Set { key: String, value: String },
    /// Print the effective configuration with defaults applied
    Show,
}

pub fn run(action: ConfigAction) -> CliResult {
    let store = FileStore::open_default()?;
    match action {
        ConfigAction::Get { key } => {
            let key = parse_key(&key)?;
            match store.get_string(key).ok().flatten() {
                Some(value) => println!("{value}"),
                None => match store.get_int(key)? {
                    Some(value) => println!("{value}"),
                    None => println!("(unset)"),
                },
            }
        }
        ConfigAction::Set { key, value } => {
            let key = parse_key(&key)?;
            match value.parse::<i64>() {
                Ok(int) => store.put_int(key, int)?,
                Err(_) => store.put_string(key, &value)?,
            }
        }
        ConfigAction::Show => {
            let effective = serde_json::json!({
                "schedule": store.schedule_config(),
                "call_bypass_policy": store.call_bypass_policy(),
                "sms_bypass_policy": store.sms_bypass_policy(),
                "required_call_count": store.required_call_count(),
                "sms_bypass_code": store.sms_bypass_code(),
                "auto_reply_call": store.auto_reply_call_policy(),
                "auto_reply_sms": store.auto_reply_sms_policy(),
                "snooze_minutes": store.snooze_minutes(),
                "notifications_enabled": store.notifications_enabled(),
                "whitelist": store.whitelist(),
            });
            println!("{}", serde_json::to_string_pretty(&effective)?);
        }
    }
    Ok(())
}

fn parse_key(key: &str) -> Result<SettingKey, Box<dyn std::error::Error>> {
    SettingKey::from_str(key).ok_or_else(|| format!("unknown setting key: {key}").into())
}
