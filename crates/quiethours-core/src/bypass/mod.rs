mod counter;
mod engine;
mod whitelist;

pub use counter::{CallWindowCounter, ROLLING_WINDOW_MINUTES};
pub use engine::{should_bypass_call, should_bypass_sms, BypassPolicy, BypassReason};
pub use whitelist::{CallWhitelist, WhitelistEntry, ENTRY_DELIMITER, FIELD_DELIMITER};
