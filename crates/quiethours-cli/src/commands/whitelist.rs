use clap::Subcommand;

use super::CliResult;
use quiethours_core::{FileStore, SettingsExt, WhitelistEntry};

#[derive(Subcommand)]
pub enum WhitelistAction {
    /// Print all entries
    List,
    /// Add or update a number
    Add {
        number: String,
        /// Let calls from this number ring through
        #[arg(long)]
        calls: bool,
        /// Let messages from this number alert
        #[arg(long)]
        messages: bool,
    },
    /// Remove a number
    Remove { number: String },
}

pub fn run(action: WhitelistAction) -> CliResult {
    let store = FileStore::open_default()?;
    match action {
        WhitelistAction::List => {
            for entry in store.whitelist().entries() {
                println!(
                    "{}\tcalls={}\tmessages={}",
                    entry.number, entry.bypass_calls, entry.bypass_messages
                );
            }
        }
        WhitelistAction::Add {
            number,
            calls,
            messages,
        } => {
            // Validation happens here, before anything is persisted.
            let entry = WhitelistEntry::new(number, calls, messages)?;
            let mut list = store.whitelist();
            list.add(entry);
            store.set_whitelist(&list)?;
        }
        WhitelistAction::Remove { number } => {
            let mut list = store.whitelist();
            if !list.remove(&number) {
                return Err(format!("{number} is not on the whitelist").into());
            }
            store.set_whitelist(&list)?;
        }
    }
    Ok(())
}
