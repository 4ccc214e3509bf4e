use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quiethours", version, about = "Quiet Hours CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current scheduler state as JSON
    Status,
    /// Turn the quiet hours schedule on
    Enable,
    /// Turn the quiet hours schedule off
    Disable,
    /// Pause suppression until resumed
    Pause,
    /// Resume suppression after a pause or snooze
    Resume,
    /// Pause suppression with an auto-expiring timer
    Snooze {
        /// Snooze length in minutes (default from settings)
        minutes: Option<u32>,
    },
    /// Manual hold, independent of the calendar window
    Force {
        #[command(subcommand)]
        action: commands::control::ForceAction,
    },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Bypass whitelist management
    Whitelist {
        #[command(subcommand)]
        action: commands::whitelist::WhitelistAction,
    },
    /// Run the scheduler in the foreground
    Run,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::control::status(),
        Commands::Enable => commands::control::enable(),
        Commands::Disable => commands::control::disable(),
        Commands::Pause => commands::control::pause(),
        Commands::Resume => commands::control::resume(),
        Commands::Snooze { minutes } => commands::control::snooze(minutes),
        Commands::Force { action } => commands::control::force(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Whitelist { action } => commands::whitelist::run(action),
        Commands::Run => commands::run::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
