use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "clockroom-cli", version, about = "Clockroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a clock page in the terminal
    Run(commands::run::RunArgs),
    /// Per-page preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Notification sounds
    Sound {
        #[command(subcommand)]
        action: commands::sound::SoundAction,
    },
    /// Move to another clock page, carrying fullscreen over
    Navigate(commands::navigate::NavigateArgs),
    /// Browsing session state
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Current weather for the world clock
    Weather(commands::weather::WeatherArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Sound { action } => commands::sound::run(action),
        Commands::Navigate(args) => commands::navigate::run(args),
        Commands::Session { action } => commands::session::run(action),
        Commands::Weather(args) => commands::weather::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
