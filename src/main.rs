//! App Permissions CLI
//!
//! Runs the app permissions screen against a JSON device fixture and prints
//! the allowed/denied lists.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use app_permissions::commands::ShowCommand;
use app_permissions::core::VERSION;

#[derive(Parser, Debug)]
#[command(name = "app-permissions", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the allowed and denied permissions of one app
    Show(ShowCommand),
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("app-permissions v{} starting...", VERSION);

    match cli.command {
        Commands::Show(command) => println!("{}", command.execute().await?),
    }

    Ok(())
}
