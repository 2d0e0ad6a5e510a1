//! diaclass CLI
//!
//! Command-line client for the diaclass prediction service.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::AssessArgs;

/// diaclass - diabetes risk assessment client
#[derive(Parser, Debug)]
#[command(name = "diaclass")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Service API address
    #[arg(long, default_value = "http://127.0.0.1:8000", global = true)]
    api: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assess a patient profile
    Assess(AssessArgs),

    /// Show model metadata
    Metadata,

    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let client = commands::ApiClient::new(&cli.api);

    match cli.command {
        Commands::Assess(args) => {
            commands::assess(&client, args).await?;
        }
        Commands::Metadata => {
            commands::metadata(&client).await?;
        }
        Commands::Health => {
            commands::health(&client).await?;
        }
    }

    Ok(())
}
