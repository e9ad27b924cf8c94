use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{BookingCommand, ConfigCommand};
use config::Config;
use shortlist_core::{HybridStore, LocalStore, RemoteStore, Store};

#[derive(Parser)]
#[command(name = "shortlist")]
#[command(version)]
#[command(about = "Save and organize rental listings", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Booking(BookingCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Booking(cmd)) => {
            let store = build_store(&config);
            cmd.run(&store, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Builds the configured store: hybrid when a remote document store is
/// configured, purely local otherwise.
fn build_store(config: &Config) -> Store {
    let local = LocalStore::new(config.data_dir.value.clone());

    if let (Some(server_url), Some(api_key)) =
        (&config.remote.server_url, &config.remote.api_key)
    {
        tracing::debug!("using remote document store at {}", server_url);
        let remote = RemoteStore::new(server_url, api_key);
        Store::Hybrid(HybridStore::new(remote, local))
    } else {
        tracing::debug!(
            "no remote store configured; using local data in {}",
            config.data_dir.value.display()
        );
        Store::Local(local)
    }
}
