// ABOUTME: Entry point for askcode — a terminal chat client for a code-helper service.
// ABOUTME: Parses CLI args, loads config, sets up file logging, and launches the app.

use std::path::PathBuf;

use clap::Parser;

use askcode::app::App;
use askcode::config::Config;
use askcode::logging;

/// Ask a code-helper service questions from your terminal.
#[derive(Debug, Parser)]
#[command(name = "askcode", version, about)]
struct Cli {
    /// Responder URL (overrides config and ASKCODE_ENDPOINT).
    #[arg(long)]
    endpoint: Option<String>,

    /// Session storage file.
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Start with an empty chat list; saved chats are replaced on the first change.
    #[arg(long)]
    fresh: bool,

    /// Config file to use instead of ~/.askcode/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load local .env if present so ASKCODE_ENDPOINT can live there.
    let _ = dotenvy::dotenv();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    config.apply_endpoint_override(cli.endpoint);
    if let Some(path) = cli.storage {
        config.storage.path = path.to_string_lossy().to_string();
    }

    logging::init(&config)?;

    App::new(config, cli.fresh).run().await
}
