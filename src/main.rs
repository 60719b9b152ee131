use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog::app::{App, Command};
use catalog::config::DEFAULT_LOG_FILTER;
use catalog::{Config, Error, HttpRepository, TerminalShell};

/// Terminal front-end for the product catalog API
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Base URL of the product API
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_ref(), args.api_url.as_deref(), args.timeout)?;

    info!("Configuration loaded: api_url={}", config.api_url);

    let repository = Arc::new(HttpRepository::from_config(&config)?);
    let shell = Arc::new(TerminalShell::new(args.yes));
    let app = App::new(config, repository, shell);

    match app.run(args.command).await {
        Ok(()) => Ok(()),
        Err(Error::Validation(errors)) => {
            for error in errors.as_slice() {
                eprintln!("{}", error);
            }
            std::process::exit(2);
        }
        Err(e @ Error::UnknownRoute(_)) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            // Already reported to the user through the shell
            debug!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}
