use anyhow::{Context, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use marketplace::config::{LatencyConfig, MarketplaceConfig};
use marketplace::domain::store::{KeyValueStore, PersistedStore};
use marketplace::infra::backend::MockBackend;
use marketplace::infra::storage::{FileStore, MemoryStore};
use marketplace::infra::textgen::TemplateGenerator;
use marketplace::{Session, Shell};
use runtime::{default_logging_config, AppConfig, CliArgs};

mod commands;
mod render;
mod repl;

use commands::Command;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Environment variables consulted when no text API key is configured.
const TEXT_KEY_ENV: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// PTJ - part-time jobs marketplace for students and employers
#[derive(Parser)]
#[command(name = "ptj")]
#[command(about = "PTJ - part-time jobs marketplace for students and employers")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep everything in memory and skip the artificial latency
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_else(default_logging_config);
    let home_dir = Path::new(&config.storage.home_dir);
    runtime::logging::init_logging_from_config(&logging_config, home_dir);
    tracing::info!("PTJ starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let market = marketplace_config(&config, &args)?;

    match cli.command.unwrap_or(Command::Status) {
        Command::Check => check_config(&config, &market),
        Command::Repl => {
            let session = open_session(&config, &args, market)?;
            repl::run(&session).await
        }
        command => {
            let session = open_session(&config, &args, market)?;
            commands::dispatch(&session, command).await
        }
    }
}

fn marketplace_config(config: &AppConfig, args: &CliArgs) -> Result<MarketplaceConfig> {
    let mut market: MarketplaceConfig = config.module_config("marketplace")?;
    if args.mock {
        market.latency = LatencyConfig::instant();
    }
    if market.text_api_key.is_none() {
        market.text_api_key = TEXT_KEY_ENV
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
    }
    Ok(market)
}

fn open_session(config: &AppConfig, args: &CliArgs, market: MarketplaceConfig) -> Result<Session> {
    let kv: Arc<dyn KeyValueStore> = if args.mock {
        tracing::info!("Using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let dir = config.data_dir();
        tracing::info!("Using data dir: {}", dir.display());
        Arc::new(FileStore::open(&dir)?)
    };

    let store = PersistedStore::new(kv, market.key_prefix.clone());
    let shell = Shell::start(store, &market);
    let backend = MockBackend::from_base_url(&market.api_base_url)
        .with_context(|| "Invalid modules.marketplace.api_base_url")?;
    let textgen = TemplateGenerator::new(market.text_api_key.clone());

    Ok(Session::new(
        shell,
        Arc::new(backend),
        Arc::new(textgen),
        market,
    ))
}

fn check_config(config: &AppConfig, market: &MarketplaceConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let backend = MockBackend::from_base_url(&market.api_base_url)
        .with_context(|| "Invalid modules.marketplace.api_base_url")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Backend: {}", backend.base());
    println!("Data dir: {}", config.data_dir().display());
    println!("{}", config.to_yaml()?);
    Ok(())
}
