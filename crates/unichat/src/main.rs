//! unichat: University Assistant Chat Client
//!
//! Main entry point for the interactive chat client.
//!
//! Usage:
//!   unichat                   - Start interactive chat
//!   unichat --config <path>   - Use a specific TOML config file
//!   unichat --help            - Show help

mod cli;

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use unichat_core::{BackendClient, ChatBackend, ChatController, Config, ConnectivityMonitor};

/// Log directive used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "warn";

/// Run mode
enum RunMode {
    /// Interactive chat, optionally with an explicit config file
    Chat(Option<PathBuf>),
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let mode = parse_args()?;

    let config_path = match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("unichat {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Chat(path) => path,
    };

    // Initialize logging (stderr, so it does not interleave with the chat)
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = match config_path {
        Some(path) => Config::from_toml_file(&path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting unichat...");
    tracing::info!("Backend: {}", config.api.base_url);

    let backend: Arc<dyn ChatBackend> = Arc::new(
        BackendClient::new(&config)
            .map_err(|e| anyhow::anyhow!("Failed to create backend client: {}", e))?,
    );

    // Start connectivity probe
    let connectivity = ConnectivityMonitor::new();
    let probe = connectivity.start(Arc::clone(&backend), config.chat.health_interval());

    let controller = ChatController::from_config(&config, backend, connectivity);
    let result = cli::run_cli(controller, &config).await;

    probe.stop().await;
    tracing::info!("Shutdown complete");
    result
}

/// Log filter from the `RUST_LOG` value, falling back to `warn` when unset or invalid
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Parse command line arguments
fn parse_args() -> anyhow::Result<RunMode> {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            _ => {}
        }
    }

    Ok(RunMode::Chat(config_path))
}

/// Print help message
fn print_help() {
    println!("unichat - University Assistant Chat Client");
    println!();
    println!("Usage:");
    println!("  unichat                   Start interactive chat");
    println!("  unichat --config <path>   Load configuration from a TOML file");
    println!("  unichat --help            Show this help message");
    println!("  unichat --version         Show version");
    println!();
    println!("Environment Variables:");
    println!("  UNICHAT_API_BASE_URL          Backend URL (default: http://localhost:5000/api)");
    println!("  UNICHAT_API_TIMEOUT_SECS      Request timeout (default: 30)");
    println!("  UNICHAT_LANGUAGE              en, tr, ar, fr, ur or fa (default: en)");
    println!("  UNICHAT_HEALTH_INTERVAL_SECS  Health probe interval (default: 30)");
    println!("  UNICHAT_OFFLINE_DELAY_MS      Delay of the offline reply (default: 1500)");
    println!("  UNICHAT_EXPORT_DIR            Transcript directory (default: .)");
    println!("  RUST_LOG                      Log filter (default: warn)");
}
