//! Pulsecheck - survey dashboard client
//!
//! A CLI client for the group-climate survey service: anonymous answer
//! submission, curator statistics with category aggregation, and admin
//! management of faculties and groups.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, validation failure, etc.)
//!   2 - Access denied (authenticated, but lacking the required role)
//!   3 - Login required (no valid session; login URL is printed)

mod analysis;
mod api;
mod auth;
mod cli;
mod config;
mod dashboard;
mod models;
mod report;

use anyhow::{Context, Result};
use api::ApiClient;
use cli::{Args, Command};
use config::Config;
use dashboard::Output;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Pulsecheck v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_command(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .pulsecheck.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".pulsecheck.toml");

    if path.exists() {
        eprintln!("⚠️  .pulsecheck.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .pulsecheck.toml")?;

    println!("✅ Created .pulsecheck.toml with default settings.");
    println!("   Edit it to set the service URL and output preferences.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the parsed command. Returns the process exit code.
async fn run_command(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = ApiClient::new(&config.api.base_url, config.api.timeout_seconds)
        .context("Failed to create API client")?;
    info!("Using service at: {}", client.base_url());

    let output = Output {
        format: args
            .format
            .unwrap_or_else(|| match config.output.format.as_str() {
                "json" => cli::OutputFormat::Json,
                _ => cli::OutputFormat::Markdown,
            }),
        file: args.output.clone().or_else(|| {
            if config.output.file.is_empty() {
                None
            } else {
                Some(config.output.file.clone().into())
            }
        }),
        quiet: args.quiet,
    };

    match args.command {
        Command::Questions => dashboard::survey::list_questions(&client, &output).await,
        Command::Groups => dashboard::survey::list_groups(&client, &output).await,
        Command::Submit { group, ref answers } => {
            dashboard::survey::submit(&client, group, answers, &output).await
        }
        Command::Curator { group, ref report } => {
            dashboard::curator::run(&client, group, report.as_deref(), &output).await
        }
        Command::Admin { action } => dashboard::admin::run(&client, action, &output).await,
        Command::InitConfig => unreachable!("handled before logging init"),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .pulsecheck.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
