//! Stay Booking: CLI Server
//!
//! Headless booking API suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/stay-booking/config.toml)
//! stay-booking-server
//!
//! # Custom config path
//! stay-booking-server --config /etc/stay-booking/config.toml
//!
//! # Override the API port
//! stay-booking-server --api-port 8081
//!
//! # Validate config without starting
//! stay-booking-server --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use stay_booking::config::AppConfig;
use stay_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Stay Booking: availability, pricing and reservations for rental listings.
#[derive(Parser, Debug)]
#[command(
    name = "stay-booking-server",
    version,
    about = "Booking API for short-term rental listings",
    long_about = "Stay Booking: REST API server for listing availability, \
                  price quotes and the reservation lifecycle.\n\n\
                  Default config: ~/.config/stay-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "STAY_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(stay_booking::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        if let Err(e) = &loaded {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
    }

    let (mut config, load_error) = match loaded {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!(
            "   Completion  : every {}s",
            config.booking.completion_interval_secs
        );
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    if cli.api_port.is_some() || cli.log_level.is_some() {
        info!(
            api_port = config.server.api_port,
            log_level = %config.logging.level,
            "CLI overrides applied"
        );
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
