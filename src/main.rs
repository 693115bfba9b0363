//! Stay booking service.
//!
//! Reads configuration from a TOML file (`STAY_BOOKING_CONFIG`, else
//! ~/.config/stay-booking/config.toml) and serves the REST API.

use tracing::{error, info};

use stay_booking::config::AppConfig;
use stay_booking::default_config_path;
use stay_booking::server::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("STAY_BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: true,
    })
    .await?;
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
