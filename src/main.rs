//! ERP subscription pricing service
//!
//! Serves catalog display pricing and subscription quotes over REST.
//! Reads configuration from TOML (`~/.config/erp-pricing/config.toml`,
//! or the path in `ERP_PRICING_CONFIG`).

use tracing::{error, info, warn};

use erp_pricing::config::{config_path_from_env, AppConfig};
use erp_pricing::server::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path_from_env();
    let (app_cfg, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(&app_cfg);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => warn!(
            "Failed to load config from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    let handle = match ServerHandle::start(ServerOptions { config: app_cfg }).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start pricing service: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");
    handle.wait().await;

    Ok(())
}
