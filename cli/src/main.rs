//! ERP pricing CLI
//!
//! Offline quotes against the configured catalog, plus a launcher for the
//! REST service. Command output is JSON on stdout; logs go to stderr.
//!
//! ```sh
//! # Validate config and catalog
//! erp-pricing check
//!
//! # Price a selection
//! erp-pricing quote --plan starter --period monthly --extra-stores 2 --plugin pos
//!
//! # Display pricing for a raw price pair
//! erp-pricing normalize --monthly 100 --yearly 1000
//!
//! # Run the REST API
//! erp-pricing serve --port 8080
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use erp_pricing::application::services::PricingService;
use erp_pricing::config::{config_path_from_env, AppConfig};
use erp_pricing::domain::BillingPeriod;
use erp_pricing::server::{build_catalog, init_tracing, ServerHandle, ServerOptions};
use erp_pricing::{AppError, InfraError, QuoteRequest};

/// ERP subscription pricing: quotes, display pricing and the REST service.
#[derive(Parser, Debug)]
#[command(name = "erp-pricing", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ERP_PRICING_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the catalog file.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate configuration and catalog, then exit.
    Check,
    /// Print active plans and plugins with display pricing.
    Catalog,
    /// Price a plan, extra stores and plugins.
    Quote {
        #[arg(long)]
        plan: String,
        /// `monthly` or `yearly`
        #[arg(long, default_value = "monthly")]
        period: BillingPeriod,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        extra_stores: i32,
        /// Plugin id; repeat for several plugins.
        #[arg(long = "plugin")]
        plugins: Vec<String>,
        /// VAT percent; defaults to `pricing.default_vat_percent`.
        #[arg(long)]
        vat: Option<Decimal>,
    },
    /// Derive display pricing from a monthly/yearly price pair.
    Normalize {
        #[arg(long)]
        monthly: Option<Decimal>,
        #[arg(long)]
        yearly: Option<Decimal>,
    },
    /// Run the REST API until SIGTERM / Ctrl+C.
    Serve {
        /// Override the listen port.
        #[arg(long)]
        port: Option<u16>,
        /// Override the log level (trace, debug, info, warn, error).
        #[arg(short, long)]
        log_level: Option<String>,
    },
}

#[derive(Serialize)]
struct CheckReport {
    config_file: String,
    config_loaded: bool,
    listen_address: String,
    log_level: String,
    default_vat_percent: String,
    catalog_source: String,
    plans: usize,
    plugins: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_path_from_env);
    let (mut config, config_loaded) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, true),
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            (AppConfig::default(), false)
        }
    };

    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }

    match cli.command {
        Command::Serve { port, log_level } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(level) = log_level {
                config.logging.level = level;
            }
            init_tracing(&config);
            info!("Configuration from {}", config_path.display());

            let handle = ServerHandle::start(ServerOptions { config }).await?;
            handle.install_signal_handler();
            info!("Press Ctrl+C to shut down gracefully");
            handle.wait().await;
        }
        command => {
            init_stderr_logging();
            run_once(command, &config, &config_path, config_loaded).await?;
        }
    }

    Ok(())
}

/// Run a one-shot command and print its result.
async fn run_once(
    command: Command,
    config: &AppConfig,
    config_path: &Path,
    config_loaded: bool,
) -> Result<(), AppError> {
    match command {
        Command::Check => {
            config.validate()?;
            let catalog = build_catalog(config)?;
            let report = CheckReport {
                config_file: config_path.display().to_string(),
                config_loaded,
                listen_address: config.server.address(),
                log_level: config.logging.level.clone(),
                default_vat_percent: config.pricing.default_vat_percent.to_string(),
                catalog_source: config
                    .catalog
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string()),
                plans: catalog.plan_count(),
                plugins: catalog.plugin_count(),
            };
            print_json(&report)?;
        }
        Command::Catalog => {
            let service = pricing_service(config)?;
            print_json(&service.catalog_overview().await?)?;
        }
        Command::Quote {
            plan,
            period,
            extra_stores,
            plugins,
            vat,
        } => {
            if extra_stores < 0 {
                warn!(extra_stores, "Negative extra store count is priced as zero");
            }
            let service = pricing_service(config)?;
            let quote = service
                .quote(QuoteRequest {
                    plan_id: plan,
                    billing_period: period,
                    extra_stores,
                    plugin_ids: plugins,
                    vat_percent: vat,
                })
                .await?;
            print_json(&quote)?;
        }
        Command::Normalize { monthly, yearly } => {
            let service = pricing_service(config)?;
            print_json(&service.normalize(monthly, yearly))?;
        }
        // Long-running; started from `main`.
        Command::Serve { .. } => {}
    }

    Ok(())
}

fn pricing_service(config: &AppConfig) -> Result<PricingService, InfraError> {
    let catalog = build_catalog(config)?;
    Ok(PricingService::new(
        Arc::new(catalog),
        config.pricing.default_vat_percent,
    ))
}

/// One-shot commands keep stdout for JSON.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), InfraError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
