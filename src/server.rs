//! Reusable pricing service runtime.
//!
//! [`ServerHandle`] owns the server lifecycle: metrics recorder, catalog
//! loading, REST API and graceful shutdown. The service binary and the CLI
//! `serve` command both start the API through it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::services::PricingService;
use crate::config::AppConfig;
use crate::infrastructure::{load_catalog, InMemoryCatalog};
use crate::interfaces::http::create_api_router;
use crate::shared::errors::InfraError;
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

/// Options for starting the pricing service.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub config: AppConfig,
}

/// Handle to a running pricing service.
///
/// ```rust,no_run
/// use erp_pricing::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub service: Arc<PricingService>,
    pub config: AppConfig,
    /// Address the API is bound to
    pub local_addr: SocketAddr,

    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the REST API.
    ///
    /// Installs the Prometheus recorder (once per process), loads the
    /// catalog and binds the listener before returning.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting ERP pricing service...");

        let prometheus_handle = prometheus_handle()?;

        let catalog = build_catalog(&app_cfg)?;
        info!(
            plans = catalog.plan_count(),
            plugins = catalog.plugin_count(),
            "Catalog ready"
        );

        let service = Arc::new(PricingService::new(
            Arc::new(catalog),
            app_cfg.pricing.default_vat_percent,
        ));
        info!(
            "Default VAT {}%, currency {}",
            service.default_vat_percent(),
            service.currency()
        );

        let api_router = create_api_router(service.clone(), prometheus_handle);

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            service,
            config: app_cfg,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    /// Trigger graceful shutdown without waiting.
    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the API task to stop.
    ///
    /// Once shutdown is triggered, in-flight requests get
    /// `server.shutdown_timeout` seconds before the task is aborted.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        let shutdown = self.shutdown.clone();
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                log_task_exit(result);
                info!("ERP pricing service stopped");
                return;
            }
            _ = shutdown.wait() => {}
        }

        match tokio::time::timeout(timeout, &mut api_task).await {
            Ok(result) => log_task_exit(result),
            Err(_) => {
                warn!("In-flight requests still running after {:?}, aborting", timeout);
                api_task.abort();
            }
        }
        info!("ERP pricing service stopped");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down ERP pricing service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

fn log_task_exit(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => info!("REST API server stopped"),
        Err(e) => error!("REST API server task panicked: {}", e),
    }
}

/// The global recorder can only be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> Result<PrometheusHandle, InfraError> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        InfraError::Config(format!("failed to install Prometheus recorder: {}", e))
    })?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Catalog from `catalog.path`, or the built-in price list when unset.
pub fn build_catalog(config: &AppConfig) -> Result<InMemoryCatalog, InfraError> {
    match &config.catalog.path {
        Some(path) => Ok(InMemoryCatalog::new(load_catalog(path)?)),
        None => {
            info!("No catalog file configured, using built-in price list");
            Ok(InMemoryCatalog::with_defaults())
        }
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn builtin_catalog_when_no_path() {
        let catalog = build_catalog(&AppConfig::default()).unwrap();
        assert_eq!(catalog.plan_count(), 3);
        assert_eq!(catalog.plugin_count(), 4);
    }

    #[test]
    fn missing_catalog_file_fails_startup() {
        let mut cfg = AppConfig::default();
        cfg.catalog.path = Some(PathBuf::from("/nonexistent/catalog.toml"));
        assert!(matches!(build_catalog(&cfg), Err(InfraError::Io(_))));
    }

    #[tokio::test]
    async fn start_serve_and_shutdown() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.shutdown_timeout = 5;

        // Port 0 is rejected by validation, so bind an ephemeral port first.
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        cfg.server.port = probe.local_addr().unwrap().port();
        drop(probe);

        let handle = ServerHandle::start(ServerOptions { config: cfg }).await.unwrap();
        assert!(handle.is_running());
        assert_eq!(handle.service.currency(), "EUR");

        handle.shutdown().await;
    }
}
