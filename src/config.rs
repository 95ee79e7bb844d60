//! Configuration module
//!
//! The service reads a TOML file (default `~/.config/erp-pricing/config.toml`,
//! overridable with `ERP_PRICING_CONFIG`). Every section has defaults so a
//! partial file, or none at all, still yields a runnable configuration.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_VAT_PERCENT;
use crate::shared::errors::InfraError;

/// Environment variable holding an explicit config file path.
pub const CONFIG_ENV_VAR: &str = "ERP_PRICING_CONFIG";

/// Default config location: `<config dir>/erp-pricing/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("erp-pricing").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Config path from `ERP_PRICING_CONFIG`, falling back to [`default_config_path`].
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`; `RUST_LOG` wins when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// VAT applied to quotes that do not carry their own rate
    #[serde(with = "rust_decimal::serde::float")]
    pub default_vat_percent: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_vat_percent: DEFAULT_VAT_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog TOML file; the built-in price list is used when unset
    pub path: Option<PathBuf>,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub pricing: PricingConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, InfraError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.server.host.trim().is_empty() {
            return Err(InfraError::Config("server.host must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(InfraError::Config("server.port must be non-zero".into()));
        }
        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(InfraError::Config(format!(
                    "logging.format must be 'pretty' or 'json', got '{}'",
                    other
                )))
            }
        }
        let vat = self.pricing.default_vat_percent;
        if vat < Decimal::ZERO || vat > Decimal::ONE_HUNDRED {
            return Err(InfraError::Config(format!(
                "pricing.default_vat_percent must be within 0..=100, got {}",
                vat
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.pricing.default_vat_percent, Decimal::from(24));
        assert!(cfg.catalog.path.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
[server]
port = 9090

[pricing]
default_vat_percent = 13.5

[catalog]
path = "/etc/erp-pricing/catalog.toml"
"#,
        )
        .unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.pricing.default_vat_percent, "13.5".parse().unwrap());
        assert_eq!(
            cfg.catalog.path,
            Some(PathBuf::from("/etc/erp-pricing/catalog.toml"))
        );
    }

    #[test]
    fn zero_port_is_rejected() {
        let err = AppConfig::from_toml_str("[server]\nport = 0\n").unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = AppConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn out_of_range_vat_is_rejected() {
        assert!(AppConfig::from_toml_str("[pricing]\ndefault_vat_percent = -1\n").is_err());
        assert!(AppConfig::from_toml_str("[pricing]\ndefault_vat_percent = 101\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load(Path::new("/nonexistent/erp-pricing.toml")).unwrap_err();
        assert!(matches!(err, InfraError::Io(_)));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
